pub mod audio_session;
pub mod registrar;

#[cfg(test)]
pub(crate) mod test_support;
