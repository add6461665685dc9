/// Receives audio level readings from a level effect.
///
/// Called once per measured frame (typically ~50 times a second) on the
/// pipeline's processing thread. Keep implementations cheap.
pub trait SimpleAudioLevelListener: Send + Sync {
    /// `level` is in `MIN_LEVEL..=MAX_LEVEL`.
    fn audio_level_changed(&self, level: i32);
}

impl<F> SimpleAudioLevelListener for F
where
    F: Fn(i32) + Send + Sync,
{
    fn audio_level_changed(&self, level: i32) {
        self(level)
    }
}
