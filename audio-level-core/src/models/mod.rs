pub mod buffer;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod levels;
pub mod state;
