pub mod codec;
pub mod level_listener;
pub mod processor;
pub mod track_control;
