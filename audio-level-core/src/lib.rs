//! # audio-level-core
//!
//! Platform-agnostic audio level metering for media processor pipelines.
//!
//! Attaches a pass-through level effect to the first audio track of a
//! processor once it finishes configuring, and forwards the measured levels
//! to a single registered listener. Pipeline backends implement the
//! `Processor` and `TrackControl` traits and plug into `AudioDeviceSession`.
//!
//! ## Architecture
//!
//! ```text
//! audio-level-core (this crate)
//! ├── traits/       ← Processor, TrackControl, Codec, ControllerListener, SimpleAudioLevelListener
//! ├── models/       ← PipelineError, MediaFormat, MediaBuffer, ControllerEvent, config, etc.
//! ├── processing/   ← LevelCalculator, AudioLevelEffect
//! └── session/      ← level effect registrar, AudioDeviceSession
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::buffer::MediaBuffer;
pub use models::config::{LevelEffectConfig, SessionConfiguration};
pub use models::error::PipelineError;
pub use models::event::ControllerEvent;
pub use models::format::{AudioEncoding, AudioFormat, Endian, MediaFormat, VideoFormat};
pub use models::levels::{AudioDevice, AudioLevels, MAX_LEVEL, MIN_LEVEL};
pub use models::state::ProcessorState;
pub use processing::level_calculator::LevelCalculator;
pub use processing::level_effect::AudioLevelEffect;
pub use session::audio_session::AudioDeviceSession;
pub use session::registrar::{install_level_effect, EffectTarget};
pub use traits::codec::Codec;
pub use traits::level_listener::SimpleAudioLevelListener;
pub use traits::processor::{ControllerListener, Processor};
pub use traits::track_control::TrackControl;
