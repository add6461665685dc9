use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::buffer::MediaBuffer;
use crate::models::config::LevelEffectConfig;
use crate::models::error::PipelineError;
use crate::models::format::MediaFormat;
use crate::processing::level_calculator::LevelCalculator;
use crate::traits::codec::Codec;
use crate::traits::level_listener::SimpleAudioLevelListener;

/// Pass-through codec plug-in that measures the audio level of every frame
/// it sees and reports it to a single listener.
///
/// Only one listener is kept. Level callbacks arrive at frame rate, so a
/// listener list with per-call copies is not worth its cost here; a new
/// registration replaces the previous one. Without a listener the effect
/// only copies frames.
///
/// Changing the listener drops the measurement history, so a new listener
/// never sees a level decaying from frames measured before it was set, and
/// `last_level` is `None` until the next measured frame.
pub struct AudioLevelEffect {
    listener: Mutex<Option<Arc<dyn SimpleAudioLevelListener>>>,
    calculator: Mutex<LevelCalculator>,
    input_format: Mutex<Option<MediaFormat>>,
}

impl AudioLevelEffect {
    pub fn new() -> Self {
        Self::with_config(LevelEffectConfig::default())
    }

    pub fn with_config(config: LevelEffectConfig) -> Self {
        Self {
            listener: Mutex::new(None),
            calculator: Mutex::new(LevelCalculator::new(config)),
            input_format: Mutex::new(None),
        }
    }

    /// Set the listener notified of level readings. `None` removes the current one.
    pub fn set_audio_level_listener(&self, listener: Option<Arc<dyn SimpleAudioLevelListener>>) {
        *self.listener.lock() = listener;
        self.calculator.lock().reset();
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// The level most recently measured, if any.
    pub fn last_level(&self) -> Option<i32> {
        self.calculator.lock().last_level()
    }

    /// The format negotiated by the pipeline, if any.
    pub fn input_format(&self) -> Option<MediaFormat> {
        self.input_format.lock().clone()
    }
}

impl Default for AudioLevelEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for AudioLevelEffect {
    fn name(&self) -> &str {
        "Audio Level Effect"
    }

    fn set_input_format(&self, format: &MediaFormat) -> Option<MediaFormat> {
        if !format.is_audio() {
            return None;
        }
        *self.input_format.lock() = Some(format.clone());
        Some(format.clone())
    }

    fn reset(&self) {
        self.calculator.lock().reset();
    }

    fn process(&self, input: &MediaBuffer, output: &mut MediaBuffer) -> Result<(), PipelineError> {
        output.copy_from(input);

        // Clone out of the slot so the listener runs without our lock held.
        let Some(listener) = self.listener.lock().clone() else {
            return Ok(());
        };
        if input.discard || input.is_empty() {
            return Ok(());
        }
        let Some(format) = input.format.as_audio() else {
            return Ok(());
        };

        let (level, notify) = {
            let mut calculator = self.calculator.lock();
            let previous = calculator.last_level();
            let Some(level) = calculator.measure(&input.data, format) else {
                return Ok(());
            };
            let notify = !calculator.config().notify_on_change_only || previous != Some(level);
            (level, notify)
        };

        if notify {
            listener.audio_level_changed(level);
        }
        Ok(())
    }
}
