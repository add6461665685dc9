use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::config::SessionConfiguration;
use crate::models::error::PipelineError;
use crate::models::event::ControllerEvent;
use crate::models::levels::{AudioDevice, AudioLevels};
use crate::models::state::ProcessorState;
use crate::processing::level_effect::AudioLevelEffect;
use crate::session::registrar::{install_level_effect, EffectTarget};
use crate::traits::codec::Codec;
use crate::traits::level_listener::SimpleAudioLevelListener;
use crate::traits::processor::Processor;

/// A received stream and the level effect measuring it.
struct ReceiveStream {
    processor: Arc<dyn Processor>,
    effect: Arc<AudioLevelEffect>,
}

/// The use of an audio device by a media stream.
///
/// Owns one level effect measuring audio captured from the local device and
/// one per received stream. Each effect is installed on the first audio
/// track of its processor when that processor finishes configuring. The
/// local effect and the receive streams each report to at most one listener.
///
/// ```text
/// [capture processor]   ─ ConfigureComplete → install local effect → realize
/// [stream processor #n] ─ ConfigureComplete → install effect #n → realize → start
/// ```
pub struct AudioDeviceSession {
    id: Uuid,
    device: AudioDevice,
    config: SessionConfiguration,
    local_effect: Arc<AudioLevelEffect>,
    stream_listener: Mutex<Option<Arc<dyn SimpleAudioLevelListener>>>,
    capture: Mutex<Option<Arc<dyn Processor>>>,
    receive_streams: Mutex<HashMap<u32, ReceiveStream>>,
    this: Weak<AudioDeviceSession>,
}

impl AudioDeviceSession {
    pub fn new(device: AudioDevice, config: SessionConfiguration) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            id: Uuid::new_v4(),
            device,
            config,
            local_effect: Arc::new(AudioLevelEffect::with_config(config.level_effect)),
            stream_listener: Mutex::new(None),
            capture: Mutex::new(None),
            receive_streams: Mutex::new(HashMap::new()),
            this: this.clone(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn device(&self) -> &AudioDevice {
        &self.device
    }

    pub fn config(&self) -> &SessionConfiguration {
        &self.config
    }

    /// Set the listener notified of the local user's audio level.
    ///
    /// Only one listener is kept; a new one replaces the previous one and
    /// `None` removes it. May be called before or after the capture
    /// processor is connected.
    pub fn set_local_user_audio_level_listener(
        &self,
        listener: Option<Arc<dyn SimpleAudioLevelListener>>,
    ) {
        self.local_effect.set_audio_level_listener(listener);
    }

    /// Set the listener notified of the audio level received from the remote party.
    ///
    /// Same single-slot semantics as the local listener. Every receive
    /// stream reports through this one listener, each measured on its own.
    pub fn set_stream_audio_level_listener(
        &self,
        listener: Option<Arc<dyn SimpleAudioLevelListener>>,
    ) {
        *self.stream_listener.lock() = listener.clone();
        let effects: Vec<_> = self
            .receive_streams
            .lock()
            .values()
            .map(|stream| Arc::clone(&stream.effect))
            .collect();
        for effect in effects {
            effect.set_audio_level_listener(listener.clone());
        }
    }

    pub fn local_effect(&self) -> &Arc<AudioLevelEffect> {
        &self.local_effect
    }

    /// The level effect of receive stream `ssrc`, if that stream was added.
    pub fn stream_effect(&self, ssrc: u32) -> Option<Arc<AudioLevelEffect>> {
        self.receive_streams
            .lock()
            .get(&ssrc)
            .map(|stream| Arc::clone(&stream.effect))
    }

    /// Last level measured on each side.
    ///
    /// With several receive streams, `stream` is the loudest of them.
    pub fn current_levels(&self) -> AudioLevels {
        let stream = self
            .receive_streams
            .lock()
            .values()
            .filter_map(|stream| stream.effect.last_level())
            .max();
        AudioLevels {
            local: self.local_effect.last_level(),
            stream,
        }
    }

    pub fn capture_processor(&self) -> Option<Arc<dyn Processor>> {
        self.capture.lock().clone()
    }

    pub fn receive_stream_count(&self) -> usize {
        self.receive_streams.lock().len()
    }

    /// Use `processor` as the capture processor and start configuring it.
    ///
    /// The local level effect is installed once configuration completes. A
    /// previously connected capture processor is closed.
    pub fn connect_capture(&self, processor: Arc<dyn Processor>) -> Result<(), PipelineError> {
        let previous = self.capture.lock().replace(Arc::clone(&processor));
        if let Some(previous) = previous {
            log::info!("[session {}] Replacing capture processor", self.id);
            previous.close();
        }

        let this = self.this.clone();
        processor.add_controller_listener(Arc::new(
            move |p: &dyn Processor, event: &ControllerEvent| {
                if let Some(session) = this.upgrade() {
                    session.processor_controller_update(p, event);
                }
            },
        ));

        let result = self.begin_configuration(processor.as_ref(), |p| {
            self.processor_controller_update(p, &ControllerEvent::ConfigureComplete)
        });
        if let Err(ref e) = result {
            log::error!("[session {}] Failed to configure capture processor: {}", self.id, e);
            self.capture.lock().take();
        }
        result
    }

    /// Handle a controller event from the capture processor.
    ///
    /// On configuration completion, installs the local level effect and
    /// moves the processor on to realization. Failures are logged only.
    pub fn processor_controller_update(&self, processor: &dyn Processor, event: &ControllerEvent) {
        match event {
            ControllerEvent::ConfigureComplete => {
                install_level_effect(processor, &self.local_effect, EffectTarget::LocalCapture);
                if let Err(e) = processor.realize() {
                    log::error!("[session {}] Failed to realize capture processor: {}", self.id, e);
                }
            }
            ControllerEvent::RealizeComplete => {
                log::info!("[session {}] Capture processor realized for {}", self.id, self.device);
            }
            ControllerEvent::Started | ControllerEvent::Stopped => {
                log::debug!("[session {}] Capture processor {:?}", self.id, event);
            }
            ControllerEvent::Closed => {
                log::debug!("[session {}] Capture processor closed", self.id);
            }
            ControllerEvent::Error(message) => {
                log::error!("[session {}] Capture processor error: {}", self.id, message);
            }
        }
    }

    /// Called when the processor of receive stream `ssrc` finishes configuring.
    ///
    /// Installs that stream's level effect on its first audio track.
    pub fn configure_completed(&self, ssrc: u32, processor: &dyn Processor) {
        let Some(effect) = self.stream_effect(ssrc) else {
            log::warn!("[session {}] Receive stream {} is no longer present", self.id, ssrc);
            return;
        };
        install_level_effect(processor, &effect, EffectTarget::ReceiveStream);
    }

    /// Start playing a received stream through `processor`.
    ///
    /// The stream gets its own level effect reporting to the stream listener.
    pub fn add_receive_stream(
        &self,
        ssrc: u32,
        processor: Arc<dyn Processor>,
    ) -> Result<(), PipelineError> {
        {
            let mut streams = self.receive_streams.lock();
            if streams.contains_key(&ssrc) {
                return Err(PipelineError::InvalidState(format!(
                    "receive stream {} already added",
                    ssrc
                )));
            }
            let effect = Arc::new(AudioLevelEffect::with_config(self.config.level_effect));
            effect.set_audio_level_listener(self.stream_listener.lock().clone());
            streams.insert(
                ssrc,
                ReceiveStream {
                    processor: Arc::clone(&processor),
                    effect,
                },
            );
        }

        let this = self.this.clone();
        processor.add_controller_listener(Arc::new(
            move |p: &dyn Processor, event: &ControllerEvent| {
                if let Some(session) = this.upgrade() {
                    session.stream_controller_update(ssrc, p, event);
                }
            },
        ));

        let result = self.begin_configuration(processor.as_ref(), |p| {
            self.stream_controller_update(ssrc, p, &ControllerEvent::ConfigureComplete)
        });
        if let Err(ref e) = result {
            log::error!("[session {}] Failed to configure receive stream {}: {}", self.id, ssrc, e);
            self.receive_streams.lock().remove(&ssrc);
        }
        result
    }

    /// Close the processor of a received stream and drop its level state.
    ///
    /// Returns `false` if no stream with that SSRC was added.
    pub fn remove_receive_stream(&self, ssrc: u32) -> bool {
        let Some(stream) = self.receive_streams.lock().remove(&ssrc) else {
            return false;
        };
        Self::close_stream(stream);
        log::info!("[session {}] Removed receive stream {}", self.id, ssrc);
        true
    }

    fn close_stream(stream: ReceiveStream) {
        stream.processor.close();
        stream.effect.set_audio_level_listener(None);
        stream.effect.reset();
    }

    fn stream_controller_update(&self, ssrc: u32, processor: &dyn Processor, event: &ControllerEvent) {
        match event {
            ControllerEvent::ConfigureComplete => {
                self.configure_completed(ssrc, processor);
                if let Err(e) = processor.realize() {
                    log::error!("[session {}] Failed to realize receive stream {}: {}", self.id, ssrc, e);
                }
            }
            ControllerEvent::RealizeComplete => {
                if self.config.start_receive_streams {
                    if let Err(e) = processor.start() {
                        log::error!("[session {}] Failed to start receive stream {}: {}", self.id, ssrc, e);
                    }
                }
            }
            ControllerEvent::Error(message) => {
                log::error!("[session {}] Receive stream {} error: {}", self.id, ssrc, message);
            }
            _ => log::debug!("[session {}] Receive stream {} {:?}", self.id, ssrc, event),
        }
    }

    /// Start the capture processor. It must have realized.
    pub fn start(&self) -> Result<(), PipelineError> {
        let processor = self.require_capture()?;
        processor.start().inspect_err(|e| {
            log::error!("[session {}] Failed to start capture: {}", self.id, e);
        })
    }

    pub fn stop(&self) -> Result<(), PipelineError> {
        let processor = self.require_capture()?;
        processor.stop()
    }

    /// Close the capture processor and every receive stream.
    pub fn close(&self) {
        let capture = self.capture.lock().take();
        if let Some(processor) = capture {
            processor.close();
        }
        let streams: Vec<_> = self.receive_streams.lock().drain().collect();
        for (_, stream) in streams {
            Self::close_stream(stream);
        }
        self.local_effect.reset();
        log::info!("[session {}] Closed {}", self.id, self.device);
    }

    fn require_capture(&self) -> Result<Arc<dyn Processor>, PipelineError> {
        self.capture
            .lock()
            .clone()
            .ok_or_else(|| PipelineError::InvalidState("no capture processor connected".into()))
    }

    /// Drive `processor` to the configured state.
    ///
    /// A processor that is already configured never emits `ConfigureComplete`
    /// again, so `configured` runs directly in that case.
    fn begin_configuration(
        &self,
        processor: &dyn Processor,
        configured: impl FnOnce(&dyn Processor),
    ) -> Result<(), PipelineError> {
        match processor.state() {
            ProcessorState::Unrealized => processor.configure(),
            ProcessorState::Configuring => Ok(()),
            ProcessorState::Configured => {
                configured(processor);
                Ok(())
            }
            state => Err(PipelineError::InvalidState(format!(
                "processor is already {:?}",
                state
            ))),
        }
    }
}

impl Drop for AudioDeviceSession {
    fn drop(&mut self) {
        self.close();
    }
}
