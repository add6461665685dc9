use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use audio_level_core::models::buffer::MediaBuffer;
use audio_level_core::models::error::PipelineError;
use audio_level_core::models::event::ControllerEvent;
use audio_level_core::models::format::MediaFormat;
use audio_level_core::models::state::ProcessorState;
use audio_level_core::traits::processor::{ControllerListener, Processor};
use audio_level_core::traits::track_control::TrackControl;

use crate::software_track::SoftwareTrackControl;

/// In-memory media processor.
///
/// Tracks are fixed at construction. Buffers are pushed in by the caller
/// with `process` once the processor has started, and come back out after
/// running through the track's codec chain.
///
/// Controller listeners are called synchronously with no internal lock
/// held, so a listener may drive the processor further (for example call
/// `realize` from `ConfigureComplete`).
pub struct SoftwareProcessor {
    name: String,
    tracks: Vec<Arc<SoftwareTrackControl>>,
    state: Mutex<ProcessorState>,
    listeners: Mutex<Vec<Arc<dyn ControllerListener>>>,
    frames_processed: AtomicU64,
}

impl SoftwareProcessor {
    pub fn new(name: impl Into<String>, tracks: Vec<SoftwareTrackControl>) -> Self {
        Self {
            name: name.into(),
            tracks: tracks.into_iter().map(Arc::new).collect(),
            state: Mutex::new(ProcessorState::Unrealized),
            listeners: Mutex::new(Vec::new()),
            frames_processed: AtomicU64::new(0),
        }
    }

    /// A processor with one plug-in capable track per format.
    pub fn from_formats(name: impl Into<String>, formats: impl IntoIterator<Item = MediaFormat>) -> Self {
        Self::new(name, formats.into_iter().map(SoftwareTrackControl::new).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn track(&self, index: usize) -> Option<&Arc<SoftwareTrackControl>> {
        self.tracks.get(index)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed.load(Ordering::Relaxed)
    }

    /// Run one buffer through the codec chain of track `track_index`.
    ///
    /// Disabled tracks return the buffer untouched.
    pub fn process(&self, track_index: usize, buffer: MediaBuffer) -> Result<MediaBuffer, PipelineError> {
        let state = self.state();
        if state != ProcessorState::Started {
            return Err(PipelineError::InvalidState(format!(
                "{} cannot process while {:?}",
                self.name, state
            )));
        }
        let track = self
            .tracks
            .get(track_index)
            .ok_or(PipelineError::NoSuchTrack(track_index))?;
        if !track.is_enabled() {
            return Ok(buffer);
        }

        let output = track.process(buffer)?;
        self.frames_processed.fetch_add(1, Ordering::Relaxed);
        Ok(output)
    }

    fn set_state(&self, state: ProcessorState) {
        *self.state.lock() = state;
    }

    fn emit(&self, event: ControllerEvent) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.controller_update(self, &event);
        }
    }

    fn fail_realize(&self, error: PipelineError) -> Result<(), PipelineError> {
        log::error!("[{}] Realize failed: {}", self.name, error);
        self.set_state(ProcessorState::Configured);
        self.emit(ControllerEvent::Error(error.to_string()));
        Err(error)
    }
}

impl Processor for SoftwareProcessor {
    fn state(&self) -> ProcessorState {
        *self.state.lock()
    }

    fn track_controls(&self) -> Result<Vec<Arc<dyn TrackControl>>, PipelineError> {
        let state = self.state();
        if !state.is_configured() {
            return Err(PipelineError::NotConfigured(format!(
                "{} is {:?}",
                self.name, state
            )));
        }
        Ok(self
            .tracks
            .iter()
            .map(|track| Arc::clone(track) as Arc<dyn TrackControl>)
            .collect())
    }

    fn add_controller_listener(&self, listener: Arc<dyn ControllerListener>) {
        self.listeners.lock().push(listener);
    }

    fn configure(&self) -> Result<(), PipelineError> {
        {
            let mut state = self.state.lock();
            match *state {
                ProcessorState::Unrealized => *state = ProcessorState::Configuring,
                ProcessorState::Closed => {
                    return Err(PipelineError::InvalidState(format!("{} is closed", self.name)))
                }
                _ => return Ok(()),
            }
        }

        log::debug!("[{}] Configured {} track(s)", self.name, self.tracks.len());
        self.set_state(ProcessorState::Configured);
        self.emit(ControllerEvent::ConfigureComplete);
        Ok(())
    }

    fn realize(&self) -> Result<(), PipelineError> {
        {
            let mut state = self.state.lock();
            match *state {
                ProcessorState::Configured => *state = ProcessorState::Realizing,
                ProcessorState::Realized | ProcessorState::Started => return Ok(()),
                other => {
                    return Err(PipelineError::NotConfigured(format!(
                        "{} cannot realize while {:?}",
                        self.name, other
                    )))
                }
            }
        }

        let enabled: Vec<_> = self.tracks.iter().filter(|t| t.is_enabled()).collect();
        for track in &enabled {
            if let Err(e) = track.negotiate() {
                return self.fail_realize(e);
            }
        }
        for (opened, track) in enabled.iter().enumerate() {
            if let Err(e) = track.open_chain() {
                enabled[..opened].iter().for_each(|track| track.close_chain());
                return self.fail_realize(e);
            }
        }
        for track in &self.tracks {
            track.lock_chain();
        }

        log::debug!("[{}] Realized", self.name);
        self.set_state(ProcessorState::Realized);
        self.emit(ControllerEvent::RealizeComplete);
        Ok(())
    }

    fn start(&self) -> Result<(), PipelineError> {
        {
            let mut state = self.state.lock();
            match *state {
                ProcessorState::Realized => *state = ProcessorState::Started,
                ProcessorState::Started => return Ok(()),
                other => {
                    return Err(PipelineError::InvalidState(format!(
                        "{} cannot start while {:?}",
                        self.name, other
                    )))
                }
            }
        }
        self.emit(ControllerEvent::Started);
        Ok(())
    }

    fn stop(&self) -> Result<(), PipelineError> {
        {
            let mut state = self.state.lock();
            match *state {
                ProcessorState::Started => *state = ProcessorState::Realized,
                ProcessorState::Realized => return Ok(()),
                other => {
                    return Err(PipelineError::InvalidState(format!(
                        "{} cannot stop while {:?}",
                        self.name, other
                    )))
                }
            }
        }
        self.emit(ControllerEvent::Stopped);
        Ok(())
    }

    fn close(&self) {
        let previous = {
            let mut state = self.state.lock();
            if state.is_closed() {
                return;
            }
            std::mem::replace(&mut *state, ProcessorState::Closed)
        };

        if previous >= ProcessorState::Realized {
            for track in &self.tracks {
                track.close_chain();
            }
        }
        log::debug!("[{}] Closed", self.name);
        self.emit(ControllerEvent::Closed);
    }
}
