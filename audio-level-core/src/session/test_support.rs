//! Minimal in-crate processor used by session tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::buffer::MediaBuffer;
use crate::models::error::PipelineError;
use crate::models::event::ControllerEvent;
use crate::models::format::MediaFormat;
use crate::models::state::ProcessorState;
use crate::traits::codec::Codec;
use crate::traits::processor::{ControllerListener, Processor};
use crate::traits::track_control::TrackControl;

struct MockTrackInner {
    format: MediaFormat,
    accepts_plugins: bool,
    enabled: AtomicBool,
    locked: AtomicBool,
    chain: Mutex<Option<Vec<Arc<dyn Codec>>>>,
}

#[derive(Clone)]
pub(crate) struct MockTrack(Arc<MockTrackInner>);

impl MockTrack {
    pub(crate) fn new(format: MediaFormat) -> Self {
        Self::build(format, true)
    }

    pub(crate) fn rejecting(format: MediaFormat) -> Self {
        Self::build(format, false)
    }

    fn build(format: MediaFormat, accepts_plugins: bool) -> Self {
        Self(Arc::new(MockTrackInner {
            format,
            accepts_plugins,
            enabled: AtomicBool::new(true),
            locked: AtomicBool::new(false),
            chain: Mutex::new(None),
        }))
    }

    pub(crate) fn chain_len(&self) -> Option<usize> {
        self.0.chain.lock().as_ref().map(Vec::len)
    }

    /// Run a buffer through the installed chain.
    pub(crate) fn push(&self, buffer: MediaBuffer) -> MediaBuffer {
        let chain = self.0.chain.lock().clone().unwrap_or_default();
        let mut current = buffer;
        for codec in chain {
            let mut output = MediaBuffer::empty(current.format.clone());
            codec.process(&current, &mut output).unwrap();
            current = output;
        }
        current
    }
}

impl TrackControl for MockTrack {
    fn format(&self) -> MediaFormat {
        self.0.format.clone()
    }

    fn is_enabled(&self) -> bool {
        self.0.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.0.enabled.store(enabled, Ordering::SeqCst);
    }

    fn set_codec_chain(&self, chain: Vec<Arc<dyn Codec>>) -> Result<(), PipelineError> {
        if !self.0.accepts_plugins {
            return Err(PipelineError::UnsupportedPlugIn("mock track".into()));
        }
        if self.0.locked.load(Ordering::SeqCst) {
            return Err(PipelineError::NotConfigured("mock track realized".into()));
        }
        *self.0.chain.lock() = Some(chain);
        Ok(())
    }
}

pub(crate) struct MockProcessor {
    tracks: Vec<MockTrack>,
    state: Mutex<ProcessorState>,
    listeners: Mutex<Vec<Arc<dyn ControllerListener>>>,
}

impl MockProcessor {
    pub(crate) fn new(tracks: Vec<MockTrack>) -> Self {
        Self {
            tracks,
            state: Mutex::new(ProcessorState::Unrealized),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn configured(tracks: Vec<MockTrack>) -> Self {
        let processor = Self::new(tracks);
        *processor.state.lock() = ProcessorState::Configured;
        processor
    }

    fn transition(
        &self,
        from: ProcessorState,
        to: ProcessorState,
        event: ControllerEvent,
    ) -> Result<(), PipelineError> {
        {
            let mut state = self.state.lock();
            if *state != from {
                return Err(PipelineError::InvalidState(format!("{:?}", *state)));
            }
            *state = to;
        }
        self.emit(&event);
        Ok(())
    }

    fn emit(&self, event: &ControllerEvent) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.controller_update(self, event);
        }
    }
}

impl Processor for MockProcessor {
    fn state(&self) -> ProcessorState {
        *self.state.lock()
    }

    fn track_controls(&self) -> Result<Vec<Arc<dyn TrackControl>>, PipelineError> {
        if !self.state().is_configured() {
            return Err(PipelineError::NotConfigured("mock processor".into()));
        }
        Ok(self
            .tracks
            .iter()
            .map(|t| Arc::new(t.clone()) as Arc<dyn TrackControl>)
            .collect())
    }

    fn add_controller_listener(&self, listener: Arc<dyn ControllerListener>) {
        self.listeners.lock().push(listener);
    }

    fn configure(&self) -> Result<(), PipelineError> {
        self.transition(
            ProcessorState::Unrealized,
            ProcessorState::Configured,
            ControllerEvent::ConfigureComplete,
        )
    }

    fn realize(&self) -> Result<(), PipelineError> {
        for track in &self.tracks {
            track.0.locked.store(true, Ordering::SeqCst);
        }
        self.transition(
            ProcessorState::Configured,
            ProcessorState::Realized,
            ControllerEvent::RealizeComplete,
        )
    }

    fn start(&self) -> Result<(), PipelineError> {
        self.transition(
            ProcessorState::Realized,
            ProcessorState::Started,
            ControllerEvent::Started,
        )
    }

    fn stop(&self) -> Result<(), PipelineError> {
        self.transition(
            ProcessorState::Started,
            ProcessorState::Realized,
            ControllerEvent::Stopped,
        )
    }

    fn close(&self) {
        {
            let mut state = self.state.lock();
            if state.is_closed() {
                return;
            }
            *state = ProcessorState::Closed;
        }
        self.emit(&ControllerEvent::Closed);
    }
}
