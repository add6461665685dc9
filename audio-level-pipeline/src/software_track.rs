use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use audio_level_core::models::buffer::MediaBuffer;
use audio_level_core::models::error::PipelineError;
use audio_level_core::models::format::MediaFormat;
use audio_level_core::traits::codec::Codec;
use audio_level_core::traits::track_control::TrackControl;

/// In-memory track control.
///
/// Holds a codec chain that `SoftwareProcessor` runs every buffer of the
/// track through. The chain can be replaced until the owning processor
/// realizes.
pub struct SoftwareTrackControl {
    format: MediaFormat,
    accepts_plugins: bool,
    enabled: AtomicBool,
    chain_locked: AtomicBool,
    chain_open: AtomicBool,
    chain: Mutex<Vec<Arc<dyn Codec>>>,
}

impl SoftwareTrackControl {
    pub fn new(format: MediaFormat) -> Self {
        Self::build(format, true)
    }

    /// A track that refuses every codec chain with `UnsupportedPlugIn`.
    pub fn without_plugins(format: MediaFormat) -> Self {
        Self::build(format, false)
    }

    fn build(format: MediaFormat, accepts_plugins: bool) -> Self {
        Self {
            format,
            accepts_plugins,
            enabled: AtomicBool::new(true),
            chain_locked: AtomicBool::new(false),
            chain_open: AtomicBool::new(false),
            chain: Mutex::new(Vec::new()),
        }
    }

    pub fn codec_chain(&self) -> Vec<Arc<dyn Codec>> {
        self.chain.lock().clone()
    }

    pub fn accepts_plugins(&self) -> bool {
        self.accepts_plugins
    }

    pub(crate) fn lock_chain(&self) {
        self.chain_locked.store(true, Ordering::SeqCst);
    }

    /// Offer the track format to each plug-in in order, feeding each output
    /// format to the next plug-in. Returns the format leaving the chain.
    pub(crate) fn negotiate(&self) -> Result<MediaFormat, PipelineError> {
        let mut format = self.format.clone();
        for codec in self.chain.lock().iter() {
            format = codec.set_input_format(&format).ok_or_else(|| {
                PipelineError::UnsupportedFormat(format!("{} rejected {:?}", codec.name(), format))
            })?;
        }
        Ok(format)
    }

    /// Open every plug-in in order. If one fails, the plug-ins opened
    /// before it are closed again.
    pub(crate) fn open_chain(&self) -> Result<(), PipelineError> {
        let chain = self.chain.lock();
        for (index, codec) in chain.iter().enumerate() {
            if let Err(e) = codec.open() {
                log::warn!("{} failed to open: {}", codec.name(), e);
                chain[..index].iter().for_each(|codec| codec.close());
                return Err(e);
            }
        }
        self.chain_open.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Close the plug-ins if `open_chain` succeeded. No-op otherwise.
    pub(crate) fn close_chain(&self) {
        if !self.chain_open.swap(false, Ordering::SeqCst) {
            return;
        }
        for codec in self.chain.lock().iter() {
            codec.close();
        }
    }

    /// Run `buffer` through every plug-in of the chain.
    pub(crate) fn process(&self, buffer: MediaBuffer) -> Result<MediaBuffer, PipelineError> {
        let chain = self.codec_chain();
        let mut current = buffer;
        for codec in chain {
            let mut output = MediaBuffer::empty(current.format.clone());
            codec.process(&current, &mut output)?;
            if output.discard {
                return Ok(output);
            }
            current = output;
        }
        Ok(current)
    }
}

impl TrackControl for SoftwareTrackControl {
    fn format(&self) -> MediaFormat {
        self.format.clone()
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn set_codec_chain(&self, chain: Vec<Arc<dyn Codec>>) -> Result<(), PipelineError> {
        if !self.accepts_plugins {
            return Err(PipelineError::UnsupportedPlugIn(
                "track does not accept codec plug-ins".into(),
            ));
        }
        if self.chain_locked.load(Ordering::SeqCst) {
            return Err(PipelineError::NotConfigured(
                "codec chain cannot change after realize".into(),
            ));
        }
        *self.chain.lock() = chain;
        Ok(())
    }
}
