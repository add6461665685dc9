//! Codec plug-ins shared by the backend tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use audio_level_core::models::buffer::MediaBuffer;
use audio_level_core::models::error::PipelineError;
use audio_level_core::models::format::MediaFormat;
use audio_level_core::traits::codec::Codec;

/// Pass-through plug-in that counts `open`/`close` calls and can be made to
/// fail on `open`.
#[derive(Default)]
pub(crate) struct CountingCodec {
    fail_open: bool,
    opens: AtomicUsize,
    closes: AtomicUsize,
}

impl CountingCodec {
    pub(crate) fn failing() -> Self {
        Self {
            fail_open: true,
            ..Default::default()
        }
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Codec for CountingCodec {
    fn name(&self) -> &str {
        "Counting Codec"
    }

    fn set_input_format(&self, format: &MediaFormat) -> Option<MediaFormat> {
        Some(format.clone())
    }

    fn open(&self) -> Result<(), PipelineError> {
        if self.fail_open {
            return Err(PipelineError::ProcessingFailed("open refused".into()));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn process(&self, input: &MediaBuffer, output: &mut MediaBuffer) -> Result<(), PipelineError> {
        output.copy_from(input);
        Ok(())
    }
}
