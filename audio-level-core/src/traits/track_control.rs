use std::sync::Arc;

use crate::models::error::PipelineError;
use crate::models::format::MediaFormat;
use crate::traits::codec::Codec;

/// Per-track configuration handle within a media processor.
pub trait TrackControl: Send + Sync {
    /// Format of the media on this track.
    fn format(&self) -> MediaFormat;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&self, enabled: bool);

    /// Replace the track's codec chain.
    ///
    /// Fails with `UnsupportedPlugIn` when the track does not accept plug-ins
    /// and with `NotConfigured` when the processor is past the configured state.
    fn set_codec_chain(&self, chain: Vec<Arc<dyn Codec>>) -> Result<(), PipelineError>;
}
