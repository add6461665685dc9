use crate::models::buffer::MediaBuffer;
use crate::models::error::PipelineError;
use crate::models::format::MediaFormat;

/// A plug-in in a track's codec chain.
///
/// Chains hold plug-ins as `Arc<dyn Codec>`, so the same instance may stay
/// reachable from its owner while the pipeline drives it. All methods take
/// `&self`; implementations keep their own synchronization.
pub trait Codec: Send + Sync {
    /// Human-readable plug-in name, used in logs.
    fn name(&self) -> &str;

    /// Offer the format this plug-in will receive.
    ///
    /// Returns the format it will produce, or `None` if the input is not supported.
    fn set_input_format(&self, format: &MediaFormat) -> Option<MediaFormat>;

    /// Acquire resources before the first `process` call.
    fn open(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Release resources. The plug-in may be reopened later.
    fn close(&self) {}

    /// Drop any per-stream state.
    fn reset(&self) {}

    /// Transform `input` into `output`.
    fn process(&self, input: &MediaBuffer, output: &mut MediaBuffer) -> Result<(), PipelineError>;
}
