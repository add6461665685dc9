use std::sync::Arc;

use crate::models::error::PipelineError;
use crate::models::event::ControllerEvent;
use crate::models::state::ProcessorState;
use crate::traits::track_control::TrackControl;

/// Receives lifecycle events from a `Processor`.
///
/// Called synchronously on the thread that caused the transition. The
/// processor does not hold internal locks during the call, so listeners may
/// call back into it (for example to realize after configuration).
pub trait ControllerListener: Send + Sync {
    fn controller_update(&self, processor: &dyn Processor, event: &ControllerEvent);
}

impl<F> ControllerListener for F
where
    F: Fn(&dyn Processor, &ControllerEvent) + Send + Sync,
{
    fn controller_update(&self, processor: &dyn Processor, event: &ControllerEvent) {
        self(processor, event)
    }
}

/// A media processor: reads a source, runs each track through its codec
/// chain, and produces output.
///
/// Implemented by pipeline backends (see `audio-level-pipeline`).
pub trait Processor: Send + Sync {
    fn state(&self) -> ProcessorState;

    /// Per-track controls, in track order.
    ///
    /// Fails with `NotConfigured` before configuration completes.
    fn track_controls(&self) -> Result<Vec<Arc<dyn TrackControl>>, PipelineError>;

    fn add_controller_listener(&self, listener: Arc<dyn ControllerListener>);

    /// Transitions: unrealized → configuring → configured. Emits `ConfigureComplete`.
    fn configure(&self) -> Result<(), PipelineError>;

    /// Transitions: configured → realizing → realized. Emits `RealizeComplete`.
    fn realize(&self) -> Result<(), PipelineError>;

    /// Transitions: realized → started. Emits `Started`.
    fn start(&self) -> Result<(), PipelineError>;

    /// Transitions: started → realized. Emits `Stopped`.
    fn stop(&self) -> Result<(), PipelineError>;

    /// Release the processor. Emits `Closed`. Closing twice is a no-op.
    fn close(&self);
}
