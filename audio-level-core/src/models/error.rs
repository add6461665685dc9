use thiserror::Error;

/// Errors raised by processors, track controls and codec plug-ins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("plug-in not supported: {0}")]
    UnsupportedPlugIn(String),

    #[error("processor not configured: {0}")]
    NotConfigured(String),

    #[error("invalid processor state: {0}")]
    InvalidState(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("no such track: {0}")]
    NoSuchTrack(usize),

    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
