/// Lifecycle notifications emitted by a `Processor` to its controller listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Track controls are available and codec chains may be set.
    ConfigureComplete,
    RealizeComplete,
    Started,
    Stopped,
    Closed,
    Error(String),
}

impl ControllerEvent {
    pub fn is_configure_complete(&self) -> bool {
        matches!(self, Self::ConfigureComplete)
    }
}
