/// Processor state machine.
///
/// State transitions:
/// ```text
/// unrealized → configuring → configured → realizing → realized ↔ started
///                                                        ↓
///                                                      closed
/// ```
/// Any state may move to `Closed`. Variants are ordered so that
/// `state >= ProcessorState::Configured` means track controls are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessorState {
    Unrealized,
    Configuring,
    Configured,
    Realizing,
    Realized,
    Started,
    Closed,
}

impl ProcessorState {
    /// Whether track controls can be queried.
    pub fn is_configured(&self) -> bool {
        *self >= Self::Configured && *self != Self::Closed
    }

    /// Whether codec chains can still be replaced.
    pub fn accepts_codec_chain(&self) -> bool {
        matches!(self, Self::Configured)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
