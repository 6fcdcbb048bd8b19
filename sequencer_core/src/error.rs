/// Failure to turn a dequeued message into a sample.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The first byte of the message is not the tag of a known channel.
    UnknownTag(u8),
}

impl DispatchError {
    pub fn error_description(&self) -> &'static str {
        match self {
            DispatchError::UnknownTag(_) => "Internal message handling error",
        }
    }
}

/// Output line driven by the threshold monitor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputKind {
    PowerTrigger,
    StatusIndicator,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    Dispatch(DispatchError),
    Output(OutputKind),
}

impl SequencerError {
    pub fn error_description(&self) -> &'static str {
        match self {
            SequencerError::Dispatch(e) => e.error_description(),
            SequencerError::Output(OutputKind::PowerTrigger) => {
                "Failed to toggle compute module trigger pin"
            }
            SequencerError::Output(OutputKind::StatusIndicator) => "Failed to set LED state",
        }
    }

    /// Only a corrupted message stream stops the sequencer.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SequencerError::Dispatch(_))
    }
}

impl From<DispatchError> for SequencerError {
    fn from(e: DispatchError) -> Self {
        SequencerError::Dispatch(e)
    }
}
