use dp_core::SlotId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    /// The wait was interrupted by shutdown.  Not a failure: callers exit
    /// their loop quietly.
    #[error("acquisition cancelled by shutdown")]
    Cancelled,

    #[error("{slot} is outside a ring of {len} slots")]
    SlotOutOfRange { slot: SlotId, len: usize },

    #[error("{0} channel disconnected")]
    Disconnected(SlotId),
}

pub type RingResult<T> = Result<T, RingError>;
