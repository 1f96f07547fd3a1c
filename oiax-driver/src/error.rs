//! Driver error types

use oiax_protocol::{CommandError, OperatingMode};

/// Errors surfaced by a driver session
///
/// `E` is the transport's error type. Transport failures are propagated
/// as-is, never retried; retry policy belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// A parameter violated its documented range; nothing was sent
    Command(CommandError),

    /// The operation is incompatible with the current operating mode
    ///
    /// Raised before any bytes are sent, most commonly for a
    /// mode-restricted command while the interface is still `Off`.
    NotReady {
        current: OperatingMode,
        required: OperatingMode,
    },

    /// Serial transport failure
    ///
    /// The mode tracked by the session is only ever committed after a
    /// successful send, so on this error it still reflects the last
    /// acknowledged transition. Bytes already written are not rolled
    /// back.
    Serial(E),
}

impl<E> From<CommandError> for DriverError<E> {
    fn from(err: CommandError) -> Self {
        DriverError::Command(err)
    }
}
