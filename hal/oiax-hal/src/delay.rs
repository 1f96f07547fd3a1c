//! Blocking delay abstraction
//!
//! The SCI device needs fixed settle times after certain commands (mode
//! changes, baud switches, wake pulses) before it accepts the next byte.
//! The driver expresses those waits through this trait so host tests can
//! observe them instead of actually sleeping.

/// Blocking millisecond delay source
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
