//! Operating-mode state machine
//!
//! The command interface is gated by four operating modes. Every legal
//! transition and its wire side effect is a function of the current mode
//! and the requested mode, expressed here as one exhaustive table so the
//! driver's tracked mode can never drift from the device's.

use crate::opcode;

/// Settle time after a mode-transition opcode before the next byte
pub const MODE_SETTLE_MS: u32 = 25;

/// Duration the wake line is held asserted when dropping to Passive
pub const WAKE_PULSE_MS: u32 = 550;

/// Command-interface operating modes
///
/// This is the state of the command interface, not of the battery: a
/// device in `Off` mode may well be powered, it just has not been sent
/// [`opcode::START`] yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatingMode {
    /// Interface not started; every restricted command is rejected
    #[default]
    Off,
    /// Interface started; actuator commands are silently ignored by the
    /// device until Safe or Full is entered
    Passive,
    /// Actuators enabled with hardware interlocks (cliff, wheel-drop)
    Safe,
    /// Actuators enabled, interlocks bypassed
    Full,
}

impl OperatingMode {
    /// Check if the interface has been started
    pub fn is_initialized(&self) -> bool {
        *self != OperatingMode::Off
    }

    /// Check if the device honors mode-restricted opcodes in this mode
    pub fn accepts_restricted(&self) -> bool {
        matches!(self, OperatingMode::Safe | OperatingMode::Full)
    }

    /// One step of the transition table toward `target`
    ///
    /// Returns what must happen on the wire before the step's mode may be
    /// adopted. A step never jumps more than one mode: reaching `Full`
    /// from `Passive` takes two steps (through `Safe`), each with its own
    /// opcode and settle delay. The caller applies steps until
    /// [`ModeStep::Done`].
    pub fn step_toward(self, target: OperatingMode) -> ModeStep {
        use ModeStep::*;
        use OperatingMode::*;

        match (self, target) {
            // Nothing can be commanded from Off; START must come first
            (Off, Off) => Done,
            (Off, Passive) | (Off, Safe) | (Off, Full) => NotInitialized,

            // Safe is one hop from either neighbor
            (Passive, Safe) => Send {
                opcode: opcode::CONTROL,
                next: Safe,
            },
            (Full, Safe) => Send {
                opcode: opcode::SAFE,
                next: Safe,
            },

            // Full is reached through Safe
            (Safe, Full) => Send {
                opcode: opcode::FULL,
                next: Full,
            },
            (Passive, Full) => Send {
                opcode: opcode::CONTROL,
                next: Safe,
            },

            // Dropping to Passive powers the actuators down; the device
            // then needs a wake pulse on the device-detect line
            (Safe, Passive) | (Full, Passive) => SendAndWake {
                opcode: opcode::POWER,
                next: Passive,
            },

            // The interface cannot be commanded back to Off
            (Passive, Off) | (Safe, Off) | (Full, Off) => NotReachable,

            (Passive, Passive) | (Safe, Safe) | (Full, Full) => Done,
        }
    }
}

/// One step of a mode transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeStep {
    /// Already in the requested mode; nothing to send
    Done,
    /// Send `opcode`, wait [`MODE_SETTLE_MS`], then adopt `next` and
    /// re-evaluate
    Send { opcode: u8, next: OperatingMode },
    /// Send `opcode`, wait [`MODE_SETTLE_MS`], pulse the wake line for
    /// [`WAKE_PULSE_MS`], then adopt `next`
    SendAndWake { opcode: u8, next: OperatingMode },
    /// The interface is in `Off` mode; start it first
    NotInitialized,
    /// No opcode sequence leads to the requested mode
    NotReachable,
}

/// Battery charging state reported by the device
///
/// Informational only: it shares the status surface with the operating
/// mode but the driver defines no transitions over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChargingState {
    /// Not connected to a charger
    NotCharging,
    /// Deeply discharged battery being brought back slowly
    RecoveryCharging,
    /// Bulk charging
    Charging,
    /// Maintenance trickle charge
    TrickleCharging,
    /// Charger connected, not charging
    Waiting,
    /// Charger fault
    ChargingFault,
}

impl ChargingState {
    /// Decode the charging-state byte of a sensor report
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ChargingState::NotCharging),
            1 => Some(ChargingState::RecoveryCharging),
            2 => Some(ChargingState::Charging),
            3 => Some(ChargingState::TrickleCharging),
            4 => Some(ChargingState::Waiting),
            5 => Some(ChargingState::ChargingFault),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_is_off() {
        assert_eq!(OperatingMode::default(), OperatingMode::Off);
        assert!(!OperatingMode::Off.is_initialized());
    }

    #[test]
    fn test_off_rejects_every_target() {
        for target in [OperatingMode::Passive, OperatingMode::Safe, OperatingMode::Full] {
            assert_eq!(
                OperatingMode::Off.step_toward(target),
                ModeStep::NotInitialized
            );
        }
    }

    #[test]
    fn test_self_transitions_are_noops() {
        for mode in [
            OperatingMode::Off,
            OperatingMode::Passive,
            OperatingMode::Safe,
            OperatingMode::Full,
        ] {
            assert_eq!(mode.step_toward(mode), ModeStep::Done);
        }
    }

    #[test]
    fn test_safe_from_either_neighbor() {
        assert_eq!(
            OperatingMode::Passive.step_toward(OperatingMode::Safe),
            ModeStep::Send {
                opcode: opcode::CONTROL,
                next: OperatingMode::Safe,
            }
        );
        assert_eq!(
            OperatingMode::Full.step_toward(OperatingMode::Safe),
            ModeStep::Send {
                opcode: opcode::SAFE,
                next: OperatingMode::Safe,
            }
        );
    }

    #[test]
    fn test_full_from_passive_goes_through_safe() {
        let first = OperatingMode::Passive.step_toward(OperatingMode::Full);
        assert_eq!(
            first,
            ModeStep::Send {
                opcode: opcode::CONTROL,
                next: OperatingMode::Safe,
            }
        );

        let second = OperatingMode::Safe.step_toward(OperatingMode::Full);
        assert_eq!(
            second,
            ModeStep::Send {
                opcode: opcode::FULL,
                next: OperatingMode::Full,
            }
        );
    }

    #[test]
    fn test_passive_requires_wake_pulse() {
        for mode in [OperatingMode::Safe, OperatingMode::Full] {
            assert_eq!(
                mode.step_toward(OperatingMode::Passive),
                ModeStep::SendAndWake {
                    opcode: opcode::POWER,
                    next: OperatingMode::Passive,
                }
            );
        }
    }

    #[test]
    fn test_off_is_unreachable() {
        for mode in [
            OperatingMode::Passive,
            OperatingMode::Safe,
            OperatingMode::Full,
        ] {
            assert_eq!(mode.step_toward(OperatingMode::Off), ModeStep::NotReachable);
        }
    }

    #[test]
    fn test_accepts_restricted() {
        assert!(!OperatingMode::Off.accepts_restricted());
        assert!(!OperatingMode::Passive.accepts_restricted());
        assert!(OperatingMode::Safe.accepts_restricted());
        assert!(OperatingMode::Full.accepts_restricted());
    }

    #[test]
    fn test_charging_state_codes() {
        assert_eq!(ChargingState::from_code(0), Some(ChargingState::NotCharging));
        assert_eq!(
            ChargingState::from_code(1),
            Some(ChargingState::RecoveryCharging)
        );
        assert_eq!(ChargingState::from_code(2), Some(ChargingState::Charging));
        assert_eq!(
            ChargingState::from_code(3),
            Some(ChargingState::TrickleCharging)
        );
        assert_eq!(ChargingState::from_code(4), Some(ChargingState::Waiting));
        assert_eq!(
            ChargingState::from_code(5),
            Some(ChargingState::ChargingFault)
        );
        assert_eq!(ChargingState::from_code(6), None);
        assert_eq!(ChargingState::from_code(255), None);
    }
}
