//! SCI opcode constants
//!
//! Single-byte command identifiers defined by the device protocol.
//! Opcodes 128-131 are honored in any initialized mode; 132-141 and 143
//! are honored only in Safe or Full mode and silently ignored in Passive.

/// Start the command interface, entering Passive mode
pub const START: u8 = 128;
/// Change the serial line rate (1 data byte: baud code)
pub const BAUD: u8 = 129;
/// Enable user control: Passive to Safe
pub const CONTROL: u8 = 130;
/// Drop back from Full to Safe
pub const SAFE: u8 = 131;
/// Enter Full mode, disabling the safety interlocks
pub const FULL: u8 = 132;
/// Power down to Passive (sleep)
pub const POWER: u8 = 133;
/// Start a spot cleaning cycle, as if the Spot button was pressed
pub const SPOT: u8 = 134;
/// Start a standard cleaning cycle
pub const CLEAN: u8 = 135;
/// Start a maximum-time cleaning cycle
pub const MAX: u8 = 136;
/// Drive the wheels (4 data bytes: speed hi/lo, radius hi/lo)
pub const DRIVE: u8 = 137;
/// Switch the cleaning motors (1 data byte: motor flags)
pub const MOTORS: u8 = 138;
/// Set the LEDs (3 data bytes: led flags, power color, power intensity)
pub const LEDS: u8 = 139;
/// Define a song (2 + 2n data bytes: song number, length, note pairs)
pub const SONG: u8 = 140;
/// Play a previously defined song (1 data byte: song number)
pub const PLAY: u8 = 141;
/// Request a sensor data packet (1 data byte: packet code)
pub const SENSORS: u8 = 142;
/// Abort the current cycle and seek the charging dock
pub const FORCE_SEEKING_DOCK: u8 = 143;
