//! Baud-rate table
//!
//! The device supports twelve line rates, selected over the wire by a
//! one-byte code. The table is closed: any other rate is rejected before
//! a single byte is sent.

/// Settle time after a baud-change opcode before the line may be
/// reconfigured and used at the new rate
pub const BAUD_SETTLE_MS: u32 = 150;

/// A legal serial line rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaudRate {
    B300,
    B600,
    B1200,
    B2400,
    B4800,
    B9600,
    B14400,
    B19200,
    B28800,
    B38400,
    /// Power-on default
    B57600,
    B115200,
}

impl BaudRate {
    /// All legal rates, in code order
    pub const ALL: [BaudRate; 12] = [
        BaudRate::B300,
        BaudRate::B600,
        BaudRate::B1200,
        BaudRate::B2400,
        BaudRate::B4800,
        BaudRate::B9600,
        BaudRate::B14400,
        BaudRate::B19200,
        BaudRate::B28800,
        BaudRate::B38400,
        BaudRate::B57600,
        BaudRate::B115200,
    ];

    /// Look up a rate in bits per second
    ///
    /// Returns `None` for anything outside the device's table.
    pub fn from_bps(bps: u32) -> Option<Self> {
        match bps {
            300 => Some(BaudRate::B300),
            600 => Some(BaudRate::B600),
            1200 => Some(BaudRate::B1200),
            2400 => Some(BaudRate::B2400),
            4800 => Some(BaudRate::B4800),
            9600 => Some(BaudRate::B9600),
            14400 => Some(BaudRate::B14400),
            19200 => Some(BaudRate::B19200),
            28800 => Some(BaudRate::B28800),
            38400 => Some(BaudRate::B38400),
            57600 => Some(BaudRate::B57600),
            115200 => Some(BaudRate::B115200),
            _ => None,
        }
    }

    /// The rate in bits per second
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::B300 => 300,
            BaudRate::B600 => 600,
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B14400 => 14400,
            BaudRate::B19200 => 19200,
            BaudRate::B28800 => 28800,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }

    /// The device-internal selection code sent on the wire
    pub fn code(self) -> u8 {
        match self {
            BaudRate::B300 => 0,
            BaudRate::B600 => 1,
            BaudRate::B1200 => 2,
            BaudRate::B2400 => 3,
            BaudRate::B4800 => 4,
            BaudRate::B9600 => 5,
            BaudRate::B14400 => 6,
            BaudRate::B19200 => 7,
            BaudRate::B28800 => 8,
            BaudRate::B38400 => 9,
            BaudRate::B57600 => 10,
            BaudRate::B115200 => 11,
        }
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        BaudRate::B57600
    }
}
