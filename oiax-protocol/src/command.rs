//! Command validation and wire encoding
//!
//! Every command is validated against its documented parameter ranges and
//! then encoded as an opcode byte plus fixed-order parameter bytes.
//! Validation always happens before encoding returns any bytes, so a bad
//! parameter can never put a partial command on the wire.

use heapless::Vec;

use crate::baud::BaudRate;
use crate::opcode;

/// Largest encoded command: a 16-note song definition
/// (opcode + song number + length + 16 note pairs)
pub const MAX_COMMAND_SIZE: usize = 3 + 2 * MAX_SONG_NOTES;

/// Lowest legal drive speed in mm/s
pub const DRIVE_SPEED_MIN: i32 = -500;
/// Highest legal drive speed in mm/s
pub const DRIVE_SPEED_MAX: i32 = 500;
/// Special drive speed meaning "keep the current speed" (wire 0x8000)
pub const DRIVE_NO_CHANGE: i32 = 32768;
/// Lowest legal turn radius in mm
pub const DRIVE_RADIUS_MIN: i32 = -2000;
/// Highest legal turn radius in mm
pub const DRIVE_RADIUS_MAX: i32 = 2000;
/// Highest song slot number
pub const MAX_SONG_NUMBER: u8 = 15;
/// Longest song the device can store
pub const MAX_SONG_NOTES: usize = 16;

// Motor-actions byte bit positions
pub const MOTOR_MAIN_BRUSH_BIT: u8 = 1 << 2;
pub const MOTOR_VACUUM_BIT: u8 = 1 << 1;
pub const MOTOR_SIDE_BRUSH_BIT: u8 = 1 << 0;

// LED-state byte bit positions
pub const LED_STATUS_GREEN_BIT: u8 = 1 << 5;
pub const LED_STATUS_RED_BIT: u8 = 1 << 4;
pub const LED_SPOT_BIT: u8 = 1 << 3;
pub const LED_CLEAN_BIT: u8 = 1 << 2;
pub const LED_MAX_BIT: u8 = 1 << 1;
pub const LED_DIRT_DETECT_BIT: u8 = 1 << 0;

/// Encode a signed 16-bit parameter as two's-complement big-endian
///
/// The value 32768 ([`DRIVE_NO_CHANGE`]) encodes to `0x8000`, which the
/// protocol reserves as a sentinel rather than a negative magnitude.
pub fn encode16(value: i32) -> [u8; 2] {
    let raw = if value >= 0 {
        value as u32
    } else {
        (value + 0x1_0000) as u32
    };
    [(raw >> 8) as u8, raw as u8]
}

/// Decode a two's-complement big-endian parameter
///
/// Inverse of [`encode16`] over the protocol's parameter domains:
/// `0x8000` decodes to [`DRIVE_NO_CHANGE`], everything else to its signed
/// 16-bit value.
pub fn decode16(bytes: [u8; 2]) -> i32 {
    if bytes == [0x80, 0x00] {
        DRIVE_NO_CHANGE
    } else {
        i16::from_be_bytes(bytes) as i32
    }
}

/// A parameter outside its documented range
///
/// Each variant carries the offending value; the accepted range is part
/// of the variant's contract (see the `DRIVE_*`, `MAX_SONG_*`, and LED
/// constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Drive speed outside −500..=500 mm/s (and not [`DRIVE_NO_CHANGE`])
    SpeedOutOfRange(i32),
    /// Turn radius outside −2000..=2000 mm
    RadiusOutOfRange(i32),
    /// LED power color or intensity outside 0..=255
    LedPowerOutOfRange(u16),
    /// Song number outside 0..=15
    SongOutOfRange(u8),
    /// Song length outside 1..=16 notes
    SongLengthOutOfRange(usize),
    /// Baud rate not in the device's 12-entry table
    UnsupportedBaudRate(u32),
}

/// Cleaning-motor switch states, packed into one byte on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorState {
    /// Main brush under the chassis
    pub main_brush: bool,
    /// Vacuum impeller
    pub vacuum: bool,
    /// Side brush
    pub side_brush: bool,
}

impl MotorState {
    /// Pack into the motor-actions byte
    pub fn as_byte(self) -> u8 {
        let mut byte = 0;
        if self.main_brush {
            byte |= MOTOR_MAIN_BRUSH_BIT;
        }
        if self.vacuum {
            byte |= MOTOR_VACUUM_BIT;
        }
        if self.side_brush {
            byte |= MOTOR_SIDE_BRUSH_BIT;
        }
        byte
    }

    /// All motors off
    pub fn off() -> Self {
        Self::default()
    }

    /// All motors on
    pub fn all() -> Self {
        Self {
            main_brush: true,
            vacuum: true,
            side_brush: true,
        }
    }
}

/// On/off LED states, packed into one byte on the wire
///
/// The bicolor power LED is controlled separately through the
/// `power_color` and `power_intensity` parameters of [`Command::Leds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedState {
    /// Green half of the status LED
    pub status_green: bool,
    /// Red half of the status LED
    pub status_red: bool,
    /// Spot LED
    pub spot: bool,
    /// Clean LED
    pub clean: bool,
    /// Max LED
    pub max: bool,
    /// Dirt-detect LED
    pub dirt_detect: bool,
}

impl LedState {
    /// Pack into the LED-state byte
    pub fn as_byte(self) -> u8 {
        let mut byte = 0;
        if self.status_green {
            byte |= LED_STATUS_GREEN_BIT;
        }
        if self.status_red {
            byte |= LED_STATUS_RED_BIT;
        }
        if self.spot {
            byte |= LED_SPOT_BIT;
        }
        if self.clean {
            byte |= LED_CLEAN_BIT;
        }
        if self.max {
            byte |= LED_MAX_BIT;
        }
        if self.dirt_detect {
            byte |= LED_DIRT_DETECT_BIT;
        }
        byte
    }
}

/// Cleaning-mode buttons that can be pressed over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// Spot cleaning cycle
    Spot,
    /// Standard cleaning cycle
    Clean,
    /// Maximum-time cleaning cycle
    Max,
}

impl Button {
    /// The opcode for this button press
    pub fn opcode(self) -> u8 {
        match self {
            Button::Spot => opcode::SPOT,
            Button::Clean => opcode::CLEAN,
            Button::Max => opcode::MAX,
        }
    }
}

/// Sensor packet groups the device can be asked to report
///
/// Only the request encoding lives here; decoding the reply stream is up
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorPacket {
    /// All three groups, 26 bytes
    All,
    /// Bumpers, cliffs, wheel drops, wall
    Environment,
    /// Buttons and internal state
    Buttons,
    /// Battery and charging
    Power,
}

impl SensorPacket {
    /// The packet code sent on the wire
    pub fn code(self) -> u8 {
        match self {
            SensorPacket::All => 0,
            SensorPacket::Environment => 1,
            SensorPacket::Buttons => 2,
            SensorPacket::Power => 3,
        }
    }
}

/// One note of a song: MIDI note number and duration in 1/64ths of a
/// second
///
/// The device plays note numbers 31..=127 and rests for anything lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// MIDI note number
    pub pitch: u8,
    /// Duration in 1/64ths of a second
    pub duration: u8,
}

/// A command ready to be validated and encoded
///
/// Commands are immutable, built per call, and consumed once by
/// [`Command::encode`]. Which commands the device honors in which
/// operating mode is enforced by the driver, not here; this layer only
/// guarantees the bytes are well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Start the command interface (mode-free)
    Start,
    /// Change the serial line rate (mode-free)
    SetBaud(BaudRate),
    /// Press a cleaning-mode button
    Button(Button),
    /// Drive the wheels at `speed` mm/s along an arc of `radius` mm
    Drive { speed: i32, radius: i32 },
    /// Switch the cleaning motors
    Motors(MotorState),
    /// Set the LEDs; `power_color` 0 (green) to 255 (red),
    /// `power_intensity` 0 (off) to 255 (full)
    Leds {
        state: LedState,
        power_color: u16,
        power_intensity: u16,
    },
    /// Store a song in one of the 16 song slots
    DefineSong { song: u8, notes: &'a [Note] },
    /// Play a previously stored song
    PlaySong(u8),
    /// Request a sensor data packet (mode-free once initialized)
    Sensors(SensorPacket),
    /// Abort the current cycle and seek the charging dock
    ForceDock,
}

impl<'a> Command<'a> {
    /// Check whether the device only honors this command in Safe or Full
    /// mode
    pub fn is_mode_restricted(&self) -> bool {
        !matches!(
            self,
            Command::Start | Command::SetBaud(_) | Command::Sensors(_) | Command::ForceDock
        )
    }

    /// Validate parameters and encode to wire bytes
    ///
    /// Returns the full opcode frame, or the first range violation found.
    /// No bytes are produced for an invalid command.
    pub fn encode(&self) -> Result<Vec<u8, MAX_COMMAND_SIZE>, CommandError> {
        let mut bytes = Vec::new();
        match *self {
            Command::Start => {
                push(&mut bytes, opcode::START);
            }
            Command::SetBaud(rate) => {
                push(&mut bytes, opcode::BAUD);
                push(&mut bytes, rate.code());
            }
            Command::Button(button) => {
                push(&mut bytes, button.opcode());
            }
            Command::Drive { speed, radius } => {
                let speed_ok = (DRIVE_SPEED_MIN..=DRIVE_SPEED_MAX).contains(&speed)
                    || speed == DRIVE_NO_CHANGE;
                if !speed_ok {
                    return Err(CommandError::SpeedOutOfRange(speed));
                }
                if !(DRIVE_RADIUS_MIN..=DRIVE_RADIUS_MAX).contains(&radius) {
                    return Err(CommandError::RadiusOutOfRange(radius));
                }
                push(&mut bytes, opcode::DRIVE);
                extend(&mut bytes, &encode16(speed));
                extend(&mut bytes, &encode16(radius));
            }
            Command::Motors(motors) => {
                push(&mut bytes, opcode::MOTORS);
                push(&mut bytes, motors.as_byte());
            }
            Command::Leds {
                state,
                power_color,
                power_intensity,
            } => {
                if power_color > 255 {
                    return Err(CommandError::LedPowerOutOfRange(power_color));
                }
                if power_intensity > 255 {
                    return Err(CommandError::LedPowerOutOfRange(power_intensity));
                }
                push(&mut bytes, opcode::LEDS);
                push(&mut bytes, state.as_byte());
                push(&mut bytes, power_color as u8);
                push(&mut bytes, power_intensity as u8);
            }
            Command::DefineSong { song, notes } => {
                if song > MAX_SONG_NUMBER {
                    return Err(CommandError::SongOutOfRange(song));
                }
                if notes.is_empty() || notes.len() > MAX_SONG_NOTES {
                    return Err(CommandError::SongLengthOutOfRange(notes.len()));
                }
                push(&mut bytes, opcode::SONG);
                push(&mut bytes, song);
                push(&mut bytes, notes.len() as u8);
                for note in notes {
                    push(&mut bytes, note.pitch);
                    push(&mut bytes, note.duration);
                }
            }
            Command::PlaySong(song) => {
                if song > MAX_SONG_NUMBER {
                    return Err(CommandError::SongOutOfRange(song));
                }
                push(&mut bytes, opcode::PLAY);
                push(&mut bytes, song);
            }
            Command::Sensors(packet) => {
                push(&mut bytes, opcode::SENSORS);
                push(&mut bytes, packet.code());
            }
            Command::ForceDock => {
                push(&mut bytes, opcode::FORCE_SEEKING_DOCK);
            }
        }
        Ok(bytes)
    }
}

// MAX_COMMAND_SIZE bounds every arm above, so the pushes cannot fail;
// the helpers keep that fact in one place.
fn push(bytes: &mut Vec<u8, MAX_COMMAND_SIZE>, byte: u8) {
    let _ = bytes.push(byte);
}

fn extend(bytes: &mut Vec<u8, MAX_COMMAND_SIZE>, data: &[u8]) {
    let _ = bytes.extend_from_slice(data);
}
