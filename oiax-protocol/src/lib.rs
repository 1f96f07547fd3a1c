//! Serial Command Interface wire protocol
//!
//! This crate defines the pure data layer of the Oiax driver: opcode
//! constants, the operating-mode state machine, baud-rate tables, and the
//! validation and binary encoding of every command. No I/O happens here;
//! the driver crate feeds the encoded bytes to a transport.
//!
//! # Wire format
//!
//! Every command is a single opcode byte followed by its parameter bytes
//! in a fixed, per-opcode order. There is no length prefix and no
//! checksum; the device relies on framing at the byte level alone.
//!
//! ```text
//! ┌────────┬──────────────────────────┐
//! │ OPCODE │ PARAMETERS               │
//! │ 1B     │ 0-34B (fixed per opcode) │
//! └────────┴──────────────────────────┘
//! ```
//!
//! Multi-byte numeric parameters are 16-bit two's-complement, big-endian.
//! Flag parameters pack booleans into single bytes at documented bit
//! positions (see [`command::MotorState`] and [`command::LedState`]).

#![no_std]
#![deny(unsafe_code)]

pub mod baud;
pub mod command;
pub mod mode;
pub mod opcode;

pub use baud::{BaudRate, BAUD_SETTLE_MS};
pub use command::{
    decode16, encode16, Button, Command, CommandError, LedState, MotorState, Note, SensorPacket,
    DRIVE_NO_CHANGE, MAX_COMMAND_SIZE,
};
pub use mode::{ChargingState, ModeStep, OperatingMode, MODE_SETTLE_MS, WAKE_PULSE_MS};
