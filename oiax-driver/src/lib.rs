//! Mode-tracking command driver for the Serial Command Interface
//!
//! This crate owns the live session with the device: one serial port, one
//! device-detect (wake) pin, one delay source, and the tracked operating
//! mode. Every public operation validates its parameters, escalates the
//! operating mode as required, and puts the encoded opcode frame on the
//! wire, in that order.
//!
//! The driver is generic over the `oiax-hal` traits, so the same code runs
//! against a chip UART, a USB-serial bridge, or the mock transports used
//! in this crate's tests.
//!
//! Single caller, single thread: methods take `&mut self` and block until
//! the device's settle times have elapsed. Concurrent use of one session
//! requires external mutual exclusion.

#![no_std]
#![deny(unsafe_code)]

pub mod driver;
pub mod error;

pub use driver::Driver;
pub use error::DriverError;

// The protocol data types appear throughout the driver API surface
pub use oiax_protocol::{
    Button, ChargingState, Command, CommandError, LedState, MotorState, Note, OperatingMode,
    SensorPacket,
};
