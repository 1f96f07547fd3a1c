//! Oiax Transport Abstraction Layer
//!
//! This crate defines the transport traits the Oiax driver is generic over,
//! so the same driver code runs against any serial peripheral: a bare-metal
//! UART, a USB-serial bridge, or a mock port in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / oiax-driver              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  oiax-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ chip HAL impl │       │ compat module │
//! │ (direct)      │       │ (embedded-hal)│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialPort`] - Byte-oriented duplex channel with runtime
//!   baud-rate reconfiguration
//! - [`gpio::OutputPin`] - Digital output (device-detect / wake line)
//! - [`delay::DelayMs`] - Blocking millisecond delays for settle timing
//!
//! The `ehal` feature adds the [`compat`] module, which wraps `embedded-hal`
//! and `embedded-io` peripheral types in these traits.

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod serial;

#[cfg(feature = "ehal")]
pub mod compat;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use gpio::OutputPin;
pub use serial::{DataBits, Parity, SerialConfig, SerialPort, StopBits};
