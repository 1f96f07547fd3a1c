//! Serial port abstractions
//!
//! Provides a blocking, byte-oriented duplex channel trait that can be
//! implemented by chip-specific HALs or host-side serial libraries.
//!
//! The SCI device boots at 57600 baud, 8 data bits, no parity, one stop bit,
//! and can be switched to another rate at runtime, so the trait includes
//! runtime baud-rate reconfiguration alongside read and write.

/// Blocking serial port
///
/// One implementor carries both directions; the protocol is strictly
/// command/response from a single caller, so split TX/RX halves are not
/// needed.
pub trait SerialPort {
    /// Error type for I/O operations
    type Error;

    /// Write all bytes to the port
    ///
    /// Blocks until every byte has been accepted by the hardware or an
    /// error occurs. Partial writes are not reported; on error the number
    /// of bytes already on the wire is unspecified.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data out to the wire
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Read available bytes into `buf`
    ///
    /// Blocks until at least one byte is available or the stream ends.
    /// Returns the number of bytes read; 0 means end of stream.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the port
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read_blocking(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    /// Switch the port to a new baud rate
    ///
    /// Called after the device has been commanded to change rates and has
    /// had time to settle. Framing (data bits, parity, stop bits) is
    /// unchanged.
    fn reconfigure(&mut self, baudrate: u32) -> Result<(), Self::Error>;
}

/// Serial framing configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    /// The device's power-on configuration: 57600 baud, 8N1
    fn default() -> Self {
        Self {
            baudrate: 57600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_device_power_on() {
        let config = SerialConfig::default();
        assert_eq!(config.baudrate, 57600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}

