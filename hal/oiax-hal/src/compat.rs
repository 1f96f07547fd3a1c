//! Adapters for `embedded-hal` / `embedded-io` peripheral types
//!
//! Most chip HALs already implement the ecosystem traits; these wrappers
//! let such types drive the Oiax traits without a hand-written bridge.
//!
//! Serial note: `embedded-io` has no vocabulary for baud-rate changes, so
//! [`BlockingSerial`] rejects [`SerialPort::reconfigure`]. It is suitable
//! for links that stay at the power-on rate; ports that must follow a baud
//! switch implement [`SerialPort`] directly.

use core::convert::Infallible;

use crate::delay::DelayMs;
use crate::gpio::OutputPin;
use crate::serial::SerialPort;

/// Error type for [`BlockingSerial`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompatSerialError<E> {
    /// Underlying I/O error
    Io(E),
    /// The writer accepted zero bytes
    WriteZero,
    /// `embedded-io` cannot change the line rate
    ReconfigureUnsupported,
}

/// [`SerialPort`] over any blocking `embedded-io` reader/writer
pub struct BlockingSerial<T> {
    inner: T,
}

impl<T> BlockingSerial<T> {
    /// Wrap an `embedded-io` duplex port
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Release the wrapped port
    pub fn release(self) -> T {
        self.inner
    }
}

impl<T> SerialPort for BlockingSerial<T>
where
    T: embedded_io::Read + embedded_io::Write,
{
    type Error = CompatSerialError<T::Error>;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut rest = data;
        while !rest.is_empty() {
            match self.inner.write(rest) {
                Ok(0) => return Err(CompatSerialError::WriteZero),
                Ok(n) => rest = &rest[n..],
                Err(e) => return Err(CompatSerialError::Io(e)),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(CompatSerialError::Io)
    }

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.inner.read(buf).map_err(CompatSerialError::Io)
    }

    fn reconfigure(&mut self, _baudrate: u32) -> Result<(), Self::Error> {
        Err(CompatSerialError::ReconfigureUnsupported)
    }
}

/// [`OutputPin`] over an infallible `embedded-hal` output pin
///
/// The wrapper tracks the driven level itself, so the wrapped pin does not
/// need to implement `StatefulOutputPin`. The pin is driven low on
/// construction to make the tracked level definite.
pub struct Pin<T> {
    inner: T,
    level_high: bool,
}

impl<T> Pin<T>
where
    T: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    /// Wrap an `embedded-hal` output pin, driving it low
    pub fn new(mut inner: T) -> Self {
        infallible(inner.set_low());
        Self {
            inner,
            level_high: false,
        }
    }

    /// Release the wrapped pin
    pub fn release(self) -> T {
        self.inner
    }
}

impl<T> OutputPin for Pin<T>
where
    T: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        infallible(self.inner.set_high());
        self.level_high = true;
    }

    fn set_low(&mut self) {
        infallible(self.inner.set_low());
        self.level_high = false;
    }

    fn is_set_high(&self) -> bool {
        self.level_high
    }
}

/// [`DelayMs`] over an `embedded-hal` delay source
pub struct Delay<T> {
    inner: T,
}

impl<T> Delay<T> {
    /// Wrap an `embedded-hal` delay source
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Release the wrapped delay source
    pub fn release(self) -> T {
        self.inner
    }
}

impl<T> DelayMs for Delay<T>
where
    T: embedded_hal::delay::DelayNs,
{
    fn delay_ms(&mut self, ms: u32) {
        self.inner.delay_ms(ms);
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
