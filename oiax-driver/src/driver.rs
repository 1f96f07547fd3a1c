//! The driver session
//!
//! [`Driver`] exclusively owns its transports and is the sole mutator of
//! the tracked [`OperatingMode`]. Every mode change goes through the
//! transition table in `oiax-protocol`, and the tracked mode is committed
//! only after the corresponding send succeeds, so it cannot drift from
//! the device's actual state as long as no bytes bypass this type.

use oiax_hal::{DelayMs, OutputPin, SerialPort};
use oiax_protocol::{
    BaudRate, Button, Command, CommandError, LedState, ModeStep, MotorState, Note, OperatingMode,
    SensorPacket, BAUD_SETTLE_MS, MODE_SETTLE_MS, WAKE_PULSE_MS,
};

use crate::error::DriverError;

/// A live session with one SCI device
///
/// Constructed in `Off` mode; nothing is honored by the device until
/// [`Driver::initialize`] has started the interface. Dropping the session
/// releases the transports without sending anything.
///
/// # Command dispatch
///
/// Mode-restricted commands come in two variants:
///
/// - the default variant escalates to `Safe` mode first, keeping the
///   device's cliff and wheel-drop interlocks armed;
/// - the `*_unsafe` variant escalates to `Full` mode instead, bypassing
///   those interlocks. Use it only when the caller has separately made
///   sure that is acceptable.
///
/// Either way parameters are validated before any escalation, so invalid
/// input never causes a partial mode change.
pub struct Driver<S, P, D> {
    serial: S,
    wake: P,
    delay: D,
    mode: OperatingMode,
}

impl<S, P, D> Driver<S, P, D>
where
    S: SerialPort,
    P: OutputPin,
    D: DelayMs,
{
    /// Take ownership of the transports and start a session in `Off` mode
    ///
    /// The device-detect line is driven high (inactive) immediately; it
    /// stays high except for the wake pulse issued when dropping to
    /// Passive mode.
    pub fn new(serial: S, mut wake: P, delay: D) -> Self {
        wake.set_high();
        Self {
            serial,
            wake,
            delay,
            mode: OperatingMode::Off,
        }
    }

    /// The operating mode as last acknowledged on the wire
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Tear down the session and hand the transports back
    pub fn release(self) -> (S, P, D) {
        (self.serial, self.wake, self.delay)
    }

    /// Start the command interface, entering Passive mode
    ///
    /// Always sends the start opcode, even when called on an already
    /// initialized session: the device resets to Passive either way, and
    /// so does the tracked mode.
    pub fn initialize(&mut self) -> Result<(), DriverError<S::Error>> {
        self.send_frame(&Command::Start.encode()?)?;
        self.delay.delay_ms(MODE_SETTLE_MS);
        self.mode = OperatingMode::Passive;
        Ok(())
    }

    /// Enter Safe mode
    ///
    /// No-op when already in Safe mode; fails with
    /// [`DriverError::NotReady`] before initialization.
    pub fn enter_safe(&mut self) -> Result<(), DriverError<S::Error>> {
        self.transition_to(OperatingMode::Safe)
    }

    /// Enter Full mode, disabling the hardware interlocks
    ///
    /// From Passive this escalates through Safe first, one transition
    /// opcode and settle delay per hop.
    pub fn enter_full(&mut self) -> Result<(), DriverError<S::Error>> {
        self.transition_to(OperatingMode::Full)
    }

    /// Drop back to Passive mode
    ///
    /// The device powers its actuators down on this transition and then
    /// needs a pulse on the device-detect line before it listens again,
    /// which this method issues.
    pub fn enter_passive(&mut self) -> Result<(), DriverError<S::Error>> {
        self.transition_to(OperatingMode::Passive)
    }

    /// Abort the current cycle and send the device to its charging dock
    ///
    /// From Safe or Full the device is dropped to Passive first; from
    /// Passive the dock command goes out directly.
    pub fn force_dock(&mut self) -> Result<(), DriverError<S::Error>> {
        let frame = Command::ForceDock.encode()?;
        self.transition_to(OperatingMode::Passive)?;
        self.send_frame(&frame)
    }

    /// Drive the wheels, interlocks armed
    ///
    /// `speed` in mm/s within −500..=500 (or
    /// [`oiax_protocol::DRIVE_NO_CHANGE`]), `radius` in mm within
    /// −2000..=2000.
    pub fn drive(&mut self, speed: i32, radius: i32) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Safe, Command::Drive { speed, radius })
    }

    /// Drive the wheels with the interlocks bypassed
    pub fn drive_unsafe(&mut self, speed: i32, radius: i32) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Full, Command::Drive { speed, radius })
    }

    /// Switch the cleaning motors, interlocks armed
    pub fn set_motors(&mut self, motors: MotorState) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Safe, Command::Motors(motors))
    }

    /// Switch the cleaning motors with the interlocks bypassed
    pub fn set_motors_unsafe(&mut self, motors: MotorState) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Full, Command::Motors(motors))
    }

    /// Set the LEDs, interlocks armed
    ///
    /// `power_color` runs 0 (green) to 255 (red), `power_intensity` 0
    /// (off) to 255 (full); larger values are rejected.
    pub fn set_leds(
        &mut self,
        state: LedState,
        power_color: u16,
        power_intensity: u16,
    ) -> Result<(), DriverError<S::Error>> {
        self.restricted(
            OperatingMode::Safe,
            Command::Leds {
                state,
                power_color,
                power_intensity,
            },
        )
    }

    /// Set the LEDs with the interlocks bypassed
    pub fn set_leds_unsafe(
        &mut self,
        state: LedState,
        power_color: u16,
        power_intensity: u16,
    ) -> Result<(), DriverError<S::Error>> {
        self.restricted(
            OperatingMode::Full,
            Command::Leds {
                state,
                power_color,
                power_intensity,
            },
        )
    }

    /// Store a song in one of the device's 16 slots, interlocks armed
    pub fn define_song(&mut self, song: u8, notes: &[Note]) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Safe, Command::DefineSong { song, notes })
    }

    /// Store a song with the interlocks bypassed
    pub fn define_song_unsafe(
        &mut self,
        song: u8,
        notes: &[Note],
    ) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Full, Command::DefineSong { song, notes })
    }

    /// Play a stored song, interlocks armed
    pub fn play_song(&mut self, song: u8) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Safe, Command::PlaySong(song))
    }

    /// Play a stored song with the interlocks bypassed
    pub fn play_song_unsafe(&mut self, song: u8) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Full, Command::PlaySong(song))
    }

    /// Press a cleaning-mode button, interlocks armed
    pub fn press_button(&mut self, button: Button) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Safe, Command::Button(button))
    }

    /// Press a cleaning-mode button with the interlocks bypassed
    pub fn press_button_unsafe(&mut self, button: Button) -> Result<(), DriverError<S::Error>> {
        self.restricted(OperatingMode::Full, Command::Button(button))
    }

    /// Switch the serial link to a new rate
    ///
    /// `bps` must be one of the device's 12 table entries. After the baud
    /// opcode goes out the device needs [`BAUD_SETTLE_MS`] to retune;
    /// only then is the local port reconfigured, to the requested rate.
    /// The operating mode is unchanged.
    pub fn set_baud_rate(&mut self, bps: u32) -> Result<(), DriverError<S::Error>> {
        let rate = BaudRate::from_bps(bps).ok_or(CommandError::UnsupportedBaudRate(bps))?;
        self.send_frame(&Command::SetBaud(rate).encode()?)?;
        self.delay.delay_ms(BAUD_SETTLE_MS);
        self.serial
            .reconfigure(rate.bps())
            .map_err(DriverError::Serial)
    }

    /// Ask the device for a sensor data packet
    ///
    /// Honored in any initialized mode. The reply bytes are left on the
    /// wire for the caller to collect with [`Driver::read_bytes`];
    /// decoding them is outside this driver's scope.
    pub fn request_sensors(&mut self, packet: SensorPacket) -> Result<(), DriverError<S::Error>> {
        if !self.mode.is_initialized() {
            return Err(DriverError::NotReady {
                current: self.mode,
                required: OperatingMode::Passive,
            });
        }
        self.send_frame(&Command::Sensors(packet).encode()?)
    }

    /// Read raw reply bytes from the device
    ///
    /// Returns the number of bytes read; 0 means end of stream.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, DriverError<S::Error>> {
        self.serial.read_blocking(buf).map_err(DriverError::Serial)
    }

    /// Guarded dispatch for mode-restricted commands
    ///
    /// Validation and encoding come first, then the escalation to
    /// `floor`, then the send. The three stages keep the invariant that
    /// a rejected command leaves both the device and the tracked mode
    /// exactly as they were.
    fn restricted(
        &mut self,
        floor: OperatingMode,
        command: Command<'_>,
    ) -> Result<(), DriverError<S::Error>> {
        let frame = command.encode()?;
        self.transition_to(floor)?;
        self.send_frame(&frame)
    }

    /// Walk the transition table until `target` is reached
    ///
    /// At most two hops (Passive to Full passes through Safe). Each hop
    /// sends its opcode, waits the settle time, performs the wake pulse
    /// when the table demands one, and only then adopts the new mode.
    fn transition_to(&mut self, target: OperatingMode) -> Result<(), DriverError<S::Error>> {
        loop {
            match self.mode.step_toward(target) {
                ModeStep::Done => return Ok(()),
                ModeStep::Send { opcode, next } => {
                    self.send_frame(&[opcode])?;
                    self.delay.delay_ms(MODE_SETTLE_MS);
                    self.mode = next;
                }
                ModeStep::SendAndWake { opcode, next } => {
                    self.send_frame(&[opcode])?;
                    self.delay.delay_ms(MODE_SETTLE_MS);
                    self.pulse_wake();
                    self.mode = next;
                }
                ModeStep::NotInitialized | ModeStep::NotReachable => {
                    return Err(DriverError::NotReady {
                        current: self.mode,
                        required: target,
                    });
                }
            }
        }
    }

    /// Wake pulse on the device-detect line: low for the pulse time,
    /// then back high
    fn pulse_wake(&mut self) {
        self.wake.set_low();
        self.delay.delay_ms(WAKE_PULSE_MS);
        self.wake.set_high();
    }

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), DriverError<S::Error>> {
        self.serial
            .write_blocking(frame)
            .and_then(|()| self.serial.flush())
            .map_err(DriverError::Serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use oiax_protocol::{opcode, DRIVE_NO_CHANGE};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct IoFailure;

    #[derive(Default)]
    struct MockSerial {
        written: Vec<u8, 64>,
        // Number of writes that succeed before the port starts failing
        fail_after: Option<usize>,
        writes: usize,
        reconfigured: Option<u32>,
        rx: Vec<u8, 32>,
        rx_pos: usize,
    }

    impl SerialPort for MockSerial {
        type Error = IoFailure;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), IoFailure> {
            if self.fail_after.is_some_and(|n| self.writes >= n) {
                return Err(IoFailure);
            }
            self.writes += 1;
            self.written.extend_from_slice(data).map_err(|_| IoFailure)
        }

        fn flush(&mut self) -> Result<(), IoFailure> {
            Ok(())
        }

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, IoFailure> {
            let rest = &self.rx[self.rx_pos..];
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            self.rx_pos += n;
            Ok(n)
        }

        fn reconfigure(&mut self, baudrate: u32) -> Result<(), IoFailure> {
            self.reconfigured = Some(baudrate);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockPin {
        level_high: bool,
        // Every level driven onto the pin, in order
        history: Vec<bool, 8>,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.level_high = true;
            let _ = self.history.push(true);
        }

        fn set_low(&mut self) {
            self.level_high = false;
            let _ = self.history.push(false);
        }

        fn is_set_high(&self) -> bool {
            self.level_high
        }
    }

    #[derive(Default)]
    struct MockDelay {
        delays: Vec<u32, 16>,
    }

    impl DelayMs for MockDelay {
        fn delay_ms(&mut self, ms: u32) {
            let _ = self.delays.push(ms);
        }
    }

    fn driver() -> Driver<MockSerial, MockPin, MockDelay> {
        Driver::new(
            MockSerial::default(),
            MockPin::default(),
            MockDelay::default(),
        )
    }

    #[test]
    fn test_new_session_is_off_with_wake_high() {
        let d = driver();
        assert_eq!(d.mode(), OperatingMode::Off);
        let (serial, wake, _) = d.release();
        assert!(serial.written.is_empty());
        assert!(wake.is_set_high());
        assert_eq!(&wake.history[..], &[true]);
    }

    #[test]
    fn test_initialize_enters_passive() {
        let mut d = driver();
        d.initialize().unwrap();
        assert_eq!(d.mode(), OperatingMode::Passive);

        let (serial, _, delay) = d.release();
        assert_eq!(&serial.written[..], &[opcode::START]);
        assert_eq!(&delay.delays[..], &[MODE_SETTLE_MS]);
    }

    #[test]
    fn test_initialize_is_repeatable() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_full().unwrap();
        // Re-initializing drops the session back to Passive unconditionally
        d.initialize().unwrap();
        assert_eq!(d.mode(), OperatingMode::Passive);
    }

    #[test]
    fn test_initialize_then_enter_full_opcode_sequence() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_full().unwrap();
        assert_eq!(d.mode(), OperatingMode::Full);

        let (serial, _, delay) = d.release();
        assert_eq!(
            &serial.written[..],
            &[opcode::START, opcode::CONTROL, opcode::FULL]
        );
        assert_eq!(
            &delay.delays[..],
            &[MODE_SETTLE_MS, MODE_SETTLE_MS, MODE_SETTLE_MS]
        );
    }

    #[test]
    fn test_enter_safe_from_full_uses_safe_opcode() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_full().unwrap();
        d.enter_safe().unwrap();
        assert_eq!(d.mode(), OperatingMode::Safe);

        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[opcode::START, opcode::CONTROL, opcode::FULL, opcode::SAFE]
        );
    }

    #[test]
    fn test_mode_transitions_fail_before_initialize() {
        let mut d = driver();
        for result in [d.enter_safe(), d.enter_full(), d.enter_passive()] {
            match result {
                Err(DriverError::NotReady { current, .. }) => {
                    assert_eq!(current, OperatingMode::Off);
                }
                other => panic!("expected NotReady, got {:?}", other),
            }
        }
        let (serial, _, _) = d.release();
        assert!(serial.written.is_empty());
    }

    #[test]
    fn test_noop_transitions_send_nothing() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_passive().unwrap();
        d.enter_safe().unwrap();
        d.enter_safe().unwrap();

        let (serial, _, _) = d.release();
        assert_eq!(&serial.written[..], &[opcode::START, opcode::CONTROL]);
    }

    #[test]
    fn test_enter_passive_pulses_wake_line() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_safe().unwrap();
        d.enter_passive().unwrap();
        assert_eq!(d.mode(), OperatingMode::Passive);

        let (serial, wake, delay) = d.release();
        assert_eq!(
            &serial.written[..],
            &[opcode::START, opcode::CONTROL, opcode::POWER]
        );
        // Initial high, then the pulse: low, high
        assert_eq!(&wake.history[..], &[true, false, true]);
        assert!(wake.is_set_high());
        assert_eq!(
            &delay.delays[..],
            &[MODE_SETTLE_MS, MODE_SETTLE_MS, MODE_SETTLE_MS, WAKE_PULSE_MS]
        );
    }

    #[test]
    fn test_restricted_from_off_sends_nothing() {
        let mut d = driver();
        let result = d.drive(100, 0);
        assert_eq!(
            result,
            Err(DriverError::NotReady {
                current: OperatingMode::Off,
                required: OperatingMode::Safe,
            })
        );
        assert_eq!(d.mode(), OperatingMode::Off);

        let (serial, _, _) = d.release();
        assert!(serial.written.is_empty());
    }

    #[test]
    fn test_safe_variant_ends_in_safe_from_every_mode() {
        // From Passive
        let mut d = driver();
        d.initialize().unwrap();
        d.set_motors(MotorState::all()).unwrap();
        assert_eq!(d.mode(), OperatingMode::Safe);
        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[opcode::START, opcode::CONTROL, opcode::MOTORS, 0b111]
        );

        // From Safe (no escalation bytes)
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_safe().unwrap();
        d.set_motors(MotorState::off()).unwrap();
        assert_eq!(d.mode(), OperatingMode::Safe);

        // From Full (drops back to Safe)
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_full().unwrap();
        d.set_motors(MotorState::off()).unwrap();
        assert_eq!(d.mode(), OperatingMode::Safe);
        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[
                opcode::START,
                opcode::CONTROL,
                opcode::FULL,
                opcode::SAFE,
                opcode::MOTORS,
                0,
            ]
        );
    }

    #[test]
    fn test_unsafe_variant_ends_in_full_from_every_mode() {
        // From Passive: escalates through Safe
        let mut d = driver();
        d.initialize().unwrap();
        d.drive_unsafe(0, 0).unwrap();
        assert_eq!(d.mode(), OperatingMode::Full);
        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[
                opcode::START,
                opcode::CONTROL,
                opcode::FULL,
                opcode::DRIVE,
                0,
                0,
                0,
                0,
            ]
        );

        // From Safe and from Full
        for pre_full in [false, true] {
            let mut d = driver();
            d.initialize().unwrap();
            d.enter_safe().unwrap();
            if pre_full {
                d.enter_full().unwrap();
            }
            d.set_leds_unsafe(LedState::default(), 0, 0).unwrap();
            assert_eq!(d.mode(), OperatingMode::Full);
        }
    }

    #[test]
    fn test_drive_sends_reference_bytes() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_safe().unwrap();
        d.drive(500, 2000).unwrap();

        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[
                opcode::START,
                opcode::CONTROL,
                opcode::DRIVE,
                0x01,
                0xF4,
                0x07,
                0xD0,
            ]
        );
    }

    #[test]
    fn test_drive_accepts_no_change_speed() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_safe().unwrap();
        d.drive(DRIVE_NO_CHANGE, 0).unwrap();
    }

    #[test]
    fn test_invalid_drive_leaves_mode_untouched() {
        let mut d = driver();
        d.initialize().unwrap();
        let result = d.drive(501, 0);
        assert_eq!(
            result,
            Err(DriverError::Command(CommandError::SpeedOutOfRange(501)))
        );
        // Validation ran before escalation: still Passive, nothing but
        // the start opcode on the wire
        assert_eq!(d.mode(), OperatingMode::Passive);
        let (serial, _, _) = d.release();
        assert_eq!(&serial.written[..], &[opcode::START]);
    }

    #[test]
    fn test_invalid_led_power_rejected_in_any_mode() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_full().unwrap();
        let result = d.set_leds(LedState::default(), 256, 0);
        assert_eq!(
            result,
            Err(DriverError::Command(CommandError::LedPowerOutOfRange(256)))
        );
        // Not even the Full -> Safe drop happened
        assert_eq!(d.mode(), OperatingMode::Full);
    }

    #[test]
    fn test_force_dock_from_safe() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_safe().unwrap();
        d.force_dock().unwrap();
        assert_eq!(d.mode(), OperatingMode::Passive);

        let (serial, wake, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[
                opcode::START,
                opcode::CONTROL,
                opcode::POWER,
                opcode::FORCE_SEEKING_DOCK,
            ]
        );
        // The drop to Passive pulsed the wake line before the dock opcode
        assert_eq!(&wake.history[..], &[true, false, true]);
    }

    #[test]
    fn test_force_dock_from_passive_is_direct() {
        let mut d = driver();
        d.initialize().unwrap();
        d.force_dock().unwrap();
        assert_eq!(d.mode(), OperatingMode::Passive);

        let (serial, wake, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[opcode::START, opcode::FORCE_SEEKING_DOCK]
        );
        assert_eq!(&wake.history[..], &[true]);
    }

    #[test]
    fn test_force_dock_from_off_fails() {
        let mut d = driver();
        let result = d.force_dock();
        assert!(matches!(result, Err(DriverError::NotReady { .. })));
        let (serial, _, _) = d.release();
        assert!(serial.written.is_empty());
    }

    #[test]
    fn test_set_baud_rate_reconfigures_to_requested_rate() {
        let mut d = driver();
        d.initialize().unwrap();
        d.set_baud_rate(19200).unwrap();
        assert_eq!(d.mode(), OperatingMode::Passive);

        let (serial, _, delay) = d.release();
        assert_eq!(&serial.written[..], &[opcode::START, opcode::BAUD, 7]);
        assert_eq!(serial.reconfigured, Some(19200));
        assert_eq!(&delay.delays[..], &[MODE_SETTLE_MS, BAUD_SETTLE_MS]);
    }

    #[test]
    fn test_set_baud_rate_rejects_unknown_rate() {
        let mut d = driver();
        d.initialize().unwrap();
        let result = d.set_baud_rate(12345);
        assert_eq!(
            result,
            Err(DriverError::Command(CommandError::UnsupportedBaudRate(
                12345
            )))
        );

        let (serial, _, _) = d.release();
        assert_eq!(&serial.written[..], &[opcode::START]);
        assert_eq!(serial.reconfigured, None);
    }

    #[test]
    fn test_play_song_escalates_from_passive() {
        let mut d = driver();
        d.initialize().unwrap();
        d.play_song(3).unwrap();

        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[opcode::START, opcode::CONTROL, opcode::PLAY, 3]
        );
    }

    #[test]
    fn test_press_button_sends_button_opcode() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_safe().unwrap();
        d.press_button(Button::Clean).unwrap();

        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[opcode::START, opcode::CONTROL, opcode::CLEAN]
        );
    }

    #[test]
    fn test_define_song_round_trip_bytes() {
        let mut d = driver();
        d.initialize().unwrap();
        d.enter_safe().unwrap();
        let notes = [
            Note {
                pitch: 60,
                duration: 32,
            },
            Note {
                pitch: 67,
                duration: 32,
            },
        ];
        d.define_song(1, &notes).unwrap();

        let (serial, _, _) = d.release();
        assert_eq!(
            &serial.written[..],
            &[
                opcode::START,
                opcode::CONTROL,
                opcode::SONG,
                1,
                2,
                60,
                32,
                67,
                32,
            ]
        );
    }

    #[test]
    fn test_request_sensors_requires_initialization() {
        let mut d = driver();
        let result = d.request_sensors(SensorPacket::All);
        assert!(matches!(result, Err(DriverError::NotReady { .. })));

        d.initialize().unwrap();
        d.request_sensors(SensorPacket::Environment).unwrap();
        // Honored from Passive without escalation
        assert_eq!(d.mode(), OperatingMode::Passive);

        let (serial, _, _) = d.release();
        assert_eq!(&serial.written[..], &[opcode::START, opcode::SENSORS, 1]);
    }

    #[test]
    fn test_read_bytes_passes_reply_through() {
        let mut serial = MockSerial::default();
        serial.rx.extend_from_slice(&[2, 25, 0]).unwrap();
        let mut d = Driver::new(serial, MockPin::default(), MockDelay::default());
        d.initialize().unwrap();

        let mut buf = [0u8; 8];
        let n = d.read_bytes(&mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..n], &[2, 25, 0]);
        assert_eq!(d.read_bytes(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_write_failure_leaves_mode_uncommitted() {
        // The port accepts the start opcode, then fails on the next write
        let serial = MockSerial {
            fail_after: Some(1),
            ..MockSerial::default()
        };
        let mut d = Driver::new(serial, MockPin::default(), MockDelay::default());
        d.initialize().unwrap();
        assert_eq!(d.mode(), OperatingMode::Passive);

        // The escalation write (CONTROL) fails, so the tracked mode must
        // still read Passive, not Safe
        let result = d.drive(100, 0);
        assert_eq!(result, Err(DriverError::Serial(IoFailure)));
        assert_eq!(d.mode(), OperatingMode::Passive);

        let (serial, _, _) = d.release();
        assert_eq!(&serial.written[..], &[opcode::START]);
    }

    #[test]
    fn test_initialize_failure_stays_off() {
        let serial = MockSerial {
            fail_after: Some(0),
            ..MockSerial::default()
        };
        let mut d = Driver::new(serial, MockPin::default(), MockDelay::default());
        let result = d.initialize();
        assert_eq!(result, Err(DriverError::Serial(IoFailure)));
        assert_eq!(d.mode(), OperatingMode::Off);
    }
}
