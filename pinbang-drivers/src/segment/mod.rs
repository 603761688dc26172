//! TM1637 4-digit 7-segment display controller
//!
//! The TM1637 uses a two-wire link that looks like I2C but is not: there is
//! no device address, bytes go out LSB-first, and data is latched on the
//! rising clock edge. The driver writes whole pin words containing only the
//! clock and data bits, so it owns the port for as long as it lives.
//!
//! # Framing
//!
//! ```text
//! start    CLK 1 1        DIO 1 0
//! bit      CLK 0 0 1      DIO 0 b b      (x8, LSB first)
//! ack      CLK 0 1 0      DIO 1 1 1
//! stop     CLK 0 1 1      DIO 0 0 1
//! ```
//!
//! Every word is held for the configured delay. The acknowledge slot is
//! clocked but never sampled.

pub mod command;
pub mod config;

use embedded_hal::delay::DelayNs;
use pinbang_hal::{GpioPort, PinMap, PinWord};

use crate::bus::BusError;
use command::{Brightness, DataCommand, DigitAddress, DisplayControl, COLON};
pub use config::{Tm1637Config, Tm1637Timing};

/// Pattern shown by [`Tm1637::run_self_test`]: "0", "1:", "2", "3"
pub const SELF_TEST_PATTERN: [u8; 4] = [
    command::SEGMENT_DIGITS[0],
    command::SEGMENT_DIGITS[1] | COLON,
    command::SEGMENT_DIGITS[2],
    command::SEGMENT_DIGITS[3],
];

/// TM1637 driver
///
/// Like the bus, every operation clocks out its full frame and reports
/// [`BusError::Transport`] afterwards if any pin write failed.
pub struct Tm1637<'a, P: GpioPort, D: DelayNs> {
    port: &'a mut P,
    delay: D,
    pins: PinMap,
    timing: Tm1637Timing,
    brightness: Brightness,
    /// A port write failed since the current operation began
    fault: bool,
}

impl<'a, P: GpioPort, D: DelayNs> Tm1637<'a, P, D> {
    /// Initialize the controller on an open port
    ///
    /// Selects auto-increment addressing, blanks all digits and sets
    /// brightness 1. Fails with [`BusError::InvalidPins`] before touching
    /// the port if CLK and DIO are not distinct single bits.
    pub fn new(port: &'a mut P, delay: D, config: Tm1637Config) -> Result<Self, BusError> {
        if !config.pins.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("tm1637: invalid pin map {}", config.pins);
            return Err(BusError::InvalidPins);
        }

        if !port.is_open() {
            #[cfg(feature = "defmt")]
            defmt::error!("tm1637: port is not open");
            return Err(BusError::PortClosed);
        }

        let mut display = Self {
            port,
            delay,
            pins: config.pins,
            timing: config.timing,
            brightness: Brightness::OFF,
            fault: false,
        };

        let result = display
            .write_command(DataCommand::WRITE_AUTO_INCREMENT.byte())
            .and(display.clear())
            .and(display.set_brightness(Brightness::MIN.level()));

        match result {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("tm1637: initialized");
                Ok(display)
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("tm1637: init failed: {}", e);
                Err(e)
            }
        }
    }

    /// Turn the display off and give the port back
    pub fn release(mut self) -> Result<(), BusError> {
        self.set_brightness(Brightness::OFF.level())
    }

    /// Current brightness
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Send a single-byte command frame, then wait for it to take effect
    pub fn write_command(&mut self, byte: u8) -> Result<(), BusError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tm1637: command {=u8:#010b}", byte);

        self.fault = false;
        self.start();
        self.write_byte(byte);
        self.skip_ack();
        self.stop();
        self.delay.delay_us(self.timing.command_settle_us);
        self.finish()
    }

    /// Send several bytes in one frame
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.fault = false;
        self.start();
        for &byte in bytes {
            self.write_byte(byte);
            self.skip_ack();
        }
        self.stop();
        self.finish()
    }

    /// Set brightness 0 (off) to 8; larger values are treated as 8
    pub fn set_brightness(&mut self, level: u8) -> Result<(), BusError> {
        let brightness = Brightness::new(level);
        self.brightness = brightness;
        self.write_command(DisplayControl::from(brightness).byte())
    }

    /// Show four raw segment bytes, optionally with the colon lit
    pub fn set_digits(&mut self, segments: [u8; 4], colon: bool) -> Result<(), BusError> {
        let [d0, d1, d2, d3] = segments;
        let d1 = if colon { d1 | COLON } else { d1 };
        self.write_bytes(&[DigitAddress::Digit0.byte(), d0, d1, d2, d3])
    }

    /// Blank all four digits
    pub fn clear(&mut self) -> Result<(), BusError> {
        self.set_digits([0; 4], false)
    }

    /// Show "01:23" to check the wiring
    pub fn run_self_test(&mut self) -> Result<(), BusError> {
        let mut frame = [DigitAddress::Digit0.byte(); 5];
        frame[1..].copy_from_slice(&SELF_TEST_PATTERN);
        self.write_bytes(&frame)
    }

    fn start(&mut self) {
        self.hold(self.pins.both(), self.timing.clock_delay_us);
        self.hold(self.pins.clock, self.timing.clock_delay_us);
    }

    fn stop(&mut self) {
        self.hold(0, self.timing.clock_delay_us);
        self.hold(self.pins.clock, self.timing.clock_delay_us);
        self.hold(self.pins.both(), self.timing.clock_delay_us);
    }

    /// Eight bits, LSB first, latched on the rising clock edge
    fn write_byte(&mut self, byte: u8) {
        for bit in 0..8 {
            let data = if byte & (1 << bit) != 0 {
                self.pins.data
            } else {
                0
            };
            self.hold(0, self.timing.data_delay_us);
            self.hold(data, self.timing.clock_delay_us);
            self.hold(data | self.pins.clock, self.timing.clock_delay_us);
        }
    }

    /// Clock the acknowledge slot with data released, without sampling it
    fn skip_ack(&mut self) {
        let data = self.pins.data;
        self.hold(data, self.timing.clock_delay_us);
        self.hold(data | self.pins.clock, self.timing.clock_delay_us);
        self.hold(data, self.timing.clock_delay_us);
    }

    /// Write one word and hold it
    fn hold(&mut self, word: PinWord, delay_us: u32) {
        if let Err(_e) = self.port.write_pins(word) {
            self.fault = true;

            #[cfg(feature = "defmt")]
            defmt::warn!("tm1637: pin write failed: {}", defmt::Debug2Format(&_e));
        }
        self.delay.delay_us(delay_us);
    }

    fn finish(&mut self) -> Result<(), BusError> {
        if core::mem::take(&mut self.fault) {
            Err(BusError::Transport)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::vec;

    use proptest::prelude::*;

    use super::*;
    use crate::testing::{decode_tm1637, MockPort, RecordingDelay};

    /// Writes in one single-byte frame: start, 8 bits, ack, stop
    const COMMAND_WRITES: usize = 2 + 8 * 3 + 3 + 3;

    fn new_display(port: &mut MockPort) -> Tm1637<'_, MockPort, RecordingDelay> {
        let mut display =
            Tm1637::new(port, RecordingDelay::default(), Tm1637Config::default()).unwrap();
        display.port.writes.clear();
        display.delay.delays_ns.clear();
        display
    }

    #[test]
    fn test_new_rejects_closed_port() {
        let mut port = MockPort::closed();
        let result = Tm1637::new(&mut port, RecordingDelay::default(), Tm1637Config::default());
        assert!(matches!(result, Err(BusError::PortClosed)));
        drop(result);
        assert!(port.writes.is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_pins() {
        let mut port = MockPort::new();
        let config = Tm1637Config {
            pins: PinMap {
                clock: 0x10,
                data: 0x10,
            },
            ..Default::default()
        };
        let result = Tm1637::new(&mut port, RecordingDelay::default(), config);
        assert!(matches!(result, Err(BusError::InvalidPins)));
        drop(result);
        assert!(port.writes.is_empty());
    }

    #[test]
    fn test_init_sequence() {
        let mut port = MockPort::new();
        let display =
            Tm1637::new(&mut port, RecordingDelay::default(), Tm1637Config::default()).unwrap();
        assert_eq!(display.brightness(), Brightness::MIN);
        drop(display);

        let frames = decode_tm1637(port.pins, &port.writes);
        assert_eq!(
            frames,
            vec![vec![0x40], vec![0xC0, 0, 0, 0, 0], vec![0x88]]
        );
    }

    #[test]
    fn test_frame_words() {
        let mut port = MockPort::new();
        let mut display = new_display(&mut port);
        display.write_command(0x01).unwrap();
        drop(display);

        let writes = &port.writes;
        assert_eq!(writes.len(), COMMAND_WRITES);
        // Start
        assert_eq!(&writes[..2], &[0x18, 0x08]);
        // Bit 0 is 1, bit 1 is 0
        assert_eq!(&writes[2..5], &[0x00, 0x10, 0x18]);
        assert_eq!(&writes[5..8], &[0x00, 0x00, 0x08]);
        // Ack slot, then stop
        assert_eq!(&writes[26..29], &[0x10, 0x18, 0x10]);
        assert_eq!(&writes[29..], &[0x00, 0x08, 0x18]);
    }

    #[test]
    fn test_command_settles() {
        let mut port = MockPort::new();
        let mut display = new_display(&mut port);

        display.write_command(0x88).unwrap();
        assert_eq!(display.delay.delays_ns.len(), COMMAND_WRITES + 1);
        assert_eq!(display.delay.delays_ns.last(), Some(&1_000_000));
        assert_eq!(display.delay.total_us(), COMMAND_WRITES as u64 * 20 + 1_000);

        display.delay.delays_ns.clear();
        display.write_bytes(&[0xC0, 0x00]).unwrap();
        assert!(!display.delay.contains_us(1_000));
    }

    #[test]
    fn test_brightness_commands() {
        let mut port = MockPort::new();
        let mut display = new_display(&mut port);
        display.set_brightness(0).unwrap();
        display.set_brightness(1).unwrap();
        display.set_brightness(5).unwrap();
        display.set_brightness(8).unwrap();
        display.set_brightness(12).unwrap();
        assert_eq!(display.brightness(), Brightness::MAX);
        drop(display);

        let frames = decode_tm1637(port.pins, &port.writes);
        assert_eq!(
            frames,
            vec![vec![0x80], vec![0x88], vec![0x8C], vec![0x8F], vec![0x8F]]
        );
    }

    #[test]
    fn test_digits_with_colon() {
        let mut port = MockPort::new();
        let mut display = new_display(&mut port);
        display.set_digits([0x06, 0x5B, 0x4F, 0x66], true).unwrap();
        display.set_digits([0x06, 0x5B, 0x4F, 0x66], false).unwrap();
        drop(display);

        let frames = decode_tm1637(port.pins, &port.writes);
        assert_eq!(
            frames,
            vec![
                vec![0xC0, 0x06, 0xDB, 0x4F, 0x66],
                vec![0xC0, 0x06, 0x5B, 0x4F, 0x66],
            ]
        );
    }

    #[test]
    fn test_clear_leaves_no_colon() {
        let mut port = MockPort::new();
        let mut display = new_display(&mut port);
        display.set_digits([0xFF; 4], true).unwrap();
        display.clear().unwrap();
        drop(display);

        let frames = decode_tm1637(port.pins, &port.writes);
        assert_eq!(frames[1], vec![0xC0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_self_test_pattern() {
        let mut port = MockPort::new();
        let mut display = new_display(&mut port);
        display.run_self_test().unwrap();
        drop(display);

        let frames = decode_tm1637(port.pins, &port.writes);
        assert_eq!(frames, vec![vec![0xC0, 0x3F, 0x86, 0x5B, 0x4F]]);
    }

    #[test]
    fn test_write_failure_finishes_frame() {
        let mut port = MockPort::new();
        let mut display = new_display(&mut port);

        display.port.fail_writes = true;
        assert_eq!(display.write_command(0x88), Err(BusError::Transport));
        assert_eq!(display.port.writes.len(), COMMAND_WRITES);

        display.port.fail_writes = false;
        assert!(display.write_command(0x88).is_ok());
    }

    #[test]
    fn test_init_failure() {
        let mut port = MockPort::new();
        port.fail_writes = true;
        let result = Tm1637::new(&mut port, RecordingDelay::default(), Tm1637Config::default());
        assert!(matches!(result, Err(BusError::Transport)));
    }

    #[test]
    fn test_release_turns_display_off() {
        let mut port = MockPort::new();
        let display = new_display(&mut port);
        display.release().unwrap();

        let frames = decode_tm1637(port.pins, &port.writes);
        assert_eq!(frames, vec![vec![0x80]]);
    }

    #[test]
    fn test_custom_pins() {
        let mut port = MockPort::new();
        port.pins = PinMap::from_bits(0, 1).unwrap();
        let config = Tm1637Config {
            pins: port.pins,
            ..Default::default()
        };
        let mut display = Tm1637::new(&mut port, RecordingDelay::default(), config).unwrap();
        display.port.writes.clear();
        display.write_command(0x8A).unwrap();
        drop(display);

        assert!(port.writes.iter().all(|&w| w & !0x03 == 0));
        assert_eq!(decode_tm1637(port.pins, &port.writes), vec![vec![0x8A]]);
    }

    proptest! {
        #[test]
        fn prop_brightness_encoding(level in any::<u8>()) {
            let mut port = MockPort::new();
            let mut display = new_display(&mut port);
            display.set_brightness(level).unwrap();
            drop(display);

            let expected = match level {
                0 => 0x80,
                v => 0x88 | (v.min(8) - 1),
            };
            prop_assert_eq!(decode_tm1637(port.pins, &port.writes), vec![vec![expected]]);
        }

        #[test]
        fn prop_digits_round_trip(segments in any::<[u8; 4]>(), colon in any::<bool>()) {
            let mut port = MockPort::new();
            let mut display = new_display(&mut port);
            display.set_digits(segments, colon).unwrap();
            drop(display);

            let frames = decode_tm1637(port.pins, &port.writes);
            prop_assert_eq!(frames.len(), 1);
            prop_assert_eq!(frames[0][0], 0xC0);
            prop_assert_eq!(frames[0][2], segments[1] | if colon { COLON } else { 0 });
            prop_assert_eq!(&frames[0][3..], &segments[2..]);
        }
    }
}
