//! HD44780 character LCD behind a PCF8574 I/O expander
//!
//! The expander drives the LCD in 4-bit mode: DB4-DB7 come from the upper
//! expander bits, RS/RW/EN/backlight from the lower ones (see
//! [`command::expander`]). Every logical byte therefore goes out as two
//! nibbles, and every nibble as two bus writes:
//!
//! ```text
//! write_byte(start, !stop, nibble | RS | EN | BL)   EN high
//! 2 µs
//! write_byte(!start, stop, nibble | RS | BL)        EN low, LCD latches
//! settle
//! ```
//!
//! The LCD has no readable state over this wiring. Display, cursor, blink and
//! backlight flags live in the driver and the composed display-control
//! instruction is resent on every change.
//!
//! Acknowledges from the expander are sampled by the bus but not acted on.

pub mod command;

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::bus::{BusError, ByteWrite};
use command::{
    cgram_address, ddram_address, expander, Command, CursorShift, DisplayControl, EntryMode,
    FunctionSet, Register,
};

/// Common PCF8574 backpack address (A0-A2 pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Enable pulse width (µs)
const ENABLE_PULSE_US: u32 = 2;

/// Settle time after each half of a byte (µs)
const NIBBLE_SETTLE_US: u32 = 10;

/// Settle time after a data write (µs)
const DATA_SETTLE_US: u32 = 50;

/// Settle time after each instruction of the init sequence (µs)
const INIT_SETTLE_US: u32 = 200;

/// Power-on handshake: 8-bit function set three times, then 4-bit
const HANDSHAKE: [(FunctionSet, u32); 4] = [
    (FunctionSet::EIGHT_BIT, 4_500),
    (FunctionSet::EIGHT_BIT, 150),
    (FunctionSet::EIGHT_BIT, 150),
    (FunctionSet::FOUR_BIT, 150),
];

/// Driver-side copy of the LCD mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub backlight: bool,
    pub display: bool,
    pub cursor: bool,
    pub blink: bool,
}

impl DisplayState {
    /// Everything on, as left by init
    pub const ALL_ON: Self = Self {
        backlight: true,
        display: true,
        cursor: true,
        blink: true,
    };

    /// Everything off, as left by release
    pub const ALL_OFF: Self = Self {
        backlight: false,
        display: false,
        cursor: false,
        blink: false,
    };

    /// Display-control instruction for these flags
    pub const fn control(&self) -> DisplayControl {
        DisplayControl {
            display: self.display,
            cursor: self.cursor,
            blink: self.blink,
        }
    }

    const fn backlight_bit(&self) -> u8 {
        if self.backlight {
            expander::BL
        } else {
            0
        }
    }
}

/// HD44780 16x2 LCD driver
///
/// Every operation clocks out its whole byte sequence even when a transfer
/// fails, then reports [`BusError::Transport`] if any transfer in it failed.
pub struct Lcd1602<B, D> {
    bus: B,
    delay: D,
    state: DisplayState,
}

impl<B: ByteWrite, D: DelayNs> Lcd1602<B, D> {
    /// Run the power-on handshake and configure the LCD
    ///
    /// Leaves the LCD cleared with display, cursor, blink and backlight on.
    pub fn new(bus: B, delay: D) -> Result<Self, BusError> {
        let mut lcd = Self {
            bus,
            delay,
            state: DisplayState::ALL_ON,
        };

        let mut result = lcd.init_4bit();
        lcd.delay.delay_us(INIT_SETTLE_US);

        for command in [
            Command::FunctionSet(FunctionSet::FOUR_BIT_TWO_LINE),
            Command::CursorShift(CursorShift::CURSOR_RIGHT),
            Command::DisplayControl(lcd.state.control()),
            Command::EntryMode(EntryMode::LEFT_TO_RIGHT),
        ] {
            result = result.and(lcd.send(command.byte(), Register::Command));
            lcd.delay.delay_us(INIT_SETTLE_US);
        }

        result = result.and(lcd.clear());
        lcd.delay.delay_us(100);

        match result {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("lcd: initialized");
                Ok(lcd)
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("lcd: init failed: {}", e);
                Err(e)
            }
        }
    }

    /// Turn everything off, clear, and hand the bus back
    ///
    /// The bus is returned even when the shutdown writes fail, so the
    /// caller can still release it and close the port.
    pub fn release(mut self) -> (B, Result<(), BusError>) {
        self.state = DisplayState::ALL_OFF;
        let result = self.update_display_control().and(self.clear());

        if let Err(_e) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("lcd: shutdown failed: {}", _e);
        }

        (self.bus, result)
    }

    /// Current mode flags
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Clear the display and home the cursor
    pub fn clear(&mut self) -> Result<(), BusError> {
        self.command(Command::Clear)
    }

    /// Home the cursor
    pub fn home(&mut self) -> Result<(), BusError> {
        self.command(Command::ReturnHome)
    }

    /// Display on/off (DDRAM content is kept)
    pub fn display(&mut self, enable: bool) -> Result<(), BusError> {
        self.state.display = enable;
        self.update_display_control()
    }

    /// Underline cursor on/off
    pub fn cursor(&mut self, enable: bool) -> Result<(), BusError> {
        self.state.cursor = enable;
        self.update_display_control()
    }

    /// Blinking block cursor on/off
    pub fn blink(&mut self, enable: bool) -> Result<(), BusError> {
        self.state.blink = enable;
        self.update_display_control()
    }

    /// Backlight on/off
    ///
    /// The backlight bit rides along with every expander write, so the
    /// display-control instruction is resent to apply it right away.
    pub fn backlight(&mut self, enable: bool) -> Result<(), BusError> {
        self.state.backlight = enable;
        self.update_display_control()
    }

    /// Write one character code at the cursor
    pub fn put_char(&mut self, code: u8) -> Result<(), BusError> {
        let result = self.send(code, Register::Data);
        self.delay.delay_us(DATA_SETTLE_US);
        result
    }

    /// Write a string at the cursor
    ///
    /// Bytes are sent as-is; the LCD character ROM matches ASCII in 0x20-0x7D.
    pub fn put_str(&mut self, text: &str) -> Result<(), BusError> {
        text.bytes()
            .fold(Ok(()), |result, code| result.and(self.put_char(code)))
    }

    /// Move the cursor, clamping to row 0-1 and column 0-39
    pub fn move_cursor(&mut self, row: u8, col: u8) -> Result<(), BusError> {
        self.command(Command::SetDdramAddress(ddram_address(row, col)))
    }

    /// Load a 5x8 glyph bitmap into one of the 8 CGRAM slots
    ///
    /// The glyph is then printable as character code `code`. Leaves the
    /// address counter in CGRAM; move the cursor before writing text.
    pub fn set_custom_glyph(&mut self, code: u8, bitmap: &[u8]) -> Result<(), BusError> {
        let address = self.command(Command::SetCgramAddress(cgram_address(code)));
        bitmap
            .iter()
            .fold(address, |result, &row| result.and(self.put_char(row)))
    }

    fn update_display_control(&mut self) -> Result<(), BusError> {
        self.command(Command::DisplayControl(self.state.control()))
    }

    fn command(&mut self, command: Command) -> Result<(), BusError> {
        let result = self.send(command.byte(), Register::Command);
        self.delay.delay_us(command.settle_us());
        result
    }

    /// Force the controller into 4-bit mode from any state
    fn init_4bit(&mut self) -> Result<(), BusError> {
        HANDSHAKE.iter().fold(Ok(()), |result, &(function, settle)| {
            let nibble = Command::FunctionSet(function).byte() & 0xF0;
            result.and(self.send_nibble(nibble, settle))
        })
    }

    /// Send a byte as high nibble then low nibble
    fn send(&mut self, byte: u8, register: Register) -> Result<(), BusError> {
        let rs = register.select_bit();
        let high = self.send_nibble((byte & 0xF0) | rs, NIBBLE_SETTLE_US);
        let low = self.send_nibble((byte << 4) | rs, NIBBLE_SETTLE_US);
        high.and(low)
    }

    /// Strobe one nibble (upper four bits of `bits`) into the LCD
    fn send_nibble(&mut self, bits: u8, settle_us: u32) -> Result<(), BusError> {
        let bits = (bits & !(expander::BL | expander::EN)) | self.state.backlight_bit();

        let strobe = self.bus.write_byte(true, false, bits | expander::EN);
        self.delay.delay_us(ENABLE_PULSE_US);
        let latch = self.bus.write_byte(false, true, bits);
        self.delay.delay_us(settle_us);

        strobe.and(latch).map(|_ack| ())
    }
}

impl<B: ByteWrite, D: DelayNs> fmt::Write for Lcd1602<B, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_str(s).map_err(|_| fmt::Error)
    }
}
