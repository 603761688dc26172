//! TM1637 command set
//!
//! Three command classes share the top two bits of the first byte of a
//! frame:
//!
//! | class           | bits 7-6 | payload                                  |
//! |-----------------|----------|------------------------------------------|
//! | data setting    | `01`     | bit 3 test mode, bit 2 fixed address     |
//! | display control | `10`     | bit 3 on, bits 2-0 pulse width           |
//! | address setting | `11`     | bits 2-0 digit register                  |

/// Segment bit that lights the colon (wired to digit 1)
pub const COLON: u8 = 0b1000_0000;

/// Segment patterns for 0-9 (bit 0 = segment a ... bit 6 = segment g)
pub const SEGMENT_DIGITS: [u8; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

/// Address handling for display data writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Addressing {
    /// Address advances after every data byte
    AutoIncrement,
    /// Every data byte goes to the addressed digit
    Fixed,
}

/// Data-setting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMode {
    Normal,
    Test,
}

/// Data-setting command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataCommand {
    pub addressing: Addressing,
    pub mode: DataMode,
}

impl DataCommand {
    /// Auto-increment, normal mode
    pub const WRITE_AUTO_INCREMENT: Self = Self {
        addressing: Addressing::AutoIncrement,
        mode: DataMode::Normal,
    };

    /// Command byte
    pub const fn byte(self) -> u8 {
        let mut byte = 0b0100_0000;
        if matches!(self.addressing, Addressing::Fixed) {
            byte |= 0b0000_0100;
        }
        if matches!(self.mode, DataMode::Test) {
            byte |= 0b0000_1000;
        }
        byte
    }
}

/// Digit register addressed by an address-setting command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DigitAddress {
    Digit0 = 0,
    Digit1 = 1,
    Digit2 = 2,
    Digit3 = 3,
}

impl DigitAddress {
    /// Command byte (0xC0-0xC3)
    pub const fn byte(self) -> u8 {
        0b1100_0000 | self as u8
    }
}

/// Display brightness, 0 (off) to 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness(u8);

impl Brightness {
    /// Display off
    pub const OFF: Self = Self(0);
    /// Dimmest visible level (1/16 duty)
    pub const MIN: Self = Self(1);
    /// Brightest level (14/16 duty)
    pub const MAX: Self = Self(8);

    /// Create a brightness level, clamping values above 8
    pub const fn new(level: u8) -> Self {
        if level > 8 {
            Self::MAX
        } else {
            Self(level)
        }
    }

    /// Level 0-8
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Pulse-width code 0-7, `None` when off
    ///
    /// Duty per code: 1/16, 2/16, 4/16, 10/16, 11/16, 12/16, 13/16, 14/16.
    pub const fn pulse_width(self) -> Option<u8> {
        match self.0 {
            0 => None,
            level => Some(level - 1),
        }
    }
}

/// Display-control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayControl {
    Off,
    On {
        /// 3-bit pulse-width code
        pulse_width: u8,
    },
}

impl DisplayControl {
    /// Command byte
    pub const fn byte(self) -> u8 {
        match self {
            DisplayControl::Off => 0b1000_0000,
            DisplayControl::On { pulse_width } => 0b1000_1000 | (pulse_width & 0b111),
        }
    }
}

impl From<Brightness> for DisplayControl {
    fn from(brightness: Brightness) -> Self {
        match brightness.pulse_width() {
            None => DisplayControl::Off,
            Some(pulse_width) => DisplayControl::On { pulse_width },
        }
    }
}
