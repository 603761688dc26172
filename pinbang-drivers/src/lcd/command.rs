//! HD44780 instruction set and PCF8574 wiring
//!
//! Each instruction is a typed value that knows its own byte encoding, so
//! callers never OR raw masks together.

/// PCF8574 expander bits wired to the LCD control lines
///
/// The data nibble (DB4-DB7) sits in the upper four bits.
pub mod expander {
    /// Register select (0 = instruction, 1 = data)
    pub const RS: u8 = 0b0000_0001;
    /// Read/write select (always 0, write)
    pub const RW: u8 = 0b0000_0010;
    /// Enable strobe, data is latched on the falling edge
    pub const EN: u8 = 0b0000_0100;
    /// Backlight transistor
    pub const BL: u8 = 0b0000_1000;
}

/// HD44780 register targeted by a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Instruction register (RS = 0)
    Command,
    /// Data register, DDRAM or CGRAM (RS = 1)
    Data,
}

impl Register {
    /// RS bit for this register
    pub const fn select_bit(self) -> u8 {
        match self {
            Register::Command => 0,
            Register::Data => expander::RS,
        }
    }
}

/// Interface data length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataLength {
    Bits4,
    Bits8,
}

/// Number of display lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lines {
    One,
    Two,
}

/// Character font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    Dots5x8,
    Dots5x11,
}

/// Function set options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FunctionSet {
    pub data_length: DataLength,
    pub lines: Lines,
    pub font: Font,
}

impl FunctionSet {
    /// 4-bit interface, 2 lines, 5x8 font (the 16x2 module behind a PCF8574)
    pub const FOUR_BIT_TWO_LINE: Self = Self {
        data_length: DataLength::Bits4,
        lines: Lines::Two,
        font: Font::Dots5x8,
    };

    /// 8-bit function set used during the power-on handshake
    pub const EIGHT_BIT: Self = Self {
        data_length: DataLength::Bits8,
        lines: Lines::One,
        font: Font::Dots5x8,
    };

    /// 4-bit function set used to leave the handshake
    pub const FOUR_BIT: Self = Self {
        data_length: DataLength::Bits4,
        lines: Lines::One,
        font: Font::Dots5x8,
    };

    const fn bits(self) -> u8 {
        let mut bits = 0;
        if matches!(self.data_length, DataLength::Bits8) {
            bits |= 0b0001_0000;
        }
        if matches!(self.lines, Lines::Two) {
            bits |= 0b0000_1000;
        }
        if matches!(self.font, Font::Dots5x11) {
            bits |= 0b0000_0100;
        }
        bits
    }
}

/// What a cursor/display shift moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftTarget {
    Cursor,
    Display,
}

/// Shift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftDirection {
    Left,
    Right,
}

/// Cursor or display shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CursorShift {
    pub target: ShiftTarget,
    pub direction: ShiftDirection,
}

impl CursorShift {
    /// Move the cursor one position right
    pub const CURSOR_RIGHT: Self = Self {
        target: ShiftTarget::Cursor,
        direction: ShiftDirection::Right,
    };

    const fn bits(self) -> u8 {
        let mut bits = 0;
        if matches!(self.target, ShiftTarget::Display) {
            bits |= 0b0000_1000;
        }
        if matches!(self.direction, ShiftDirection::Right) {
            bits |= 0b0000_0100;
        }
        bits
    }
}

/// Display on/off, cursor and blink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayControl {
    pub display: bool,
    pub cursor: bool,
    pub blink: bool,
}

impl DisplayControl {
    const fn bits(self) -> u8 {
        let mut bits = 0;
        if self.display {
            bits |= 0b0000_0100;
        }
        if self.cursor {
            bits |= 0b0000_0010;
        }
        if self.blink {
            bits |= 0b0000_0001;
        }
        bits
    }
}

/// Entry mode: address direction after each data write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EntryMode {
    /// Increment (true) or decrement the address counter
    pub increment: bool,
    /// Shift the whole display with each write
    pub shift: bool,
}

impl EntryMode {
    /// Left-to-right text, no display shift
    pub const LEFT_TO_RIGHT: Self = Self {
        increment: true,
        shift: false,
    };

    const fn bits(self) -> u8 {
        let mut bits = 0;
        if self.increment {
            bits |= 0b0000_0010;
        }
        if self.shift {
            bits |= 0b0000_0001;
        }
        bits
    }
}

/// HD44780 instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Clear DDRAM and home the cursor
    Clear,
    /// Home the cursor and undo display shifts
    ReturnHome,
    EntryMode(EntryMode),
    DisplayControl(DisplayControl),
    CursorShift(CursorShift),
    FunctionSet(FunctionSet),
    /// Set CGRAM address (6 bits)
    SetCgramAddress(u8),
    /// Set DDRAM address (7 bits)
    SetDdramAddress(u8),
}

impl Command {
    /// Instruction byte
    pub const fn byte(self) -> u8 {
        match self {
            Command::Clear => 0b0000_0001,
            Command::ReturnHome => 0b0000_0010,
            Command::EntryMode(mode) => 0b0000_0100 | mode.bits(),
            Command::DisplayControl(control) => 0b0000_1000 | control.bits(),
            Command::CursorShift(shift) => 0b0001_0000 | shift.bits(),
            Command::FunctionSet(function) => 0b0010_0000 | function.bits(),
            Command::SetCgramAddress(addr) => 0b0100_0000 | (addr & 0x3F),
            Command::SetDdramAddress(addr) => 0b1000_0000 | (addr & 0x7F),
        }
    }

    /// Execution time to wait after the instruction (µs)
    ///
    /// Clear and home run an internal erase/reset cycle; everything else
    /// finishes in ~37 µs.
    pub const fn settle_us(self) -> u32 {
        match self {
            Command::Clear => 5_000,
            Command::ReturnHome => 1_600,
            _ => 50,
        }
    }
}

/// Last column of a 40-character DDRAM line
pub const MAX_COLUMN: u8 = 0x27;

/// DDRAM offset of the second line
pub const ROW_OFFSET: u8 = 0x40;

/// DDRAM address for a cursor position, clamping out-of-range values
///
/// Row 0 spans 0x00-0x27 and row 1 spans 0x40-0x67.
pub fn ddram_address(row: u8, col: u8) -> u8 {
    let row = row.min(1);
    let col = col.min(MAX_COLUMN);
    (row * ROW_OFFSET + col) & 0x7F
}

/// CGRAM address of a custom glyph (8 bytes per glyph)
pub fn cgram_address(code: u8) -> u8 {
    (code << 3) & 0x3F
}
