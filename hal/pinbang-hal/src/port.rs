//! Pin-word port abstraction
//!
//! A bit-bang adapter has no notion of individual pins on the wire: every
//! write sets all lines at once and every read samples all lines at once.
//! Drivers therefore keep their own copy of the full word and replay it on
//! each change.

use core::fmt;

/// Pin state of the whole port, one bit per physical line
pub type PinWord = u8;

/// Whole-port GPIO transport
///
/// Implementations wrap the adapter's transport (USB bit-bang mode on an
/// FT232R, a simulator, ...). Drivers borrow the port mutably for their whole
/// lifetime, so nothing else can write to it while a protocol is running.
///
/// # Lifecycle
///
/// `open` must succeed before a driver is constructed on top of the port.
/// `close` is called by the owner after every driver has been released.
pub trait GpioPort {
    /// Transport error
    type Error: fmt::Debug;

    /// Open and configure the transport for bit-bang output
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Close the transport
    ///
    /// Closing an already closed port is a no-op.
    fn close(&mut self);

    /// Whether the transport is currently open
    fn is_open(&self) -> bool;

    /// Set every line of the port from `word` in one transfer
    fn write_pins(&mut self, word: PinWord) -> Result<(), Self::Error>;

    /// Sample every line of the port in one transfer
    ///
    /// Implementations may need to switch the lines to input around the
    /// sample and restore output afterwards.
    fn read_pins(&mut self) -> Result<PinWord, Self::Error>;
}

impl<T: GpioPort + ?Sized> GpioPort for &mut T {
    type Error = T::Error;

    fn open(&mut self) -> Result<(), Self::Error> {
        T::open(self)
    }

    fn close(&mut self) {
        T::close(self)
    }

    fn is_open(&self) -> bool {
        T::is_open(self)
    }

    fn write_pins(&mut self, word: PinWord) -> Result<(), Self::Error> {
        T::write_pins(self, word)
    }

    fn read_pins(&mut self) -> Result<PinWord, Self::Error> {
        T::read_pins(self)
    }
}

/// Generic transport errors
///
/// For port implementations that have nothing richer to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// The transport could not be opened or configured
    OpenFailed,
    /// Operation on a port that is not open
    NotOpen,
    /// Writing the pin word failed
    WriteFailed,
    /// Reading the pin word failed
    ReadFailed,
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::OpenFailed => f.write_str("failed to open port"),
            PortError::NotOpen => f.write_str("port is not open"),
            PortError::WriteFailed => f.write_str("pin write failed"),
            PortError::ReadFailed => f.write_str("pin read failed"),
        }
    }
}

/// Assignment of the two bus lines to bits of the pin word
///
/// Both masks must be single, distinct bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    /// Clock line (SCL / CLK)
    pub clock: PinWord,
    /// Data line (SDA / DIO)
    pub data: PinWord,
}

impl PinMap {
    /// FT232R wiring: CTS carries the clock, DTR carries data
    pub const FT232R: Self = Self {
        clock: 0x08,
        data: 0x10,
    };

    /// Create a pin map from two bit indices
    ///
    /// Returns `None` unless both indices fit the word and differ.
    pub const fn from_bits(clock_bit: u8, data_bit: u8) -> Option<Self> {
        let bits = PinWord::BITS as u8;
        if clock_bit >= bits || data_bit >= bits || clock_bit == data_bit {
            return None;
        }
        Some(Self {
            clock: 1 << clock_bit,
            data: 1 << data_bit,
        })
    }

    /// Both lines released (high)
    pub const fn both(&self) -> PinWord {
        self.clock | self.data
    }

    /// Check that the masks are single distinct bits
    pub const fn is_valid(&self) -> bool {
        self.clock.count_ones() == 1 && self.data.count_ones() == 1 && self.clock != self.data
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::FT232R
    }
}
