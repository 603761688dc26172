//! TM1637 timing and wiring

use pinbang_hal::PinMap;

/// Line timing of the TM1637 framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tm1637Timing {
    /// Hold time after each clock change (µs)
    pub clock_delay_us: u32,
    /// Hold time after pulling both lines low before a data bit (µs)
    pub data_delay_us: u32,
    /// Pause after a single-byte command frame (µs)
    pub command_settle_us: u32,
}

impl Tm1637Timing {
    /// Conservative timing that works through USB bit-bang latency
    pub const STANDARD: Self = Self {
        clock_delay_us: 20,
        data_delay_us: 20,
        command_settle_us: 1_000,
    };
}

impl Default for Tm1637Timing {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// TM1637 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tm1637Config {
    /// Port bits wired to CLK and DIO
    pub pins: PinMap,
    pub timing: Tm1637Timing,
}
