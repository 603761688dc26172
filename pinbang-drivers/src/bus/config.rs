//! Bus timing and wiring

use pinbang_hal::PinMap;

/// Bit timing of the emulated bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusTiming {
    /// Settle time around each clock edge (µs)
    pub bit_delay_us: u32,
    /// Pause between clock-stretch polls (µs)
    pub poll_delay_us: u32,
    /// Number of clock polls before giving up on a stretched clock
    pub clock_retries: u16,
}

impl BusTiming {
    /// ~50 kHz with a 1000 poll stretch budget
    pub const STANDARD: Self = Self {
        bit_delay_us: 10,
        poll_delay_us: 1,
        clock_retries: 1000,
    };
}

impl Default for BusTiming {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Which port bits carry clock and data
    pub pins: PinMap,
    /// Bit timing
    pub timing: BusTiming,
}

impl BusConfig {
    /// Create a config with custom wiring and standard timing
    pub const fn with_pins(pins: PinMap) -> Self {
        Self {
            pins,
            timing: BusTiming::STANDARD,
        }
    }
}
