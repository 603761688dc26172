//! Demo sequences
//!
//! Each sequence runs until it finishes or its [`CancelToken`] is set. The
//! token is checked between display updates, never inside a transfer.
//! Transfer failures are logged and counted, and the sequence keeps going.
//!
//! [`CancelToken`]: crate::CancelToken

mod blink;
mod lcd;
mod segment;

pub use blink::{blink, BLINK_CYCLES};
pub use lcd::{hello_loop, status_loop, DEGREE_SIGN};
pub use segment::{segment_showcase, SHOWCASE_FRAMES};

use pinbang_drivers::BusError;

/// Pause between screens of the LCD demos (ms)
pub const SCREEN_PAUSE_MS: u32 = 1_000;

/// Outcome of a demo run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DemoStats {
    /// Display updates performed
    pub updates: u32,
    /// Updates that reported a transfer failure
    pub failures: u32,
}

impl DemoStats {
    fn record(&mut self, result: Result<(), BusError>) {
        self.updates = self.updates.saturating_add(1);
        if let Err(_e) = result {
            self.failures = self.failures.saturating_add(1);

            #[cfg(feature = "defmt")]
            defmt::warn!("demo: display update failed: {}", _e);
        }
    }
}
