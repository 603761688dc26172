//! Host-side demo sequences for pinbang displays
//!
//! The sequences are plain functions over a port, a delay provider and a
//! [`CancelToken`], so a binary only has to open a concrete USB transport,
//! wire Ctrl+C to [`CancelToken::cancel`] and call one of them:
//!
//! | sequence                       | hardware                         |
//! |--------------------------------|----------------------------------|
//! | [`demo::blink`]                | two LEDs on the clock/data bits  |
//! | [`demo::hello_loop`]           | 16x2 LCD on a PCF8574 backpack   |
//! | [`demo::status_loop`]          | 16x2 LCD on a PCF8574 backpack   |
//! | [`demo::segment_showcase`]     | TM1637 4-digit display           |

#![deny(unsafe_code)]

pub mod cancel;
pub mod delay;
pub mod demo;
pub mod format;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use cancel::CancelToken;
pub use delay::ThreadDelay;
pub use demo::DemoStats;
pub use telemetry::{ClockTime, HostTelemetry, Telemetry};
