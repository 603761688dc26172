//! Display drivers built on a pin-word port
//!
//! Everything in this crate is implemented by toggling two bits of a
//! [`pinbang_hal::GpioPort`] with blocking delays in between:
//!
//! - [`bus::BitBangBus`] - software two-wire (I2C-style) bus master
//! - [`lcd::Lcd1602`] - HD44780 character LCD behind a PCF8574 expander,
//!   driven through the bus
//! - [`segment::Tm1637`] - TM1637 4-digit 7-segment controller, driven
//!   directly on the port with its own framing
//!
//! Delays come from an injected [`embedded_hal::delay::DelayNs`]. The timings
//! are hard requirements of the chips, not tuning knobs.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod lcd;
pub mod segment;

#[cfg(test)]
mod testing;

pub use bus::{Ack, BitBangBus, BusConfig, BusError, BusTiming, ByteWrite};
pub use lcd::Lcd1602;
pub use segment::{Tm1637, Tm1637Config, Tm1637Timing};
