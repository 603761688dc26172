//! Software two-wire bus
//!
//! The bus master lives entirely in [`BitBangBus`]. Device drivers that only
//! need to push bytes at a fixed address talk to it through [`ByteWrite`],
//! which keeps them testable against a recording fake.

mod bitbang;
mod config;

pub use bitbang::BitBangBus;
pub use config::{BusConfig, BusTiming};

use core::fmt;

/// Acknowledge slot sampled after a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Receiver pulled the data line low
    Ack,
    /// Data line stayed high
    Nack,
}

impl Ack {
    /// Interpret a sampled data line level
    pub const fn from_level(high: bool) -> Self {
        if high {
            Ack::Nack
        } else {
            Ack::Ack
        }
    }

    /// Line level that encodes this acknowledge
    pub const fn level(self) -> bool {
        matches!(self, Ack::Nack)
    }

    /// Check for a positive acknowledge
    pub const fn is_ack(self) -> bool {
        matches!(self, Ack::Ack)
    }
}

/// Whether a start condition is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No transaction in progress
    #[default]
    Idle,
    /// Start sent, the next start is a repeated start
    Started,
}

/// Bus and device driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Driver constructed on a port that is not open
    PortClosed,
    /// Pin map with overlapping or multi-bit line masks
    InvalidPins,
    /// Byte transfer without an open transaction
    NotStarted,
    /// At least one pin write of the operation failed
    Transport,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::PortClosed => f.write_str("port is not open"),
            BusError::InvalidPins => f.write_str("clock and data must be distinct single bits"),
            BusError::NotStarted => f.write_str("no transaction in progress"),
            BusError::Transport => f.write_str("pin transport failed during transfer"),
        }
    }
}

/// Byte-level write access to a device at a fixed address
pub trait ByteWrite {
    /// Write one byte, optionally opening the transaction (start + address)
    /// and optionally closing it (stop)
    ///
    /// Returns the acknowledge sampled after `data`. Without `send_start`
    /// a transaction must already be open, otherwise nothing is sent and
    /// [`BusError::NotStarted`] is returned.
    fn write_byte(&mut self, send_start: bool, send_stop: bool, data: u8)
        -> Result<Ack, BusError>;
}

impl<T: ByteWrite + ?Sized> ByteWrite for &mut T {
    fn write_byte(
        &mut self,
        send_start: bool,
        send_stop: bool,
        data: u8,
    ) -> Result<Ack, BusError> {
        T::write_byte(self, send_start, send_stop, data)
    }
}
