//! pinbang Hardware Abstraction Layer
//!
//! This crate defines the one primitive every driver in the workspace is
//! built on: a port that writes all of its pin levels in one atomic byte and
//! reads them back in one atomic byte. USB bit-bang adapters (FT232R and
//! friends) expose exactly this and nothing more.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pinbang-apps (demo sequences)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinbang-drivers (bus, LCD, TM1637)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinbang-hal (this crate - GpioPort)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!          USB adapter transport (external)
//! ```
//!
//! # Traits
//!
//! - [`port::GpioPort`] - Whole-word pin write/read with open/close lifecycle

#![no_std]
#![deny(unsafe_code)]

pub mod port;

// Re-export key types at crate root for convenience
pub use port::{GpioPort, PinMap, PinWord, PortError};
