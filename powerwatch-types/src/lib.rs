//! # powerwatch-types
//!
//! Core types shared by the powerwatch crates. A poll of the hardware
//! monitor produces a [`Readings`] collection; the application derives
//! power and load figures from it and emits them as [`StateUpdate`]s.
//!
//! ## Features
//!
//! - `std` (default): Standard library support (`std::error::Error` impls)
//! - `serde`: JSON serialization of readings and state updates via serde
//!
//! ## Example
//!
//! ```rust
//! use powerwatch_types::{Reading, ReadingKind, Readings};
//!
//! let readings: Readings = vec![
//!     Reading::new("CPU Package Power", ReadingKind::Power, 42.5, "W"),
//!     Reading::new("Total CPU Usage", ReadingKind::Usage, 12.0, "%"),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(readings.find_or_default("CPU Package Power", "W").value, 42.5);
//!
//! // Missing sensors resolve to a zero reading instead of an error
//! let gpu = readings.find_or_default("GPU Power (Total)", "W");
//! assert_eq!(gpu.value, 0.0);
//! assert_eq!(gpu.unit, "W");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod reading;
mod readings;
mod state;

pub use reading::*;
pub use readings::*;
pub use state::*;

/// Unit used for every power figure.
pub const UNIT_WATTS: &str = "W";

/// Unit used for every load figure.
pub const UNIT_PERCENT: &str = "%";
