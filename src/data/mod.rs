//! Metric derivation from raw monitor readings.
//!
//! ## Submodules
//!
//! - [`load`]: CPU/GPU/RAM usage, read directly from the monitor
//! - [`power`]: Whole-system power estimate and PSU efficiency correction
//!
//! ## Data Flow
//!
//! ```text
//! Readings (one poll)
//!        │
//!        ├──▶ LoadReport::from_readings()   (%)
//!        │
//!        └──▶ PowerModel::estimate()        (W, DC)
//!                    │
//!                    ▼
//!             PowerEstimate::corrected()    (W, wall)
//! ```
//!
//! Every rounding step rounds the stored value, half to even.

pub mod load;
pub mod power;

pub use load::LoadReport;
pub use power::{
    calculate_fans_power, calculate_power_multiplier, drives_power, estimate_ram_power,
    PowerEstimate, PowerModel, PowerReport,
};

/// Round to the nearest whole number, ties to even.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to one decimal place.
///
/// Rounds the exact binary value rather than `value * 10`, so a literal
/// like 0.35 (stored just below the tie) goes down to 0.3.
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(7480.06), 7480.0);
        assert_eq!(round_half_even(-0.4), -0.0);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(37.46), 37.5);
        assert_eq!(round_to_tenth(51.23), 51.2);
        assert_eq!(round_to_tenth(12.0), 12.0);
    }

    #[test]
    fn test_round_to_tenth_uses_stored_value() {
        // Stored just below the written tie
        assert_eq!(round_to_tenth(0.35), 0.3);
        assert_eq!(round_to_tenth(1.45), 1.4);
        // Stored just above it
        assert_eq!(round_to_tenth(0.45), 0.5);
        assert_eq!(round_to_tenth(0.65), 0.7);
    }
}
