//! Whole-system power estimation.
//!
//! Only CPU and GPU power are measured directly. RAM, fans and drives have
//! no sensor on most hardware, so they are estimated from installed
//! capacity and the configured component counts. The resulting DC figure
//! is scaled by a PSU multiplier to approximate what is drawn from the wall.

use powerwatch_types::{Readings, UNIT_WATTS};

use super::round_half_even;
use crate::config::{FanCounts, PlatformConfig, SensorNames, SensorRole};

/// Installed RAM, in GB, drawing one watt.
pub const RAM_GB_PER_WATT: f64 = 2.6;

/// Typical draw of an 80mm case fan at full speed.
pub const FAN_80MM_WATTS: f64 = 1.0;

/// Typical draw of a 120mm case fan at full speed.
pub const FAN_120MM_WATTS: f64 = 5.0;

/// Typical draw of a 200mm case fan at full speed.
pub const FAN_200MM_WATTS: f64 = 7.0;

/// Fans never spin below this duty cycle, whatever the CPU load.
pub const MIN_FAN_DUTY_PERCENT: f64 = 40.0;

/// Flat estimate per installed drive.
pub const DRIVE_WATTS: f64 = 5.0;

/// Multiplier turning delivered DC power into wall power.
///
/// An efficiency of `e` percent loses `100 - e` percent in conversion, so
/// 85% gives 1.15 and 100% gives 1.0. Callers keep `e` within 0..=100.
pub fn calculate_power_multiplier(psu_efficiency: f64) -> f64 {
    let dissipation = 100.0 - psu_efficiency;
    (100.0 + dissipation) / 100.0
}

/// Estimated fan power, using CPU load as a stand-in for fan duty cycle.
pub fn calculate_fans_power(fans: &FanCounts, cpu_load_percent: f64) -> f64 {
    let full_speed = FAN_80MM_WATTS * f64::from(fans.fan_80mm)
        + FAN_120MM_WATTS * f64::from(fans.fan_120mm)
        + FAN_200MM_WATTS * f64::from(fans.fan_200mm);

    full_speed / 100.0 * cpu_load_percent.max(MIN_FAN_DUTY_PERCENT)
}

/// Estimated RAM power from used + available physical memory (MB).
///
/// The total approximates installed capacity; the result is rounded to a
/// whole watt.
pub fn estimate_ram_power(used_mb: f64, available_mb: f64) -> f64 {
    let total_mb = used_mb + available_mb;
    round_half_even(total_mb / 1000.0 / RAM_GB_PER_WATT)
}

/// Estimated power for `count` drives.
pub fn drives_power(count: u32) -> f64 {
    DRIVE_WATTS * f64::from(count)
}

/// Per-component power before PSU correction, in watts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowerEstimate {
    pub cpu: f64,
    pub gpu: f64,
    pub ram: f64,
    pub fans: f64,
    pub drives: f64,
}

impl PowerEstimate {
    /// Estimate reporting zero for every component.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Sum of every component.
    pub fn total(&self) -> f64 {
        self.cpu + self.gpu + self.ram + self.fans + self.drives
    }

    /// Apply `multiplier` and round every figure to whole watts.
    ///
    /// The total is rounded from the unrounded sum, so it can differ from
    /// the sum of the rounded components by a watt or two.
    pub fn corrected(&self, multiplier: f64) -> PowerReport {
        let scale = |watts: f64| round_half_even(watts * multiplier);

        PowerReport {
            total: scale(self.total()),
            cpu: scale(self.cpu),
            gpu: scale(self.gpu),
            ram: scale(self.ram),
            fans: scale(self.fans),
            drives: scale(self.drives),
        }
    }
}

/// Wall power figures, rounded to whole watts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowerReport {
    pub total: f64,
    pub cpu: f64,
    pub gpu: f64,
    pub ram: f64,
    pub fans: f64,
    pub drives: f64,
}

impl PowerReport {
    pub fn unit(&self) -> &'static str {
        UNIT_WATTS
    }
}

/// Power model for one machine.
#[derive(Debug, Clone)]
pub struct PowerModel {
    fans: FanCounts,
    drives: u32,
    multiplier: f64,
    sensors: SensorNames,
}

impl PowerModel {
    pub fn new(platform: &PlatformConfig) -> Self {
        Self {
            fans: platform.fans,
            drives: platform.drives_quantity,
            multiplier: calculate_power_multiplier(platform.psu_efficiency),
            sensors: platform.sensors.clone(),
        }
    }

    /// The PSU multiplier applied by [`PowerModel::report`].
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Estimate DC power from one poll. Missing sensors count as zero.
    pub fn estimate(&self, readings: &Readings) -> PowerEstimate {
        let lookup = |role: SensorRole, unit: &str| {
            readings.find_or_default(self.sensors.label(role), unit).value
        };

        let cpu = lookup(SensorRole::CpuPower, UNIT_WATTS);
        let gpu = lookup(SensorRole::GpuPower, UNIT_WATTS);
        let ram = estimate_ram_power(
            lookup(SensorRole::RamUsed, ""),
            lookup(SensorRole::RamAvailable, ""),
        );
        let cpu_load = lookup(SensorRole::CpuLoad, "%");

        PowerEstimate {
            cpu,
            gpu,
            ram,
            fans: calculate_fans_power(&self.fans, cpu_load),
            drives: drives_power(self.drives),
        }
    }

    /// Estimate wall power from one poll.
    pub fn report(&self, readings: &Readings) -> PowerReport {
        self.estimate(readings).corrected(self.multiplier)
    }
}
