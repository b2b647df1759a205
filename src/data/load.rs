//! System load figures read straight from the monitor.

use powerwatch_types::{Readings, UNIT_PERCENT};

use super::round_to_tenth;
use crate::config::{SensorNames, SensorRole};

/// CPU, GPU and RAM usage in percent, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadReport {
    pub cpu: f64,
    pub gpu: f64,
    pub ram: f64,
}

impl LoadReport {
    /// Report with every load at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Read the configured load sensors. Missing sensors read as zero.
    pub fn from_readings(readings: &Readings, sensors: &SensorNames) -> Self {
        let load = |role: SensorRole| {
            round_to_tenth(
                readings
                    .find_or_default(sensors.label(role), UNIT_PERCENT)
                    .value,
            )
        };

        Self {
            cpu: load(SensorRole::CpuLoad),
            gpu: load(SensorRole::GpuLoad),
            ram: load(SensorRole::RamLoad),
        }
    }

    pub fn unit(&self) -> &'static str {
        UNIT_PERCENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerwatch_types::{Reading, ReadingKind};

    #[test]
    fn test_load_from_readings() {
        let readings = Readings::indexed(vec![
            Reading::new("Total CPU Usage", ReadingKind::Usage, 37.46, "%"),
            Reading::new("GPU Core Load", ReadingKind::Usage, 99.0, "%"),
            Reading::new("Physical Memory Load", ReadingKind::Usage, 51.23, "%"),
        ]);

        let report = LoadReport::from_readings(&readings, &SensorNames::default());
        assert_eq!(report.cpu, 37.5);
        assert_eq!(report.gpu, 99.0);
        assert_eq!(report.ram, 51.2);
        assert_eq!(report.unit(), "%");
    }

    #[test]
    fn test_missing_load_is_zero() {
        let readings = Readings::indexed(vec![Reading::new(
            "Total CPU Usage",
            ReadingKind::Usage,
            12.0,
            "%",
        )]);

        let report = LoadReport::from_readings(&readings, &SensorNames::default());
        assert_eq!(report.cpu, 12.0);
        assert_eq!(report.gpu, 0.0);
        assert_eq!(report.ram, 0.0);
    }

    #[test]
    fn test_zero_report() {
        assert_eq!(LoadReport::zero(), LoadReport { cpu: 0.0, gpu: 0.0, ram: 0.0 });
    }
}
