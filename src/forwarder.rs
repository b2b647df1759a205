//! Metric forwarding.
//!
//! Turns one poll of readings into named state updates and hands each one
//! to a [`MetricSink`]. Entity ids and friendly names are built from the
//! platform id and name:
//!
//! | Entity id             | Friendly name          | Unit | Sent when               |
//! |-----------------------|------------------------|------|-------------------------|
//! | `<id>_cpu_load`       | `<name> CPU Load`      | %    | system load enabled     |
//! | `<id>_gpu_load`       | `<name> GPU Load`      | %    | system load enabled     |
//! | `<id>_ram_load`       | `<name> RAM Load`      | %    | system load enabled     |
//! | `<id>_total_power`    | `<name> Total Power`   | W    | always                  |
//! | `<id>_cpu_power`      | `<name> CPU Power`     | W    | detailed power enabled  |
//! | `<id>_gpu_power`      | `<name> GPU Power`     | W    | detailed power enabled  |
//! | `<id>_ram_power`      | `<name> RAM Power`     | W    | detailed power enabled  |
//! | `<id>_drives_power`   | `<name> Drives Power`  | W    | detailed power enabled  |
//! | `<id>_fans_power`     | `<name> Fans Power`    | W    | detailed power enabled  |

use powerwatch_adapters::AdapterError;
use powerwatch_types::{Readings, StateUpdate, UNIT_PERCENT, UNIT_WATTS};
use tracing::{debug, warn};

use crate::config::{PlatformConfig, SensorNames, WebhookSettings};
use crate::data::{LoadReport, PowerEstimate, PowerModel, PowerReport};
use crate::sink::MetricSink;

/// Which metric groups to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardOptions {
    pub send_system_load: bool,
    pub send_detailed_power: bool,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        Self {
            send_system_load: true,
            send_detailed_power: false,
        }
    }
}

impl From<&WebhookSettings> for ForwardOptions {
    fn from(settings: &WebhookSettings) -> Self {
        Self {
            send_system_load: settings.send_system_load,
            send_detailed_power: settings.send_detailed_power_usage,
        }
    }
}

/// Builds and dispatches state updates for one machine.
#[derive(Debug, Clone)]
pub struct MetricForwarder {
    platform_id: String,
    platform_name: String,
    sensors: SensorNames,
    model: PowerModel,
    options: ForwardOptions,
}

impl MetricForwarder {
    pub fn new(platform: &PlatformConfig, options: ForwardOptions) -> Self {
        Self {
            platform_id: platform.id.clone(),
            platform_name: platform.name.clone(),
            sensors: platform.sensors.clone(),
            model: PowerModel::new(platform),
            options,
        }
    }

    /// CPU/GPU/RAM load updates.
    pub fn load_updates(&self, readings: &Readings, send_zeros: bool) -> Vec<StateUpdate> {
        let load = if send_zeros {
            LoadReport::zero()
        } else {
            LoadReport::from_readings(readings, &self.sensors)
        };

        vec![
            self.update("cpu_load", "CPU Load", load.cpu, UNIT_PERCENT),
            self.update("gpu_load", "GPU Load", load.gpu, UNIT_PERCENT),
            self.update("ram_load", "RAM Load", load.ram, UNIT_PERCENT),
        ]
    }

    /// Total power, followed by the per-component figures when detailed
    /// power is enabled.
    pub fn power_updates(&self, readings: &Readings, send_zeros: bool) -> Vec<StateUpdate> {
        let report = self.power_report(readings, send_zeros);

        let mut updates = vec![self.update("total_power", "Total Power", report.total, UNIT_WATTS)];

        if self.options.send_detailed_power {
            updates.extend([
                self.update("cpu_power", "CPU Power", report.cpu, UNIT_WATTS),
                self.update("gpu_power", "GPU Power", report.gpu, UNIT_WATTS),
                self.update("ram_power", "RAM Power", report.ram, UNIT_WATTS),
                self.update("drives_power", "Drives Power", report.drives, UNIT_WATTS),
                self.update("fans_power", "Fans Power", report.fans, UNIT_WATTS),
            ]);
        }

        updates
    }

    /// Every update for one cycle, loads first.
    pub fn updates(&self, readings: &Readings, send_zeros: bool) -> Vec<StateUpdate> {
        let mut updates = Vec::new();
        if self.options.send_system_load {
            updates.extend(self.load_updates(readings, send_zeros));
        }
        updates.extend(self.power_updates(readings, send_zeros));
        updates
    }

    /// Build this cycle's updates and push each one to `sink`.
    ///
    /// Every update is attempted even if earlier ones fail; the outcome of
    /// each push is returned in order.
    pub async fn forward<S>(&self, sink: &S, readings: &Readings, send_zeros: bool) -> DispatchReport
    where
        S: MetricSink + ?Sized,
    {
        let mut report = DispatchReport::default();

        for update in self.updates(readings, send_zeros) {
            let result = sink.push(&update).await;
            match &result {
                Ok(()) => debug!(entity_id = %update.entity_id, state = %update.state(), "Pushed"),
                Err(e) => warn!(entity_id = %update.entity_id, error = %e, "Push failed"),
            }
            report.outcomes.push(DispatchOutcome { update, result });
        }

        report
    }

    fn power_report(&self, readings: &Readings, send_zeros: bool) -> PowerReport {
        let estimate = if send_zeros {
            PowerEstimate::zero()
        } else {
            self.model.estimate(readings)
        };
        estimate.corrected(self.model.multiplier())
    }

    fn update(&self, suffix: &str, label: &str, value: f64, unit: &str) -> StateUpdate {
        StateUpdate::new(
            format!("{}_{}", self.platform_id, suffix),
            format!("{} {}", self.platform_name, label),
            value,
            unit,
        )
    }
}

/// Result of pushing one update.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub update: StateUpdate,
    pub result: Result<(), AdapterError>,
}

/// Per-update results of one forwarding pass.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    /// Number of updates the sink accepted.
    pub fn sent(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of updates the sink rejected.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.sent()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Rejected updates with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&StateUpdate, &AdapterError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.update, e)))
    }
}
