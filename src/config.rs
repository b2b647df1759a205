//! Settings loading.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. An INI file (`config.ini` by default), written out with the
//!    defaults the first time powerwatch runs
//! 3. `POWERWATCH_<SECTION>__<KEY>` environment variables, e.g.
//!    `POWERWATCH_WEBHOOK__TOKEN`
//!
//! Missing or malformed keys never abort loading: each falls back to its
//! default and malformed ones are logged. Fan and drive counts are the
//! exception: a missing key means none installed (one drive), not the
//! counts written to a fresh file.
//!
//! ```ini
//! [hwinfo]
//! host = 127.0.0.1
//! port = 60005
//!
//! [platform]
//! id = main_pc
//! psu_efficiency_percentage = 85
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "POWERWATCH";

/// Fan count assumed for a size class with no key in the file.
///
/// Differs from the bootstrapped file, which lists a typical 2x80mm + 4x120mm
/// case.
pub const MISSING_FAN_QUANTITY: u32 = 0;

/// Drive count assumed when `drives_quantity` is absent.
pub const MISSING_DRIVES_QUANTITY: u32 = 1;

/// Fully resolved settings. Loaded once per process.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub hwinfo: HwInfoSettings,
    pub webhook: WebhookSettings,
    pub platform: PlatformConfig,
}

/// Where to find remoteHWInfo and how often to poll it.
#[derive(Debug, Clone, PartialEq)]
pub struct HwInfoSettings {
    pub host: String,
    pub port: u16,
    pub interval_secs: u64,
    pub timeout_secs: u64,
}

/// State store connection and what to send to it.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookSettings {
    pub enabled: bool,
    pub token: String,
    pub url: String,
    pub send_system_load: bool,
    pub send_detailed_power_usage: bool,
}

/// Static description of the monitored machine.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    /// Display name, prefixed to every friendly name.
    pub name: String,
    /// Prefixed to every entity id.
    pub id: String,
    pub drives_quantity: u32,
    /// Always within 0..=100 once loaded.
    pub psu_efficiency: f64,
    pub fans: FanCounts,
    pub sensors: SensorNames,
}

/// Installed case fans by size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanCounts {
    pub fan_80mm: u32,
    pub fan_120mm: u32,
    pub fan_200mm: u32,
}

/// Logical sensors powerwatch reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorRole {
    CpuPower,
    GpuPower,
    CpuLoad,
    GpuLoad,
    RamLoad,
    RamUsed,
    RamAvailable,
}

impl SensorRole {
    pub const ALL: [SensorRole; 7] = [
        SensorRole::CpuPower,
        SensorRole::GpuPower,
        SensorRole::CpuLoad,
        SensorRole::GpuLoad,
        SensorRole::RamLoad,
        SensorRole::RamUsed,
        SensorRole::RamAvailable,
    ];

    /// Key of this role in the `[sensor_names]` section.
    pub fn key(&self) -> &'static str {
        match self {
            SensorRole::CpuPower => "cpu_power",
            SensorRole::GpuPower => "gpu_power",
            SensorRole::CpuLoad => "cpu_load",
            SensorRole::GpuLoad => "gpu_load",
            SensorRole::RamLoad => "ram_load",
            SensorRole::RamUsed => "ram_used",
            SensorRole::RamAvailable => "ram_available",
        }
    }

    /// The HWiNFO label for this role on a stock install.
    pub fn default_label(&self) -> &'static str {
        match self {
            SensorRole::CpuPower => "CPU Package Power",
            SensorRole::GpuPower => "GPU Power (Total)",
            SensorRole::CpuLoad => "Total CPU Usage",
            SensorRole::GpuLoad => "GPU Core Load",
            SensorRole::RamLoad => "Physical Memory Load",
            SensorRole::RamUsed => "Physical Memory Used",
            SensorRole::RamAvailable => "Physical Memory Available",
        }
    }
}

/// HWiNFO labels for each [`SensorRole`] on this machine.
///
/// Label text changes between hardware and HWiNFO versions, so every
/// role can be overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorNames {
    pub cpu_power: String,
    pub gpu_power: String,
    pub cpu_load: String,
    pub gpu_load: String,
    pub ram_load: String,
    pub ram_used: String,
    pub ram_available: String,
}

impl SensorNames {
    pub fn label(&self, role: SensorRole) -> &str {
        match role {
            SensorRole::CpuPower => &self.cpu_power,
            SensorRole::GpuPower => &self.gpu_power,
            SensorRole::CpuLoad => &self.cpu_load,
            SensorRole::GpuLoad => &self.gpu_load,
            SensorRole::RamLoad => &self.ram_load,
            SensorRole::RamUsed => &self.ram_used,
            SensorRole::RamAvailable => &self.ram_available,
        }
    }

    fn label_mut(&mut self, role: SensorRole) -> &mut String {
        match role {
            SensorRole::CpuPower => &mut self.cpu_power,
            SensorRole::GpuPower => &mut self.gpu_power,
            SensorRole::CpuLoad => &mut self.cpu_load,
            SensorRole::GpuLoad => &mut self.gpu_load,
            SensorRole::RamLoad => &mut self.ram_load,
            SensorRole::RamUsed => &mut self.ram_used,
            SensorRole::RamAvailable => &mut self.ram_available,
        }
    }
}

impl Default for SensorNames {
    fn default() -> Self {
        Self {
            cpu_power: SensorRole::CpuPower.default_label().to_string(),
            gpu_power: SensorRole::GpuPower.default_label().to_string(),
            cpu_load: SensorRole::CpuLoad.default_label().to_string(),
            gpu_load: SensorRole::GpuLoad.default_label().to_string(),
            ram_load: SensorRole::RamLoad.default_label().to_string(),
            ram_used: SensorRole::RamUsed.default_label().to_string(),
            ram_available: SensorRole::RamAvailable.default_label().to_string(),
        }
    }
}

impl Default for HwInfoSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 60005,
            interval_secs: 5,
            timeout_secs: 5,
        }
    }
}

impl HwInfoSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            token: "xxx".to_string(),
            url: "http://127.0.0.1:8123/api/states/".to_string(),
            send_system_load: true,
            send_detailed_power_usage: false,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: "Main Pc".to_string(),
            id: "main_pc".to_string(),
            drives_quantity: 3,
            psu_efficiency: 85.0,
            fans: FanCounts {
                fan_80mm: 2,
                fan_120mm: 4,
                fan_200mm: 0,
            },
            sensors: SensorNames::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hwinfo: HwInfoSettings::default(),
            webhook: WebhookSettings::default(),
            platform: PlatformConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, writing a default file first if it is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, writing defaults");
            Self::default().save(path)?;
        }
        Self::load_with_env(path, environment())
    }

    /// Load from `path` with an explicit environment layer.
    pub fn load_with_env(path: &Path, env: Environment) -> Result<Self> {
        info!(path = %path.display(), "Loading config");
        let raw = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(false))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Ok(Self::from_config(&raw))
    }

    /// Resolve every key against `raw`, falling back to the defaults.
    pub fn from_config(raw: &Config) -> Self {
        let defaults = Self::default();
        let lookup = Lookup { raw };

        let hwinfo = HwInfoSettings {
            host: lookup.get("hwinfo.host", defaults.hwinfo.host),
            port: lookup.get("hwinfo.port", defaults.hwinfo.port),
            interval_secs: lookup.get("hwinfo.interval_secs", defaults.hwinfo.interval_secs),
            timeout_secs: lookup.get("hwinfo.timeout_secs", defaults.hwinfo.timeout_secs),
        };

        let webhook = WebhookSettings {
            enabled: lookup.get("webhook.enabled", defaults.webhook.enabled),
            token: lookup.get("webhook.token", defaults.webhook.token),
            url: lookup.get("webhook.url", defaults.webhook.url),
            send_system_load: lookup.get(
                "webhook.send_system_load",
                defaults.webhook.send_system_load,
            ),
            send_detailed_power_usage: lookup.get(
                "webhook.send_detailed_power_usage",
                defaults.webhook.send_detailed_power_usage,
            ),
        };

        let fans = FanCounts {
            fan_80mm: lookup.get("platform.fan_80mm_quantity", MISSING_FAN_QUANTITY),
            fan_120mm: lookup.get("platform.fan_120mm_quantity", MISSING_FAN_QUANTITY),
            fan_200mm: lookup.get("platform.fan_200mm_quantity", MISSING_FAN_QUANTITY),
        };

        let mut sensors = defaults.platform.sensors.clone();
        for role in SensorRole::ALL {
            let key = format!("sensor_names.{}", role.key());
            let label = lookup.get(&key, sensors.label(role).to_string());
            *sensors.label_mut(role) = label;
        }

        let psu_efficiency = clamp_efficiency(lookup.get(
            "platform.psu_efficiency_percentage",
            defaults.platform.psu_efficiency,
        ));

        let platform = PlatformConfig {
            name: lookup.get("platform.name", defaults.platform.name),
            id: lookup.get("platform.id", defaults.platform.id),
            drives_quantity: lookup.get(
                "platform.drives_quantity",
                MISSING_DRIVES_QUANTITY,
            ),
            psu_efficiency,
            fans,
            sensors,
        };

        let mut settings = Self {
            hwinfo,
            webhook,
            platform,
        };

        if settings.hwinfo.interval_secs == 0 {
            warn!("hwinfo.interval_secs must be at least 1, using 1");
            settings.hwinfo.interval_secs = 1;
        }

        settings
    }

    /// Write these settings as an INI file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        }

        fs::write(path, self.to_ini())
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Render as INI in the layout [`Settings::load`] reads.
    pub fn to_ini(&self) -> String {
        let h = &self.hwinfo;
        let w = &self.webhook;
        let p = &self.platform;

        let mut out = format!(
            "[hwinfo]\n\
             host = {}\n\
             port = {}\n\
             interval_secs = {}\n\
             timeout_secs = {}\n\
             \n\
             [webhook]\n\
             enabled = {}\n\
             token = {}\n\
             url = {}\n\
             send_system_load = {}\n\
             send_detailed_power_usage = {}\n\
             \n\
             [platform]\n\
             name = {}\n\
             id = {}\n\
             drives_quantity = {}\n\
             psu_efficiency_percentage = {}\n\
             fan_80mm_quantity = {}\n\
             fan_120mm_quantity = {}\n\
             fan_200mm_quantity = {}\n\
             \n\
             [sensor_names]\n",
            h.host,
            h.port,
            h.interval_secs,
            h.timeout_secs,
            w.enabled,
            w.token,
            w.url,
            w.send_system_load,
            w.send_detailed_power_usage,
            p.name,
            p.id,
            p.drives_quantity,
            p.psu_efficiency,
            p.fans.fan_80mm,
            p.fans.fan_120mm,
            p.fans.fan_200mm,
        );

        for role in SensorRole::ALL {
            out.push_str(&format!("{} = {}\n", role.key(), p.sensors.label(role)));
        }

        out
    }
}

/// The `POWERWATCH_<SECTION>__<KEY>` environment layer.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Clamp a PSU efficiency percentage into 0..=100.
pub fn clamp_efficiency(efficiency: f64) -> f64 {
    if efficiency.is_nan() {
        warn!("psu_efficiency_percentage is not a number, assuming 100");
        return 100.0;
    }
    let clamped = efficiency.clamp(0.0, 100.0);
    if clamped != efficiency {
        warn!(
            configured = efficiency,
            used = clamped,
            "psu_efficiency_percentage out of range, clamping"
        );
    }
    clamped
}

struct Lookup<'a> {
    raw: &'a Config,
}

impl Lookup<'_> {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.raw.get::<T>(key) {
            Ok(value) => value,
            Err(ConfigError::NotFound(_)) => default,
            Err(e) => {
                warn!(key, error = %e, "Invalid config value, using default");
                default
            }
        }
    }
}
