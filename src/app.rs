//! The poll, compute and forward loop.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use powerwatch_adapters::hwinfo::HwInfoAdapter;
use powerwatch_adapters::webhook::WebhookClient;
use powerwatch_types::Readings;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::config::Settings;
use crate::forwarder::{DispatchReport, ForwardOptions, MetricForwarder};
use crate::sink::{LogSink, MetricSink};

/// Outcome of one cycle.
#[derive(Debug)]
pub struct CycleSummary {
    /// Whether remoteHWInfo answered with a usable document.
    pub online: bool,
    pub report: DispatchReport,
}

/// Polls the monitor and forwards derived metrics, one cycle at a time.
pub struct Agent {
    source: HwInfoAdapter,
    forwarder: MetricForwarder,
    sink: Box<dyn MetricSink>,
}

impl Agent {
    pub fn new(source: HwInfoAdapter, forwarder: MetricForwarder, sink: Box<dyn MetricSink>) -> Self {
        Self {
            source,
            forwarder,
            sink,
        }
    }

    /// Wire an agent from loaded settings.
    ///
    /// Updates are only logged when `dry_run` is set or the webhook is
    /// disabled in the config.
    pub fn from_settings(settings: &Settings, dry_run: bool) -> Result<Self> {
        let source = HwInfoAdapter::builder()
            .host(settings.hwinfo.host.clone())
            .port(settings.hwinfo.port)
            .timeout(settings.hwinfo.timeout())
            .build()
            .context("Failed to create remoteHWInfo client")?;

        let forwarder = MetricForwarder::new(
            &settings.platform,
            ForwardOptions::from(&settings.webhook),
        );

        Ok(Self::new(source, forwarder, build_sink(settings, dry_run)?))
    }

    /// Fetch readings, or `None` when the monitor cannot be read.
    pub async fn poll(&self) -> Option<Readings> {
        match self.source.collect().await {
            Ok(readings) => {
                info!(readings = readings.len(), "Polled remoteHWInfo");
                Some(readings)
            }
            Err(e) => {
                warn!(url = %self.source.url(), error = %e, "Failed to poll remoteHWInfo, sending zeros");
                None
            }
        }
    }

    /// Run one cycle. An unreachable monitor is reported as all zeros so
    /// the state store shows the machine as off rather than stale.
    pub async fn run_cycle(&self) -> CycleSummary {
        self.run_cycle_with(self.sink.as_ref()).await
    }

    /// Run one cycle against `sink` instead of the agent's own sink.
    pub async fn run_cycle_with<S>(&self, sink: &S) -> CycleSummary
    where
        S: MetricSink + ?Sized,
    {
        let polled = self.poll().await;
        let online = polled.is_some();
        let readings = polled.unwrap_or_default();

        let report = self.forwarder.forward(sink, &readings, !online).await;

        if report.is_success() {
            info!(sent = report.sent(), online, sink = %sink.description(), "Cycle complete");
        } else {
            warn!(
                sent = report.sent(),
                failed = report.failed(),
                online,
                sink = %sink.description(),
                "Cycle complete with failures"
            );
        }

        CycleSummary { online, report }
    }

    /// Run cycles every `interval` until `shutdown` resolves.
    ///
    /// A cycle that overruns the interval delays the next one instead of
    /// bunching them up.
    pub async fn run<F>(&self, interval: Duration, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            source = %self.source.url(),
            sink = %self.sink.description(),
            interval_secs = interval.as_secs(),
            "Starting agent"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }
}

/// Choose the sink for the loaded settings.
pub fn build_sink(settings: &Settings, dry_run: bool) -> Result<Box<dyn MetricSink>> {
    if dry_run || !settings.webhook.enabled {
        return Ok(Box::new(LogSink));
    }

    let client = WebhookClient::builder()
        .url(settings.webhook.url.clone())
        .token(settings.webhook.token.clone())
        .build()
        .context("Failed to create webhook client")?;

    Ok(Box::new(client))
}
