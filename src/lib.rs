//! # powerwatch
//!
//! Forwards power and load metrics from HWiNFO to a home automation state
//! store.
//!
//! HWiNFO only exposes what the hardware measures, which on most machines
//! means CPU and GPU power but nothing for RAM, fans or drives, and never
//! what the whole box draws from the wall. powerwatch polls the
//! remoteHWInfo JSON endpoint, estimates the missing components from the
//! machine's configuration, corrects for PSU losses and pushes the result
//! as named entities over an authenticated webhook.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                            Agent                              │
//! │  ┌──────────────┐    ┌──────────┐    ┌───────────┐            │
//! │  │ HwInfoAdapter│───▶│   data   │───▶│ forwarder │            │
//! │  │   (input)    │    │ (derive) │    │ (updates) │            │
//! │  └──────────────┘    └──────────┘    └─────┬─────┘            │
//! │                                            │                  │
//! │                                            ▼                  │
//! │                          ┌─────────┐                          │
//! │                          │  sink   │◀── WebhookClient |       │
//! │                          │(output) │    LogSink | Recording   │
//! │                          └─────────┘                          │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: The [`Agent`] polling loop, one cycle per interval
//! - **[`config`]**: INI settings with environment overrides
//! - **[`data`]**: Load figures and the power model
//! - **[`forwarder`]**: Turns one poll into named [`StateUpdate`]s and
//!   dispatches them
//! - **[`sink`]**: Where updates go ([`MetricSink`] trait)
//!
//! When remoteHWInfo cannot be reached, every entity is sent as zero so the
//! state store reflects a machine that is off.
//!
//! ## Usage
//!
//! ```bash
//! # Poll forever using ./config.ini (created on first run)
//! powerwatch
//!
//! # One cycle, logged instead of sent
//! powerwatch --once --dry-run
//! ```
//!
//! ### As a library
//!
//! ```
//! use powerwatch::config::PlatformConfig;
//! use powerwatch::forwarder::{ForwardOptions, MetricForwarder};
//! use powerwatch::Readings;
//!
//! let forwarder = MetricForwarder::new(&PlatformConfig::default(), ForwardOptions::default());
//!
//! // An offline machine still reports every entity, as zero
//! let updates = forwarder.updates(&Readings::new(), true);
//! assert_eq!(updates.len(), 4);
//! assert!(updates.iter().all(|u| u.state() == "0"));
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod forwarder;
pub mod sink;

// Re-export main types for convenience
pub use app::{Agent, CycleSummary};
pub use self::config::{PlatformConfig, Settings};
pub use data::{LoadReport, PowerEstimate, PowerModel, PowerReport};
pub use forwarder::{DispatchReport, ForwardOptions, MetricForwarder};
pub use powerwatch_types::{Reading, ReadingKind, Readings, StateUpdate};
pub use sink::{LogSink, MetricSink, RecordingSink};
