//! # powerwatch-adapters
//!
//! HTTP collaborators used by powerwatch.
//!
//! ## Supported Systems
//!
//! - **remoteHWInfo** (`hwinfo` feature) - Fetches the `json.json` document
//!   served by remoteHWInfo and normalizes it into [`Readings`]
//! - **State store webhook** (`webhook` feature) - Pushes one
//!   [`StateUpdate`] per request to a Home Assistant style
//!   `/api/states/<entity_id>` endpoint
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use powerwatch_adapters::hwinfo::HwInfoAdapter;
//! use powerwatch_adapters::webhook::WebhookClient;
//! use powerwatch_types::StateUpdate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HwInfoAdapter::builder()
//!         .host("127.0.0.1")
//!         .port(60005)
//!         .build()?;
//!
//!     let readings = source.collect().await?;
//!     println!("Collected {} readings", readings.len());
//!
//!     let webhook = WebhookClient::builder()
//!         .url("http://127.0.0.1:8123/api/states/")
//!         .token("secret")
//!         .build()?;
//!
//!     webhook
//!         .push(&StateUpdate::new("main_pc_total_power", "Main Pc Total Power", 240.0, "W"))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod error;

#[cfg(feature = "hwinfo")]
pub mod hwinfo;

#[cfg(feature = "webhook")]
pub mod webhook;

pub use error::AdapterError;

// Re-export types for convenience
pub use powerwatch_types::{Reading, ReadingKind, Readings, StateUpdate};
