//! AudienceLab client SDK
//!
//! Tracks how many days an installation keeps coming back, caches the
//! server-issued creative token that identifies it, and reports retention,
//! purchase, ad and custom events to the AudienceLab webhook.
//!
//! The entry point is [`AudienceLab`]:
//!
//! ```rust,no_run
//! use audiencelab_config::SdkConfig;
//! use audiencelab_sdk::AudienceLab;
//!
//! async fn run() -> Result<(), audiencelab_common::SdkError> {
//!     let sdk = AudienceLab::builder(SdkConfig::default()).build();
//!     let outcome = sdk.initialize("my-api-key").await?;
//!     println!("creative token: {}", outcome.token);
//!
//!     sdk.send_custom_purchase_event("sku-1", "Gem pack", 4.99, "USD", "completed")
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod dates;
pub mod device;
pub mod events;
pub mod retention;
#[cfg(test)]
mod retention_proptest;
#[cfg(test)]
mod retention_test;
pub mod storage;
pub mod token;
pub mod totals;
pub mod webhook;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiKey};
pub use client::{AudienceLab, AudienceLabBuilder, InitializeOutcome, MetricsOutcome, SkipReason};
pub use device::{StaticDeviceProbe, SystemDeviceProbe};
pub use events::{AdEvent, CustomEvent, CustomEventParams, PurchaseEvent};
pub use retention::{RetentionReport, RetentionState, RetentionTracker};
pub use storage::Storage;
pub use token::TokenCache;
pub use totals::TotalValueTracker;
pub use webhook::{WebhookDispatcher, WebhookEnvelope};

pub use audiencelab_common::{Clock, DeviceMetrics, DeviceProbe, SdkError, SystemClock};
pub use audiencelab_storage::{KeyValueStore, MemoryStore};
