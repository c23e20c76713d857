// --- File: crates/audiencelab_common/src/services.rs ---
//! Collaborator abstractions.
//!
//! The SDK core never reaches for ambient globals: device information and the
//! current time come in through these traits so hosts (and tests) can
//! substitute their own.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};

use crate::models::DeviceMetrics;

/// Collects a snapshot of the device the SDK runs on.
#[async_trait]
pub trait DeviceProbe: Send + Sync {
    /// Best-effort collection; never fails, missing fields stay at default.
    async fn collect(&self) -> DeviceMetrics;
}

/// Source of the current local time, including its offset from UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's wall clock in its local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
