//! Device probes shipped with the SDK.
//!
//! Hosts with richer platform access (GPU strings, fonts, battery) are
//! expected to implement [`DeviceProbe`] themselves or hand a pre-collected
//! snapshot to [`StaticDeviceProbe`].

use async_trait::async_trait;
use audiencelab_common::{DeviceMetrics, DeviceProbe};
use chrono::{Local, SecondsFormat};
use tracing::debug;

/// Reports a fixed snapshot supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticDeviceProbe {
    metrics: DeviceMetrics,
}

impl StaticDeviceProbe {
    pub fn new(metrics: DeviceMetrics) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl DeviceProbe for StaticDeviceProbe {
    async fn collect(&self) -> DeviceMetrics {
        self.metrics.clone()
    }
}

/// Best-effort probe built from what the process can see about its host.
///
/// The device name is the platform string (`"linux x86_64"`), the OS version
/// comes from `/etc/os-release` where present and the timezone is reported as
/// the current local time with its offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDeviceProbe;

impl SystemDeviceProbe {
    async fn os_version() -> Option<String> {
        let release = tokio::fs::read_to_string("/etc/os-release").await.ok()?;
        release.lines().find_map(|line| {
            line.strip_prefix("VERSION_ID=")
                .map(|v| v.trim_matches('"').to_string())
        })
    }
}

#[async_trait]
impl DeviceProbe for SystemDeviceProbe {
    async fn collect(&self) -> DeviceMetrics {
        let os_version = Self::os_version().await.unwrap_or_else(|| "Unknown".to_string());
        let metrics = DeviceMetrics {
            device_name: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            device_model: "Unknown".to_string(),
            os_version,
            timezone: Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
            ..DeviceMetrics::unknown()
        };
        debug!("Collected device metrics for {}", metrics.device_name);
        metrics
    }
}
