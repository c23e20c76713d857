// --- File: crates/audiencelab_common/src/models.rs ---
use serde::{Deserialize, Serialize};

/// Flat snapshot of device and runtime characteristics.
///
/// Every field is best-effort; probes leave what they cannot determine at its
/// default (empty, zero, false).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetrics {
    pub device_name: String,
    pub device_model: String,
    pub os_version: String,
    pub dpi: f64,
    pub gpu_renderer: String,
    pub gpu_vendor: String,
    pub gpu_version: String,
    pub native_width: u32,
    pub native_height: u32,
    pub legacy_width: u32,
    pub legacy_height: u32,
    pub installed_fonts: Vec<String>,
    pub low_battery_level: bool,
    pub timezone: String,
}

impl DeviceMetrics {
    /// The fallback snapshot reported when probing fails outright.
    pub fn unknown() -> Self {
        Self {
            device_name: "Unknown".to_string(),
            device_model: "Unknown".to_string(),
            os_version: "Unknown".to_string(),
            dpi: 1.0,
            gpu_renderer: "Unknown".to_string(),
            gpu_vendor: "Unknown".to_string(),
            gpu_version: "N/A".to_string(),
            timezone: "Unknown".to_string(),
            ..Self::default()
        }
    }
}
