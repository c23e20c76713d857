//! Payloads of the custom events hosts can report.

use serde::{Deserialize, Serialize};

pub const RETENTION_EVENT_TYPE: &str = "retention";
pub const PURCHASE_EVENT_TYPE: &str = "custom.purchase";
pub const AD_EVENT_TYPE: &str = "custom.ad";
pub const CUSTOM_EVENT_TYPE: &str = "custom";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub item_id: String,
    pub item_name: String,
    pub value: f64,
    pub currency: String,
    pub status: String,
    /// Purchase total for the installation, this purchase included.
    pub total_purchase_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tr_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdEvent {
    pub ad_id: String,
    pub name: String,
    pub source: String,
    pub watch_time: f64,
    pub reward: bool,
    pub media_source: String,
    pub channel: String,
    pub value: f64,
    pub currency: String,
    /// Ad value total for the installation, this event included.
    pub total_ad_value: f64,
}

/// A named event with free-form parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub event_name: String,
    pub params: CustomEventParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomEventParams {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}
