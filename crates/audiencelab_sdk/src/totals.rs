//! Running totals of reported ad and purchase value.

use tracing::debug;

use crate::storage::{keys, Storage};

#[derive(Clone)]
pub struct TotalValueTracker {
    storage: Storage,
}

impl TotalValueTracker {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn total_ad_value(&self) -> f64 {
        self.total(keys::TOTAL_AD_VALUE).await
    }

    /// Adds `value` to the ad total and returns the new total.
    pub async fn add_to_total_ad_value(&self, value: f64) -> f64 {
        self.add(keys::TOTAL_AD_VALUE, value).await
    }

    pub async fn total_purchase_value(&self) -> f64 {
        self.total(keys::TOTAL_PURCHASE_VALUE).await
    }

    /// Adds `value` to the purchase total and returns the new total.
    pub async fn add_to_total_purchase_value(&self, value: f64) -> f64 {
        self.add(keys::TOTAL_PURCHASE_VALUE, value).await
    }

    /// The ad total `value` would bring, without recording it.
    pub async fn projected_ad_value(&self, value: f64) -> f64 {
        self.projected(keys::TOTAL_AD_VALUE, value).await
    }

    /// The purchase total `value` would bring, without recording it.
    pub async fn projected_purchase_value(&self, value: f64) -> f64 {
        self.projected(keys::TOTAL_PURCHASE_VALUE, value).await
    }

    // Absent or unparseable totals count as zero.
    async fn total(&self, key: &str) -> f64 {
        self.storage
            .get_item(key)
            .await
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|total| total.is_finite())
            .unwrap_or(0.0)
    }

    // Non-finite values leave the total unchanged.
    async fn projected(&self, key: &str, value: f64) -> f64 {
        let current = self.total(key).await;
        if value.is_finite() {
            current + value
        } else {
            current
        }
    }

    async fn add(&self, key: &str, value: f64) -> f64 {
        if !value.is_finite() {
            return self.total(key).await;
        }
        let total = self.projected(key, value).await;
        self.storage.save_item(key, &total.to_string()).await;
        debug!("{} is now {}", key, total);
        total
    }
}
