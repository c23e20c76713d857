//! Retention tracking.
//!
//! Counts whole local calendar days since the first recorded run and reports
//! them at most once per day. State lives in one versioned record
//! ([`RetentionState`]) written with a single store call; the individual
//! legacy keys are mirrored after each write and read only to migrate
//! installations that predate the record.

use audiencelab_common::Clock;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::dates::{days_between, local_date_string, parse_local_date};
use crate::storage::{keys, Storage};

pub const RETENTION_STATE_VERSION: u32 = 1;

/// Everything the tracker persists. Days are `dd/mm/yyyy` local dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionState {
    #[serde(default)]
    pub version: u32,
    /// Set on the first run, never changed afterwards.
    #[serde(default)]
    pub first_login: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub retention_day: Option<u32>,
    #[serde(default)]
    pub backfill_day: Option<u32>,
    /// The day the last retention cycle completed.
    #[serde(default)]
    pub last_sent_metric_date: Option<String>,
}

impl Default for RetentionState {
    fn default() -> Self {
        Self {
            version: RETENTION_STATE_VERSION,
            first_login: None,
            last_login: None,
            retention_day: None,
            backfill_day: None,
            last_sent_metric_date: None,
        }
    }
}

impl RetentionState {
    /// Loads the record, migrating from the legacy per-field keys when no
    /// record has been written yet.
    pub async fn load(storage: &Storage) -> Self {
        if let Some(state) = storage.get_json::<RetentionState>(keys::RETENTION_STATE).await {
            return state;
        }

        let day = |value: Option<String>| value.and_then(|v| v.trim().parse::<u32>().ok());
        Self {
            version: RETENTION_STATE_VERSION,
            first_login: storage.get_item(keys::FIRST_LOGIN).await,
            last_login: storage.get_item(keys::LAST_LOGIN).await,
            retention_day: day(storage.get_item(keys::RETENTION_DAY).await),
            backfill_day: day(storage.get_item(keys::BACKFILL_DAY).await),
            last_sent_metric_date: storage.get_item(keys::LAST_SENT_METRIC_DATE).await,
        }
    }

    /// Writes the record, then mirrors each present field to its legacy key.
    pub async fn save(&self, storage: &Storage) {
        storage.save_json(keys::RETENTION_STATE, self).await;

        let mirrors = [
            (keys::FIRST_LOGIN, self.first_login.clone()),
            (keys::LAST_LOGIN, self.last_login.clone()),
            (keys::RETENTION_DAY, self.retention_day.map(|d| d.to_string())),
            (keys::BACKFILL_DAY, self.backfill_day.map(|d| d.to_string())),
            (keys::LAST_SENT_METRIC_DATE, self.last_sent_metric_date.clone()),
        ];
        for (key, value) in mirrors {
            if let Some(value) = value {
                storage.save_item(key, &value).await;
            }
        }
    }
}

/// Result of a retention cycle that has something to report.
///
/// Serialized with string values, the format the ingestion endpoint has
/// always received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionReport {
    #[serde(serialize_with = "as_string")]
    pub retention_day: u32,
    #[serde(serialize_with = "as_string")]
    pub backfill_day: u32,
}

fn as_string<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// The retention state machine.
#[derive(Clone)]
pub struct RetentionTracker {
    storage: Storage,
    clock: Arc<dyn Clock>,
}

impl RetentionTracker {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Today's local date as persisted by the tracker.
    pub fn today(&self) -> String {
        local_date_string(&self.clock.now())
    }

    pub async fn state(&self) -> RetentionState {
        RetentionState::load(&self.storage).await
    }

    /// Whether today's retention cycle has already completed.
    pub async fn reported_today(&self) -> bool {
        let today = self.today();
        self.state().await.last_sent_metric_date.as_deref() == Some(today.as_str())
    }

    /// Advances the state machine for today.
    ///
    /// Returns `None` when there is nothing to report: the cycle already ran
    /// today, this is the very first run, or the stored dates are unreadable.
    /// Once a report is returned the day is marked done, whether or not the
    /// caller manages to deliver it.
    pub async fn update_retention(&self) -> Option<RetentionReport> {
        let today = self.today();
        let mut state = self.state().await;

        if state.last_sent_metric_date.as_deref() == Some(today.as_str()) {
            debug!("Retention already reported for {}", today);
            return None;
        }

        let last_login = state.last_login.clone().unwrap_or_else(|| today.clone());
        let Some(first_login) = state.first_login.clone() else {
            state.first_login = Some(today.clone());
            state.last_login = Some(today.clone());
            state.save(&self.storage).await;
            info!("Recorded first login on {}", today);
            return None;
        };

        let Some(first_login_date) = parse_local_date(&first_login) else {
            warn!("Unreadable firstLogin {:?}, skipping retention update", first_login);
            return None;
        };

        let backfill_day = if last_login != today {
            let Some(last_login_date) = parse_local_date(&last_login) else {
                warn!("Unreadable lastLogin {:?}, skipping retention update", last_login);
                return None;
            };
            state.last_login = Some(today.clone());
            non_negative(days_between(first_login_date, last_login_date))
        } else {
            0
        };

        let today_date = parse_local_date(&today)?;
        let retention_day = non_negative(days_between(first_login_date, today_date));

        state.backfill_day = Some(backfill_day);
        state.retention_day = Some(retention_day);
        state.last_sent_metric_date = Some(today);
        state.save(&self.storage).await;

        Some(RetentionReport {
            retention_day,
            backfill_day,
        })
    }
}

// A clock set back before firstLogin yields negative spans; report day 0.
fn non_negative(days: i64) -> u32 {
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
