//! Shared helpers for the unit tests in this crate.

use audiencelab_common::Clock;
use audiencelab_storage::MemoryStore;
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use std::sync::{Arc, Mutex};

use crate::storage::Storage;

/// A clock that only moves when told to.
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    /// Noon on the given local day in a zone `offset_hours` east of UTC.
    pub fn at(year: i32, month: u32, day: u32, offset_hours: i32) -> Arc<Self> {
        let tz = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let now = tz.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap()
    }
}

pub fn seeded_storage(entries: &[(&str, &str)]) -> (Arc<MemoryStore>, Storage) {
    let store = Arc::new(MemoryStore::with_entries(entries.iter().copied()));
    let storage = Storage::new(store.clone());
    (store, storage)
}
