#[cfg(test)]
mod tests {
    use crate::retention::RetentionTracker;
    use crate::storage::keys;
    use crate::test_support::{seeded_storage, FixedClock};
    use chrono::{Datelike, Duration, NaiveDate};
    use proptest::prelude::*;

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(future)
    }

    proptest! {
        // The day counter equals the calendar-day distance from firstLogin,
        // whatever the first day, the gap or the local timezone.
        #[test]
        fn retention_day_is_exact_day_count(
            days_since_epoch in 0i64..20_000,
            gap in 0i64..4_000,
            offset_hours in -11i32..=12,
        ) {
            let first = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Duration::days(days_since_epoch);
            let today = first + Duration::days(gap);
            let first_text = first.format("%d/%m/%Y").to_string();

            let (_store, storage) = seeded_storage(&[
                (keys::FIRST_LOGIN, first_text.as_str()),
                (keys::LAST_LOGIN, first_text.as_str()),
            ]);
            let clock = FixedClock::at(today.year(), today.month(), today.day(), offset_hours);
            let tracker = RetentionTracker::new(storage, clock);

            let report = run(tracker.update_retention());
            prop_assert!(report.is_some());
            let report = report.unwrap();
            prop_assert_eq!(i64::from(report.retention_day), gap);
            prop_assert_eq!(report.backfill_day, 0);
        }
    }

    #[test]
    fn spot_check_offsets() {
        for gap in [0i64, 1, 30, 365] {
            let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(gap);
            let (_store, storage) = seeded_storage(&[
                (keys::FIRST_LOGIN, "01/01/2024"),
                (keys::LAST_LOGIN, "01/01/2024"),
            ]);
            let clock = FixedClock::at(today.year(), today.month(), today.day(), 1);
            let tracker = RetentionTracker::new(storage, clock);
            let report = run(tracker.update_retention()).expect("report due");
            assert_eq!(i64::from(report.retention_day), gap);
        }
    }
}
