#[cfg(test)]
mod tests {
    use crate::retention::{RetentionReport, RetentionState, RetentionTracker};
    use crate::storage::keys;
    use crate::test_support::{seeded_storage, FixedClock};
    use audiencelab_storage::KeyValueStore;

    #[tokio::test]
    async fn first_run_records_first_and_last_login() {
        let (store, storage) = seeded_storage(&[]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        assert_eq!(tracker.update_retention().await, None);

        let state = tracker.state().await;
        assert_eq!(state.first_login.as_deref(), Some("10/01/2024"));
        assert_eq!(state.last_login.as_deref(), Some("10/01/2024"));
        assert_eq!(state.last_sent_metric_date, None);
        assert_eq!(state.retention_day, None);

        // Legacy keys are mirrored.
        assert_eq!(
            store.get(keys::FIRST_LOGIN).await.unwrap().as_deref(),
            Some("10/01/2024")
        );
        assert_eq!(
            store.get(keys::LAST_LOGIN).await.unwrap().as_deref(),
            Some("10/01/2024")
        );
    }

    #[tokio::test]
    async fn second_run_on_first_day_reports_day_zero() {
        let (_store, storage) = seeded_storage(&[]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        assert_eq!(tracker.update_retention().await, None);
        assert_eq!(
            tracker.update_retention().await,
            Some(RetentionReport {
                retention_day: 0,
                backfill_day: 0
            })
        );
        assert!(tracker.reported_today().await);
    }

    #[tokio::test]
    async fn new_day_reports_days_since_first_login() {
        let (store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "01/01/2024"),
            (keys::LAST_LOGIN, "01/01/2024"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        let report = tracker.update_retention().await.expect("report due");
        assert_eq!(report.retention_day, 9);
        // lastLogin was still the first day, so there is nothing to backfill.
        assert_eq!(report.backfill_day, 0);

        let state = tracker.state().await;
        assert_eq!(state.last_login.as_deref(), Some("10/01/2024"));
        assert_eq!(state.first_login.as_deref(), Some("01/01/2024"));
        assert_eq!(state.retention_day, Some(9));
        assert_eq!(state.last_sent_metric_date.as_deref(), Some("10/01/2024"));
        assert_eq!(
            store.get(keys::RETENTION_DAY).await.unwrap().as_deref(),
            Some("9")
        );
    }

    #[tokio::test]
    async fn backfill_captures_previous_last_login() {
        let (_store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "01/01/2024"),
            (keys::LAST_LOGIN, "05/01/2024"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        assert_eq!(
            tracker.update_retention().await,
            Some(RetentionReport {
                retention_day: 9,
                backfill_day: 4
            })
        );
    }

    #[tokio::test]
    async fn same_day_update_is_idempotent() {
        let (store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "01/01/2024"),
            (keys::LAST_LOGIN, "09/01/2024"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        assert!(tracker.update_retention().await.is_some());
        let after_first = tracker.state().await;

        assert_eq!(tracker.update_retention().await, None);
        let after_second = tracker.state().await;
        assert_eq!(after_first, after_second);
        assert_eq!(
            store.get(keys::LAST_SENT_METRIC_DATE).await.unwrap().as_deref(),
            Some("10/01/2024")
        );
    }

    #[tokio::test]
    async fn next_day_reports_again() {
        let (_store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "01/01/2024"),
            (keys::LAST_LOGIN, "01/01/2024"),
        ]);
        let clock = FixedClock::at(2024, 1, 10, 0);
        let tracker = RetentionTracker::new(storage, clock.clone());

        assert!(tracker.update_retention().await.is_some());
        clock.advance_days(1);
        assert_eq!(
            tracker.update_retention().await,
            Some(RetentionReport {
                retention_day: 10,
                backfill_day: 9
            })
        );
    }

    #[tokio::test]
    async fn unreadable_first_login_aborts_without_writing() {
        let (store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "sometime last year"),
            (keys::LAST_LOGIN, "01/01/2024"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        assert_eq!(tracker.update_retention().await, None);
        assert_eq!(store.get(keys::LAST_SENT_METRIC_DATE).await.unwrap(), None);
        assert_eq!(store.get(keys::RETENTION_STATE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unreadable_last_login_aborts() {
        let (store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "01/01/2024"),
            (keys::LAST_LOGIN, "yesterday"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        assert_eq!(tracker.update_retention().await, None);
        assert_eq!(store.get(keys::LAST_SENT_METRIC_DATE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_last_login_counts_as_today() {
        let (_store, storage) = seeded_storage(&[(keys::FIRST_LOGIN, "01/01/2024")]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 31, 0));

        assert_eq!(
            tracker.update_retention().await,
            Some(RetentionReport {
                retention_day: 30,
                backfill_day: 0
            })
        );
    }

    #[tokio::test]
    async fn clock_behind_first_login_reports_day_zero() {
        let (_store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "10/01/2024"),
            (keys::LAST_LOGIN, "10/01/2024"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 5, 0));

        let report = tracker.update_retention().await.expect("report due");
        assert_eq!(report.retention_day, 0);
        assert_eq!(report.backfill_day, 0);
    }

    #[tokio::test]
    async fn record_takes_precedence_over_legacy_keys() {
        let state = RetentionState {
            first_login: Some("01/01/2024".into()),
            last_login: Some("01/01/2024".into()),
            last_sent_metric_date: Some("10/01/2024".into()),
            ..RetentionState::default()
        };
        let blob = serde_json::to_string(&state).unwrap();
        let (_store, storage) = seeded_storage(&[
            (keys::RETENTION_STATE, blob.as_str()),
            (keys::LAST_SENT_METRIC_DATE, "09/01/2024"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));

        assert!(tracker.reported_today().await);
        assert_eq!(tracker.update_retention().await, None);
    }

    #[tokio::test]
    async fn legacy_keys_migrate_into_record() {
        let (store, storage) = seeded_storage(&[
            (keys::FIRST_LOGIN, "01/01/2024"),
            (keys::LAST_LOGIN, "01/01/2024"),
            (keys::RETENTION_DAY, "3"),
        ]);
        let tracker = RetentionTracker::new(storage, FixedClock::at(2024, 1, 10, 0));
        assert_eq!(tracker.state().await.retention_day, Some(3));

        tracker.update_retention().await;

        let blob = store.get(keys::RETENTION_STATE).await.unwrap().unwrap();
        let saved: RetentionState = serde_json::from_str(&blob).unwrap();
        assert_eq!(saved.version, 1);
        assert_eq!(saved.retention_day, Some(9));
        assert_eq!(saved.backfill_day, Some(0));
    }

    #[test]
    fn report_serializes_days_as_strings() {
        let report = RetentionReport {
            retention_day: 9,
            backfill_day: 4,
        };
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            serde_json::json!({"retentionDay": "9", "backfillDay": "4"})
        );
    }
}
