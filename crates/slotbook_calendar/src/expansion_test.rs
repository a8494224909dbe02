#[cfg(test)]
mod tests {
    use crate::expansion::{
        blocker_slots, parse_duration_minutes, plan_expansion, slots_needed, ExpansionError,
        TimestampPolicy,
    };
    use crate::slots::Slot;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::{json, Value};
    use slotbook_config::{ScheduleConfig, TimestampMode};

    fn labels(slots: &[Slot]) -> Vec<&'static str> {
        slots.iter().map(|s| s.label()).collect()
    }

    #[test]
    fn nine_o_clock_ninety_minutes_needs_two_blockers() {
        let plan = plan_expansion(
            "2025-06-02T09:00:00.000Z",
            Some(&json!(90)),
            TimestampPolicy::Naive,
        )
        .unwrap();

        assert_eq!(plan.start_slot.label(), "9:00 AM - 9:30 AM");
        assert_eq!(plan.slots_needed, 3);
        assert_eq!(
            labels(&plan.blockers),
            vec!["9:30 AM - 10:00 AM", "10:00 AM - 10:30 AM"]
        );
        assert_eq!(
            plan.confirmed_date,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }

    #[test]
    fn half_past_four_thirty_minutes_is_noop() {
        let plan = plan_expansion(
            "2025-06-02T16:30:00.000Z",
            Some(&json!(30)),
            TimestampPolicy::Naive,
        )
        .unwrap();

        assert_eq!(plan.start_slot, Slot::last());
        assert_eq!(plan.slots_needed, 1);
        assert!(plan.is_noop());
    }

    #[test]
    fn five_pm_has_no_start_slot() {
        let err = plan_expansion(
            "2025-06-02T17:00:00.000Z",
            Some(&json!(60)),
            TimestampPolicy::Naive,
        )
        .unwrap_err();

        assert_eq!(
            err,
            ExpansionError::StartSlotNotFound {
                confirmed: "2025-06-02T17:00:00.000Z".to_string(),
                clock: "5:00 PM".to_string(),
            }
        );
    }

    #[test]
    fn unmatched_start_wins_over_missing_duration() {
        let err = plan_expansion("2025-06-02T09:10", None, TimestampPolicy::Naive).unwrap_err();
        assert!(matches!(err, ExpansionError::StartSlotNotFound { .. }));
    }

    #[test]
    fn last_slot_clips_long_bookings() {
        let plan = plan_expansion(
            "2025-06-02T16:00:00Z",
            Some(&json!("240 min")),
            TimestampPolicy::Naive,
        )
        .unwrap();

        assert_eq!(plan.slots_needed, 8);
        assert_eq!(labels(&plan.blockers), vec!["4:30 PM - 5:00 PM"]);

        let at_end = plan_expansion(
            "2025-06-02T16:30:00Z",
            Some(&json!(120)),
            TimestampPolicy::Naive,
        )
        .unwrap();
        assert!(at_end.blockers.is_empty());
    }

    #[test]
    fn missing_or_non_positive_duration_is_noop() {
        for duration in [None, Some(json!(0)), Some(json!(-45)), Some(json!("abc"))] {
            let plan = plan_expansion(
                "2025-06-02T10:00:00Z",
                duration.as_ref(),
                TimestampPolicy::Naive,
            )
            .unwrap();
            assert!(plan.is_noop(), "expected no-op for {:?}", duration);
            assert_eq!(plan.duration_minutes, None);
        }
    }

    #[test]
    fn naive_policy_ignores_offset() {
        let plan = plan_expansion(
            "2025-06-02T09:00:00+08:00",
            Some(&json!(60)),
            TimestampPolicy::Naive,
        )
        .unwrap();
        assert_eq!(plan.clock_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(labels(&plan.blockers), vec!["9:30 AM - 10:00 AM"]);
    }

    #[test]
    fn zoned_policy_converts_before_matching() {
        let policy = TimestampPolicy::Zoned(chrono_tz::Asia::Manila);
        // 01:00 UTC is 09:00 in Manila (UTC+8, no DST).
        let plan = plan_expansion("2025-06-02T01:00:00.000Z", Some(&json!(60)), policy).unwrap();
        assert_eq!(plan.start_slot.label(), "9:00 AM - 9:30 AM");

        // 16:30 UTC on the 1st is 00:30 on the 2nd in Manila.
        let err = plan_expansion("2025-06-01T16:30:00Z", Some(&json!(60)), policy).unwrap_err();
        assert!(matches!(err, ExpansionError::StartSlotNotFound { .. }));
    }

    #[test]
    fn zoned_policy_crosses_midnight_into_next_date() {
        // Kiritimati is UTC+14, so 19:00 UTC lands at 09:00 the next day.
        let policy = TimestampPolicy::Zoned(chrono_tz::Pacific::Kiritimati);
        let plan = plan_expansion("2025-06-01T19:00:00Z", Some(&json!(60)), policy).unwrap();
        assert_eq!(
            plan.confirmed_date,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
        assert_eq!(plan.start_slot.label(), "9:00 AM - 9:30 AM");
        assert_eq!(labels(&plan.blockers), vec!["9:30 AM - 10:00 AM"]);
    }

    #[test]
    fn invalid_timestamps_are_rejected() {
        for raw in ["", "tomorrow at nine", "2025-06-02", "2025-13-02T09:00", "2025-06-02T9"] {
            let err = plan_expansion(raw, Some(&json!(60)), TimestampPolicy::Naive).unwrap_err();
            assert!(
                matches!(err, ExpansionError::InvalidTimestamp(_)),
                "expected InvalidTimestamp for {:?}",
                raw
            );
        }
        // An offset that is not RFC 3339 is not silently dropped
        let err = plan_expansion(
            "2025-06-02T09:00+08:00",
            Some(&json!(60)),
            TimestampPolicy::Zoned(chrono_tz::UTC),
        )
        .unwrap_err();
        assert!(matches!(err, ExpansionError::InvalidTimestamp(_)));
    }

    #[test]
    fn zoned_timestamp_without_offset_is_local_time() {
        let policy = TimestampPolicy::Zoned(chrono_tz::Asia::Manila);
        for raw in ["2025-06-02T09:00", "2025-06-02 09:00", "2025-06-02T09:00:00.000"] {
            let plan = plan_expansion(raw, Some(&json!(60)), policy).unwrap();
            assert_eq!(
                plan.confirmed_date,
                NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                "date for {:?}",
                raw
            );
            assert_eq!(plan.start_slot.label(), "9:00 AM - 9:30 AM");
            assert_eq!(labels(&plan.blockers), vec!["9:30 AM - 10:00 AM"]);
        }
    }

    #[test]
    fn zoned_timestamp_in_dst_gap_is_rejected() {
        // 02:30 does not exist in New York on 2025-03-09
        let err = plan_expansion(
            "2025-03-09T02:30",
            Some(&json!(60)),
            TimestampPolicy::Zoned(chrono_tz::America::New_York),
        )
        .unwrap_err();
        assert!(matches!(err, ExpansionError::InvalidTimestamp(_)));
    }

    #[test]
    fn space_separated_naive_timestamp() {
        let plan = plan_expansion("2025-06-02 13:30", Some(&json!(45)), TimestampPolicy::Naive)
            .unwrap();
        assert_eq!(plan.start_slot.label(), "1:30 PM - 2:00 PM");
        assert_eq!(labels(&plan.blockers), vec!["2:00 PM - 2:30 PM"]);
    }

    #[test]
    fn duration_parsing_variants() {
        assert_eq!(parse_duration_minutes(Some(&json!(90))), Some(90));
        assert_eq!(parse_duration_minutes(Some(&json!(45.5))), Some(46));
        assert_eq!(parse_duration_minutes(Some(&json!("60"))), Some(60));
        assert_eq!(parse_duration_minutes(Some(&json!("75 minutes"))), Some(75));
        assert_eq!(parse_duration_minutes(Some(&json!(" 30min"))), Some(30));
        assert_eq!(parse_duration_minutes(Some(&json!("min 30"))), None);
        assert_eq!(parse_duration_minutes(Some(&json!("0"))), None);
        assert_eq!(parse_duration_minutes(Some(&Value::Null)), None);
        assert_eq!(parse_duration_minutes(Some(&json!(true))), None);
        assert_eq!(parse_duration_minutes(None), None);
    }

    #[test]
    fn slots_needed_boundaries() {
        assert_eq!(slots_needed(None), 1);
        assert_eq!(slots_needed(Some(1)), 1);
        assert_eq!(slots_needed(Some(30)), 1);
        assert_eq!(slots_needed(Some(31)), 2);
        assert_eq!(slots_needed(Some(60)), 2);
        assert_eq!(slots_needed(Some(61)), 3);
        assert_eq!(slots_needed(Some(90)), 3);
    }

    #[test]
    fn blocker_slots_never_include_start() {
        let start = Slot::from_index(4).unwrap();
        assert!(blocker_slots(start, 1).is_empty());
        assert_eq!(
            blocker_slots(start, 3)
                .iter()
                .map(|s| s.index())
                .collect::<Vec<_>>(),
            vec![5, 6]
        );
        assert!(blocker_slots(Slot::last(), 5).is_empty());
        assert_eq!(blocker_slots(Slot::first(), usize::MAX).len(), 17);
    }

    #[test]
    fn policy_from_config() {
        let mut config = ScheduleConfig::default();
        assert_eq!(
            TimestampPolicy::from_config(&config).unwrap(),
            TimestampPolicy::Naive
        );

        config.timestamp_policy = TimestampMode::Zoned;
        assert_eq!(
            TimestampPolicy::from_config(&config).unwrap(),
            TimestampPolicy::Zoned(chrono_tz::Asia::Manila)
        );

        config.time_zone = "Mars/Olympus".to_string();
        assert_eq!(
            TimestampPolicy::from_config(&config).unwrap_err(),
            ExpansionError::UnknownTimeZone("Mars/Olympus".to_string())
        );
    }
}
