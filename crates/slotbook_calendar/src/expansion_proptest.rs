#[cfg(test)]
mod tests {
    use crate::expansion::{blocker_slots, plan_expansion, slots_needed, TimestampPolicy};
    use crate::slots::{Slot, SLOT_COUNT};
    use proptest::prelude::*;
    use serde_json::json;

    // Confirmed timestamp for the start of slot `index` on a fixed date
    fn timestamp_for(index: usize) -> String {
        let start = Slot::from_index(index).unwrap().start();
        format!("2025-06-03T{}:00.000Z", start.format("%H:%M"))
    }

    proptest! {
        #[test]
        fn test_slots_needed_is_ceiling_of_half_hours(minutes in 1u32..100_000) {
            let needed = slots_needed(Some(minutes));
            // Smallest n with n * 30 >= minutes
            prop_assert!(needed as u32 * 30 >= minutes);
            prop_assert!((needed as u32 - 1) * 30 < minutes);
            if minutes % 30 == 0 {
                prop_assert_eq!(needed as u32, minutes / 30);
            }
        }

        #[test]
        fn test_blockers_are_contiguous_and_clipped(start in 0..SLOT_COUNT, n in 1usize..40) {
            let slot = Slot::from_index(start).unwrap();
            let blockers = blocker_slots(slot, n);

            let expected_end = (start + n).min(SLOT_COUNT);
            let expected: Vec<usize> = (start + 1..expected_end).collect();
            let actual: Vec<usize> = blockers.iter().map(|s| s.index()).collect();
            prop_assert_eq!(actual, expected);

            // Never the start slot, never past the table
            prop_assert!(blockers.iter().all(|s| s.index() > start && s.index() < SLOT_COUNT));
        }

        #[test]
        fn test_plan_matches_components(start in 0..SLOT_COUNT, minutes in 1u32..600) {
            let plan = plan_expansion(
                &timestamp_for(start),
                Some(&json!(minutes)),
                TimestampPolicy::Naive,
            ).unwrap();

            prop_assert_eq!(plan.start_slot.index(), start);
            prop_assert_eq!(plan.slots_needed, slots_needed(Some(minutes)));
            prop_assert_eq!(plan.blockers.clone(), blocker_slots(plan.start_slot, plan.slots_needed));
            prop_assert_eq!(plan.is_noop(), minutes <= 30 || start == SLOT_COUNT - 1);
        }

        #[test]
        fn test_off_grid_minutes_never_match(hour in 0u32..24, minute in 0u32..60) {
            prop_assume!(minute % 30 != 0);
            let raw = format!("2025-06-03T{:02}:{:02}:00Z", hour, minute);
            prop_assert!(plan_expansion(&raw, Some(&json!(60)), TimestampPolicy::Naive).is_err());
        }
    }
}
