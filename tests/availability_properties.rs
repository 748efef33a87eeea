use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use std::collections::BTreeSet;
use studio_backend::domain::services::availability::{estimate_availability, DateRange, SuggestionPolicy};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

prop_compose! {
    fn scenario()(today_offset in 0i64..730, booked_offsets in prop::collection::vec(-10i64..90, 0..80))
        -> (NaiveDate, BTreeSet<NaiveDate>)
    {
        let today = base() + Duration::days(today_offset);
        let booked = booked_offsets.into_iter().map(|o| today + Duration::days(o)).collect();
        (today, booked)
    }
}

proptest! {
    #[test]
    fn suggestions_respect_every_rule((today, booked) in scenario()) {
        let policy = SuggestionPolicy::default();
        let est = estimate_availability(today, DateRange::default_from(today), &booked, &policy);

        prop_assert!(est.suggested_dates.len() <= 5);
        for d in &est.suggested_dates {
            prop_assert!(*d > today);
            prop_assert!(*d <= today + Duration::days(60));
            prop_assert!(d.weekday() != Weekday::Mon);
            prop_assert!(!booked.contains(d));
        }
        prop_assert!(est.suggested_dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn suggestions_are_the_earliest_open_days((today, booked) in scenario()) {
        let est = estimate_availability(today, DateRange::default_from(today), &booked, &SuggestionPolicy::default());

        if let Some(last) = est.suggested_dates.last() {
            let mut day = today + Duration::days(1);
            while day < *last {
                let open = day.weekday() != Weekday::Mon && !booked.contains(&day);
                prop_assert_eq!(open, est.suggested_dates.contains(&day));
                day += Duration::days(1);
            }
        }
    }

    #[test]
    fn booked_dates_are_sorted_and_in_range(
        (today, booked) in scenario(),
        start_off in -30i64..60,
        len in 0i64..90,
    ) {
        let range = DateRange { start: today + Duration::days(start_off), end: today + Duration::days(start_off + len) };
        let est = estimate_availability(today, range, &booked, &SuggestionPolicy::default());

        prop_assert!(est.booked_dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(est.booked_dates.iter().all(|d| range.contains(*d) && booked.contains(d)));
        let expected = booked.iter().filter(|d| range.contains(**d)).count();
        prop_assert_eq!(est.booked_dates.len(), expected);
    }

    #[test]
    fn fully_booked_window_yields_nothing(today_offset in 0i64..730) {
        let today = base() + Duration::days(today_offset);
        let booked: BTreeSet<NaiveDate> = (1..=60).map(|o| today + Duration::days(o)).collect();
        let est = estimate_availability(today, DateRange::default_from(today), &booked, &SuggestionPolicy::default());
        prop_assert!(est.suggested_dates.is_empty());
    }

    #[test]
    fn query_parsing_never_inverts(start in "\\PC{0,12}", end in "\\PC{0,12}", today_offset in 0i64..730) {
        let today = base() + Duration::days(today_offset);
        let range = DateRange::from_query(today, Some(&start), Some(&end));
        prop_assert!(range.start <= range.end);
    }
}
