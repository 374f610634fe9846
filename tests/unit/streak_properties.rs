/// Streak behaviour over generated completion histories
use std::collections::BTreeSet;

use habitflow::*;
use proptest::prelude::*;

fn day(s: &str) -> DayKey {
    DayKey::parse(s).expect("valid day key")
}

fn history_from(today: DayKey, offsets: &BTreeSet<i64>) -> Vec<DayKey> {
    offsets.iter().map(|offset| today.add_days(-offset)).collect()
}

fn today() -> DayKey {
    day("2024-08-15")
}

proptest! {
    #[test]
    fn test_longest_never_below_current(offsets in prop::collection::btree_set(0i64..60, 0..40)) {
        let history = history_from(today(), &offsets);
        let summary = compute_streaks(history.iter().copied(), today());

        prop_assert!(summary.longest >= summary.current);
        prop_assert_eq!(summary.longest == 0, history.is_empty());
    }

    #[test]
    fn test_completing_today_starts_a_streak(offsets in prop::collection::btree_set(0i64..60, 0..40)) {
        let mut history = history_from(today(), &offsets);
        history.push(today());

        prop_assert!(compute_streaks(history, today()).current >= 1);
    }

    #[test]
    fn test_two_day_gap_resets_current(offsets in prop::collection::btree_set(2i64..60, 0..40)) {
        let history = history_from(today(), &offsets);

        prop_assert_eq!(compute_streaks(history, today()).current, 0);
    }

    #[test]
    fn test_input_order_and_duplicates_do_not_matter(
        offsets in prop::collection::btree_set(0i64..60, 0..40),
        repeat in prop::collection::vec(0i64..60, 0..20),
    ) {
        let history = history_from(today(), &offsets);

        let mut shuffled = history.clone();
        shuffled.reverse();
        shuffled.extend(history.iter().copied());
        shuffled.extend(repeat.iter().filter(|o| offsets.contains(*o)).map(|o| today().add_days(-o)));

        prop_assert_eq!(compute_streaks(history, today()), compute_streaks(shuffled, today()));
    }
}

#[test]
fn test_documented_examples() {
    let history = vec![day("2024-01-01"), day("2024-01-02"), day("2024-01-03"), day("2024-01-05")];
    assert_eq!(compute_streaks(history, day("2024-03-01")).longest, 3);

    let today = day("2024-05-20");
    let week: Vec<DayKey> = (0..7).map(|i| today.add_days(-i)).collect();
    let summary = compute_streaks(week, today);
    assert_eq!(summary, StreakSummary { current: 7, longest: 7 });

    // Yesterday anchors the streak when today is still open
    let summary = compute_streaks(vec![today.previous(), today.add_days(-2)], today);
    assert_eq!(summary.current, 2);
}
