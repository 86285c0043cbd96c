//! Property tests over randomly sized rostering problems.

use proptest::prelude::*;

use u_roster::builder::RosterCpBuilder;
use u_roster::constraints::ConstraintSet;
use u_roster::cp::{BacktrackingSolver, SolverConfig};
use u_roster::models::{Coverage, Horizon, Nurse, Roster, RosterDomain, ShiftKind, ShiftType, Weekday};
use u_roster::statistics::RosterStatistics;

fn weekday() -> impl Strategy<Value = Weekday> {
    (0usize..7).prop_map(|i| Weekday::ALL[i])
}

/// Problems that always admit a roster: at least two nurses, at most one
/// nurse per working shift.
fn problem() -> impl Strategy<Value = RosterDomain> {
    (2usize..=5, 1usize..=8, 0u32..=1, 0u32..=1, weekday()).prop_map(
        |(nurses, days, day_cover, night_cover, start)| {
            RosterDomain::new(
                (0..nurses).map(|i| Nurse::new(format!("N{i}"))).collect(),
                Horizon::new(days).starting_on(start),
                vec![
                    ShiftType::day("Day", day_cover),
                    ShiftType::night("Night", night_cover),
                ],
            )
            .unwrap()
        },
    )
}

/// Day-shift-only problems with one nurse required per day.
fn day_only_problem() -> impl Strategy<Value = RosterDomain> {
    (2usize..=4, 1usize..=10, weekday()).prop_map(|(nurses, days, start)| {
        RosterDomain::new(
            (0..nurses).map(|i| Nurse::new(format!("N{i}"))).collect(),
            Horizon::new(days).starting_on(start),
            vec![ShiftType::day("Day", 1)],
        )
        .unwrap()
    })
}

fn solve(domain: &RosterDomain) -> Roster {
    RosterCpBuilder::new(domain)
        .with_constraints(ConstraintSet::new())
        .solve(&BacktrackingSolver::new(), &SolverConfig::default())
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_one_shift_per_nurse_day(domain in problem()) {
        let roster = solve(&domain);
        prop_assert_eq!(roster.entries().count(), domain.nurse_count() * domain.day_count());
        for d in 0..domain.day_count() {
            let held: usize = (0..domain.shift_count()).map(|s| roster.count(d, s)).sum();
            prop_assert_eq!(held, domain.nurse_count());
        }
    }

    #[test]
    fn prop_exact_coverage(domain in problem()) {
        let roster = solve(&domain);
        for day in domain.days() {
            for s in domain.active_shifts() {
                let coverage: Coverage = domain.shifts()[s].coverage_on(day);
                prop_assert!(coverage.admits(roster.count(day.index, s) as u32));
            }
        }
    }

    #[test]
    fn prop_no_day_after_night(domain in problem()) {
        let roster = solve(&domain);
        for n in 0..domain.nurse_count() {
            for d in 1..domain.day_count() {
                prop_assert!(!(roster.shift(n, d - 1).kind == ShiftKind::Night
                    && roster.shift(n, d).kind == ShiftKind::Day));
            }
        }
    }

    #[test]
    fn prop_consecutive_cap(domain in day_only_problem(), max_days in 1u32..=3, seed in any::<u64>()) {
        let roster = RosterCpBuilder::new(&domain)
            .with_constraints(ConstraintSet::new().with_consecutive_cap(max_days))
            .solve(&BacktrackingSolver::new(), &SolverConfig::default().with_seed(seed))
            .unwrap();
        for n in 0..domain.nurse_count() {
            prop_assert!(roster.longest_streak(n) <= max_days as usize);
        }
        for d in 0..domain.day_count() {
            prop_assert_eq!(roster.count(d, 0), 1);
        }
    }

    #[test]
    fn prop_statistics_idempotent(domain in problem(), week_length in 1usize..=7) {
        let roster = solve(&domain);
        let first = RosterStatistics::calculate_with_week_length(&roster, week_length);
        let second = RosterStatistics::calculate_with_week_length(&roster, week_length);
        prop_assert_eq!(first.tables(), second.tables());
        prop_assert_eq!(&first, &second);

        let worked: usize = first.totals().iter().map(|(_, total)| total).sum();
        let weekly: usize = first.weekly.iter().flatten().sum();
        prop_assert_eq!(worked, weekly);
    }
}
