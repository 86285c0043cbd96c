//! Roster statistics.
//!
//! Pure aggregations over a solved roster, used to inspect workload
//! balance after solving. The roster is assumed valid and is not checked
//! again.
//!
//! # Tables
//!
//! | Table | Key | Columns |
//! |-------|-----|---------|
//! | Distribution of Shifts per Team | team | members, total shifts |
//! | Distribution of Shift Types per Nurse | nurse | one per working shift, total |
//! | Distribution of Weekday-Weekend Shifts per Nurse | nurse | weekday, weekend, total |
//! | Distribution of Shifts per Week per Nurse | nurse | one per week, total |
//!
//! Per-nurse data is indexed by nurse in input order, with the nurse id
//! as row label. Team rows are ordered by team name, so computing twice
//! yields identical tables.

mod table;

use std::collections::BTreeMap;

use serde::Serialize;

pub use table::StatTable;

use crate::models::{Roster, DAYS_PER_WEEK};

/// Members and worked shifts of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TeamLoad {
    pub members: usize,
    pub shifts: usize,
}

/// Working shifts of one nurse split by weekday and weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DaySplit {
    pub weekday: usize,
    pub weekend: usize,
}

impl DaySplit {
    pub fn total(&self) -> usize {
        self.weekday + self.weekend
    }
}

/// Team name → load. Nurses without a team are not counted.
pub fn team_distribution(roster: &Roster) -> BTreeMap<String, TeamLoad> {
    let mut teams: BTreeMap<String, TeamLoad> = BTreeMap::new();
    for (n, nurse) in roster.nurses().iter().enumerate() {
        let Some(team) = &nurse.team else {
            continue;
        };
        let load = teams.entry(team.clone()).or_default();
        load.members += 1;
        load.shifts += worked(roster, n);
    }
    teams
}

/// Count per working shift type for each nurse, in shift order.
pub fn shift_types_per_nurse(roster: &Roster) -> Vec<Vec<usize>> {
    let active: Vec<usize> = active_shifts(roster);
    (0..roster.nurses().len())
        .map(|n| {
            let mut counts = vec![0; active.len()];
            for d in 0..roster.days().len() {
                let s = roster.shift_index(n, d);
                if let Some(col) = active.iter().position(|&a| a == s) {
                    counts[col] += 1;
                }
            }
            counts
        })
        .collect()
}

/// Weekday/weekend split of working shifts for each nurse.
pub fn weekday_weekend(roster: &Roster) -> Vec<DaySplit> {
    (0..roster.nurses().len())
        .map(|n| {
            let mut split = DaySplit::default();
            for day in roster.days().iter().filter(|d| roster.is_working(n, d.index)) {
                if day.is_weekend() {
                    split.weekend += 1;
                } else {
                    split.weekday += 1;
                }
            }
            split
        })
        .collect()
}

/// Working shifts per week for each nurse.
///
/// Weeks are windows of `week_length` days from day 0; the last one may
/// be partial.
pub fn weekly_counts(roster: &Roster, week_length: usize) -> Vec<Vec<usize>> {
    let weeks = week_count(roster, week_length);
    (0..roster.nurses().len())
        .map(|n| {
            let mut counts = vec![0; weeks];
            for day in roster.days().iter().filter(|d| roster.is_working(n, d.index)) {
                counts[day.week(week_length)] += 1;
            }
            counts
        })
        .collect()
}

fn active_shifts(roster: &Roster) -> Vec<usize> {
    roster
        .shifts()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_active())
        .map(|(i, _)| i)
        .collect()
}

fn worked(roster: &Roster, nurse: usize) -> usize {
    (0..roster.days().len())
        .filter(|&d| roster.is_working(nurse, d))
        .count()
}

fn week_count(roster: &Roster, week_length: usize) -> usize {
    roster.days().len().div_ceil(week_length.max(1))
}

/// All roster statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterStatistics {
    /// Nurse ids in input order; row labels of the per-nurse data.
    pub nurse_ids: Vec<String>,
    /// Working shift ids, in shift order.
    pub shift_ids: Vec<String>,
    /// Days per week used for `weekly`.
    pub week_length: usize,
    pub teams: BTreeMap<String, TeamLoad>,
    pub shift_types: Vec<Vec<usize>>,
    pub day_split: Vec<DaySplit>,
    pub weekly: Vec<Vec<usize>>,
}

impl RosterStatistics {
    /// Computes all statistics with 7-day weeks.
    pub fn calculate(roster: &Roster) -> Self {
        Self::calculate_with_week_length(roster, DAYS_PER_WEEK)
    }

    /// Computes all statistics with a custom week length.
    pub fn calculate_with_week_length(roster: &Roster, week_length: usize) -> Self {
        let week_length = week_length.max(1);
        Self {
            nurse_ids: roster.nurses().iter().map(|n| n.id.clone()).collect(),
            shift_ids: active_shifts(roster)
                .into_iter()
                .map(|s| roster.shifts()[s].id.clone())
                .collect(),
            week_length,
            teams: team_distribution(roster),
            shift_types: shift_types_per_nurse(roster),
            day_split: weekday_weekend(roster),
            weekly: weekly_counts(roster, week_length),
        }
    }

    /// Working shifts per nurse, in input order.
    pub fn totals(&self) -> Vec<(&str, usize)> {
        self.nurse_ids
            .iter()
            .zip(&self.day_split)
            .map(|(id, split)| (id.as_str(), split.total()))
            .collect()
    }

    /// Difference between the busiest and the least busy nurse.
    pub fn workload_spread(&self) -> usize {
        let totals = self.day_split.iter().map(DaySplit::total);
        let max = totals.clone().max().unwrap_or(0);
        let min = totals.min().unwrap_or(0);
        max - min
    }

    fn labelled<'a, T>(&'a self, rows: &'a [T]) -> impl Iterator<Item = (&'a str, &'a T)> + 'a {
        self.nurse_ids.iter().map(String::as_str).zip(rows)
    }

    /// The statistics as named tables.
    pub fn tables(&self) -> Vec<StatTable> {
        let total = || "Total Shifts".to_string();

        let teams = self.teams.iter().fold(
            StatTable::new(
                "Distribution of Shifts per Team",
                "Team",
                vec!["Team Members".into(), total()],
            ),
            |table, (name, load)| table.with_row(name.as_str(), vec![load.members, load.shifts]),
        );

        let mut columns = self.shift_ids.clone();
        columns.push(total());
        let shift_types = self.labelled(&self.shift_types).fold(
            StatTable::new("Distribution of Shift Types per Nurse", "Nurse", columns),
            |table, (id, counts)| table.with_row(id, with_total(counts)),
        );

        let day_split = self.labelled(&self.day_split).fold(
            StatTable::new(
                "Distribution of Weekday-Weekend Shifts per Nurse",
                "Nurse",
                vec!["Weekday Shifts".into(), "Weekend Shifts".into(), total()],
            ),
            |table, (id, split)| {
                table.with_row(id, vec![split.weekday, split.weekend, split.total()])
            },
        );

        let weeks = self.weekly.iter().map(Vec::len).max().unwrap_or(0);
        let mut columns: Vec<String> = (1..=weeks).map(|w| format!("Week {w}")).collect();
        columns.push(total());
        let weekly = self.labelled(&self.weekly).fold(
            StatTable::new("Distribution of Shifts per Week per Nurse", "Nurse", columns),
            |table, (id, counts)| table.with_row(id, with_total(counts)),
        );

        vec![teams, shift_types, day_split, weekly]
    }
}

fn with_total(counts: &[usize]) -> Vec<usize> {
    let mut row = counts.to_vec();
    row.push(counts.iter().sum());
    row
}
