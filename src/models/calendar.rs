//! Planning horizon and calendar days.
//!
//! A horizon is a contiguous run of days starting on a given weekday.
//! Days are addressed by index `0..len`; the weekday and weekend flag of
//! each day are derived from the start weekday.
//!
//! # Weeks
//! Weeks are fixed-size windows over day indices starting at day 0,
//! regardless of the start weekday. The final week may be partial.

use serde::{Deserialize, Serialize};

/// Default week length used for weekly partitions.
pub const DAYS_PER_WEEK: usize = 7;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The weekday `days` after this one.
    pub fn offset(self, days: usize) -> Self {
        Self::ALL[(self.index() + days) % 7]
    }

    /// Saturday and Sunday.
    #[inline]
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// A single day of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Day {
    /// Position in the horizon (0-based).
    pub index: usize,
    /// Calendar weekday.
    pub weekday: Weekday,
}

impl Day {
    /// Whether the day falls on a weekend.
    #[inline]
    pub fn is_weekend(&self) -> bool {
        self.weekday.is_weekend()
    }

    /// Week number for a given week length.
    #[inline]
    pub fn week(&self, week_length: usize) -> usize {
        self.index / week_length.max(1)
    }
}

/// Planning horizon: length and start weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// Number of days.
    pub length: usize,
    /// Weekday of day 0.
    pub start: Weekday,
}

impl Horizon {
    /// Creates a horizon starting on Monday.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            start: Weekday::Monday,
        }
    }

    /// Sets the start weekday.
    pub fn starting_on(mut self, start: Weekday) -> Self {
        self.start = start;
        self
    }

    /// Generates the days of this horizon.
    pub fn days(&self) -> Vec<Day> {
        (0..self.length)
            .map(|index| Day {
                index,
                weekday: self.start.offset(index),
            })
            .collect()
    }

    /// Partitions day indices into `[start, end)` weeks.
    ///
    /// The final week is kept even when shorter than `week_length`.
    pub fn weeks(&self, week_length: usize) -> Vec<(usize, usize)> {
        let step = week_length.max(1);
        (0..self.length)
            .step_by(step)
            .map(|start| (start, (start + step).min(self.length)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_offset() {
        assert_eq!(Weekday::Monday.offset(0), Weekday::Monday);
        assert_eq!(Weekday::Friday.offset(2), Weekday::Sunday);
        assert_eq!(Weekday::Sunday.offset(1), Weekday::Monday);
        assert_eq!(Weekday::Wednesday.offset(14), Weekday::Wednesday);
    }

    #[test]
    fn test_weekend_flags() {
        let days = Horizon::new(7).days();
        let weekend: Vec<usize> = days.iter().filter(|d| d.is_weekend()).map(|d| d.index).collect();
        assert_eq!(weekend, vec![5, 6]);
    }

    #[test]
    fn test_weekend_with_start_day() {
        let days = Horizon::new(3).starting_on(Weekday::Saturday).days();
        assert!(days[0].is_weekend());
        assert!(days[1].is_weekend());
        assert!(!days[2].is_weekend());
        assert_eq!(days[2].weekday, Weekday::Monday);
    }

    #[test]
    fn test_weeks_with_partial_tail() {
        let weeks = Horizon::new(17).weeks(7);
        assert_eq!(weeks, vec![(0, 7), (7, 14), (14, 17)]);
    }

    #[test]
    fn test_weeks_exact() {
        let weeks = Horizon::new(14).weeks(DAYS_PER_WEEK);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[1], (7, 14));
    }

    #[test]
    fn test_day_week_number() {
        let days = Horizon::new(10).days();
        assert_eq!(days[6].week(7), 0);
        assert_eq!(days[7].week(7), 1);
    }
}
