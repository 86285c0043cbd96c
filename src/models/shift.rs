//! Shift types and coverage requirements.
//!
//! A shift type is a kind of daily duty (day, night) or the `Off` pseudo
//! shift. Working shift types carry a coverage requirement: the number of
//! nurses that must hold the shift on every day of the horizon.

use serde::{Deserialize, Serialize};

use super::Day;

/// Identifier of the implicit off-duty shift type.
pub const OFF_SHIFT_ID: &str = "Off";

/// Shift classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    /// Daytime duty.
    Day,
    /// Overnight duty.
    Night,
    /// Not working.
    Off,
}

/// Headcount range required for a shift on a day.
///
/// `min == max` is an exact requirement. `max = None` means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Minimum number of nurses.
    pub min: u32,
    /// Maximum number of nurses.
    pub max: Option<u32>,
}

impl Coverage {
    /// Exactly `count` nurses.
    pub fn exact(count: u32) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    /// Between `min` and `max` nurses (inclusive).
    pub fn range(min: u32, max: u32) -> Self {
        Self { min, max: Some(max) }
    }

    /// At least `min` nurses.
    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    /// No requirement.
    pub fn unbounded() -> Self {
        Self { min: 0, max: None }
    }

    /// Whether `count` satisfies this requirement.
    #[inline]
    pub fn admits(&self, count: u32) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Whether the requirement is exact.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.max == Some(self.min)
    }
}

/// A shift type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftType {
    /// Unique identifier (e.g., "ED Day 01").
    pub id: String,
    /// Classification used by kind-based rules.
    pub kind: ShiftKind,
    /// Duration in hours (0 for `Off`).
    pub duration_hours: u32,
    /// Daily coverage requirement.
    pub coverage: Coverage,
    /// Coverage on Saturdays and Sundays, when different.
    #[serde(default)]
    pub weekend_coverage: Option<Coverage>,
}

impl ShiftType {
    /// Creates a shift type with the given kind and coverage.
    pub fn new(id: impl Into<String>, kind: ShiftKind, coverage: Coverage) -> Self {
        let duration_hours = match kind {
            ShiftKind::Day | ShiftKind::Night => 12,
            ShiftKind::Off => 0,
        };
        Self {
            id: id.into(),
            kind,
            duration_hours,
            coverage,
            weekend_coverage: None,
        }
    }

    /// A day shift requiring exactly `count` nurses.
    pub fn day(id: impl Into<String>, count: u32) -> Self {
        Self::new(id, ShiftKind::Day, Coverage::exact(count))
    }

    /// A night shift requiring exactly `count` nurses.
    pub fn night(id: impl Into<String>, count: u32) -> Self {
        Self::new(id, ShiftKind::Night, Coverage::exact(count))
    }

    /// The off-duty pseudo shift.
    pub fn off() -> Self {
        Self::new(OFF_SHIFT_ID, ShiftKind::Off, Coverage::unbounded())
    }

    /// Sets the duration in hours.
    pub fn with_duration(mut self, hours: u32) -> Self {
        self.duration_hours = hours;
        self
    }

    /// Sets the daily coverage.
    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// Sets a different coverage for weekend days.
    pub fn with_weekend_coverage(mut self, coverage: Coverage) -> Self {
        self.weekend_coverage = Some(coverage);
        self
    }

    /// Whether this is a working shift (anything but `Off`).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.kind != ShiftKind::Off
    }

    /// Coverage that applies on `day`.
    ///
    /// `Off` never has a requirement.
    pub fn coverage_on(&self, day: &Day) -> Coverage {
        if !self.is_active() {
            return Coverage::unbounded();
        }
        match self.weekend_coverage {
            Some(weekend) if day.is_weekend() => weekend,
            _ => self.coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Horizon, Weekday};

    #[test]
    fn test_coverage_admits() {
        assert!(Coverage::exact(2).admits(2));
        assert!(!Coverage::exact(2).admits(1));
        assert!(!Coverage::exact(2).admits(3));
        assert!(Coverage::range(1, 3).admits(3));
        assert!(Coverage::at_least(1).admits(100));
        assert!(Coverage::unbounded().admits(0));
        assert!(Coverage::exact(1).is_exact());
        assert!(!Coverage::range(1, 2).is_exact());
    }

    #[test]
    fn test_shift_constructors() {
        let d = ShiftType::day("ED Day 01", 1);
        assert_eq!(d.kind, ShiftKind::Day);
        assert!(d.is_active());
        assert_eq!(d.coverage, Coverage::exact(1));

        let off = ShiftType::off();
        assert_eq!(off.id, OFF_SHIFT_ID);
        assert!(!off.is_active());
        assert_eq!(off.duration_hours, 0);
    }

    #[test]
    fn test_weekend_coverage_override() {
        let days = Horizon::new(7).starting_on(Weekday::Monday).days();
        let s = ShiftType::day("On Call", 2).with_weekend_coverage(Coverage::exact(1));
        assert_eq!(s.coverage_on(&days[0]), Coverage::exact(2));
        assert_eq!(s.coverage_on(&days[5]), Coverage::exact(1));
    }

    #[test]
    fn test_off_has_no_requirement() {
        let day = Horizon::new(1).days()[0];
        let off = ShiftType::off().with_coverage(Coverage::exact(3));
        assert_eq!(off.coverage_on(&day), Coverage::unbounded());
    }
}
