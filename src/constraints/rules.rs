//! Rule parameters.
//!
//! Plain data describing *which* shifts, days, and staff a rule family
//! applies to. The family functions in `library` turn them into relations.

use serde::{Deserialize, Serialize};

use crate::models::{Day, Roster, RosterDomain, ShiftKind, Weekday};

/// Selects a subset of shift types.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShiftSelector {
    /// Every working shift (all but `Off`).
    #[default]
    Active,
    /// Every shift type of a kind.
    Kind(ShiftKind),
    /// Shift types listed by id.
    Ids(Vec<String>),
}

impl ShiftSelector {
    /// Shift types listed by id.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Resolves the selector to shift indices of `domain`.
    ///
    /// Unknown ids are skipped; validation reports them separately.
    pub fn resolve(&self, domain: &RosterDomain) -> Vec<usize> {
        match self {
            Self::Active => domain.active_shifts().collect(),
            Self::Kind(kind) => domain.shifts_of_kind(*kind),
            Self::Ids(ids) => ids.iter().filter_map(|id| domain.shift_index(id)).collect(),
        }
    }

    /// Ids that do not name a shift type of `domain`.
    pub fn unknown_ids<'a>(&'a self, domain: &RosterDomain) -> Vec<&'a str> {
        match self {
            Self::Ids(ids) => ids
                .iter()
                .filter(|id| domain.shift_index(id).is_none())
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Selects a subset of horizon days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayFilter {
    #[default]
    All,
    /// Monday to Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
}

impl DayFilter {
    /// Whether `day` passes the filter.
    #[inline]
    pub fn admits(&self, day: &Day) -> bool {
        match self {
            Self::All => true,
            Self::Weekdays => !day.is_weekend(),
            Self::Weekends => day.is_weekend(),
        }
    }

    /// Indices of the days of `domain` passing the filter.
    pub fn days(&self, domain: &RosterDomain) -> Vec<usize> {
        domain
            .days()
            .iter()
            .filter(|d| self.admits(d))
            .map(|d| d.index)
            .collect()
    }
}

/// A nurse working a `from` shift on day D may not work a `to` shift on D+1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenSuccession {
    pub from: ShiftSelector,
    pub to: ShiftSelector,
}

impl ForbiddenSuccession {
    pub fn new(from: ShiftSelector, to: ShiftSelector) -> Self {
        Self { from, to }
    }

    /// No day shift right after a night shift.
    pub fn night_then_day() -> Self {
        Self::new(
            ShiftSelector::Kind(ShiftKind::Night),
            ShiftSelector::Kind(ShiftKind::Day),
        )
    }
}

/// At most `max_days` consecutive days on the selected shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsecutiveCap {
    pub max_days: u32,
    pub shifts: ShiftSelector,
}

impl ConsecutiveCap {
    /// At most `max_days` consecutive working days.
    pub fn working_days(max_days: u32) -> Self {
        Self {
            max_days,
            shifts: ShiftSelector::Active,
        }
    }

    /// At most `max_days` consecutive days on the selected shifts.
    pub fn for_shifts(max_days: u32, shifts: ShiftSelector) -> Self {
        Self { max_days, shifts }
    }
}

/// Who a fairness rule balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FairnessScope {
    /// Each nurse individually.
    PerNurse,
    /// Each team as a whole.
    PerTeam,
}

/// Count bounds of a fairness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountBounds {
    /// Fixed inclusive range.
    Fixed { min: u32, max: u32 },
    /// Even split of the required coverage slots across the group.
    ///
    /// Each nurse gets `⌊slots / nurses⌋`; when the division is not exact
    /// up to `tolerance` more. Teams are weighted by their size.
    Even { tolerance: u32 },
}

/// Bounds on how many selected shifts each nurse or team works.
///
/// Enforced as hard constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessRule {
    pub scope: FairnessScope,
    pub shifts: ShiftSelector,
    pub days: DayFilter,
    pub bounds: CountBounds,
}

impl FairnessRule {
    /// Per-nurse bounds over all working shifts and days.
    pub fn per_nurse(bounds: CountBounds) -> Self {
        Self {
            scope: FairnessScope::PerNurse,
            shifts: ShiftSelector::Active,
            days: DayFilter::All,
            bounds,
        }
    }

    /// Per-team bounds over all working shifts and days.
    pub fn per_team(bounds: CountBounds) -> Self {
        Self {
            scope: FairnessScope::PerTeam,
            ..Self::per_nurse(bounds)
        }
    }

    /// Restricts the rule to some shifts.
    pub fn with_shifts(mut self, shifts: ShiftSelector) -> Self {
        self.shifts = shifts;
        self
    }

    /// Restricts the rule to some days.
    pub fn on_days(mut self, days: DayFilter) -> Self {
        self.days = days;
        self
    }
}

/// At most `max_shifts` selected shifts per nurse in each period.
///
/// Periods are consecutive windows of `period_days` from day 0; the last
/// one may be shorter and is capped all the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCap {
    pub period_days: u32,
    pub max_shifts: u32,
    pub shifts: ShiftSelector,
}

impl PeriodCap {
    /// At most `max_shifts` working shifts per 7-day week.
    pub fn weekly(max_shifts: u32) -> Self {
        Self {
            period_days: 7,
            max_shifts,
            shifts: ShiftSelector::Active,
        }
    }
}

/// Whose shifts an exclusion removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionTarget {
    Team(String),
    Nurse(String),
}

/// The target never works the selected shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftExclusion {
    pub target: ExclusionTarget,
    pub shifts: ShiftSelector,
}

impl ShiftExclusion {
    pub fn team(team: impl Into<String>, shifts: ShiftSelector) -> Self {
        Self {
            target: ExclusionTarget::Team(team.into()),
            shifts,
        }
    }

    pub fn nurse(nurse_id: impl Into<String>, shifts: ShiftSelector) -> Self {
        Self {
            target: ExclusionTarget::Nurse(nurse_id.into()),
            shifts,
        }
    }
}

/// Block rostering of one shift.
///
/// A nurse who works `shift` on a `start` weekday works it for `length`
/// consecutive days, then is off for `rest_days` days. The block days
/// match the start day, so nobody else works `shift` inside a block.
/// Days past the horizon end are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftBlock {
    pub shift: String,
    pub start: Weekday,
    pub length: u32,
    pub rest_days: u32,
}

impl ShiftBlock {
    pub fn new(shift: impl Into<String>, start: Weekday, length: u32, rest_days: u32) -> Self {
        Self {
            shift: shift.into(),
            start,
            length,
            rest_days,
        }
    }

    /// Rest days `nurse` takes after the blocks it starts in `roster`.
    pub fn rest_days_in(&self, roster: &Roster, nurse: usize) -> Vec<usize> {
        let horizon = roster.days().len();
        let length = self.length as usize;
        roster
            .days()
            .iter()
            .filter(|d| d.weekday == self.start && roster.shift(nurse, d.index).id == self.shift)
            .flat_map(|d| {
                let from = d.index + length;
                from..(from + self.rest_days as usize).min(horizon)
            })
            .filter(|&d| !roster.is_working(nurse, d))
            .collect()
    }
}
