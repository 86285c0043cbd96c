//! Roster (solution) model.
//!
//! A roster maps every (nurse, day) pair to exactly one shift type,
//! `Off` included. It is produced once per successful solve and is
//! read-only afterwards.

use serde::Serialize;

use super::{Day, Nurse, RosterDomain, ShiftType};
use crate::constraints::{ConstraintSet, Rule};
use crate::error::{RosterError, RosterResult};

/// Label of a mandated rest day after a shift block.
pub const REST_DAY_LABEL: &str = "Rest Day";

/// A decoded schedule: (nurse, day) → shift type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    nurses: Vec<Nurse>,
    days: Vec<Day>,
    shifts: Vec<ShiftType>,
    /// Shift index per cell, nurse-major (`nurse * days + day`).
    grid: Vec<usize>,
}

/// One cell of a roster.
#[derive(Debug, Clone, Copy)]
pub struct RosterEntry<'a> {
    pub nurse: &'a Nurse,
    pub day: &'a Day,
    pub shift: &'a ShiftType,
}

impl Roster {
    /// Creates a roster from a nurse-major grid of shift indices.
    ///
    /// # Errors
    /// `RosterError::MalformedSolution` if the grid size does not match the
    /// domain or a cell references an unknown shift.
    pub fn from_grid(domain: &RosterDomain, grid: Vec<usize>) -> RosterResult<Self> {
        let expected = domain.nurse_count() * domain.day_count();
        if grid.len() != expected {
            return Err(RosterError::MalformedSolution(format!(
                "roster grid has {} cells, expected {expected}",
                grid.len()
            )));
        }
        if let Some(bad) = grid.iter().find(|&&s| s >= domain.shift_count()) {
            return Err(RosterError::MalformedSolution(format!(
                "roster grid references unknown shift index {bad}"
            )));
        }

        Ok(Self {
            nurses: domain.nurses().to_vec(),
            days: domain.days().to_vec(),
            shifts: domain.shifts().to_vec(),
            grid,
        })
    }

    /// Creates a roster from one row of shift ids per nurse.
    ///
    /// # Errors
    /// `RosterError::MalformedSolution` on unknown shift ids or wrong row
    /// lengths.
    pub fn from_shift_ids<S: AsRef<str>>(
        domain: &RosterDomain,
        rows: &[Vec<S>],
    ) -> RosterResult<Self> {
        let mut grid = Vec::with_capacity(domain.nurse_count() * domain.day_count());
        for row in rows {
            if row.len() != domain.day_count() {
                return Err(RosterError::MalformedSolution(format!(
                    "roster row has {} days, expected {}",
                    row.len(),
                    domain.day_count()
                )));
            }
            for id in row {
                let idx = domain.shift_index(id.as_ref()).ok_or_else(|| {
                    RosterError::MalformedSolution(format!("unknown shift '{}'", id.as_ref()))
                })?;
                grid.push(idx);
            }
        }
        Self::from_grid(domain, grid)
    }

    /// Nurses covered by this roster.
    pub fn nurses(&self) -> &[Nurse] {
        &self.nurses
    }

    /// Days covered by this roster.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Shift types referenced by this roster.
    pub fn shifts(&self) -> &[ShiftType] {
        &self.shifts
    }

    /// Shift index assigned to `nurse` on `day`.
    #[inline]
    pub fn shift_index(&self, nurse: usize, day: usize) -> usize {
        self.grid[nurse * self.days.len() + day]
    }

    /// Shift type assigned to `nurse` on `day`.
    #[inline]
    pub fn shift(&self, nurse: usize, day: usize) -> &ShiftType {
        &self.shifts[self.shift_index(nurse, day)]
    }

    /// Shift type assigned to the nurse with the given id.
    pub fn get(&self, nurse_id: &str, day: usize) -> Option<&ShiftType> {
        let nurse = self.nurses.iter().position(|n| n.id == nurse_id)?;
        (day < self.days.len()).then(|| self.shift(nurse, day))
    }

    /// Whether `nurse` holds a working shift on `day`.
    #[inline]
    pub fn is_working(&self, nurse: usize, day: usize) -> bool {
        self.shift(nurse, day).is_active()
    }

    /// The nurse's shifts over the horizon.
    pub fn nurse_schedule(&self, nurse: usize) -> Vec<&ShiftType> {
        (0..self.days.len()).map(|d| self.shift(nurse, d)).collect()
    }

    /// Nurses holding `shift` on `day`.
    pub fn assigned(&self, day: usize, shift: usize) -> Vec<&Nurse> {
        self.nurses
            .iter()
            .enumerate()
            .filter(|&(n, _)| self.shift_index(n, day) == shift)
            .map(|(_, nurse)| nurse)
            .collect()
    }

    /// Number of nurses holding `shift` on `day`.
    pub fn count(&self, day: usize, shift: usize) -> usize {
        (0..self.nurses.len())
            .filter(|&n| self.shift_index(n, day) == shift)
            .count()
    }

    /// Iterates all cells, nurse-major.
    pub fn entries(&self) -> impl Iterator<Item = RosterEntry<'_>> + '_ {
        self.nurses.iter().enumerate().flat_map(move |(n, nurse)| {
            self.days.iter().map(move |day| RosterEntry {
                nurse,
                day,
                shift: self.shift(n, day.index),
            })
        })
    }

    /// Days on which `nurse` rests after a shift block of `constraints`,
    /// ascending.
    pub fn rest_days(&self, nurse: usize, constraints: &ConstraintSet) -> Vec<usize> {
        let mut days: Vec<usize> = constraints
            .rules()
            .iter()
            .filter_map(|rule| match rule {
                Rule::ShiftBlock(block) => Some(block),
                _ => None,
            })
            .flat_map(|block| block.rest_days_in(self, nurse))
            .collect();
        days.sort_unstable();
        days.dedup();
        days
    }

    /// The nurse's schedule as display labels: the shift id, or
    /// [`REST_DAY_LABEL`] on block rest days.
    pub fn schedule_labels(&self, nurse: usize, constraints: &ConstraintSet) -> Vec<&str> {
        let rest = self.rest_days(nurse, constraints);
        (0..self.days.len())
            .map(|d| {
                if rest.binary_search(&d).is_ok() {
                    REST_DAY_LABEL
                } else {
                    self.shift(nurse, d).id.as_str()
                }
            })
            .collect()
    }

    /// Longest run of consecutive working days for `nurse`.
    pub fn longest_streak(&self, nurse: usize) -> usize {
        let mut best = 0;
        let mut run = 0;
        for day in 0..self.days.len() {
            if self.is_working(nurse, day) {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }
        best
    }
}
