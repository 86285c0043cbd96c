//! Roster domain: the static problem description.
//!
//! Bundles the nurse list, the horizon days, and the shift types into a
//! single immutable value that every rule family and the model builder
//! read from. Construction validates the input and appends the `Off`
//! shift type when the caller did not supply one.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Day, Horizon, Nurse, ShiftKind, ShiftType, Team};
use crate::error::RosterResult;
use crate::validation::{into_configuration_error, validate_domain};

/// The nurses, days, and shift types of one rostering problem.
#[derive(Debug, Clone, Serialize)]
pub struct RosterDomain {
    nurses: Vec<Nurse>,
    horizon: Horizon,
    days: Vec<Day>,
    shifts: Vec<ShiftType>,
    off_shift: usize,
}

impl RosterDomain {
    /// Builds a domain from an ordered nurse list, a horizon, and shift types.
    ///
    /// # Errors
    /// `RosterError::Configuration` if the horizon is empty, no nurses are
    /// given, ids are duplicated, a coverage range is inverted, or more than
    /// one `Off` shift type is supplied.
    pub fn new(
        nurses: Vec<Nurse>,
        horizon: Horizon,
        shifts: Vec<ShiftType>,
    ) -> RosterResult<Self> {
        validate_domain(&nurses, &horizon, &shifts).map_err(into_configuration_error)?;

        let mut shifts = shifts;
        let off_shift = match shifts.iter().position(|s| s.kind == ShiftKind::Off) {
            Some(idx) => idx,
            None => {
                shifts.push(ShiftType::off());
                shifts.len() - 1
            }
        };

        Ok(Self {
            nurses,
            days: horizon.days(),
            horizon,
            shifts,
            off_shift,
        })
    }

    /// Nurses in input order.
    pub fn nurses(&self) -> &[Nurse] {
        &self.nurses
    }

    /// Horizon days.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Shift types, `Off` included.
    pub fn shifts(&self) -> &[ShiftType] {
        &self.shifts
    }

    /// The planning horizon.
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Number of nurses.
    #[inline]
    pub fn nurse_count(&self) -> usize {
        self.nurses.len()
    }

    /// Number of days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of shift types (including `Off`).
    #[inline]
    pub fn shift_count(&self) -> usize {
        self.shifts.len()
    }

    /// Index of the `Off` shift type.
    #[inline]
    pub fn off_shift(&self) -> usize {
        self.off_shift
    }

    /// Indices of working shift types.
    pub fn active_shifts(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.shifts.len()).filter(move |&s| s != self.off_shift)
    }

    /// Indices of shift types of the given kind.
    pub fn shifts_of_kind(&self, kind: ShiftKind) -> Vec<usize> {
        self.shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Looks up a nurse index by id.
    pub fn nurse_index(&self, id: &str) -> Option<usize> {
        self.nurses.iter().position(|n| n.id == id)
    }

    /// Looks up a shift index by id.
    pub fn shift_index(&self, id: &str) -> Option<usize> {
        self.shifts.iter().position(|s| s.id == id)
    }

    /// Teams derived from nurse affiliations, ordered by name.
    ///
    /// Nurses without a team do not appear in any team.
    pub fn teams(&self) -> Vec<Team> {
        let mut by_name: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, nurse) in self.nurses.iter().enumerate() {
            if let Some(team) = nurse.team.as_deref() {
                by_name.entry(team).or_default().push(idx);
            }
        }
        by_name
            .into_iter()
            .map(|(name, members)| Team {
                name: name.to_string(),
                members,
            })
            .collect()
    }

    /// Finds a team by name.
    pub fn team(&self, name: &str) -> Option<Team> {
        self.teams().into_iter().find(|t| t.name == name)
    }
}
