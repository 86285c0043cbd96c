//! Roster objectives.

use serde::{Deserialize, Serialize};

use super::AssignmentVars;
use crate::constraints::{DayFilter, ShiftSelector};
use crate::cp::Objective;
use crate::error::{RosterError, RosterResult};
use crate::models::RosterDomain;

/// A weighted wish of one nurse.
///
/// Every matching assignment adds `weight` to the minimised cost:
/// positive weights penalise, negative weights reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPreference {
    pub nurse_id: String,
    pub shifts: ShiftSelector,
    #[serde(default)]
    pub days: DayFilter,
    pub weight: i64,
}

impl ShiftPreference {
    /// Penalises `nurse_id` working `shifts` by `weight` per day.
    pub fn avoid(nurse_id: impl Into<String>, shifts: ShiftSelector, weight: i64) -> Self {
        Self {
            nurse_id: nurse_id.into(),
            shifts,
            days: DayFilter::All,
            weight: weight.abs(),
        }
    }

    /// Rewards `nurse_id` working `shifts` by `weight` per day.
    pub fn prefer(nurse_id: impl Into<String>, shifts: ShiftSelector, weight: i64) -> Self {
        Self {
            weight: -weight.abs(),
            ..Self::avoid(nurse_id, shifts, weight)
        }
    }

    /// Restricts the preference to some days.
    pub fn on_days(mut self, days: DayFilter) -> Self {
        self.days = days;
        self
    }
}

/// What the solver optimises once all rules hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterObjective {
    /// Minimise the total weight of matched preferences.
    Preferences(Vec<ShiftPreference>),
}

impl RosterObjective {
    /// Linear objective over `vars`.
    ///
    /// # Errors
    /// `RosterError::Configuration` if a preference names an unknown nurse
    /// or shift.
    pub fn to_objective(
        &self,
        vars: &AssignmentVars,
        domain: &RosterDomain,
    ) -> RosterResult<Objective> {
        match self {
            Self::Preferences(preferences) => {
                let mut terms = Vec::new();
                for pref in preferences {
                    let nurse = domain.nurse_index(&pref.nurse_id).ok_or_else(|| {
                        RosterError::Configuration(format!(
                            "preference references unknown nurse '{}'",
                            pref.nurse_id
                        ))
                    })?;
                    if let Some(id) = pref.shifts.unknown_ids(domain).first() {
                        return Err(RosterError::Configuration(format!(
                            "preference of nurse '{}' references unknown shift '{id}'",
                            pref.nurse_id
                        )));
                    }
                    if pref.weight == 0 {
                        continue;
                    }

                    let shifts = pref.shifts.resolve(domain);
                    let days = pref.days.days(domain);
                    terms.extend(
                        vars.block(&[nurse], &days, &shifts)
                            .into_iter()
                            .map(|var| (var, pref.weight)),
                    );
                }
                Ok(Objective::Minimize { terms })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::CpModel;
    use crate::models::{Horizon, Nurse, ShiftKind, ShiftType};

    fn setup() -> (RosterDomain, AssignmentVars) {
        let domain = RosterDomain::new(
            vec![Nurse::new("1"), Nurse::new("2")],
            Horizon::new(7),
            vec![ShiftType::day("Day", 1), ShiftType::night("Night", 1)],
        )
        .unwrap();
        let mut model = CpModel::new("test");
        let vars = AssignmentVars::create(&mut model, &domain);
        (domain, vars)
    }

    #[test]
    fn test_preference_terms() {
        let (domain, vars) = setup();
        let objective = RosterObjective::Preferences(vec![
            ShiftPreference::avoid("1", ShiftSelector::Kind(ShiftKind::Night), 5)
                .on_days(DayFilter::Weekends),
            ShiftPreference::prefer("2", ShiftSelector::ids(["Day"]), 2),
        ])
        .to_objective(&vars, &domain)
        .unwrap();

        let terms = objective.terms();
        assert_eq!(terms.len(), 2 + 7);
        assert_eq!(terms[0], (vars.get(0, 5, 1), 5));
        assert_eq!(terms[2], (vars.get(1, 0, 0), -2));
    }

    #[test]
    fn test_zero_weight_skipped() {
        let (domain, vars) = setup();
        let objective = RosterObjective::Preferences(vec![ShiftPreference::avoid(
            "1",
            ShiftSelector::Active,
            0,
        )])
        .to_objective(&vars, &domain)
        .unwrap();
        assert!(objective.terms().is_empty());
    }

    #[test]
    fn test_unknown_references() {
        let (domain, vars) = setup();
        let unknown_nurse =
            RosterObjective::Preferences(vec![ShiftPreference::avoid("9", ShiftSelector::Active, 1)]);
        assert!(matches!(
            unknown_nurse.to_objective(&vars, &domain),
            Err(RosterError::Configuration(_))
        ));

        let unknown_shift = RosterObjective::Preferences(vec![ShiftPreference::avoid(
            "1",
            ShiftSelector::ids(["Late"]),
            1,
        )]);
        assert!(matches!(
            unknown_shift.to_objective(&vars, &domain),
            Err(RosterError::Configuration(_))
        ));
    }
}
