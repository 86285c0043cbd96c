//! Input validation for rostering problems.
//!
//! Checks structural integrity of the domain and of the rule parameters
//! before a model is built. Detects:
//! - Empty horizons and nurse lists
//! - Duplicate IDs
//! - Inverted coverage ranges and coverage no staff could meet
//! - Contradictory or degenerate rule parameters
//! - References to unknown shifts, teams, or nurses
//!
//! All problems are collected; callers decide whether to fail once with
//! the full list.

use std::collections::HashSet;

use crate::constraints::{
    ConstraintSet, CountBounds, ExclusionTarget, FairnessScope, Rule, ShiftSelector,
};
use crate::error::RosterError;
use crate::models::{Horizon, Nurse, RosterDomain, ShiftKind, ShiftType, OFF_SHIFT_ID};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The horizon has no days.
    EmptyHorizon,
    /// No nurses were given.
    EmptyNurseList,
    /// Two entities share the same ID.
    DuplicateId,
    /// A coverage range has `min > max`.
    InvalidCoverage,
    /// More than one `Off` shift type.
    AmbiguousOffShift,
    /// A day requires more nurses than exist.
    CoverageExceedsStaff,
    /// A rule parameter is degenerate or contradictory.
    InvalidRuleParameter,
    /// A rule references a shift, team, or nurse that doesn't exist.
    UnknownReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the raw inputs of a [`RosterDomain`].
///
/// Checks:
/// 1. The horizon has at least one day
/// 2. At least one nurse
/// 3. No duplicate nurse IDs
/// 4. No duplicate shift IDs, including a clash with the implicit `Off`
/// 5. No inverted coverage range (weekday or weekend)
/// 6. At most one `Off` shift type
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_domain(nurses: &[Nurse], horizon: &Horizon, shifts: &[ShiftType]) -> ValidationResult {
    let mut errors = Vec::new();

    if horizon.length == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyHorizon,
            "Horizon has no days",
        ));
    }

    if nurses.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyNurseList,
            "No nurses given",
        ));
    }

    let mut nurse_ids = HashSet::new();
    for nurse in nurses {
        if !nurse_ids.insert(nurse.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate nurse ID: {}", nurse.id),
            ));
        }
    }

    let mut shift_ids = HashSet::new();
    for shift in shifts {
        if !shift_ids.insert(shift.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift ID: {}", shift.id),
            ));
        }

        let ranges = std::iter::once(shift.coverage).chain(shift.weekend_coverage);
        for coverage in ranges {
            if let Some(max) = coverage.max.filter(|&max| max < coverage.min) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCoverage,
                    format!(
                        "Shift '{}' requires at least {} but at most {max} nurses",
                        shift.id, coverage.min
                    ),
                ));
            }
        }
    }

    let off_count = shifts.iter().filter(|s| s.kind == ShiftKind::Off).count();
    if off_count > 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::AmbiguousOffShift,
            format!("{off_count} Off shift types given, expected at most one"),
        ));
    }
    if off_count == 0 && shift_ids.contains(OFF_SHIFT_ID) {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateId,
            format!("Working shift uses the reserved ID '{OFF_SHIFT_ID}'"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates rule parameters against a domain.
///
/// Checks:
/// 1. Single assignment, coverage, and rest are present; rest is not
///    empty; no day requires more nurses than exist
/// 2. Consecutive caps and periods are at least one day
/// 3. Fixed fairness bounds are ordered
/// 4. Team-scoped rules have teams to apply to
/// 5. Shift, team, and nurse references resolve
/// 6. Shift blocks name a working shift and last at least one day
pub fn validate_constraints(domain: &RosterDomain, set: &ConstraintSet) -> ValidationResult {
    let mut errors = Vec::new();

    for family in set.missing_required() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidRuleParameter,
            format!("Required rule family '{family}' is missing"),
        ));
    }

    if set.contains("coverage") {
        check_staffing(domain, &mut errors);
    }

    for rule in set.rules() {
        match rule {
            Rule::SingleAssignment | Rule::Coverage => {}
            Rule::Rest(successions) => {
                if successions.is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRuleParameter,
                        "Rest rule has no forbidden successions",
                    ));
                }
                for succession in successions {
                    check_selector(domain, rule, &succession.from, &mut errors);
                    check_selector(domain, rule, &succession.to, &mut errors);
                }
            }
            Rule::ConsecutiveCap(cap) => {
                if cap.max_days == 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRuleParameter,
                        "Consecutive cap must allow at least one day",
                    ));
                }
                check_selector(domain, rule, &cap.shifts, &mut errors);
            }
            Rule::Fairness(fairness) => {
                if let CountBounds::Fixed { min, max } = fairness.bounds {
                    if min > max {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::InvalidRuleParameter,
                            format!("Fairness bounds inverted: min {min} > max {max}"),
                        ));
                    }
                }
                if fairness.scope == FairnessScope::PerTeam && domain.teams().is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRuleParameter,
                        "Team fairness requested but no nurse belongs to a team",
                    ));
                }
                check_selector(domain, rule, &fairness.shifts, &mut errors);
            }
            Rule::PeriodCap(cap) => {
                if cap.period_days == 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRuleParameter,
                        "Period cap must span at least one day",
                    ));
                }
                check_selector(domain, rule, &cap.shifts, &mut errors);
            }
            Rule::TeamDailyLimit { .. } => {
                if domain.teams().is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRuleParameter,
                        "Team daily limit requested but no nurse belongs to a team",
                    ));
                }
            }
            Rule::Exclusion(exclusion) => {
                match &exclusion.target {
                    ExclusionTarget::Team(team) if domain.team(team).is_none() => {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::UnknownReference,
                            format!("Exclusion references unknown team '{team}'"),
                        ));
                    }
                    ExclusionTarget::Nurse(id) if domain.nurse_index(id).is_none() => {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::UnknownReference,
                            format!("Exclusion references unknown nurse '{id}'"),
                        ));
                    }
                    _ => {}
                }
                check_selector(domain, rule, &exclusion.shifts, &mut errors);
            }
            Rule::ShiftBlock(block) => {
                if block.length == 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRuleParameter,
                        format!("Shift block of '{}' has zero length", block.shift),
                    ));
                }
                match domain.shift_index(&block.shift) {
                    None => errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownReference,
                        format!("Shift block references unknown shift '{}'", block.shift),
                    )),
                    Some(s) if s == domain.off_shift() => errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRuleParameter,
                        "Shift block cannot be built on the Off shift",
                    )),
                    Some(_) => {}
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Sum of minimum coverage per day against the staff size.
fn check_staffing(domain: &RosterDomain, errors: &mut Vec<ValidationError>) {
    let staff = domain.nurse_count() as u64;
    for day in domain.days() {
        let required: u64 = domain
            .active_shifts()
            .map(|s| u64::from(domain.shifts()[s].coverage_on(day).min))
            .sum();
        if required > staff {
            errors.push(ValidationError::new(
                ValidationErrorKind::CoverageExceedsStaff,
                format!(
                    "Day {} ({}) requires {required} nurses but only {staff} exist",
                    day.index,
                    day.weekday.name()
                ),
            ));
        }
    }
}

fn check_selector(
    domain: &RosterDomain,
    rule: &Rule,
    selector: &ShiftSelector,
    errors: &mut Vec<ValidationError>,
) {
    for id in selector.unknown_ids(domain) {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnknownReference,
            format!("Rule '{}' references unknown shift '{id}'", rule.name()),
        ));
    }
}

/// Folds collected validation errors into one configuration error.
pub(crate) fn into_configuration_error(errors: Vec<ValidationError>) -> RosterError {
    RosterError::Configuration(
        errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{
        ConsecutiveCap, FairnessRule, PeriodCap, ShiftBlock, ShiftExclusion,
    };
    use crate::models::{Coverage, Weekday};

    fn staff(n: usize) -> Vec<Nurse> {
        (0..n).map(|i| Nurse::new(format!("N{i}"))).collect()
    }

    fn day_night() -> Vec<ShiftType> {
        vec![ShiftType::day("Day", 1), ShiftType::night("Night", 1)]
    }

    fn domain(n: usize) -> RosterDomain {
        RosterDomain::new(staff(n), Horizon::new(7), day_night()).unwrap()
    }

    fn kinds(errors: &[ValidationError]) -> Vec<ValidationErrorKind> {
        errors.iter().map(|e| e.kind.clone()).collect()
    }

    #[test]
    fn test_valid_domain() {
        assert!(validate_domain(&staff(3), &Horizon::new(7), &day_night()).is_ok());
    }

    #[test]
    fn test_empty_horizon_and_staff() {
        let errors = validate_domain(&[], &Horizon::new(0), &day_night()).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![ValidationErrorKind::EmptyHorizon, ValidationErrorKind::EmptyNurseList]
        );
    }

    #[test]
    fn test_duplicate_nurse_id() {
        let nurses = vec![Nurse::new("1"), Nurse::new("1")];
        let errors = validate_domain(&nurses, &Horizon::new(7), &day_night()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("nurse")));
    }

    #[test]
    fn test_duplicate_shift_id() {
        let shifts = vec![ShiftType::day("Day", 1), ShiftType::night("Day", 1)];
        let errors = validate_domain(&staff(2), &Horizon::new(7), &shifts).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("shift")));
    }

    #[test]
    fn test_reserved_off_id() {
        let shifts = vec![ShiftType::day(OFF_SHIFT_ID, 1)];
        let errors = validate_domain(&staff(2), &Horizon::new(7), &shifts).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::DuplicateId]);
    }

    #[test]
    fn test_inverted_coverage() {
        let shifts = vec![
            ShiftType::day("Day", 1).with_coverage(Coverage::range(3, 1)),
            ShiftType::night("Night", 1).with_weekend_coverage(Coverage::range(2, 0)),
        ];
        let errors = validate_domain(&staff(4), &Horizon::new(7), &shifts).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidCoverage));
    }

    #[test]
    fn test_two_off_shifts() {
        let mut second = ShiftType::off();
        second.id = "Leave".into();
        let shifts = vec![ShiftType::day("Day", 1), ShiftType::off(), second];
        let errors = validate_domain(&staff(2), &Horizon::new(7), &shifts).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::AmbiguousOffShift]);
    }

    #[test]
    fn test_default_constraints_valid() {
        assert!(validate_constraints(&domain(3), &ConstraintSet::new()).is_ok());
    }

    #[test]
    fn test_coverage_exceeds_staff() {
        let errors = validate_constraints(&domain(1), &ConstraintSet::new()).unwrap_err();
        assert_eq!(errors.len(), 7);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::CoverageExceedsStaff));
    }

    #[test]
    fn test_weekend_coverage_exceeds_staff() {
        let shifts = vec![ShiftType::day("Day", 1).with_weekend_coverage(Coverage::exact(3))];
        let d = RosterDomain::new(staff(2), Horizon::new(7), shifts).unwrap();
        let errors = validate_constraints(&d, &ConstraintSet::new()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("Saturday"));
    }

    #[test]
    fn test_degenerate_parameters() {
        let set = ConstraintSet::new()
            .with_rule(Rule::ConsecutiveCap(ConsecutiveCap::working_days(0)))
            .with_fairness(FairnessRule::per_nurse(CountBounds::Fixed { min: 4, max: 2 }))
            .with_period_cap(PeriodCap {
                period_days: 0,
                max_shifts: 1,
                shifts: ShiftSelector::Active,
            })
            .with_shift_block(ShiftBlock::new("Night", Weekday::Monday, 0, 2));
        let errors = validate_constraints(&domain(3), &set).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidRuleParameter));
    }

    #[test]
    fn test_required_families_missing() {
        let set: ConstraintSet =
            serde_json::from_str(r#"{"rules":["SingleAssignment"]}"#).unwrap();
        let errors = validate_constraints(&domain(3), &set).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("'coverage'"));
        assert!(errors[1].message.contains("'rest'"));
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidRuleParameter));
    }

    #[test]
    fn test_empty_rest_rule() {
        let set = ConstraintSet::new().with_rest_rules(Vec::new());
        let errors = validate_constraints(&domain(3), &set).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidRuleParameter]);
    }

    #[test]
    fn test_team_daily_limit_without_teams() {
        let set = ConstraintSet::new().with_team_daily_limit(1);
        let errors = validate_constraints(&domain(3), &set).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidRuleParameter]);
    }

    #[test]
    fn test_team_fairness_without_teams() {
        let set = ConstraintSet::new()
            .with_fairness(FairnessRule::per_team(CountBounds::Even { tolerance: 1 }));
        let errors = validate_constraints(&domain(3), &set).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidRuleParameter]);
    }

    #[test]
    fn test_unknown_references() {
        let set = ConstraintSet::new()
            .with_exclusion(ShiftExclusion::team("Z", ShiftSelector::ids(["Late"])))
            .with_exclusion(ShiftExclusion::nurse("ghost", ShiftSelector::Active))
            .with_shift_block(ShiftBlock::new("Early", Weekday::Monday, 3, 2));
        let errors = validate_constraints(&domain(3), &set).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::UnknownReference));
    }

    #[test]
    fn test_block_on_off_shift() {
        let set = ConstraintSet::new()
            .with_shift_block(ShiftBlock::new(OFF_SHIFT_ID, Weekday::Monday, 2, 0));
        let errors = validate_constraints(&domain(3), &set).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidRuleParameter]);
    }

    #[test]
    fn test_configuration_error_joins_messages() {
        let errors = validate_domain(&[], &Horizon::new(0), &day_night()).unwrap_err();
        match into_configuration_error(errors) {
            RosterError::Configuration(msg) => {
                assert_eq!(msg, "Horizon has no days; No nurses given");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
