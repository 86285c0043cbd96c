//! Constraint library.
//!
//! Each rostering rule family is a pure function from the variable space,
//! the domain, and its parameters to a list of relations. A [`Rule`] names
//! one enabled family with its parameters; a [`ConstraintSet`] is the
//! ordered list of rules a model is built from.
//!
//! # Families
//!
//! | Family | Relation |
//! |--------|----------|
//! | single assignment | Σ_s x[n,d,s] = 1 |
//! | coverage | min ≤ Σ_n x[n,d,s] ≤ max |
//! | rest | x[n,d,from] ⇒ ¬x[n,d+1,to] |
//! | consecutive cap | Σ over K+1 days ≤ K |
//! | fairness | min ≤ Σ over group, days, shifts ≤ max |
//! | period cap | Σ over each period ≤ M |
//! | team daily limit | Σ over team members ≤ L |
//! | exclusion | Σ over target, shifts = 0 |
//! | shift block | x[n,d,s] = x[n,d+o,s], x[n,d,s] ⇒ x[n,d+len+r,Off] |
//!
//! # Reference
//! Burke et al. (2004), "The State of the Art of Nurse Rostering"

pub mod library;
mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::AssignmentVars;
use crate::cp::Relation;
use crate::models::RosterDomain;

pub use rules::{
    ConsecutiveCap, CountBounds, DayFilter, ExclusionTarget, FairnessRule, FairnessScope,
    ForbiddenSuccession, PeriodCap, ShiftBlock, ShiftExclusion, ShiftSelector,
};

/// Families every constraint set must contain.
pub const REQUIRED_FAMILIES: [&str; 3] = ["single_assignment", "coverage", "rest"];

/// One enabled rule family with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Exactly one shift type per nurse per day.
    SingleAssignment,
    /// Every working shift staffed within its coverage.
    Coverage,
    /// Forbidden successions on adjacent days.
    Rest(Vec<ForbiddenSuccession>),
    /// Maximum consecutive days on some shifts.
    ConsecutiveCap(ConsecutiveCap),
    /// Count bounds per nurse or team.
    Fairness(FairnessRule),
    /// Maximum shifts per period.
    PeriodCap(PeriodCap),
    /// Maximum working members of one team per day.
    TeamDailyLimit { max_per_team: u32 },
    /// Shifts a team or nurse never works.
    Exclusion(ShiftExclusion),
    /// Block rostering with trailing rest days.
    ShiftBlock(ShiftBlock),
}

impl Rule {
    /// Family name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SingleAssignment => "single_assignment",
            Self::Coverage => "coverage",
            Self::Rest(_) => "rest",
            Self::ConsecutiveCap(_) => "consecutive_cap",
            Self::Fairness(_) => "fairness",
            Self::PeriodCap(_) => "period_cap",
            Self::TeamDailyLimit { .. } => "team_daily_limit",
            Self::Exclusion(_) => "exclusion",
            Self::ShiftBlock(_) => "shift_block",
        }
    }

    /// Whether the rule belongs to the families every roster needs.
    pub fn is_required(&self) -> bool {
        REQUIRED_FAMILIES.contains(&self.name())
    }

    /// Relations of this rule over `vars`.
    pub fn relations(&self, vars: &AssignmentVars, domain: &RosterDomain) -> Vec<Relation> {
        match self {
            Self::SingleAssignment => library::single_assignment(vars, domain),
            Self::Coverage => library::coverage(vars, domain),
            Self::Rest(successions) => library::rest(vars, domain, successions),
            Self::ConsecutiveCap(cap) => library::consecutive_cap(vars, domain, cap),
            Self::Fairness(rule) => library::fairness(vars, domain, rule),
            Self::PeriodCap(cap) => library::period_cap(vars, domain, cap),
            Self::TeamDailyLimit { max_per_team } => {
                library::team_daily_limit(vars, domain, *max_per_team)
            }
            Self::Exclusion(exclusion) => library::exclusion(vars, domain, exclusion),
            Self::ShiftBlock(block) => library::shift_block(vars, domain, block),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest(successions) => write!(f, "rest({} successions)", successions.len()),
            Self::ConsecutiveCap(cap) => write!(f, "consecutive_cap(K={})", cap.max_days),
            Self::Fairness(rule) => match rule.bounds {
                CountBounds::Fixed { min, max } => {
                    write!(f, "fairness({:?}, {min}..={max})", rule.scope)
                }
                CountBounds::Even { tolerance } => {
                    write!(f, "fairness({:?}, even±{tolerance})", rule.scope)
                }
            },
            Self::PeriodCap(cap) => {
                write!(f, "period_cap({} per {} days)", cap.max_shifts, cap.period_days)
            }
            Self::TeamDailyLimit { max_per_team } => write!(f, "team_daily_limit({max_per_team})"),
            Self::Exclusion(exclusion) => match &exclusion.target {
                ExclusionTarget::Team(team) => write!(f, "exclusion(team {team})"),
                ExclusionTarget::Nurse(nurse) => write!(f, "exclusion(nurse {nurse})"),
            },
            Self::ShiftBlock(block) => write!(
                f,
                "shift_block({} from {} x{}, rest {})",
                block.shift,
                block.start.name(),
                block.length,
                block.rest_days
            ),
            other => f.write_str(other.name()),
        }
    }
}

/// Ordered list of enabled rules.
///
/// # Example
///
/// ```
/// use u_roster::constraints::ConstraintSet;
///
/// let set = ConstraintSet::new().with_consecutive_cap(5);
/// assert_eq!(set.rules().len(), 4);
/// assert_eq!(set.summary(), "single_assignment, coverage, rest(1 successions), consecutive_cap(K=5)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    rules: Vec<Rule>,
}

impl ConstraintSet {
    /// Required families: single assignment, coverage, no day after night.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Rule::SingleAssignment,
                Rule::Coverage,
                Rule::Rest(vec![ForbiddenSuccession::night_then_day()]),
            ],
        }
    }

    /// Replaces the rest rule with custom successions.
    ///
    /// The list must not be empty; validation rejects a rest rule without
    /// successions.
    pub fn with_rest_rules(mut self, successions: Vec<ForbiddenSuccession>) -> Self {
        self.rules.retain(|r| !matches!(r, Rule::Rest(_)));
        self.rules.push(Rule::Rest(successions));
        self
    }

    /// Caps consecutive working days at `max_days`.
    pub fn with_consecutive_cap(self, max_days: u32) -> Self {
        self.with_rule(Rule::ConsecutiveCap(ConsecutiveCap::working_days(max_days)))
    }

    pub fn with_fairness(self, rule: FairnessRule) -> Self {
        self.with_rule(Rule::Fairness(rule))
    }

    pub fn with_period_cap(self, cap: PeriodCap) -> Self {
        self.with_rule(Rule::PeriodCap(cap))
    }

    pub fn with_team_daily_limit(self, max_per_team: u32) -> Self {
        self.with_rule(Rule::TeamDailyLimit { max_per_team })
    }

    pub fn with_exclusion(self, exclusion: ShiftExclusion) -> Self {
        self.with_rule(Rule::Exclusion(exclusion))
    }

    pub fn with_shift_block(self, block: ShiftBlock) -> Self {
        self.with_rule(Rule::ShiftBlock(block))
    }

    /// Appends any rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Removes every rule of the named family.
    ///
    /// Required families (single assignment, coverage, rest) cannot be
    /// removed; customise rest with [`with_rest_rules`](Self::with_rest_rules).
    pub fn without(mut self, family: &str) -> Self {
        self.rules.retain(|r| r.is_required() || r.name() != family);
        self
    }

    /// Enabled rules in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Required families absent from the set.
    ///
    /// Only possible for sets assembled through serde.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FAMILIES
            .into_iter()
            .filter(|family| !self.contains(family))
            .collect()
    }

    /// Whether a rule of the named family is enabled.
    pub fn contains(&self, family: &str) -> bool {
        self.rules.iter().any(|r| r.name() == family)
    }

    /// One-line description of the enabled rules.
    pub fn summary(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::CpModel;
    use crate::models::{Horizon, Nurse, ShiftKind, ShiftType, Weekday};

    #[test]
    fn test_default_families() {
        let set = ConstraintSet::default();
        let names: Vec<_> = set.rules().iter().map(Rule::name).collect();
        assert_eq!(names, vec!["single_assignment", "coverage", "rest"]);
    }

    #[test]
    fn test_builder_appends_in_order() {
        let set = ConstraintSet::new()
            .with_consecutive_cap(3)
            .with_period_cap(PeriodCap::weekly(4))
            .with_team_daily_limit(1)
            .with_exclusion(ShiftExclusion::team("A", ShiftSelector::ids(["Day"])))
            .with_shift_block(ShiftBlock::new("Night", Weekday::Monday, 3, 2))
            .with_fairness(FairnessRule::per_nurse(CountBounds::Even { tolerance: 1 }));
        let names: Vec<_> = set.rules().iter().map(Rule::name).collect();
        assert_eq!(
            names,
            vec![
                "single_assignment",
                "coverage",
                "rest",
                "consecutive_cap",
                "period_cap",
                "team_daily_limit",
                "exclusion",
                "shift_block",
                "fairness"
            ]
        );
    }

    #[test]
    fn test_without_keeps_required() {
        let set = ConstraintSet::new()
            .with_consecutive_cap(3)
            .without("rest")
            .without("consecutive_cap")
            .without("coverage");
        assert!(!set.contains("consecutive_cap"));
        assert!(set.contains("rest"));
        assert!(set.contains("coverage"));
        assert!(set.contains("single_assignment"));
        assert!(set.missing_required().is_empty());
    }

    #[test]
    fn test_missing_required_after_json() {
        let set: ConstraintSet = serde_json::from_str(r#"{"rules":["SingleAssignment"]}"#).unwrap();
        assert_eq!(set.missing_required(), vec!["coverage", "rest"]);
    }

    #[test]
    fn test_with_rest_rules_replaces() {
        let set = ConstraintSet::new().with_rest_rules(vec![ForbiddenSuccession::new(
            ShiftSelector::Kind(ShiftKind::Night),
            ShiftSelector::Active,
        )]);
        let rests: Vec<_> = set
            .rules()
            .iter()
            .filter(|r| matches!(r, Rule::Rest(_)))
            .collect();
        assert_eq!(rests.len(), 1);
    }

    #[test]
    fn test_rule_relations_dispatch() {
        let domain = RosterDomain::new(
            vec![Nurse::new("1"), Nurse::new("2")],
            Horizon::new(3),
            vec![ShiftType::day("Day", 1), ShiftType::night("Night", 1)],
        )
        .unwrap();
        let mut model = CpModel::new("test");
        let vars = AssignmentVars::create(&mut model, &domain);

        assert_eq!(Rule::SingleAssignment.relations(&vars, &domain).len(), 6);
        assert_eq!(Rule::Coverage.relations(&vars, &domain).len(), 6);
        assert_eq!(
            Rule::ConsecutiveCap(ConsecutiveCap::working_days(1))
                .relations(&vars, &domain)
                .len(),
            4
        );
    }

    #[test]
    fn test_summary_and_display() {
        let set = ConstraintSet::new()
            .with_fairness(FairnessRule::per_team(CountBounds::Fixed { min: 1, max: 3 }))
            .with_team_daily_limit(2);
        assert_eq!(
            set.summary(),
            "single_assignment, coverage, rest(1 successions), fairness(PerTeam, 1..=3), team_daily_limit(2)"
        );
    }

    #[test]
    fn test_constraint_set_json() {
        let set = ConstraintSet::new()
            .with_consecutive_cap(5)
            .with_exclusion(ShiftExclusion::nurse("7", ShiftSelector::Kind(ShiftKind::Night)));
        let json = serde_json::to_string(&set).unwrap();
        let back: ConstraintSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
