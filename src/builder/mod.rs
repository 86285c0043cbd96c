//! CP-based rostering formulation.
//!
//! Bridges the rostering domain to the CP modelling layer. Builds a
//! [`CpModel`] from a domain, a constraint set, and an optional
//! objective, submits it to a [`CpSolver`], and decodes the answer into
//! a [`Roster`].
//!
//! # Reference
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming", Ch. 22

mod objective;
mod variables;

use tracing::{debug, info, warn};

pub use objective::{RosterObjective, ShiftPreference};
pub use variables::AssignmentVars;

use crate::constraints::ConstraintSet;
use crate::cp::{CpModel, CpSolution, CpSolver, SolverConfig, SolverStatus};
use crate::error::{RosterError, RosterResult};
use crate::models::{Roster, RosterDomain};
use crate::validation::{into_configuration_error, validate_constraints};

/// A built model together with its variable space.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub model: CpModel,
    pub vars: AssignmentVars,
}

/// Builds a CP model from a rostering domain.
///
/// # Example
/// ```
/// use u_roster::builder::RosterCpBuilder;
/// use u_roster::constraints::ConstraintSet;
/// use u_roster::cp::{BacktrackingSolver, SolverConfig};
/// use u_roster::models::{Horizon, Nurse, RosterDomain, ShiftType};
///
/// let domain = RosterDomain::new(
///     vec![Nurse::new("1"), Nurse::new("2"), Nurse::new("3")],
///     Horizon::new(7),
///     vec![ShiftType::day("Day", 1), ShiftType::night("Night", 1)],
/// )
/// .unwrap();
///
/// let roster = RosterCpBuilder::new(&domain)
///     .with_constraints(ConstraintSet::new())
///     .solve(&BacktrackingSolver::new(), &SolverConfig::default())
///     .unwrap();
/// assert_eq!(roster.count(0, 0), 1);
/// ```
pub struct RosterCpBuilder<'a> {
    domain: &'a RosterDomain,
    constraints: ConstraintSet,
    objective: Option<RosterObjective>,
}

impl<'a> RosterCpBuilder<'a> {
    /// Creates a builder with the required rule families.
    pub fn new(domain: &'a RosterDomain) -> Self {
        Self {
            domain,
            constraints: ConstraintSet::new(),
            objective: None,
        }
    }

    /// Replaces the constraint set.
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the objective. Without one the first feasible roster is returned.
    pub fn with_objective(mut self, objective: RosterObjective) -> Self {
        self.objective = Some(objective);
        self
    }

    /// The active constraint set.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Builds the CP model.
    ///
    /// Creates:
    /// - One boolean per (nurse, day, shift)
    /// - The relations of every enabled rule, in set order
    /// - The objective, if any
    /// - A day-major decision order hint
    ///
    /// # Errors
    /// `RosterError::Configuration` if rule parameters or the objective do
    /// not fit the domain.
    pub fn build(&self) -> RosterResult<RosterModel> {
        validate_constraints(self.domain, &self.constraints).map_err(into_configuration_error)?;

        let mut model = CpModel::new("nurse_roster");
        let vars = AssignmentVars::create(&mut model, self.domain);

        for rule in self.constraints.rules() {
            let relations = rule.relations(&vars, self.domain);
            debug!(rule = %rule, relations = relations.len(), "rule added");
            model.add_relations(relations);
        }

        if let Some(objective) = &self.objective {
            model.set_objective(objective.to_objective(&vars, self.domain)?);
        }
        model.set_decision_order(vars.day_major());

        info!(
            nurses = self.domain.nurse_count(),
            days = self.domain.day_count(),
            shifts = self.domain.shift_count(),
            variables = model.var_count(),
            relations = model.relation_count(),
            "roster model built"
        );

        Ok(RosterModel { model, vars })
    }

    /// Builds, solves, and decodes.
    ///
    /// # Errors
    /// - `Configuration` for invalid parameters or a model the engine rejects
    /// - `InfeasibleModel` when no roster satisfies the rules
    /// - `SolverTimeout` when the budget runs out without an answer
    /// - `MalformedSolution` when the engine's assignment is not a roster
    pub fn solve<S: CpSolver>(&self, solver: &S, config: &SolverConfig) -> RosterResult<Roster> {
        let RosterModel { model, vars } = self.build()?;

        info!(
            time_limit_ms = config.time_limit_ms,
            node_limit = ?config.node_limit,
            "submitting roster model"
        );
        let solution = solver.solve(&model, config);
        info!(
            status = ?solution.status,
            objective = ?solution.objective_value,
            elapsed_ms = solution.solve_time_ms,
            nodes = solution.nodes,
            "solver finished"
        );

        match solution.status {
            SolverStatus::Optimal | SolverStatus::Feasible => {
                self.decode_solution(&vars, &solution)
            }
            SolverStatus::Infeasible => {
                let summary = self.constraints.summary();
                warn!(constraints = %summary, "roster model infeasible");
                Err(RosterError::InfeasibleModel {
                    summary,
                    constraints: Box::new(self.constraints.clone()),
                })
            }
            SolverStatus::Timeout | SolverStatus::Unknown => {
                warn!(elapsed_ms = solution.solve_time_ms, "solver gave no answer within budget");
                Err(RosterError::SolverTimeout {
                    elapsed_ms: solution.solve_time_ms,
                })
            }
            SolverStatus::ModelInvalid => Err(RosterError::Configuration(
                "solver rejected the roster model".into(),
            )),
        }
    }

    /// Decodes a CP solution into a roster.
    ///
    /// Each (nurse, day) must have exactly one true shift variable.
    fn decode_solution(&self, vars: &AssignmentVars, solution: &CpSolution) -> RosterResult<Roster> {
        let mut grid = Vec::with_capacity(vars.nurse_count() * vars.day_count());
        for n in 0..vars.nurse_count() {
            for d in 0..vars.day_count() {
                let mut held = (0..vars.shift_count())
                    .filter(|&s| solution.value(vars.get(n, d, s)) == Some(true));
                match (held.next(), held.next()) {
                    (Some(s), None) => grid.push(s),
                    (None, _) => {
                        return Err(RosterError::MalformedSolution(format!(
                            "nurse {} holds no shift on day {d}",
                            self.domain.nurses()[n].id
                        )))
                    }
                    (Some(_), Some(_)) => {
                        return Err(RosterError::MalformedSolution(format!(
                            "nurse {} holds several shifts on day {d}",
                            self.domain.nurses()[n].id
                        )))
                    }
                }
            }
        }
        Roster::from_grid(self.domain, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{CountBounds, FairnessRule};
    use crate::cp::BacktrackingSolver;
    use crate::models::{Horizon, Nurse, ShiftType};

    fn domain(nurses: usize, days: usize) -> RosterDomain {
        RosterDomain::new(
            (0..nurses).map(|i| Nurse::new(format!("{i}"))).collect(),
            Horizon::new(days),
            vec![ShiftType::day("Day", 1), ShiftType::night("Night", 1)],
        )
        .unwrap()
    }

    /// Replays a fixed answer regardless of the model.
    struct FixedSolver(CpSolution);

    impl CpSolver for FixedSolver {
        fn solve(&self, _model: &CpModel, _config: &SolverConfig) -> CpSolution {
            self.0.clone()
        }
    }

    #[test]
    fn test_build_counts() {
        let d = domain(3, 7);
        let built = RosterCpBuilder::new(&d).build().unwrap();
        assert_eq!(built.model.var_count(), 3 * 7 * 3);
        // single assignment 21, coverage 14, rest 3 nurses × 6 day pairs
        assert_eq!(built.model.relation_count(), 21 + 14 + 18);
        assert!(built.model.objective.is_none());
        assert_eq!(
            built.model.decision_order.as_ref().map(Vec::len),
            Some(3 * 7 * 3)
        );
    }

    #[test]
    fn test_build_rejects_understaffed() {
        let d = domain(1, 3);
        let err = RosterCpBuilder::new(&d).build().unwrap_err();
        assert!(matches!(err, RosterError::Configuration(_)));
    }

    #[test]
    fn test_loaded_set_without_coverage_rejected() {
        let d = domain(3, 3);
        let set: ConstraintSet =
            serde_json::from_str(r#"{"rules":["SingleAssignment"]}"#).unwrap();
        let err = RosterCpBuilder::new(&d)
            .with_constraints(set)
            .solve(&BacktrackingSolver::new(), &SolverConfig::default())
            .unwrap_err();
        match err {
            RosterError::Configuration(msg) => assert!(msg.contains("'coverage'")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_solve_small() {
        let d = domain(3, 3);
        let roster = RosterCpBuilder::new(&d)
            .solve(&BacktrackingSolver::new(), &SolverConfig::default())
            .unwrap();
        for day in 0..3 {
            assert_eq!(roster.count(day, 0), 1);
            assert_eq!(roster.count(day, 1), 1);
            assert_eq!(roster.count(day, 2), 1);
        }
    }

    #[test]
    fn test_infeasible_carries_constraints() {
        let d = domain(2, 2);
        // Coverage needs 4 working shifts, fairness allows at most 1 each.
        let set = ConstraintSet::new()
            .with_fairness(FairnessRule::per_nurse(CountBounds::Fixed { min: 0, max: 1 }));
        let err = RosterCpBuilder::new(&d)
            .with_constraints(set.clone())
            .solve(&BacktrackingSolver::new(), &SolverConfig::default())
            .unwrap_err();
        match err {
            RosterError::InfeasibleModel {
                summary,
                constraints,
            } => {
                assert!(summary.contains("fairness"));
                assert_eq!(*constraints, set);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_timeout_status() {
        let d = domain(2, 2);
        let mut timeout = CpSolution::empty(SolverStatus::Timeout);
        timeout.solve_time_ms = 42;
        let err = RosterCpBuilder::new(&d)
            .solve(&FixedSolver(timeout), &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, RosterError::SolverTimeout { elapsed_ms: 42 }));
    }

    #[test]
    fn test_unknown_status_is_timeout() {
        let d = domain(2, 2);
        let err = RosterCpBuilder::new(&d)
            .solve(
                &FixedSolver(CpSolution::empty(SolverStatus::Unknown)),
                &SolverConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RosterError::SolverTimeout { .. }));
    }

    #[test]
    fn test_model_invalid_is_configuration() {
        let d = domain(2, 2);
        let err = RosterCpBuilder::new(&d)
            .solve(
                &FixedSolver(CpSolution::empty(SolverStatus::ModelInvalid)),
                &SolverConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RosterError::Configuration(_)));
    }

    #[test]
    fn test_malformed_solution() {
        let d = domain(2, 2);
        // Claims success but every variable is true.
        let mut bogus = CpSolution::empty(SolverStatus::Feasible);
        bogus.values = vec![true; 2 * 2 * 3];
        let err = RosterCpBuilder::new(&d)
            .solve(&FixedSolver(bogus), &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, RosterError::MalformedSolution(_)));

        // Claims success with no values at all.
        let err = RosterCpBuilder::new(&d)
            .solve(
                &FixedSolver(CpSolution::empty(SolverStatus::Optimal)),
                &SolverConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RosterError::MalformedSolution(_)));
    }

    #[test]
    fn test_objective_steers_assignment() {
        let d = domain(2, 1);
        let objective = RosterObjective::Preferences(vec![ShiftPreference::avoid(
            "0",
            crate::constraints::ShiftSelector::ids(["Night"]),
            10,
        )]);
        let roster = RosterCpBuilder::new(&d)
            .with_objective(objective)
            .solve(&BacktrackingSolver::new(), &SolverConfig::default())
            .unwrap();
        assert_eq!(roster.shift(0, 0).id, "Day");
        assert_eq!(roster.shift(1, 0).id, "Night");
    }
}
