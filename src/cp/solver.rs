//! CP solver interface.

use serde::{Deserialize, Serialize};

use super::model::CpModel;
use super::variables::BoolVar;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded its budget without a definitive answer.
    Timeout,
    /// No answer for unknown reasons.
    Unknown,
}

/// Solution from a CP solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective value (if the model has an objective and a solution exists).
    pub objective_value: Option<i64>,
    /// Variable values, indexed by variable. Empty without a solution.
    pub values: Vec<bool>,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
    /// Search nodes explored (0 if the solver does not report it).
    pub nodes: u64,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            solve_time_ms: 0,
            nodes: 0,
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of a variable, if the solution assigns it.
    pub fn value(&self, var: BoolVar) -> Option<bool> {
        self.values.get(var.index()).copied()
    }
}

/// Solver configuration: the resolution budget and search options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: u64,
    /// Maximum number of search nodes, if bounded.
    pub node_limit: Option<u64>,
    /// Number of parallel workers (engines may ignore this).
    pub num_workers: usize,
    /// Stop after finding the first feasible solution.
    pub stop_after_first: bool,
    /// Seed for randomized branching; `None` keeps the model's order.
    pub random_seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            node_limit: None,
            num_workers: 1,
            stop_after_first: false,
            random_seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the time limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Stops at the first feasible solution.
    pub fn first_solution(mut self) -> Self {
        self.stop_after_first = true;
        self
    }

    /// Sets the branching seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic. This can
/// wrap an external engine (e.g., a CP-SAT or MIP service) or provide a
/// deterministic stub for tests.
pub trait CpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

impl<S: CpSolver + ?Sized> CpSolver for &S {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        (**self).solve(model, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, 60_000);
        assert_eq!(config.num_workers, 1);
        assert!(config.node_limit.is_none());
        assert!(!config.stop_after_first);
        assert!(config.random_seed.is_none());
    }

    #[test]
    fn test_solver_config_partial_json() {
        let config: SolverConfig = serde_json::from_str(r#"{"time_limit_ms": 500}"#).unwrap();
        assert_eq!(config.time_limit_ms, 500);
        assert_eq!(config.num_workers, 1);
    }

    #[test]
    fn test_empty_solution() {
        let s = CpSolution::empty(SolverStatus::Infeasible);
        assert!(!s.is_solution_found());
        assert_eq!(s.value(BoolVar(0)), None);
    }
}
