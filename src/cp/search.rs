//! Reference backtracking solver.
//!
//! # Algorithm
//!
//! 1. Bounds propagation over every linear relation: a row whose reachable
//!    range `[lo, hi]` misses `[lower, upper]` fails; a free variable whose
//!    contribution would push the row out of range is fixed.
//! 2. Unit propagation over implications.
//! 3. Depth-first branching on the first unassigned variable of the
//!    model's decision order, `true` first (unless that raises the cost).
//! 4. With an objective, every new incumbent tightens an upper bound row
//!    on the cost (branch and bound) until the tree is exhausted.
//!
//! # Limitations
//!
//! Chronological backtracking without learning. Suitable for the small,
//! fixed instances used in tests and examples; production models should
//! go to an external engine through [`CpSolver`].

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::model::{CpModel, Relation};
use super::solver::{CpSolution, CpSolver, SolverConfig, SolverStatus};
use super::variables::Literal;

/// Nodes between wall-clock checks.
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// A deterministic depth-first CP solver for small boolean models.
#[derive(Debug, Clone, Default)]
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BacktrackingSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        if let Err(reason) = model.validate() {
            debug!(model = %model.name, %reason, "model rejected");
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let started = Instant::now();
        let mut search = Search::new(model, config);
        let stop = search.run(config, started);

        let status = match (stop, search.incumbent.is_some()) {
            (Stop::FirstSolution, _) => SolverStatus::Feasible,
            (Stop::Exhausted, true) => SolverStatus::Optimal,
            (Stop::Exhausted, false) => SolverStatus::Infeasible,
            (Stop::Budget, true) => SolverStatus::Feasible,
            (Stop::Budget, false) => SolverStatus::Timeout,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(
            model = %model.name,
            nodes = search.nodes,
            elapsed_ms,
            ?status,
            "search finished"
        );

        let (values, objective_value) = match search.incumbent.take() {
            Some((values, _)) => {
                let objective = model.objective.as_ref().map(|o| o.evaluate(&values));
                (values, objective)
            }
            None => (Vec::new(), None),
        };

        CpSolution {
            status,
            objective_value,
            values,
            solve_time_ms: elapsed_ms,
            nodes: search.nodes,
        }
    }
}

/// Why the search loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    FirstSolution,
    Exhausted,
    Budget,
}

#[derive(Debug, Clone)]
struct Row {
    terms: Vec<(usize, i64)>,
    lower: i64,
    upper: i64,
}

#[derive(Debug, Clone, Copy)]
struct Decision {
    var: usize,
    value: bool,
    mark: usize,
    flipped: bool,
}

struct Search {
    rows: Vec<Row>,
    implications: Vec<(Literal, Literal)>,
    row_watch: Vec<Vec<usize>>,
    imp_watch: Vec<Vec<usize>>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    order: Vec<usize>,
    /// Minimization cost per variable (0 if not in the objective).
    cost: Vec<i64>,
    /// Row bounding the cost, present iff the model has an objective.
    bound_row: Option<usize>,
    incumbent: Option<(Vec<bool>, i64)>,
    nodes: u64,
}

impl Search {
    fn new(model: &CpModel, config: &SolverConfig) -> Self {
        let n = model.var_count();
        let mut rows = Vec::new();
        let mut implications = Vec::new();
        let mut row_watch = vec![Vec::new(); n];
        let mut imp_watch = vec![Vec::new(); n];

        for relation in &model.relations {
            match relation {
                Relation::Linear {
                    terms,
                    lower,
                    upper,
                    ..
                } => {
                    let idx = rows.len();
                    for &(v, _) in terms {
                        row_watch[v.index()].push(idx);
                    }
                    rows.push(Row {
                        terms: terms.iter().map(|&(v, c)| (v.index(), c)).collect(),
                        lower: *lower,
                        upper: *upper,
                    });
                }
                Relation::Implication {
                    premise,
                    conclusion,
                    ..
                } => {
                    let idx = implications.len();
                    imp_watch[premise.var.index()].push(idx);
                    imp_watch[conclusion.var.index()].push(idx);
                    implications.push((*premise, *conclusion));
                }
            }
        }

        let mut cost = vec![0; n];
        let bound_row = model.objective.as_ref().map(|objective| {
            let terms: Vec<(usize, i64)> = objective
                .as_minimization()
                .into_iter()
                .map(|(v, c)| (v.index(), c))
                .collect();
            let idx = rows.len();
            for &(v, c) in &terms {
                cost[v] += c;
                row_watch[v].push(idx);
            }
            rows.push(Row {
                terms,
                lower: i64::MIN,
                upper: i64::MAX,
            });
            idx
        });

        let mut order: Vec<usize> = match &model.decision_order {
            Some(hint) => hint.iter().map(|v| v.index()).collect(),
            None => (0..n).collect(),
        };
        // Variables missing from the hint are branched on last.
        let mut listed = vec![false; n];
        for &v in &order {
            listed[v] = true;
        }
        order.extend((0..n).filter(|&v| !listed[v]));

        if let Some(seed) = config.random_seed {
            order.shuffle(&mut StdRng::seed_from_u64(seed));
        }

        Self {
            rows,
            implications,
            row_watch,
            imp_watch,
            values: vec![None; n],
            trail: Vec::new(),
            order,
            cost,
            bound_row,
            incumbent: None,
            nodes: 0,
        }
    }

    fn run(&mut self, config: &SolverConfig, started: Instant) -> Stop {
        if !self.propagate_everything() {
            return Stop::Exhausted;
        }

        let mut decisions: Vec<Decision> = Vec::new();
        loop {
            let Some(var) = self.next_unassigned() else {
                self.record_leaf();
                if self.bound_row.is_none() || config.stop_after_first {
                    return Stop::FirstSolution;
                }
                if !self.backtrack(&mut decisions) {
                    return Stop::Exhausted;
                }
                continue;
            };

            if self.budget_exhausted(config, started) {
                return Stop::Budget;
            }
            self.nodes += 1;

            let value = self.cost[var] <= 0;
            decisions.push(Decision {
                var,
                value,
                mark: self.trail.len(),
                flipped: false,
            });
            if !self.decide(var, value) && !self.backtrack(&mut decisions) {
                return Stop::Exhausted;
            }
        }
    }

    fn budget_exhausted(&self, config: &SolverConfig, started: Instant) -> bool {
        if config.node_limit.is_some_and(|limit| self.nodes >= limit) {
            return true;
        }
        self.nodes % CLOCK_CHECK_INTERVAL == 0
            && started.elapsed().as_millis() >= u128::from(config.time_limit_ms)
    }

    fn next_unassigned(&self) -> Option<usize> {
        self.order.iter().copied().find(|&v| self.values[v].is_none())
    }

    /// Stores the current complete assignment if it beats the incumbent,
    /// then tightens the cost bound.
    fn record_leaf(&mut self) {
        let values: Vec<bool> = self.values.iter().map(|v| v.unwrap_or(false)).collect();
        let cost: i64 = (0..values.len())
            .filter(|&v| values[v])
            .map(|v| self.cost[v])
            .sum();

        let improves = self
            .incumbent
            .as_ref()
            .map_or(true, |(_, best)| cost < *best);
        if improves {
            self.incumbent = Some((values, cost));
            if let Some(row) = self.bound_row {
                self.rows[row].upper = cost - 1;
            }
        }
    }

    fn decide(&mut self, var: usize, value: bool) -> bool {
        let mut queue = Vec::new();
        self.assign(var, value, &mut queue) && self.propagate(queue)
    }

    fn backtrack(&mut self, decisions: &mut Vec<Decision>) -> bool {
        while let Some(decision) = decisions.pop() {
            self.undo_to(decision.mark);
            if decision.flipped {
                continue;
            }
            let value = !decision.value;
            decisions.push(Decision {
                value,
                flipped: true,
                ..decision
            });
            if self.decide(decision.var, value) {
                return true;
            }
        }
        false
    }

    fn undo_to(&mut self, mark: usize) {
        for var in self.trail.drain(mark..) {
            self.values[var] = None;
        }
    }

    fn assign(&mut self, var: usize, value: bool, queue: &mut Vec<usize>) -> bool {
        match self.values[var] {
            Some(current) => current == value,
            None => {
                self.values[var] = Some(value);
                self.trail.push(var);
                queue.push(var);
                true
            }
        }
    }

    fn propagate_everything(&mut self) -> bool {
        let mut queue = Vec::new();
        for row in 0..self.rows.len() {
            if !self.propagate_row(row, &mut queue) {
                return false;
            }
        }
        for imp in 0..self.implications.len() {
            if !self.propagate_implication(imp, &mut queue) {
                return false;
            }
        }
        self.propagate(queue)
    }

    fn propagate(&mut self, mut queue: Vec<usize>) -> bool {
        while let Some(var) = queue.pop() {
            for k in 0..self.row_watch[var].len() {
                let row = self.row_watch[var][k];
                if !self.propagate_row(row, &mut queue) {
                    return false;
                }
            }
            for k in 0..self.imp_watch[var].len() {
                let imp = self.imp_watch[var][k];
                if !self.propagate_implication(imp, &mut queue) {
                    return false;
                }
            }
        }
        true
    }

    fn propagate_row(&mut self, idx: usize, queue: &mut Vec<usize>) -> bool {
        let forced: Vec<(usize, bool)> = {
            let row = &self.rows[idx];
            let (mut lo, mut hi) = (0i64, 0i64);
            for &(v, c) in &row.terms {
                match self.values[v] {
                    Some(true) => {
                        lo += c;
                        hi += c;
                    }
                    Some(false) => {}
                    None if c > 0 => hi += c,
                    None => lo += c,
                }
            }
            if hi < row.lower || lo > row.upper {
                return false;
            }

            row.terms
                .iter()
                .filter(|&&(v, c)| c != 0 && self.values[v].is_none())
                .filter_map(|&(v, c)| {
                    let width = c.abs();
                    if lo.saturating_add(width) > row.upper {
                        // Must stay at its smallest contribution.
                        Some((v, c < 0))
                    } else if hi.saturating_sub(width) < row.lower {
                        // Must take its largest contribution.
                        Some((v, c > 0))
                    } else {
                        None
                    }
                })
                .collect()
        };

        forced
            .into_iter()
            .all(|(v, value)| self.assign(v, value, queue))
    }

    fn propagate_implication(&mut self, idx: usize, queue: &mut Vec<usize>) -> bool {
        let (premise, conclusion) = self.implications[idx];
        let p = self.values[premise.var.index()].map(|v| premise.holds(v));
        let q = self.values[conclusion.var.index()].map(|v| conclusion.holds(v));
        match (p, q) {
            (Some(true), Some(false)) => false,
            (Some(true), None) => {
                self.assign(conclusion.var.index(), conclusion.satisfying_value(), queue)
            }
            (None, Some(false)) => {
                self.assign(premise.var.index(), !premise.satisfying_value(), queue)
            }
            _ => true,
        }
    }
}
