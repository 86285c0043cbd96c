//! Constraint Programming (CP) modelling layer.
//!
//! Provides a small, engine-neutral model for boolean constrained
//! optimization: variables, linear and implication relations, and an
//! optional linear objective.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`], [`Literal`]: decision variables and their polarity
//! - **Relations**: [`Relation`]: linear ranges and implications
//! - **Model**: [`CpModel`]: container for variables, relations, objective
//! - **Solver**: [`CpSolver`] trait: interface for solver implementations
//!
//! # Design
//!
//! The modelling layer does not depend on any engine. The [`CpSolver`]
//! trait allows plugging in an external solver; [`BacktrackingSolver`]
//! is a deterministic reference engine for small instances and tests.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod search;
mod solver;
mod variables;

pub use model::{CpModel, Objective, Relation};
pub use search::BacktrackingSolver;
pub use solver::{CpSolution, CpSolver, SolverConfig, SolverStatus};
pub use variables::{BoolVar, Literal};
