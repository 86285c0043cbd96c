//! Nurse rostering framework.
//!
//! Turns a rostering problem (nurses, a horizon of days, shift types with
//! coverage requirements) and a set of workplace rules into a boolean CP
//! model, hands it to a solver, and decodes the answer into a roster.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Nurse`, `Team`, `Horizon`, `Day`,
//!   `ShiftType`, `Coverage`, `RosterDomain`, `Roster`
//! - **`cp`**: Engine-neutral CP modelling layer: `BoolVar`, `Relation`,
//!   `CpModel`, the `CpSolver` trait, and a reference backtracking solver
//! - **`constraints`**: Rule families (`single_assignment`, `coverage`,
//!   `rest`, `consecutive_cap`, `fairness`, ...) and the `ConstraintSet`
//!   that composes them
//! - **`builder`**: `RosterCpBuilder`: variable space, model assembly,
//!   solve and decode
//! - **`statistics`**: Per-team, per-nurse, weekday/weekend, and weekly
//!   shift distributions
//! - **`validation`**: Input integrity checks (empty input, duplicate IDs,
//!   coverage vs. staff, rule parameters, references)
//!
//! # Example
//!
//! ```
//! use u_roster::builder::RosterCpBuilder;
//! use u_roster::constraints::ConstraintSet;
//! use u_roster::cp::{BacktrackingSolver, SolverConfig};
//! use u_roster::models::{Horizon, Nurse, RosterDomain, ShiftType};
//! use u_roster::statistics::RosterStatistics;
//!
//! let nurses = (1..=4).map(|i| Nurse::new(i.to_string())).collect();
//! let domain = RosterDomain::new(
//!     nurses,
//!     Horizon::new(7),
//!     vec![ShiftType::day("Day", 1), ShiftType::night("Night", 1)],
//! )?;
//!
//! let roster = RosterCpBuilder::new(&domain)
//!     .with_constraints(ConstraintSet::new().with_consecutive_cap(5))
//!     .solve(&BacktrackingSolver::new(), &SolverConfig::default())?;
//!
//! let stats = RosterStatistics::calculate(&roster);
//! assert_eq!(stats.totals().iter().map(|(_, total)| total).sum::<usize>(), 14);
//! # Ok::<(), u_roster::RosterError>(())
//! ```
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

pub mod builder;
pub mod constraints;
pub mod cp;
pub mod error;
pub mod models;
pub mod statistics;
pub mod validation;

pub use error::{RosterError, RosterResult};
