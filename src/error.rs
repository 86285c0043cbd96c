//! Roster error types.

use thiserror::Error;

use crate::constraints::ConstraintSet;

/// Errors surfaced by domain construction and the model builder.
///
/// None of these are handled internally: relaxing a model after
/// `InfeasibleModel` or enlarging the budget after `SolverTimeout` is
/// the caller's decision.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Invalid input detected before solving (empty horizon, no nurses,
    /// contradictory rule parameters, unknown references).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The engine proved that no assignment satisfies the active rules.
    #[error("no roster satisfies the active constraints: {summary}")]
    InfeasibleModel {
        /// One-line description of the active rule families.
        summary: String,
        /// The rule configuration that was submitted.
        constraints: Box<ConstraintSet>,
    },

    /// The resolution budget ran out before a definitive answer.
    #[error("solver budget exhausted after {elapsed_ms} ms without a definitive answer")]
    SolverTimeout { elapsed_ms: u64 },

    /// The engine reported success but its assignment is not a roster.
    #[error("malformed solver assignment: {0}")]
    MalformedSolution(String),
}

pub type RosterResult<T> = Result<T, RosterError>;
