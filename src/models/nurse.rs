//! Nurse model.
//!
//! Nurses are the assignable staff of a roster. Each nurse has a stable
//! identifier and may belong to a team; team membership drives the
//! team-level fairness, exclusion, and daily-limit rules.

use serde::{Deserialize, Serialize};

/// A nurse that can be assigned to shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nurse {
    /// Unique, stable identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Team affiliation, if any.
    #[serde(default)]
    pub team: Option<String>,
}

impl Nurse {
    /// Creates a nurse without a team.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            team: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the team affiliation.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Whether this nurse belongs to the given team.
    #[inline]
    pub fn is_member_of(&self, team: &str) -> bool {
        self.team.as_deref() == Some(team)
    }
}

/// A team: a named group of nurses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team name.
    pub name: String,
    /// Indices of the member nurses in the domain's nurse list.
    pub members: Vec<usize>,
}

impl Team {
    /// Number of team members.
    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }
}
