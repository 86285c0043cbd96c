//! CP model definition.

use serde::{Deserialize, Serialize};

use super::variables::{BoolVar, Literal};

/// A relation over boolean variables.
///
/// These are the only two forms the solving engine is required to
/// understand. Cardinality, equality, and windowed caps are all linear
/// relations with unit coefficients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// `lower <= Σ coef·x <= upper`, with `x ∈ {0, 1}`.
    Linear {
        /// Label used in diagnostics.
        name: String,
        /// (variable, coefficient) pairs.
        terms: Vec<(BoolVar, i64)>,
        /// Inclusive lower bound.
        lower: i64,
        /// Inclusive upper bound.
        upper: i64,
    },

    /// `premise ⇒ conclusion`.
    Implication {
        /// Label used in diagnostics.
        name: String,
        premise: Literal,
        conclusion: Literal,
    },
}

impl Relation {
    /// `lower <= Σ vars <= upper`.
    pub fn between(
        name: impl Into<String>,
        vars: impl IntoIterator<Item = BoolVar>,
        lower: i64,
        upper: i64,
    ) -> Self {
        Self::Linear {
            name: name.into(),
            terms: vars.into_iter().map(|v| (v, 1)).collect(),
            lower,
            upper,
        }
    }

    /// `Σ vars == count`.
    pub fn exactly(
        name: impl Into<String>,
        vars: impl IntoIterator<Item = BoolVar>,
        count: i64,
    ) -> Self {
        Self::between(name, vars, count, count)
    }

    /// `Σ vars <= count`.
    pub fn at_most(
        name: impl Into<String>,
        vars: impl IntoIterator<Item = BoolVar>,
        count: i64,
    ) -> Self {
        Self::between(name, vars, i64::MIN, count)
    }

    /// `Σ vars >= count`.
    pub fn at_least(
        name: impl Into<String>,
        vars: impl IntoIterator<Item = BoolVar>,
        count: i64,
    ) -> Self {
        Self::between(name, vars, count, i64::MAX)
    }

    /// `a == b`.
    pub fn equal(name: impl Into<String>, a: BoolVar, b: BoolVar) -> Self {
        Self::Linear {
            name: name.into(),
            terms: vec![(a, 1), (b, -1)],
            lower: 0,
            upper: 0,
        }
    }

    /// `premise ⇒ conclusion`.
    pub fn implies(name: impl Into<String>, premise: Literal, conclusion: Literal) -> Self {
        Self::Implication {
            name: name.into(),
            premise,
            conclusion,
        }
    }

    /// Diagnostic label.
    pub fn name(&self) -> &str {
        match self {
            Self::Linear { name, .. } | Self::Implication { name, .. } => name,
        }
    }

    /// Variables referenced by this relation.
    pub fn vars(&self) -> Vec<BoolVar> {
        match self {
            Self::Linear { terms, .. } => terms.iter().map(|&(v, _)| v).collect(),
            Self::Implication {
                premise,
                conclusion,
                ..
            } => vec![premise.var, conclusion.var],
        }
    }

    /// Whether a complete assignment satisfies this relation.
    ///
    /// `values` is indexed by variable index.
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        match self {
            Self::Linear {
                terms,
                lower,
                upper,
                ..
            } => {
                let sum: i64 = terms
                    .iter()
                    .filter(|&&(v, _)| values[v.index()])
                    .map(|&(_, c)| c)
                    .sum();
                *lower <= sum && sum <= *upper
            }
            Self::Implication {
                premise,
                conclusion,
                ..
            } => !premise.holds(values[premise.var.index()])
                || conclusion.holds(values[conclusion.var.index()]),
        }
    }
}

/// Objective function for the CP model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Minimize a weighted sum of boolean variables.
    Minimize {
        /// (variable, coefficient) pairs.
        terms: Vec<(BoolVar, i64)>,
    },

    /// Maximize a weighted sum of boolean variables.
    Maximize {
        /// (variable, coefficient) pairs.
        terms: Vec<(BoolVar, i64)>,
    },
}

impl Objective {
    /// The objective's terms.
    pub fn terms(&self) -> &[(BoolVar, i64)] {
        match self {
            Self::Minimize { terms } | Self::Maximize { terms } => terms,
        }
    }

    /// Objective value of a complete assignment.
    pub fn evaluate(&self, values: &[bool]) -> i64 {
        self.terms()
            .iter()
            .filter(|&&(v, _)| values[v.index()])
            .map(|&(_, c)| c)
            .sum()
    }

    /// Terms rewritten so that smaller is always better.
    pub fn as_minimization(&self) -> Vec<(BoolVar, i64)> {
        match self {
            Self::Minimize { terms } => terms.clone(),
            Self::Maximize { terms } => terms.iter().map(|&(v, c)| (v, -c)).collect(),
        }
    }
}

/// A constraint programming model over boolean variables.
///
/// Contains variables, relations, an optional objective, and an optional
/// decision order hint for solvers that branch on variables.
///
/// # Examples
///
/// ```
/// use u_roster::cp::{CpModel, Relation};
///
/// let mut model = CpModel::new("example");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// model.add_relation(Relation::exactly("one of a, b", [a, b], 1));
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Variable names, indexed by variable.
    var_names: Vec<String>,
    /// Relations.
    pub relations: Vec<Relation>,
    /// Objective function.
    pub objective: Option<Objective>,
    /// Preferred branching order.
    pub decision_order: Option<Vec<BoolVar>>,
}

impl CpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declares a new boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        self.var_names.push(name.into());
        BoolVar(self.var_names.len() - 1)
    }

    /// Name of a variable.
    pub fn var_name(&self, var: BoolVar) -> Option<&str> {
        self.var_names.get(var.index()).map(String::as_str)
    }

    /// Number of variables.
    pub fn var_count(&self) -> usize {
        self.var_names.len()
    }

    /// Adds a relation.
    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Adds several relations.
    pub fn add_relations(&mut self, relations: impl IntoIterator<Item = Relation>) {
        self.relations.extend(relations);
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Sets the preferred branching order.
    pub fn set_decision_order(&mut self, order: Vec<BoolVar>) {
        self.decision_order = Some(order);
    }

    /// Number of relations.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists and that linear bounds
    /// are ordered.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.var_count();
        for relation in &self.relations {
            if let Some(v) = relation.vars().into_iter().find(|v| v.index() >= n) {
                return Err(format!(
                    "relation '{}' references undefined variable #{}",
                    relation.name(),
                    v.index()
                ));
            }
            if let Relation::Linear {
                name, lower, upper, ..
            } = relation
            {
                if lower > upper {
                    return Err(format!("relation '{name}' has lower bound above upper bound"));
                }
            }
        }
        if let Some(objective) = &self.objective {
            if objective.terms().iter().any(|(v, _)| v.index() >= n) {
                return Err("objective references undefined variable".into());
            }
        }
        if let Some(order) = &self.decision_order {
            if order.iter().any(|v| v.index() >= n) {
                return Err("decision order references undefined variable".into());
            }
        }
        Ok(())
    }

    /// Names of relations violated by a complete assignment.
    pub fn violations(&self, values: &[bool]) -> Vec<&str> {
        self.relations
            .iter()
            .filter(|r| !r.is_satisfied(values))
            .map(Relation::name)
            .collect()
    }
}
