//! Tabular statistics output.

use std::fmt;

use serde::Serialize;

/// A named table of counts keyed by nurse or team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatTable {
    /// Table title.
    pub name: String,
    /// Header of the grouping column.
    pub key_column: String,
    /// Headers of the count columns.
    pub columns: Vec<String>,
    /// Rows in insertion order: group key and one count per column.
    pub rows: Vec<(String, Vec<usize>)>,
}

impl StatTable {
    pub(crate) fn new(name: &str, key_column: &str, columns: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            key_column: key_column.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    pub(crate) fn with_row(mut self, key: impl Into<String>, values: Vec<usize>) -> Self {
        self.rows.push((key.into(), values));
        self
    }

    /// Value of `column` in the row `key`.
    pub fn value(&self, key: &str, column: &str) -> Option<usize> {
        let col = self.columns.iter().position(|c| c == column)?;
        let (_, values) = self.rows.iter().find(|(k, _)| k == key)?;
        values.get(col).copied()
    }
}

impl fmt::Display for StatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        write!(f, "{}", self.key_column)?;
        for column in &self.columns {
            write!(f, "\t{column}")?;
        }
        writeln!(f)?;
        for (key, values) in &self.rows {
            write!(f, "{key}")?;
            for value in values {
                write!(f, "\t{value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_lookup_and_display() {
        let table = StatTable::new(
            "Distribution of Shifts per Team",
            "Team",
            vec!["Team Members".into(), "Total Shifts".into()],
        )
        .with_row("A", vec![2, 5]);

        assert_eq!(table.value("A", "Total Shifts"), Some(5));
        assert_eq!(table.value("A", "Missing"), None);
        assert_eq!(table.value("B", "Total Shifts"), None);
        assert_eq!(
            table.to_string(),
            "Distribution of Shifts per Team\nTeam\tTeam Members\tTotal Shifts\nA\t2\t5\n"
        );
    }
}
