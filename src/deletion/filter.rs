

use serde::{Deserialize, Serialize};

/// Which rows of a table a deleter targets.
///
/// Values and bounds are spliced into the statement literally; callers are
/// expected to pass sanitized input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFilter {
    /// Every row in the table.
    #[default]
    All,
    /// `column IN (values...)`.
    ValueSet { column: String, values: Vec<String> },
    /// `lower < column < upper`, either bound optional.
    Range {
        column: String,
        lower: Option<String>,
        upper: Option<String>,
    },
}

impl RowFilter {
    /// Normalizes raw deleter options into a single filter shape.
    ///
    /// A non-empty value list wins over range bounds. Bounds only count when
    /// both the column and the bound are non-empty.
    pub fn from_parts(
        column: &str,
        values: &[String],
        lower: Option<&str>,
        upper: Option<&str>,
    ) -> Self {
        if !values.is_empty() {
            return Self::ValueSet {
                column: column.to_string(),
                values: values.to_vec(),
            };
        }

        if column.is_empty() {
            return Self::All;
        }

        let lower = lower.filter(|b| !b.is_empty()).map(str::to_string);
        let upper = upper.filter(|b| !b.is_empty()).map(str::to_string);
        if lower.is_none() && upper.is_none() {
            return Self::All;
        }

        Self::Range {
            column: column.to_string(),
            lower,
            upper,
        }
    }

    /// The `WHERE` clause shared by delete and count statements, with a
    /// leading space, or an empty string.
    pub fn where_clause(&self) -> String {
        match self {
            Self::All => String::new(),
            Self::ValueSet { values, .. } if values.is_empty() => String::new(),
            Self::ValueSet { column, values } => {
                format!(" WHERE {} IN ('{}')", column, values.join("','"))
            }
            Self::Range { column, lower, upper } => {
                let lower = lower.as_deref().filter(|b| !b.is_empty());
                let upper = upper.as_deref().filter(|b| !b.is_empty());
                match (lower, upper) {
                    _ if column.is_empty() => String::new(),
                    (Some(lower), Some(upper)) => format!(
                        " WHERE {} > '{}' AND {} < '{}'",
                        column, lower, column, upper
                    ),
                    (Some(lower), None) => format!(" WHERE {} > '{}'", column, lower),
                    (None, Some(upper)) => format!(" WHERE {} < '{}'", column, upper),
                    (None, None) => String::new(),
                }
            }
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.where_clause().is_empty()
    }
}


pub fn build_delete_statement(table_name: &str, filter: &RowFilter) -> String {
    format!("DELETE FROM `{}`{}", table_name, filter.where_clause())
}


pub fn build_count_statement(table_name: &str, filter: &RowFilter) -> String {
    format!(
        "SELECT COUNT(*) as count FROM `{}`{}",
        table_name,
        filter.where_clause()
    )
}
