//! The RETURNING clause.
//!
//! Reuses the select column machinery: the returned columns derive a row
//! shape exactly like a SELECT list. Whether the target dialect supports
//! RETURNING at all is a connector concern, checked against
//! [`Dialect::supports_returning`](crate::dialect::Dialect::supports_returning)
//! before execution.

use crate::check::Inconsistency;
use crate::clause::select_columns::{IntoSelectColumns, SelectColumn};
use crate::clause::Clause;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::row::RowSpec;
use crate::serialize::{Serialize, SqlWriter};

/// The RETURNING column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturningClause {
    columns: Vec<SelectColumn>,
}

impl ReturningClause {
    /// Builds the clause from anything column-list-like.
    pub fn new(columns: impl IntoSelectColumns) -> Self {
        Self {
            columns: columns.into_select_columns(),
        }
    }

    /// Derives the returned row shape.
    #[must_use]
    pub fn row_spec(&self) -> RowSpec {
        RowSpec::new(
            self.columns
                .iter()
                .filter_map(SelectColumn::field_spec)
                .collect(),
        )
    }
}

impl Serialize for ReturningClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        if self.columns.is_empty() {
            return;
        }
        writer.push_str(" RETURNING ");
        writer.push_list(&self.columns);
    }
}

impl Clause for ReturningClause {
    fn is_missing(&self) -> bool {
        self.columns.is_empty()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        for column in &self.columns {
            column.expr().collect_required_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        for column in &self.columns {
            column.expr().collect_required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        for column in &self.columns {
            column.expr().collect_parameters(out);
        }
    }

    fn check(&self) -> Result<(), Inconsistency> {
        if self.columns.is_empty() {
            return Ok(());
        }
        let mut seen: IdSet<Name> = IdSet::new();
        for column in &self.columns {
            let name = column
                .result_name()
                .ok_or(Inconsistency::UnnamedSelectColumn)?;
            if !seen.insert(name) {
                return Err(Inconsistency::DuplicateResultName(name.text()));
            }
        }
        Ok(())
    }
}
