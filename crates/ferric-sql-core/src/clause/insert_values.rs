//! The INSERT value list: `DEFAULT VALUES`, a single `set(...)` row, or
//! additional rows appended with `add_row(...)`.

use crate::check::Inconsistency;
use crate::clause::Clause;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::schema::Assignment;
use crate::serialize::{Serialize, SqlWriter};

/// The value-supplying part of an INSERT statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InsertValueList {
    /// No values given yet; inconsistent until set.
    #[default]
    Missing,
    /// `DEFAULT VALUES`: every column takes its default.
    DefaultValues,
    /// One or more value rows, each a list of column assignments. The
    /// first row fixes the column list; later rows must match it.
    Rows(Vec<Vec<Assignment>>),
}

impl InsertValueList {
    /// The assignment rows, empty for the other variants.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Assignment>] {
        match self {
            Self::Rows(rows) => rows,
            Self::Missing | Self::DefaultValues => &[],
        }
    }

    /// Validates the list against the statement's target table and its
    /// required insert columns.
    pub fn check_against(
        &self,
        table: Name,
        required_columns: &[Name],
    ) -> Result<(), Inconsistency> {
        let rows = match self {
            Self::Missing => return Err(Inconsistency::EmptySetClause),
            Self::DefaultValues => return Ok(()),
            Self::Rows(rows) => rows,
        };
        let first = match rows.first() {
            Some(first) if !first.is_empty() => first,
            _ => return Err(Inconsistency::EmptySetClause),
        };

        for row in rows {
            let mut seen: IdSet<Name> = IdSet::new();
            for assignment in row {
                if assignment.table != row[0].table {
                    return Err(Inconsistency::MixedAssignmentTables);
                }
                if assignment.table != table {
                    return Err(Inconsistency::WrongAssignmentTable(table.text()));
                }
                if assignment.must_not_insert {
                    return Err(Inconsistency::ColumnMustNotBeInserted(
                        assignment.column.text(),
                    ));
                }
                if !seen.insert(assignment.column) {
                    return Err(Inconsistency::DuplicateAssignment(assignment.column.text()));
                }
            }
            if row.len() != first.len()
                || row
                    .iter()
                    .zip(first)
                    .any(|(a, b)| a.column != b.column)
            {
                return Err(Inconsistency::MismatchedValueRow);
            }
        }

        for required in required_columns {
            if !first.iter().any(|a| a.column == *required) {
                return Err(Inconsistency::MissingRequiredInsertColumn(required.text()));
            }
        }
        Ok(())
    }
}

impl Serialize for InsertValueList {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        match self {
            Self::Missing => {}
            Self::DefaultValues => writer.push_str(" DEFAULT VALUES"),
            Self::Rows(rows) => {
                let Some(first) = rows.first() else { return };
                writer.push_str(" (");
                for (i, assignment) in first.iter().enumerate() {
                    if i > 0 {
                        writer.push(',');
                    }
                    writer.push_name(assignment.column);
                }
                writer.push_str(") VALUES");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        writer.push(',');
                    }
                    writer.push('(');
                    for (j, assignment) in row.iter().enumerate() {
                        if j > 0 {
                            writer.push(',');
                        }
                        assignment.value.serialize(writer);
                    }
                    writer.push(')');
                }
            }
        }
    }
}

impl Clause for InsertValueList {
    fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        for row in self.rows() {
            for assignment in row {
                assignment.value.collect_required_tables(out);
            }
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        for row in self.rows() {
            for assignment in row {
                assignment.value.collect_required_ctes(out);
            }
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        for row in self.rows() {
            for assignment in row {
                assignment.value.collect_parameters(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::Expr;
    use crate::value::Value;

    fn assignment(column: &'static str, value: i64) -> Assignment {
        Assignment {
            table: Name::new("tab_bar"),
            column: Name::new(column),
            value: Expr::Literal(Value::Int(value)),
            must_not_insert: false,
            must_not_update: false,
        }
    }

    #[test]
    fn test_single_row_serialization() {
        let list = InsertValueList::Rows(vec![vec![assignment("gamma", 1), assignment("beta", 2)]]);
        assert_eq!(
            list.to_sql(&AnsiDialect::new()),
            " (gamma,beta) VALUES(1,2)"
        );
    }

    #[test]
    fn test_multi_row_serialization() {
        let list = InsertValueList::Rows(vec![
            vec![assignment("gamma", 1)],
            vec![assignment("gamma", 2)],
        ]);
        assert_eq!(list.to_sql(&AnsiDialect::new()), " (gamma) VALUES(1),(2)");
    }

    #[test]
    fn test_default_values() {
        let list = InsertValueList::DefaultValues;
        assert_eq!(list.to_sql(&AnsiDialect::new()), " DEFAULT VALUES");
        assert_eq!(list.check_against(Name::new("tab_bar"), &[]), Ok(()));
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let list = InsertValueList::Rows(vec![vec![]]);
        assert_eq!(
            list.check_against(Name::new("tab_bar"), &[]),
            Err(Inconsistency::EmptySetClause)
        );
        assert_eq!(
            InsertValueList::Missing.check_against(Name::new("tab_bar"), &[]),
            Err(Inconsistency::EmptySetClause)
        );
    }

    #[test]
    fn test_duplicate_target_column_rejected() {
        let list = InsertValueList::Rows(vec![vec![assignment("gamma", 1), assignment("gamma", 2)]]);
        assert_eq!(
            list.check_against(Name::new("tab_bar"), &[]),
            Err(Inconsistency::DuplicateAssignment("gamma"))
        );
    }

    #[test]
    fn test_required_column_must_be_assigned() {
        let list = InsertValueList::Rows(vec![vec![assignment("beta", 1)]]);
        assert_eq!(
            list.check_against(Name::new("tab_bar"), &[Name::new("gamma")]),
            Err(Inconsistency::MissingRequiredInsertColumn("gamma"))
        );
    }

    #[test]
    fn test_mismatched_rows_rejected() {
        let list = InsertValueList::Rows(vec![
            vec![assignment("gamma", 1)],
            vec![assignment("beta", 2)],
        ]);
        assert_eq!(
            list.check_against(Name::new("tab_bar"), &[]),
            Err(Inconsistency::MismatchedValueRow)
        );
    }
}
