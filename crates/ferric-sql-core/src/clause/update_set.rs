//! The UPDATE set list: ` SET a=1,b=2`.

use crate::check::Inconsistency;
use crate::clause::Clause;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::schema::Assignment;
use crate::serialize::{Serialize, SqlWriter};

/// The assignment list of an UPDATE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSetList {
    assignments: Vec<Assignment>,
}

impl UpdateSetList {
    /// Builds the list from assignments.
    #[must_use]
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// The assignments in order.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Validates the list against the statement's target table.
    pub fn check_against(&self, table: Name) -> Result<(), Inconsistency> {
        if self.assignments.is_empty() {
            return Err(Inconsistency::EmptySetClause);
        }
        let mut seen: IdSet<Name> = IdSet::new();
        for assignment in &self.assignments {
            if assignment.table != self.assignments[0].table {
                return Err(Inconsistency::MixedAssignmentTables);
            }
            if assignment.table != table {
                return Err(Inconsistency::WrongAssignmentTable(table.text()));
            }
            if assignment.must_not_update {
                return Err(Inconsistency::ColumnMustNotBeUpdated(
                    assignment.column.text(),
                ));
            }
            if !seen.insert(assignment.column) {
                return Err(Inconsistency::DuplicateAssignment(assignment.column.text()));
            }
        }
        Ok(())
    }
}

impl Serialize for UpdateSetList {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        if self.assignments.is_empty() {
            return;
        }
        writer.push_str(" SET ");
        writer.push_list(&self.assignments);
    }
}

impl Clause for UpdateSetList {
    fn is_missing(&self) -> bool {
        self.assignments.is_empty()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        for assignment in &self.assignments {
            assignment.value.collect_required_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        for assignment in &self.assignments {
            assignment.value.collect_required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        for assignment in &self.assignments {
            assignment.value.collect_parameters(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::Expr;
    use crate::value::Value;

    fn assignment(column: &'static str, must_not_update: bool) -> Assignment {
        Assignment {
            table: Name::new("tab_bar"),
            column: Name::new(column),
            value: Expr::Literal(Value::Int(7)),
            must_not_insert: false,
            must_not_update,
        }
    }

    #[test]
    fn test_set_list_serialization() {
        let list = UpdateSetList::new(vec![assignment("gamma", false), assignment("beta", false)]);
        assert_eq!(list.to_sql(&AnsiDialect::new()), " SET gamma=7,beta=7");
    }

    #[test]
    fn test_empty_set_rejected() {
        let list = UpdateSetList::default();
        assert_eq!(
            list.check_against(Name::new("tab_bar")),
            Err(Inconsistency::EmptySetClause)
        );
    }

    #[test]
    fn test_must_not_update_rejected() {
        let list = UpdateSetList::new(vec![assignment("gamma", true)]);
        assert_eq!(
            list.check_against(Name::new("tab_bar")),
            Err(Inconsistency::ColumnMustNotBeUpdated("gamma"))
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let list = UpdateSetList::new(vec![assignment("gamma", false), assignment("gamma", false)]);
        assert_eq!(
            list.check_against(Name::new("tab_bar")),
            Err(Inconsistency::DuplicateAssignment("gamma"))
        );
    }

    #[test]
    fn test_wrong_table_rejected() {
        let list = UpdateSetList::new(vec![assignment("gamma", false)]);
        assert_eq!(
            list.check_against(Name::new("tab_foo")),
            Err(Inconsistency::WrongAssignmentTable("tab_foo"))
        );
    }
}
