//! WHERE and HAVING: a boolean condition with a leading keyword.
//!
//! A condition whose whole tree is dynamically excluded serializes to
//! nothing, exactly like the missing clause; a constant-false condition
//! serializes as the dialect's false literal, never eliding the keyword.

use crate::clause::Clause;
use crate::expr::typed::IntoTyped;
use crate::expr::Expr;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::serialize::{Serialize, SqlWriter};
use crate::types::Boolean;

#[derive(Debug, Clone, Default, PartialEq)]
struct Condition {
    expr: Option<Expr>,
}

impl Condition {
    fn new<C: IntoTyped<Boolean>>(condition: C) -> Self {
        Self {
            expr: Some(condition.into_typed().into_expr()),
        }
    }

    fn active(&self) -> Option<&Expr> {
        self.expr.as_ref().filter(|expr| !expr.is_pruned())
    }

    fn serialize_with(&self, keyword: &str, writer: &mut SqlWriter<'_>) {
        if let Some(expr) = self.active() {
            writer.push_str(keyword);
            expr.serialize(writer);
        }
    }
}

/// The WHERE clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    condition: Condition,
}

impl WhereClause {
    /// Sets the condition.
    pub fn new<C: IntoTyped<Boolean>>(condition: C) -> Self {
        Self {
            condition: Condition::new(condition),
        }
    }

    /// The condition expression, if one is set.
    #[must_use]
    pub fn condition(&self) -> Option<&Expr> {
        self.condition.expr.as_ref()
    }
}

impl Serialize for WhereClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        self.condition.serialize_with(" WHERE ", writer);
    }
}

impl Clause for WhereClause {
    fn is_missing(&self) -> bool {
        self.condition.expr.is_none()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        if let Some(expr) = &self.condition.expr {
            expr.collect_required_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        if let Some(expr) = &self.condition.expr {
            expr.collect_required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        if let Some(expr) = &self.condition.expr {
            expr.collect_parameters(out);
        }
    }
}

/// The HAVING clause. Same shape as WHERE; aggregate content is legal
/// here and checked by the statement's aggregate rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HavingClause {
    condition: Condition,
}

impl HavingClause {
    /// Sets the condition.
    pub fn new<C: IntoTyped<Boolean>>(condition: C) -> Self {
        Self {
            condition: Condition::new(condition),
        }
    }

    /// The condition expression, if one is set.
    #[must_use]
    pub fn condition(&self) -> Option<&Expr> {
        self.condition.expr.as_ref()
    }
}

impl Serialize for HavingClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        self.condition.serialize_with(" HAVING ", writer);
    }
}

impl Clause for HavingClause {
    fn is_missing(&self) -> bool {
        self.condition.expr.is_none()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        if let Some(expr) = &self.condition.expr {
            expr.collect_required_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        if let Some(expr) = &self.condition.expr {
            expr.collect_required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        if let Some(expr) = &self.condition.expr {
            expr.collect_parameters(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::typed::{dynamic, value, BooleanOps};

    #[test]
    fn test_constant_false_keeps_keyword() {
        let clause = WhereClause::new(value(false));
        assert_eq!(clause.to_sql(&AnsiDialect::new()), " WHERE FALSE");
    }

    #[test]
    fn test_dynamic_false_operand_reduces() {
        let clause = WhereClause::new(value(true).and(dynamic(false, value(false))));
        assert_eq!(clause.to_sql(&AnsiDialect::new()), " WHERE TRUE");
    }

    #[test]
    fn test_fully_excluded_condition_serializes_nothing() {
        let clause = WhereClause::new(dynamic(false, value(true)));
        assert!(!clause.is_missing());
        assert_eq!(clause.to_sql(&AnsiDialect::new()), "");
    }

    #[test]
    fn test_missing_where() {
        let clause = WhereClause::default();
        assert!(clause.is_missing());
        assert_eq!(clause.to_sql(&AnsiDialect::new()), "");
    }
}
