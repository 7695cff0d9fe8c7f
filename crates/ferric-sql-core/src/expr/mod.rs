//! The expression tree.
//!
//! Every typed piece of a statement is an [`Expr`] node: column
//! references, literals, parameters, operator applications, function
//! calls, sub-selects and dynamic wrappers. Node facts — value type,
//! nullability, aggregate content, brace requirements, required tables,
//! parameters — are computed by ordinary recursion over the children.
//!
//! Untyped [`Expr`] values are produced and consumed through the typed
//! facade in [`typed`], which enforces operand compatibility at compile
//! time; code outside this crate rarely touches `Expr` directly.

pub mod functions;
pub mod typed;

use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::serialize::{Serialize, SqlWriter};
use crate::statement::select::SelectStatement;
use crate::types::ValueType;
use crate::value::Value;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `||`
    Concat,
}

impl BinaryOp {
    /// The serialized operator, including its surrounding spaces.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => " + ",
            Self::Sub => " - ",
            Self::Mul => " * ",
            Self::Div => " / ",
            Self::Mod => " % ",
            Self::Eq => " = ",
            Self::Ne => " <> ",
            Self::Lt => " < ",
            Self::Le => " <= ",
            Self::Gt => " > ",
            Self::Ge => " >= ",
            Self::And => " AND ",
            Self::Or => " OR ",
            Self::Like => " LIKE ",
            Self::NotLike => " NOT LIKE ",
            Self::Concat => " || ",
        }
    }

    /// Whether this operator yields a boolean regardless of operand types.
    #[must_use]
    pub const fn is_predicate(self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::Ne
                | Self::Lt
                | Self::Le
                | Self::Gt
                | Self::Ge
                | Self::And
                | Self::Or
                | Self::Like
                | Self::NotLike
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `NOT `
    Not,
}

impl UnaryOp {
    /// The serialized operator prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT ",
        }
    }
}

/// How a function call derives its nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Never NULL (e.g. COUNT).
    Never,
    /// May be NULL regardless of arguments (aggregates over possibly
    /// empty sets: SUM, AVG, MIN, MAX).
    Always,
    /// NULL if any argument can be NULL.
    FromArguments,
}

/// A (possibly aggregate) function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    /// The SQL function name as serialized.
    pub name: &'static str,
    /// The arguments; empty for `COUNT(*)` style calls.
    pub args: Vec<Expr>,
    /// Whether this is an aggregate function.
    pub is_aggregate: bool,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The result value type.
    pub value_type: ValueType,
    /// How nullability is derived.
    pub null_policy: NullPolicy,
}

/// A column reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// The qualifying table (or alias, or CTE) name.
    pub table: Name,
    /// The column name.
    pub name: Name,
    /// The column's value type.
    pub value_type: ValueType,
    /// Whether the column is nullable.
    pub nullable: bool,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value, serialized inline (escaped through the dialect).
    Literal(Value),
    /// A column reference, always serialized table-qualified.
    Column(ColumnRef),
    /// A named placeholder awaiting a bound value.
    Parameter {
        /// Placeholder name.
        name: &'static str,
        /// Declared value type.
        value_type: ValueType,
        /// Whether NULL may be bound.
        nullable: bool,
    },
    /// A unary operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operator application.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `operand [NOT] IN(args)`. An empty argument list is well-formed
    /// and serializes to the dialect's always-false (or always-true when
    /// negated) literal.
    In {
        /// The tested expression.
        operand: Box<Expr>,
        /// The list entries.
        args: Vec<Expr>,
        /// Whether this is NOT IN.
        negated: bool,
    },
    /// `operand [NOT] BETWEEN low AND high`.
    Between {
        /// The tested expression.
        operand: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },
    /// `operand IS [NOT] NULL`.
    IsNull {
        /// The tested expression.
        operand: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },
    /// A function call.
    Func(FuncCall),
    /// A scalar sub-select, serialized in parentheses.
    Subquery(Box<SelectStatement>),
    /// `EXISTS (sub-select)`.
    Exists(Box<SelectStatement>),
    /// A dynamic wrapper: the inclusion decision was made at statement
    /// construction time; an excluded element is omitted (or substituted)
    /// at serialization.
    Dynamic {
        /// Whether the wrapped expression takes part.
        included: bool,
        /// The wrapped expression.
        inner: Box<Expr>,
    },
}

impl Expr {
    /// The node's SQL value category, a pure function of its children.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Literal(value) => value.value_type().unwrap_or(ValueType::NoValue),
            Self::Column(col) => col.value_type,
            Self::Parameter { value_type, .. } => *value_type,
            Self::Unary { op, operand } => match op {
                UnaryOp::Not => ValueType::Boolean,
                UnaryOp::Neg => match operand.value_type() {
                    ValueType::UnsignedIntegral => ValueType::Integral,
                    other => other,
                },
            },
            Self::Binary { left, op, right } => {
                if op.is_predicate() {
                    ValueType::Boolean
                } else {
                    match op {
                        BinaryOp::Concat => ValueType::Text,
                        BinaryOp::Sub => left.value_type().subtraction_result(right.value_type()),
                        _ => left.value_type().arithmetic_result(right.value_type()),
                    }
                }
            }
            Self::In { .. } | Self::Between { .. } | Self::IsNull { .. } | Self::Exists(_) => {
                ValueType::Boolean
            }
            Self::Func(func) => func.value_type,
            Self::Subquery(select) => select
                .row_spec()
                .fields()
                .first()
                .map_or(ValueType::NoValue, |field| field.value_type),
            Self::Dynamic { inner, .. } => inner.value_type(),
        }
    }

    /// Whether the expression can evaluate to NULL: declared directly on
    /// leaves, logical OR across children on composites.
    #[must_use]
    pub fn can_be_null(&self) -> bool {
        match self {
            Self::Literal(value) => value.is_null(),
            Self::Column(col) => col.nullable,
            Self::Parameter { nullable, .. } => *nullable,
            // IS NULL and EXISTS are three-valued-logic terminators.
            Self::IsNull { .. } | Self::Exists(_) => false,
            Self::Func(func) => match func.null_policy {
                NullPolicy::Never => false,
                NullPolicy::Always => true,
                NullPolicy::FromArguments => func.args.iter().any(Self::can_be_null),
            },
            Self::Subquery(select) => select
                .row_spec()
                .fields()
                .first()
                .is_none_or(|field| field.nullable),
            _ => self.children().iter().any(|child| child.can_be_null()),
        }
    }

    /// Whether the expression contains an aggregate function call.
    #[must_use]
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Self::Func(func) => {
                func.is_aggregate || func.args.iter().any(Self::contains_aggregate)
            }
            // Sub-selects are their own aggregate context.
            Self::Subquery(_) | Self::Exists(_) => false,
            _ => self.children().iter().any(|child| child.contains_aggregate()),
        }
    }

    /// Whether an aggregate function call directly contains another one.
    #[must_use]
    pub fn has_nested_aggregate(&self) -> bool {
        match self {
            Self::Func(func) if func.is_aggregate => {
                func.args.iter().any(Self::contains_aggregate)
            }
            Self::Subquery(_) | Self::Exists(_) => false,
            _ => self
                .children()
                .iter()
                .any(|child| child.has_nested_aggregate()),
        }
    }

    /// Whether this node must be parenthesized when used as an operand of
    /// another operator. Composite operator expressions do; bare columns,
    /// literals, parameters and function calls never do.
    #[must_use]
    pub fn requires_braces(&self) -> bool {
        match self {
            Self::Binary { .. }
            | Self::Unary { .. }
            | Self::In { .. }
            | Self::Between { .. }
            | Self::IsNull { .. } => true,
            Self::Dynamic { inner, .. } => inner.requires_braces(),
            _ => false,
        }
    }

    /// The direct child nodes.
    #[must_use]
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Literal(_)
            | Self::Column(_)
            | Self::Parameter { .. }
            | Self::Subquery(_)
            | Self::Exists(_) => Vec::new(),
            Self::Unary { operand, .. } | Self::IsNull { operand, .. } => vec![operand],
            Self::Binary { left, right, .. } => vec![left, right],
            Self::In { operand, args, .. } => {
                let mut children: Vec<&Expr> = vec![operand];
                children.extend(args.iter());
                children
            }
            Self::Between {
                operand, low, high, ..
            } => vec![operand, low, high],
            Self::Func(func) => func.args.iter().collect(),
            Self::Dynamic { inner, .. } => vec![inner],
        }
    }

    /// Accumulates the tables this expression references. Dynamic
    /// wrappers contribute regardless of their inclusion flag: the
    /// statement must be well-formed for every runtime shape.
    pub fn collect_required_tables(&self, out: &mut IdSet<Name>) {
        match self {
            Self::Column(col) => {
                out.insert(col.table);
            }
            Self::Subquery(select) | Self::Exists(select) => {
                out.union_with(select.unresolved_tables());
            }
            _ => {
                for child in self.children() {
                    child.collect_required_tables(out);
                }
            }
        }
    }

    /// Accumulates the CTE names this expression references through
    /// sub-selects.
    pub fn collect_required_ctes(&self, out: &mut IdSet<Name>) {
        match self {
            Self::Subquery(select) | Self::Exists(select) => {
                out.union_with(select.unresolved_ctes());
            }
            _ => {
                for child in self.children() {
                    child.collect_required_ctes(out);
                }
            }
        }
    }

    /// Accumulates parameter declarations in serialization order,
    /// skipping pruned dynamic subtrees (their placeholders are never
    /// emitted, so nothing may bind to them).
    pub fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        if self.is_pruned() {
            return;
        }
        match self {
            Self::Parameter {
                name,
                value_type,
                nullable,
            } => out.push(ParameterSpec {
                name,
                value_type: *value_type,
                nullable: *nullable,
            }),
            Self::Subquery(select) | Self::Exists(select) => {
                out.extend(select.parameters());
            }
            _ => {
                for child in self.children() {
                    child.collect_parameters(out);
                }
            }
        }
    }

    /// Whether serialization would emit nothing for this node: an
    /// excluded dynamic wrapper, or an AND/OR both of whose sides are
    /// pruned.
    #[must_use]
    pub fn is_pruned(&self) -> bool {
        match self {
            Self::Dynamic {
                included, inner, ..
            } => !included || inner.is_pruned(),
            Self::Binary { left, op, right }
                if matches!(op, BinaryOp::And | BinaryOp::Or) =>
            {
                left.is_pruned() && right.is_pruned()
            }
            _ => false,
        }
    }

    /// The name a result column derives when no alias is given.
    #[must_use]
    pub fn suggested_name(&self) -> Option<Name> {
        match self {
            Self::Column(col) => Some(col.name),
            Self::Func(func) => Some(Name::new(func.name_lower())),
            Self::Dynamic { inner, .. } => inner.suggested_name(),
            _ => None,
        }
    }

    fn serialize_operand(&self, writer: &mut SqlWriter<'_>) {
        if self.requires_braces() {
            writer.push('(');
            self.serialize(writer);
            writer.push(')');
        } else {
            self.serialize(writer);
        }
    }
}

impl FuncCall {
    fn name_lower(&self) -> &'static str {
        match self.name {
            "COUNT" => "count",
            "SUM" => "sum",
            "AVG" => "avg",
            "MIN" => "min",
            "MAX" => "max",
            "LOWER" => "lower",
            "UPPER" => "upper",
            "TRIM" => "trim",
            other => other,
        }
    }
}

impl Serialize for Expr {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        match self {
            Self::Literal(value) => writer.push_literal(value),
            Self::Column(col) => {
                writer.push_name(col.table);
                writer.push('.');
                writer.push_name(col.name);
            }
            Self::Parameter { .. } => writer.push_placeholder(),
            Self::Unary { op, operand } => {
                writer.push_str(op.symbol());
                operand.serialize_operand(writer);
            }
            Self::Binary { left, op, right } => {
                // AND/OR reduce away pruned dynamic operands so that
                // `a.and(dynamic(false, b))` serializes exactly like `a`.
                if matches!(op, BinaryOp::And | BinaryOp::Or) {
                    match (left.is_pruned(), right.is_pruned()) {
                        (true, true) => return,
                        (true, false) => return right.serialize(writer),
                        (false, true) => return left.serialize(writer),
                        (false, false) => {}
                    }
                }
                left.serialize_operand(writer);
                writer.push_str(op.symbol());
                right.serialize_operand(writer);
            }
            Self::In {
                operand,
                args,
                negated,
            } => {
                if args.is_empty() {
                    let literal = writer.dialect().boolean_literal(*negated);
                    writer.push_str(literal);
                    return;
                }
                operand.serialize_operand(writer);
                writer.push_str(if *negated { " NOT IN(" } else { " IN(" });
                writer.push_list(args);
                writer.push(')');
            }
            Self::Between {
                operand,
                low,
                high,
                negated,
            } => {
                operand.serialize_operand(writer);
                writer.push_str(if *negated {
                    " NOT BETWEEN "
                } else {
                    " BETWEEN "
                });
                low.serialize_operand(writer);
                writer.push_str(" AND ");
                high.serialize_operand(writer);
            }
            Self::IsNull { operand, negated } => {
                operand.serialize_operand(writer);
                writer.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Self::Func(func) => {
                writer.push_str(func.name);
                writer.push('(');
                if func.distinct {
                    writer.push_str("DISTINCT ");
                }
                if func.args.is_empty() {
                    writer.push('*');
                } else {
                    writer.push_list(&func.args);
                }
                writer.push(')');
            }
            Self::Subquery(select) => {
                writer.push('(');
                select.serialize(writer);
                writer.push(')');
            }
            Self::Exists(select) => {
                writer.push_str("EXISTS (");
                select.serialize(writer);
                writer.push(')');
            }
            Self::Dynamic { included, inner } => {
                if *included {
                    inner.serialize(writer);
                }
            }
        }
    }
}
