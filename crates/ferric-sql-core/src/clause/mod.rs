//! Clause composition.
//!
//! A statement is an ordered set of clause slots. Each clause has a
//! canonical missing state that serializes to nothing and contributes
//! nothing, declares the tables and CTEs it requires and provides, runs
//! its own local validity rules, and serializes itself with its leading
//! keyword (`" FROM "`, `" WHERE "`, ...). The statement types in
//! [`crate::statement`] fold these declarations into the whole-statement
//! consistency verdict.

pub mod from;
pub mod group_by;
pub mod insert_values;
pub mod limit;
pub mod order_by;
pub mod returning;
pub mod select_columns;
pub mod update_set;
pub mod where_;
pub mod with;

use crate::check::Inconsistency;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::serialize::Serialize;

/// The capability interface every clause implements.
pub trait Clause: Serialize {
    /// Whether the clause is the canonical unset placeholder.
    fn is_missing(&self) -> bool {
        false
    }

    /// Adds the tables (and aliases, and CTE names used as tables) this
    /// clause references without introducing them.
    fn required_tables(&self, _out: &mut IdSet<Name>) {}

    /// Adds the tables this clause introduces.
    fn provided_tables(&self, _out: &mut IdSet<Name>) {}

    /// Adds the CTE names this clause references.
    fn required_ctes(&self, _out: &mut IdSet<Name>) {}

    /// Adds the CTE names this clause introduces.
    fn provided_ctes(&self, _out: &mut IdSet<Name>) {}

    /// Adds this clause's parameter declarations in serialization order.
    fn collect_parameters(&self, _out: &mut Vec<ParameterSpec>) {}

    /// Runs the clause's local validity rules.
    fn check(&self) -> Result<(), Inconsistency> {
        Ok(())
    }
}
