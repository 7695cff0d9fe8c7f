//! LIMIT and OFFSET.

use crate::clause::Clause;
use crate::serialize::{Serialize, SqlWriter};

/// The LIMIT/OFFSET clause pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimitClause {
    limit: Option<u64>,
    offset: Option<u64>,
}

impl LimitClause {
    /// Sets the row limit.
    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    /// Sets the row offset.
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }
}

impl Serialize for LimitClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        if let Some(limit) = self.limit {
            writer.push_str(" LIMIT ");
            writer.push_str(&limit.to_string());
        }
        if let Some(offset) = self.offset {
            writer.push_str(" OFFSET ");
            writer.push_str(&offset.to_string());
        }
    }
}

impl Clause for LimitClause {
    fn is_missing(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}
