//! Predicate builder for client search.
//!
//! # Invariants
//! - Criteria are visited in one fixed order, so equal filters always produce
//!   byte-identical SQL.
//! - Values only ever travel as bind parameters.

use crate::model::client::{supplied, ClientFilter};
use rusqlite::types::Value;

/// Predicate fragment plus positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Zero or more ` AND <column> = ?` terms, meant to follow `WHERE 1 = 1`.
    pub sql: String,
    pub bind_values: Vec<Value>,
}

impl FilterClause {
    pub fn is_empty(&self) -> bool {
        self.bind_values.is_empty()
    }
}

/// Builds the AND-combined equality predicate for every supplied criterion.
pub fn build_filter_clause(filter: &ClientFilter) -> FilterClause {
    let mut sql = String::new();
    let mut bind_values = Vec::new();

    // Order here is the order of the generated predicate.
    let criteria = [
        ("c.first_name", &filter.first_name),
        ("c.last_name", &filter.last_name),
        ("c.email", &filter.email),
        ("p.phone", &filter.phone),
    ];

    for (column, value) in criteria {
        if let Some(value) = supplied(value) {
            sql.push_str(" AND ");
            sql.push_str(column);
            sql.push_str(" = ?");
            bind_values.push(Value::Text(value.to_string()));
        }
    }

    FilterClause { sql, bind_values }
}
