//! The query execution collaborator.
//!
//! The compiler never talks to a database. Composed queries are handed to a
//! [`QueryExecutor`], which returns rows as ordered cells. Connection
//! handling, transactions, cancellation and timeouts belong to the
//! implementor.

use crate::error::ExecutionError;
use crate::sql::query::Query;
use crate::value::RawValue;

/// One result row, cells in projection order.
pub type Row = Vec<RawValue>;

/// Runs composed queries.
pub trait QueryExecutor {
    fn fetch(&mut self, query: &Query) -> Result<Vec<Row>, ExecutionError>;
}

impl<F> QueryExecutor for F
where
    F: FnMut(&Query) -> Result<Vec<Row>, ExecutionError>,
{
    fn fetch(&mut self, query: &Query) -> Result<Vec<Row>, ExecutionError> {
        self(query)
    }
}

/// Check that every row has `expected` cells.
pub(crate) fn check_width(rows: &[Row], expected: usize) -> Result<(), ExecutionError> {
    match rows.iter().find(|row| row.len() != expected) {
        Some(row) => Err(ExecutionError::ColumnCount {
            expected,
            got: row.len(),
        }),
        None => Ok(()),
    }
}
