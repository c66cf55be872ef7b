//! Execution boundary.
//!
//! sqlent stops at the compiled [`Statement`]. Whatever runs statements
//! against a database implements [`StatementExecutor`]; [`fetch_bounded`]
//! composes the paginated count and window queries on top of it.

use std::collections::HashMap;

use tracing::debug;

use crate::bound_list::{BoundList, RowBounds};
use crate::error::{SqlentError, SqlentResult};
use crate::statement::Statement;
use crate::transpiler::{Dialect, paginate};

/// A fetched row keyed by result column name.
pub type Row = HashMap<String, serde_json::Value>;

/// Runs compiled statements.
pub trait StatementExecutor {
    /// Fetch every row the statement yields.
    fn query_rows(&mut self, statement: &Statement) -> SqlentResult<Vec<Row>>;

    /// Fetch the single integer a counting statement yields.
    fn query_count(&mut self, statement: &Statement) -> SqlentResult<i64>;
}

/// Run the count and limited forms of `statement` and assemble a
/// [`BoundList`]. Negative bounds clamp to zero.
pub fn fetch_bounded<E: StatementExecutor + ?Sized>(
    executor: &mut E,
    statement: &Statement,
    offset: i64,
    limit: i64,
    dialect: Dialect,
) -> SqlentResult<BoundList<Row>> {
    let bounds = RowBounds::new(offset, limit);
    let paged = paginate(statement, bounds, dialect)?;

    let total = executor.query_count(&paged.count)?;
    if total < 0 {
        return Err(SqlentError::invalid(format!(
            "'{}' returned a negative count {}",
            paged.count.id, total
        )));
    }
    let rows = executor.query_rows(&paged.limited)?;
    debug!(
        "Fetched {} of {} rows for '{}'",
        rows.len(),
        total,
        statement.id
    );
    Ok(BoundList::new(rows, bounds, total))
}
