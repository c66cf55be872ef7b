//! Bounded-fetch rewrites of an already compiled SELECT.

use tracing::debug;

use super::dml::bind_window;
use super::conditions::ParamContext;
use super::dialect::Dialect;
use crate::bound_list::RowBounds;
use crate::error::{SqlentError, SqlentResult};
use crate::statement::{ResultShape, Statement, StatementKind};

/// The two statements a bounded fetch runs: the total row count and the
/// requested window of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedStatements {
    pub count: Statement,
    pub limited: Statement,
}

/// Wrap `statement` as a subquery twice, once counted and once limited.
///
/// Only a plain select can be wrapped: one with an inline LIMIT or a
/// FOR UPDATE clause is rejected.
///
/// Both keep the original bindings in front; the limited form appends the
/// offset and limit bindings, numbered after the originals.
pub fn paginate(
    statement: &Statement,
    bounds: RowBounds,
    dialect: Dialect,
) -> SqlentResult<PagedStatements> {
    if !statement.is_select() {
        return Err(SqlentError::invalid(format!(
            "cannot paginate non-select statement '{}'",
            statement.id
        )));
    }
    if !statement.pageable {
        return Err(SqlentError::invalid(format!(
            "cannot paginate '{}': it already has a LIMIT or FOR UPDATE clause",
            statement.id
        )));
    }
    let generator = dialect.generator();

    let count = Statement {
        id: format!("{}!selectCount", statement.id),
        kind: StatementKind::SelectCount,
        sql: format!("SELECT COUNT(*) FROM ({}) __subquery", statement.sql),
        bindings: statement.bindings.clone(),
        shape: ResultShape::Count,
        pageable: false,
    };

    let mut params = ParamContext::continuing(statement.bindings.clone());
    let window = bind_window(generator.as_ref(), &mut params, bounds.offset(), bounds.limit());
    let limited = Statement {
        id: format!("{}!selectLimit", statement.id),
        kind: statement.kind,
        sql: format!("SELECT * FROM ({}) __subquery {}", statement.sql, window),
        bindings: params.bindings,
        shape: statement.shape.clone(),
        pageable: false,
    };

    debug!(
        "Paginated '{}' at offset {} limit {}",
        statement.id,
        bounds.offset(),
        bounds.limit()
    );
    Ok(PagedStatements { count, limited })
}
