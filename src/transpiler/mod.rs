//! SQL transpiler: query contexts to dialect-specific statements.

pub mod clauses;
pub mod conditions;
pub mod dialect;
pub mod dml;
pub mod pagination;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::context::QueryContext;
use crate::error::SqlentResult;
use crate::statement::{Statement, StatementKind};

pub use conditions::{ParamContext, ToSqlFragment};
pub use dialect::Dialect;
pub use pagination::{PagedStatements, paginate};
pub use traits::SqlGenerator;

/// Compile the statement for `kind` from a bound context.
///
/// `namespace` prefixes the statement id, e.g. `Post.selectEntity`.
pub fn build_statement(
    ctx: &QueryContext,
    kind: StatementKind,
    namespace: &str,
) -> SqlentResult<Statement> {
    let generator = ctx.dialect().generator();
    let generator = generator.as_ref();
    let (sql, params, shape) = match kind {
        StatementKind::SelectEntity => dml::select::build_select_entity(ctx, generator)?,
        StatementKind::SelectProjections => dml::select::build_select_projections(ctx, generator)?,
        StatementKind::SelectCount => dml::select::build_select_count(ctx, generator)?,
        StatementKind::SelectExists => dml::select::build_select_exists(ctx, generator)?,
        StatementKind::Insert => dml::insert::build_insert(ctx, generator)?,
        StatementKind::Update => dml::update::build_update(ctx, generator)?,
        StatementKind::Delete => dml::delete::build_delete(ctx, generator)?,
    };
    let id = format!("{}.{}", namespace, kind.id());
    // COUNT and EXISTS never render the window or the lock.
    let windowed = matches!(kind, StatementKind::SelectEntity | StatementKind::SelectProjections)
        && (ctx.row_bounds().is_some() || ctx.for_update());
    let pageable = kind.is_select() && !windowed;
    debug!("Compiled {} [{}]: {}", id, generator.name(), sql);
    Ok(Statement {
        id,
        kind,
        sql,
        bindings: params.bindings,
        shape,
        pageable,
    })
}
