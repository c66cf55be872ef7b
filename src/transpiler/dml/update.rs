//! UPDATE SQL generation.

use super::select::Compiled;
use super::{table_sql, where_sql};
use crate::context::QueryContext;
use crate::error::{SqlentError, SqlentResult};
use crate::statement::ResultShape;
use crate::transpiler::conditions::{ParamContext, ToSqlFragment};
use crate::transpiler::traits::SqlGenerator;

/// Updates the base table only; joins are never rendered.
pub fn build_update(ctx: &QueryContext, generator: &dyn SqlGenerator) -> SqlentResult<Compiled> {
    let update = ctx
        .update()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| SqlentError::invalid("update needs at least one assignment"))?;
    let mut params = ParamContext::new();
    let table = table_sql(ctx, generator)?;
    let sets = update.to_sql(ctx, generator, &mut params)?;
    let filter = where_sql(ctx, generator, &mut params)?;
    let sql = format!("UPDATE {} SET {}{}", table, sets, filter);
    Ok((
        sql,
        params,
        ResultShape::Affected {
            generated_keys: Vec::new(),
        },
    ))
}
