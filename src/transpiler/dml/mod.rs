//! Statement skeletons. Optional clauses are emitted only when their
//! context slot holds something that renders non-empty.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::ast::Value;
use crate::context::QueryContext;
use crate::error::{SqlentError, SqlentResult};
use crate::statement::Binding;
use crate::transpiler::conditions::{ParamContext, ToSqlFragment};
use crate::transpiler::traits::SqlGenerator;

/// Root table with its alias: `` `post` t ``.
pub(crate) fn table_sql(ctx: &QueryContext, generator: &dyn SqlGenerator) -> SqlentResult<String> {
    let root = ctx.root()?;
    Ok(generator.aliased_table(
        &generator.table(&root.entity().table_path()),
        root.table_alias(),
    ))
}

/// Root table followed by every join in dependency order.
pub(crate) fn joined_table_sql(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> SqlentResult<String> {
    let mut sql = table_sql(ctx, generator)?;
    let root = ctx.root()?;
    for join in root.entity().joins() {
        let binding = ctx
            .binding(&join.name)
            .ok_or_else(|| SqlentError::UnknownEntity(join.name.clone()))?;
        let keyword = generator.join_keyword(join.kind)?;
        let on = join.criterion.to_sql(ctx, generator, params)?;
        if on.is_empty() {
            return Err(SqlentError::metadata(
                root.entity().name(),
                format!("join '{}' has an empty criterion", join.name),
            ));
        }
        let table = generator.table(&binding.entity().table_path());
        sql.push_str(&format!(
            " {} {} ON {}",
            keyword,
            generator.aliased_table(&table, binding.table_alias()),
            on
        ));
    }
    Ok(sql)
}

pub(crate) fn where_sql(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> SqlentResult<String> {
    prefixed(" WHERE ", ctx.criterion(), ctx, generator, params)
}

pub(crate) fn order_by_sql(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> SqlentResult<String> {
    prefixed(" ORDER BY ", ctx.order_by(), ctx, generator, params)
}

pub(crate) fn limit_sql(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> String {
    match ctx.row_bounds() {
        Some(bounds) => format!(
            " {}",
            bind_window(generator, params, bounds.offset(), bounds.limit())
        ),
        None => String::new(),
    }
}

pub(crate) fn for_update_sql(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
) -> SqlentResult<String> {
    if ctx.for_update() {
        Ok(format!(" {}", generator.for_update()?))
    } else {
        Ok(String::new())
    }
}

/// Bind offset and limit in the dialect's order and render the LIMIT clause.
pub(crate) fn bind_window(
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
    offset: u64,
    limit: u64,
) -> String {
    let mut bind = |n: u64| {
        let value = Value::Int(i64::try_from(n).unwrap_or(i64::MAX));
        params.add_param(Binding::value(value), generator)
    };
    if generator.offset_first() {
        let offset = bind(offset);
        let limit = bind(limit);
        generator.limit_offset(&offset, &limit)
    } else {
        let limit = bind(limit);
        let offset = bind(offset);
        generator.limit_offset(&offset, &limit)
    }
}

fn prefixed<T: ToSqlFragment>(
    keyword: &str,
    node: Option<&T>,
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> SqlentResult<String> {
    let Some(node) = node else {
        return Ok(String::new());
    };
    let sql = node.to_sql(ctx, generator, params)?;
    if sql.is_empty() {
        Ok(sql)
    } else {
        Ok(format!("{}{}", keyword, sql))
    }
}
