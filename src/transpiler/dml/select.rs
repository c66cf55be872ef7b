//! SELECT SQL generation.

use super::{for_update_sql, joined_table_sql, limit_sql, order_by_sql, where_sql};
use crate::context::QueryContext;
use crate::error::{SqlentError, SqlentResult};
use crate::statement::{ResultMapping, ResultShape};
use crate::transpiler::conditions::{ParamContext, ToSqlFragment, column_sql};
use crate::transpiler::traits::SqlGenerator;

/// SQL text, bindings and shape of a compiled body, before an id is attached.
pub type Compiled = (String, ParamContext, ResultShape);

/// Every property of the root entity, virtual ones through their chain.
pub fn build_select_entity(ctx: &QueryContext, generator: &dyn SqlGenerator) -> SqlentResult<Compiled> {
    let root = ctx.root()?;
    let mut columns = Vec::with_capacity(root.entity().properties().len());
    let mut mappings = Vec::with_capacity(root.entity().properties().len());
    for property in root.entity().properties() {
        let (column, _) = column_sql(ctx, generator, &property.name)?;
        columns.push(format!(
            "{} AS {}",
            column,
            generator.quote_identifier(&property.column)
        ));
        mappings.push(ResultMapping {
            property: property.name.clone(),
            column: property.column.clone(),
            value_type: property.value_type,
            sql_type: property.sql_type,
            type_handler: property.type_handler.clone(),
            id: property.id,
        });
    }
    if columns.is_empty() {
        return Err(SqlentError::invalid(format!(
            "entity '{}' has no properties to select",
            root.entity().name()
        )));
    }

    let mut params = ParamContext::new();
    let sql = select_body(ctx, generator, &mut params, &columns.join(","))?;
    Ok((sql, params, ResultShape::Entity { mappings }))
}

pub fn build_select_projections(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
) -> SqlentResult<Compiled> {
    let projections = ctx
        .projections()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| SqlentError::invalid("select-projections needs at least one projection"))?;
    let mut params = ParamContext::new();
    let columns = projections.to_sql(ctx, generator, &mut params)?;
    let sql = select_body(ctx, generator, &mut params, &columns)?;
    let shape = ResultShape::Projections {
        names: projections.names(),
        scalar: projections.is_scalar(),
    };
    Ok((sql, params, shape))
}

pub fn build_select_count(ctx: &QueryContext, generator: &dyn SqlGenerator) -> SqlentResult<Compiled> {
    let mut params = ParamContext::new();
    let from = joined_table_sql(ctx, generator, &mut params)?;
    let filter = where_sql(ctx, generator, &mut params)?;
    let sql = format!("SELECT COUNT(*) FROM {}{}", from, filter);
    Ok((sql, params, ResultShape::Count))
}

pub fn build_select_exists(ctx: &QueryContext, generator: &dyn SqlGenerator) -> SqlentResult<Compiled> {
    let mut params = ParamContext::new();
    let from = joined_table_sql(ctx, generator, &mut params)?;
    let filter = where_sql(ctx, generator, &mut params)?;
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {}{})", from, filter);
    Ok((sql, params, ResultShape::Exists))
}

fn select_body(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
    columns: &str,
) -> SqlentResult<String> {
    let from = joined_table_sql(ctx, generator, params)?;
    let filter = where_sql(ctx, generator, params)?;
    let order = order_by_sql(ctx, generator, params)?;
    let limit = limit_sql(ctx, generator, params);
    let lock = for_update_sql(ctx, generator)?;
    Ok(format!(
        "SELECT {} FROM {}{}{}{}{}",
        columns, from, filter, order, limit, lock
    ))
}
