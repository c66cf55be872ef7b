//! ORDER BY, SET and projection list rendering.

use crate::ast::{OrderBy, ProjectionOp, Projections, Update, UpdateOp};
use crate::context::QueryContext;
use crate::error::{SqlentError, SqlentResult};
use crate::transpiler::conditions::{ParamContext, ToSqlFragment, argument_sql, column_sql};
use crate::transpiler::traits::SqlGenerator;

impl ToSqlFragment for OrderBy {
    fn to_sql(
        &self,
        ctx: &QueryContext,
        generator: &dyn SqlGenerator,
        _params: &mut ParamContext,
    ) -> SqlentResult<String> {
        let items = self
            .orders()
            .iter()
            .map(|order| -> SqlentResult<String> {
                let (column, _) = column_sql(ctx, generator, &order.property)?;
                let direction = if order.descending { "DESC" } else { "ASC" };
                Ok(format!("{} {}", column, direction))
            })
            .collect::<SqlentResult<Vec<_>>>()?;
        Ok(items.join(","))
    }
}

impl ToSqlFragment for Update {
    fn to_sql(
        &self,
        ctx: &QueryContext,
        generator: &dyn SqlGenerator,
        params: &mut ParamContext,
    ) -> SqlentResult<String> {
        let mut items = Vec::with_capacity(self.assignments().len());
        for set in self.assignments() {
            let (column, target) = column_sql(ctx, generator, &set.property)?;
            let lhs = generator.assignment_target(target.table_alias(), &target.property().column);
            let expected = if set.op == UpdateOp::Nullify { 0 } else { 1 };
            if set.args.len() != expected {
                return Err(SqlentError::invalid(format!(
                    "{:?} on '{}' takes {} argument(s), got {}",
                    set.op,
                    set.property,
                    expected,
                    set.args.len()
                )));
            }
            let sql = match set.op {
                UpdateOp::Nullify => format!("{} = NULL", lhs),
                UpdateOp::Set => {
                    let arg = argument_sql(ctx, generator, params, &target, &set.args[0])?;
                    format!("{} = {}", lhs, arg)
                }
                UpdateOp::Add => {
                    let arg = argument_sql(ctx, generator, params, &target, &set.args[0])?;
                    format!("{} = {} + {}", lhs, column, arg)
                }
                UpdateOp::Subtract => {
                    let arg = argument_sql(ctx, generator, params, &target, &set.args[0])?;
                    format!("{} = {} - {}", lhs, column, arg)
                }
            };
            items.push(sql);
        }
        Ok(items.join(","))
    }
}

impl ToSqlFragment for Projections {
    fn to_sql(
        &self,
        ctx: &QueryContext,
        generator: &dyn SqlGenerator,
        _params: &mut ParamContext,
    ) -> SqlentResult<String> {
        let items = self
            .entries()
            .iter()
            .map(|(name, projection)| -> SqlentResult<String> {
                let (column, _) = column_sql(ctx, generator, &projection.property)?;
                let expr = match projection.op {
                    ProjectionOp::Property => column,
                    ProjectionOp::Distinct => format!("DISTINCT({})", column),
                    ProjectionOp::Count => format!("COUNT({})", column),
                    ProjectionOp::CountDistinct => format!("COUNT(DISTINCT {})", column),
                    ProjectionOp::Max => format!("MAX({})", column),
                    ProjectionOp::Min => format!("MIN({})", column),
                    ProjectionOp::Sum => format!("SUM({})", column),
                    ProjectionOp::Avg => format!("AVG({})", column),
                };
                Ok(format!("{} AS {}", expr, generator.quote_identifier(name)))
            })
            .collect::<SqlentResult<Vec<_>>>()?;
        Ok(items.join(","))
    }
}
