//! DELETE SQL generation.

use super::select::Compiled;
use super::{table_sql, where_sql};
use crate::context::QueryContext;
use crate::error::SqlentResult;
use crate::statement::ResultShape;
use crate::transpiler::conditions::ParamContext;
use crate::transpiler::traits::SqlGenerator;

pub fn build_delete(ctx: &QueryContext, generator: &dyn SqlGenerator) -> SqlentResult<Compiled> {
    let mut params = ParamContext::new();
    let table = table_sql(ctx, generator)?;
    let filter = where_sql(ctx, generator, &mut params)?;
    let sql = format!("DELETE FROM {}{}", table, filter);
    Ok((
        sql,
        params,
        ResultShape::Affected {
            generated_keys: Vec::new(),
        },
    ))
}
