//! INSERT SQL generation.

use super::select::Compiled;
use crate::context::QueryContext;
use crate::error::{SqlentError, SqlentResult};
use crate::statement::{Binding, BindingSource, GeneratedKey, ResultShape};
use crate::transpiler::conditions::ParamContext;
use crate::transpiler::traits::SqlGenerator;

/// Physical, non-generated columns of the root entity, each bound to the
/// same-named property of the inserted value. Generated columns are left to
/// the database and reported as keys to read back.
pub fn build_insert(ctx: &QueryContext, generator: &dyn SqlGenerator) -> SqlentResult<Compiled> {
    let root = ctx.root()?;
    let entity = root.entity();
    let mut params = ParamContext::new();
    let mut columns = Vec::new();
    let mut values = Vec::new();
    let mut generated_keys = Vec::new();

    for property in entity.properties().iter().filter(|p| !p.is_virtual()) {
        if property.generated {
            generated_keys.push(GeneratedKey {
                property: property.name.clone(),
                column: property.column.clone(),
            });
            continue;
        }
        columns.push(generator.quote_identifier(&property.column));
        let binding = Binding {
            source: BindingSource::Property(property.name.clone()),
            sql_type: property.sql_type,
            type_handler: property.type_handler.clone(),
        };
        values.push(params.add_param(binding, generator));
    }

    if columns.is_empty() {
        return Err(SqlentError::invalid(format!(
            "entity '{}' has no insertable columns",
            entity.name()
        )));
    }

    let sql = format!(
        "INSERT INTO {}({}) VALUES({})",
        generator.table(&entity.table_path()),
        columns.join(","),
        values.join(",")
    );
    Ok((sql, params, ResultShape::Affected { generated_keys }))
}
