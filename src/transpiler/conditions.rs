//! Criterion rendering.

use crate::ast::{Arg, Condition, ConditionOp, Criterion, JunctionOp};
use crate::context::{QueryContext, ResolvedProperty};
use crate::error::{SqlentError, SqlentResult};
use crate::statement::{Binding, BindingSource};
use crate::transpiler::traits::SqlGenerator;

/// Placeholder numbering and the bindings emitted so far.
#[derive(Debug, Clone, Default)]
pub struct ParamContext {
    /// Current parameter index (1-based for Postgres $1, $2, etc.)
    pub index: usize,
    /// Collected bindings in placeholder order
    pub bindings: Vec<Binding>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after bindings an earlier statement already emitted.
    pub fn continuing(bindings: Vec<Binding>) -> Self {
        Self {
            index: bindings.len(),
            bindings,
        }
    }

    /// Add a binding and return the placeholder for it.
    pub fn add_param(&mut self, binding: Binding, generator: &dyn SqlGenerator) -> String {
        self.index += 1;
        self.bindings.push(binding);
        generator.placeholder(self.index)
    }
}

/// Rendering of an AST node against a bound [`QueryContext`].
pub trait ToSqlFragment {
    /// Render the node. An empty string means "no clause".
    fn to_sql(
        &self,
        ctx: &QueryContext,
        generator: &dyn SqlGenerator,
        params: &mut ParamContext,
    ) -> SqlentResult<String>;
}

/// Resolve `path` and render its qualified column.
pub(crate) fn column_sql(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    path: &str,
) -> SqlentResult<(String, ResolvedProperty)> {
    let resolved = ctx.resolve(path)?;
    let sql = generator.column(resolved.table_alias(), &resolved.property().column);
    Ok((sql, resolved))
}

/// Render an argument: a placeholder typed after `target`, or the column of
/// a referenced property.
pub(crate) fn argument_sql(
    ctx: &QueryContext,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
    target: &ResolvedProperty,
    arg: &Arg,
) -> SqlentResult<String> {
    match arg {
        Arg::Ref(reference) => {
            let resolved = ctx.resolve_reference(reference)?;
            Ok(generator.column(resolved.table_alias(), &resolved.property().column))
        }
        Arg::Value(value) => {
            let property = target.property();
            let binding = Binding {
                source: BindingSource::Value(value.clone()),
                sql_type: property.sql_type,
                type_handler: property.type_handler.clone(),
            };
            Ok(params.add_param(binding, generator))
        }
    }
}

impl ToSqlFragment for Condition {
    fn to_sql(
        &self,
        ctx: &QueryContext,
        generator: &dyn SqlGenerator,
        params: &mut ParamContext,
    ) -> SqlentResult<String> {
        if let Some(expected) = self.op.arity() {
            if self.args.len() != expected {
                return Err(SqlentError::invalid(format!(
                    "{:?} on '{}' takes {} argument(s), got {}",
                    self.op,
                    self.property,
                    expected,
                    self.args.len()
                )));
            }
        }

        let (column, target) = column_sql(ctx, generator, &self.property)?;
        let arg = |i: usize, params: &mut ParamContext| {
            argument_sql(ctx, generator, params, &target, &self.args[i])
        };

        let sql = match self.op {
            ConditionOp::Eq => format!("{} = {}", column, arg(0, params)?),
            ConditionOp::Ne => format!("{} != {}", column, arg(0, params)?),
            ConditionOp::Gt => format!("{} > {}", column, arg(0, params)?),
            ConditionOp::Ge => format!("{} >= {}", column, arg(0, params)?),
            ConditionOp::Lt => format!("{} < {}", column, arg(0, params)?),
            ConditionOp::Le => format!("{} <= {}", column, arg(0, params)?),
            ConditionOp::IsNull => format!("{} IS NULL", column),
            ConditionOp::IsNotNull => format!("{} IS NOT NULL", column),
            ConditionOp::Like => format!("{} LIKE {}", column, arg(0, params)?),
            ConditionOp::LikeEscape => {
                let pattern = arg(0, params)?;
                let escape = arg(1, params)?;
                format!("{} LIKE {} ESCAPE {}", column, pattern, escape)
            }
            ConditionOp::Between => {
                let low = arg(0, params)?;
                let high = arg(1, params)?;
                format!("{} BETWEEN {} AND {}", column, low, high)
            }
            // Nothing is a member of the empty set.
            ConditionOp::In if self.args.is_empty() => generator.constant(false).to_string(),
            ConditionOp::In => {
                let items = (0..self.args.len())
                    .map(|i| arg(i, params))
                    .collect::<SqlentResult<Vec<_>>>()?;
                format!("{} IN({})", column, items.join(","))
            }
        };
        Ok(sql)
    }
}

impl ToSqlFragment for Criterion {
    fn to_sql(
        &self,
        ctx: &QueryContext,
        generator: &dyn SqlGenerator,
        params: &mut ParamContext,
    ) -> SqlentResult<String> {
        match self {
            Criterion::Condition(c) => c.to_sql(ctx, generator, params),
            Criterion::Constant(value) => Ok(generator.constant(*value).to_string()),
            Criterion::Junction(j) => match j.op {
                JunctionOp::And | JunctionOp::Or => {
                    let separator = if j.op == JunctionOp::And { " AND " } else { " OR " };
                    let mut parts = Vec::with_capacity(j.children.len());
                    for child in &j.children {
                        let sql = child.to_sql(ctx, generator, params)?;
                        if !sql.is_empty() {
                            parts.push(sql);
                        }
                    }
                    if parts.is_empty() {
                        Ok(String::new())
                    } else {
                        Ok(format!("({})", parts.join(separator)))
                    }
                }
                JunctionOp::Not => {
                    let [child] = j.children.as_slice() else {
                        return Err(SqlentError::invalid(format!(
                            "NOT takes exactly one criterion, got {}",
                            j.children.len()
                        )));
                    };
                    let sql = child.to_sql(ctx, generator, params)?;
                    if sql.is_empty() {
                        Ok(sql)
                    } else {
                        Ok(format!("NOT({})", sql))
                    }
                }
            },
        }
    }
}
