//! Per-statement compilation context.
//!
//! A [`QueryContext`] binds the root entity (under the empty key) and every
//! joined entity (under its join name) to a table alias, holds the query
//! slots of the statement being compiled, and resolves property paths to
//! concrete `(table alias, column)` pairs. It is confined to one compilation
//! and is not `Sync`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::ast::{Criterion, OrderBy, Projections, Reference, Update};
use crate::bound_list::RowBounds;
use crate::error::{SqlentError, SqlentResult};
use crate::metadata::{EntityDescriptor, PropertyDescriptor};
use crate::transpiler::Dialect;

/// Binding key of the root entity.
pub const ROOT: &str = "";

#[derive(Debug, Clone)]
pub struct EntityBinding {
    entity: Arc<EntityDescriptor>,
    table_alias: String,
}

impl EntityBinding {
    pub fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }
}

/// Where a property path ends up after following its reference chain.
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    entity: Arc<EntityDescriptor>,
    table_alias: String,
    index: usize,
}

impl ResolvedProperty {
    pub fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }

    pub fn property(&self) -> &PropertyDescriptor {
        &self.entity.properties()[self.index]
    }
}

pub struct QueryContext {
    dialect: Dialect,
    bindings: HashMap<String, EntityBinding>,
    criterion: Option<Criterion>,
    order_by: Option<OrderBy>,
    update: Option<Update>,
    projections: Option<Projections>,
    row_bounds: Option<RowBounds>,
    for_update: bool,
    resolved: RefCell<HashMap<Reference, ResolvedProperty>>,
}

impl QueryContext {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            bindings: HashMap::new(),
            criterion: None,
            order_by: None,
            update: None,
            projections: None,
            row_bounds: None,
            for_update: false,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Bind an entity under `key` ([`ROOT`] or a join name).
    pub fn bind_entity(
        &mut self,
        key: &str,
        entity: Arc<EntityDescriptor>,
        table_alias: &str,
    ) -> SqlentResult<()> {
        if table_alias.trim().is_empty() {
            return Err(SqlentError::invalid(format!(
                "table alias for '{}' must not be blank",
                key
            )));
        }
        self.bindings.insert(
            key.to_string(),
            EntityBinding {
                entity,
                table_alias: table_alias.to_string(),
            },
        );
        self.resolved.get_mut().clear();
        Ok(())
    }

    pub fn binding(&self, key: &str) -> Option<&EntityBinding> {
        self.bindings.get(key)
    }

    pub fn root(&self) -> SqlentResult<&EntityBinding> {
        self.binding(ROOT)
            .ok_or_else(|| SqlentError::UnknownEntity("<root>".to_string()))
    }

    pub fn set_criterion(&mut self, criterion: Criterion) {
        self.criterion = Some(criterion);
    }

    pub fn criterion(&self) -> Option<&Criterion> {
        self.criterion.as_ref()
    }

    pub fn set_order_by(&mut self, order_by: OrderBy) {
        self.order_by = Some(order_by);
    }

    pub fn order_by(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    pub fn set_update(&mut self, update: Update) {
        self.update = Some(update);
    }

    pub fn update(&self) -> Option<&Update> {
        self.update.as_ref()
    }

    pub fn set_projections(&mut self, projections: Projections) {
        self.projections = Some(projections);
    }

    pub fn projections(&self) -> Option<&Projections> {
        self.projections.as_ref()
    }

    pub fn set_row_bounds(&mut self, bounds: RowBounds) {
        self.row_bounds = Some(bounds);
    }

    pub fn row_bounds(&self) -> Option<RowBounds> {
        self.row_bounds
    }

    pub fn set_for_update(&mut self, for_update: bool) {
        self.for_update = for_update;
    }

    pub fn for_update(&self) -> bool {
        self.for_update
    }

    /// Resolve a property path such as `authorName`, `joinAuthor.username`
    /// or `joinBlog.#id`.
    pub fn resolve(&self, path: &str) -> SqlentResult<ResolvedProperty> {
        self.resolve_reference(&Reference::parse(path)?)
    }

    /// Follow `reference` through virtual properties until a physical column.
    ///
    /// Each hop switches to the binding named by the next reference's join,
    /// or stays on the current binding when the next reference is bare.
    pub fn resolve_reference(&self, reference: &Reference) -> SqlentResult<ResolvedProperty> {
        if let Some(hit) = self.resolved.borrow().get(reference) {
            return Ok(hit.clone());
        }

        let mut key = reference.join().unwrap_or(ROOT).to_string();
        let mut current = reference.clone();
        let mut visited: Vec<(String, usize)> = Vec::new();
        loop {
            let binding = self.bindings.get(&key).ok_or_else(|| {
                SqlentError::UnknownEntity(if key.is_empty() {
                    "<root>".to_string()
                } else {
                    key.clone()
                })
            })?;
            let index = binding
                .entity
                .property_index(current.property())
                .ok_or_else(|| SqlentError::UnresolvableProperty(current.to_string()))?;

            if visited.iter().any(|(k, i)| *k == key && *i == index) {
                return Err(SqlentError::cycle(
                    binding.entity.name(),
                    format!("reference chain of '{}' loops at '{}'", reference, current),
                ));
            }
            visited.push((key.clone(), index));

            let property = &binding.entity.properties()[index];
            match &property.reference {
                None => {
                    let resolved = ResolvedProperty {
                        entity: Arc::clone(&binding.entity),
                        table_alias: binding.table_alias.clone(),
                        index,
                    };
                    self.resolved
                        .borrow_mut()
                        .insert(reference.clone(), resolved.clone());
                    return Ok(resolved);
                }
                Some(next) => {
                    let next = Reference::parse(next)?;
                    trace!("Reference hop {} -> {}", current, next);
                    if let Some(join) = next.join() {
                        key = join.to_string();
                    }
                    current = next;
                }
            }
        }
    }
}
