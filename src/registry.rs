//! Composition root: entity metadata plus a dialect, producing statements.
//!
//! ```
//! use sqlent::prelude::*;
//!
//! let registry = SqlRegistry::new(MetadataRegistry::default(), Dialect::H2);
//! registry
//!     .register(EntityDecl::new("User").property(PropertyDecl::new("age")))
//!     .unwrap();
//! let stmt = registry.select("User").criterion(eq("age", 30)).count().unwrap();
//! assert_eq!(stmt.sql, "SELECT COUNT(*) FROM `user` t WHERE t.`age` = ?");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::{Criterion, OrderBy, Projections, Update, Value};
use crate::bound_list::RowBounds;
use crate::context::{QueryContext, ROOT};
use crate::error::SqlentResult;
use crate::metadata::{EntityDecl, EntityDescriptor, MetadataRegistry};
use crate::statement::{Statement, StatementKind};
use crate::transpiler::{Dialect, PagedStatements, build_statement, paginate};

/// Table alias of the root entity. Joins are aliased `j1..jn` in join order.
pub const ROOT_ALIAS: &str = "t";

pub struct SqlRegistry {
    metadata: MetadataRegistry,
    dialect: Dialect,
}

impl SqlRegistry {
    pub fn new(metadata: MetadataRegistry, dialect: Dialect) -> Self {
        Self { metadata, dialect }
    }

    pub fn metadata(&self) -> &MetadataRegistry {
        &self.metadata
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn register(&self, decl: EntityDecl) -> SqlentResult<()> {
        self.metadata.register(decl)
    }

    pub fn descriptor(&self, entity: &str) -> SqlentResult<Arc<EntityDescriptor>> {
        self.metadata.descriptor(entity)
    }

    /// A context with the root entity and every join bound.
    pub fn context(&self, entity: &str) -> SqlentResult<QueryContext> {
        let root = self.descriptor(entity)?;
        let mut ctx = QueryContext::new(self.dialect);
        for (i, join) in root.joins().iter().enumerate() {
            let target = self.descriptor(&join.target)?;
            ctx.bind_entity(&join.name, target, &format!("j{}", i + 1))?;
        }
        ctx.bind_entity(ROOT, root, ROOT_ALIAS)?;
        Ok(ctx)
    }

    /// A context with only the root entity bound, for statements that touch
    /// the base table alone.
    pub fn base_context(&self, entity: &str) -> SqlentResult<QueryContext> {
        let root = self.descriptor(entity)?;
        let mut ctx = QueryContext::new(self.dialect);
        ctx.bind_entity(ROOT, root, ROOT_ALIAS)?;
        Ok(ctx)
    }

    pub fn select(&self, entity: &str) -> SelectBuilder<'_> {
        SelectBuilder {
            registry: self,
            entity: entity.to_string(),
            criterion: None,
            order_by: None,
            bounds: None,
            for_update: false,
        }
    }

    pub fn insert(&self, entity: &str) -> SqlentResult<Statement> {
        let ctx = self.base_context(entity)?;
        build_statement(&ctx, StatementKind::Insert, entity)
    }

    pub fn update(&self, entity: &str, update: Update, criterion: Criterion) -> SqlentResult<Statement> {
        let mut ctx = self.base_context(entity)?;
        ctx.set_update(update);
        ctx.set_criterion(criterion);
        build_statement(&ctx, StatementKind::Update, entity)
    }

    /// Update built from an entity value keyed by property name. Every
    /// non-virtual property is set from its value; a missing or null value
    /// is nullified unless `ignore_nulls` is set, in which case it is left
    /// out.
    pub fn update_entity(
        &self,
        entity: &str,
        values: &HashMap<String, Value>,
        ignore_nulls: bool,
        criterion: Criterion,
    ) -> SqlentResult<Statement> {
        let descriptor = self.descriptor(entity)?;
        let mut update = Update::new();
        for property in descriptor.properties().iter().filter(|p| !p.is_virtual()) {
            update = match values.get(&property.name) {
                Some(value) if *value != Value::Null => update.set(&property.name, value.clone()),
                _ if ignore_nulls => update,
                _ => update.nullify(&property.name),
            };
        }
        self.update(entity, update, criterion)
    }

    pub fn delete(&self, entity: &str, criterion: Criterion) -> SqlentResult<Statement> {
        let mut ctx = self.base_context(entity)?;
        ctx.set_criterion(criterion);
        build_statement(&ctx, StatementKind::Delete, entity)
    }

    /// Count and limited forms of a compiled select.
    pub fn paginate(&self, statement: &Statement, bounds: RowBounds) -> SqlentResult<PagedStatements> {
        paginate(statement, bounds, self.dialect)
    }
}

/// Collects the query slots of a select before picking its result form.
pub struct SelectBuilder<'a> {
    registry: &'a SqlRegistry,
    entity: String,
    criterion: Option<Criterion>,
    order_by: Option<OrderBy>,
    bounds: Option<RowBounds>,
    for_update: bool,
}

impl SelectBuilder<'_> {
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = Some(criterion);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Render the window inline as a LIMIT clause.
    pub fn bounds(mut self, bounds: RowBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    pub fn entities(self) -> SqlentResult<Statement> {
        let ctx = self.context(None)?;
        build_statement(&ctx, StatementKind::SelectEntity, &self.entity)
    }

    pub fn projections(self, projections: Projections) -> SqlentResult<Statement> {
        let ctx = self.context(Some(projections))?;
        build_statement(&ctx, StatementKind::SelectProjections, &self.entity)
    }

    pub fn count(self) -> SqlentResult<Statement> {
        let ctx = self.context(None)?;
        build_statement(&ctx, StatementKind::SelectCount, &self.entity)
    }

    pub fn exists(self) -> SqlentResult<Statement> {
        let ctx = self.context(None)?;
        build_statement(&ctx, StatementKind::SelectExists, &self.entity)
    }

    fn context(&self, projections: Option<Projections>) -> SqlentResult<QueryContext> {
        let mut ctx = self.registry.context(&self.entity)?;
        if let Some(criterion) = &self.criterion {
            ctx.set_criterion(criterion.clone());
        }
        if let Some(order_by) = &self.order_by {
            ctx.set_order_by(order_by.clone());
        }
        if let Some(bounds) = self.bounds {
            ctx.set_row_bounds(bounds);
        }
        if let Some(projections) = projections {
            ctx.set_projections(projections);
        }
        ctx.set_for_update(self.for_update);
        Ok(ctx)
    }
}
