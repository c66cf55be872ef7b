//! Concurrent store of declarations and their resolved descriptors.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

use super::declarations::EntityDecl;
use super::descriptor::EntityDescriptor;
use super::naming::{Naming, NamingStrategy};
use super::resolve::resolve;
use crate::error::{SqlentError, SqlentResult};

/// Declarations keyed by entity name, plus a compute-if-absent cache of
/// resolved descriptors.
///
/// Racing resolutions of the same entity may both compute, but only the
/// first published descriptor is ever handed out.
pub struct MetadataRegistry {
    declarations: DashMap<String, EntityDecl>,
    descriptors: DashMap<String, Arc<EntityDescriptor>>,
    naming: Box<dyn NamingStrategy>,
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new(Naming::default())
    }
}

impl MetadataRegistry {
    pub fn new(naming: Naming) -> Self {
        Self::with_strategy(naming.strategy())
    }

    pub fn with_strategy(naming: Box<dyn NamingStrategy>) -> Self {
        Self {
            declarations: DashMap::new(),
            descriptors: DashMap::new(),
            naming,
        }
    }

    /// Add a declaration. Names are unique for the registry's lifetime.
    pub fn register(&self, decl: EntityDecl) -> SqlentResult<()> {
        if decl.name.trim().is_empty() {
            return Err(SqlentError::invalid("entity name must not be blank"));
        }
        match self.declarations.entry(decl.name.clone()) {
            Entry::Occupied(_) => Err(SqlentError::metadata(
                &decl.name,
                "entity declared twice",
            )),
            Entry::Vacant(slot) => {
                debug!("Registered entity '{}'", decl.name);
                slot.insert(decl);
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Registered entity names, sorted.
    pub fn entity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.declarations.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn declaration(&self, name: &str) -> Option<EntityDecl> {
        self.declarations.get(name).map(|d| d.value().clone())
    }

    /// The resolved descriptor for `name`, resolving and publishing it on
    /// first use.
    pub fn descriptor(&self, name: &str) -> SqlentResult<Arc<EntityDescriptor>> {
        if let Some(published) = self.descriptors.get(name) {
            return Ok(Arc::clone(published.value()));
        }

        let lineage = self.lineage(name)?;
        let resolved = Arc::new(resolve(&lineage, self.naming.as_ref())?);

        match self.descriptors.entry(name.to_string()) {
            Entry::Occupied(published) => {
                warn!("Descriptor for '{}' was published concurrently; using the first", name);
                Ok(Arc::clone(published.get()))
            }
            Entry::Vacant(slot) => {
                debug!("Published descriptor for '{}'", name);
                slot.insert(Arc::clone(&resolved));
                Ok(resolved)
            }
        }
    }

    /// The entity followed by its ancestors, nearest first.
    fn lineage(&self, name: &str) -> SqlentResult<Vec<EntityDecl>> {
        let mut lineage = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(name.to_string());
        while let Some(entity) = current {
            if !seen.insert(entity.clone()) {
                return Err(SqlentError::metadata(
                    name,
                    format!("inheritance cycle through '{}'", entity),
                ));
            }
            let decl = match self.declaration(&entity) {
                Some(decl) => decl,
                None if lineage.is_empty() => {
                    return Err(SqlentError::UnknownEntity(entity));
                }
                None => {
                    return Err(SqlentError::metadata(
                        name,
                        format!("unknown ancestor '{}'", entity),
                    ));
                }
            };
            current = decl.extends.clone();
            lineage.push(decl);
        }
        Ok(lineage)
    }
}
