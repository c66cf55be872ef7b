//! Declarations → [`EntityDescriptor`].

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use super::cache::CachePolicy;
use super::declarations::{EntityDecl, JoinDecl};
use super::descriptor::{EntityDescriptor, JoinDescriptor, PropertyDescriptor};
use super::naming::NamingStrategy;
use crate::error::{SqlentError, SqlentResult};

/// Resolve an entity from its declaration lineage.
///
/// `lineage[0]` is the concrete entity, followed by its ancestors from the
/// nearest to the most distant. Reference chains are recorded, not followed.
pub fn resolve(
    lineage: &[EntityDecl],
    naming: &dyn NamingStrategy,
) -> SqlentResult<EntityDescriptor> {
    let concrete = lineage
        .first()
        .ok_or_else(|| SqlentError::invalid("entity lineage must not be empty"))?;
    let entity = concrete.name.as_str();
    if entity.trim().is_empty() {
        return Err(SqlentError::invalid("entity name must not be blank"));
    }

    let table = lineage
        .iter()
        .find_map(|d| d.table.clone())
        .unwrap_or_else(|| naming.table_name(entity));
    let schema = lineage.iter().find_map(|d| d.schema.clone());
    let catalog = lineage.iter().find_map(|d| d.catalog.clone());
    let cache = resolve_cache(lineage)?;
    let properties = resolve_properties(entity, lineage, naming)?;
    let joins = resolve_joins(entity, lineage)?;

    debug!(
        "Resolved entity '{}' -> table '{}', {} properties, joins [{}]",
        entity,
        table,
        properties.len(),
        joins
            .iter()
            .map(|j| j.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(EntityDescriptor::new(
        entity.to_string(),
        table,
        schema,
        catalog,
        cache,
        joins,
        properties,
    ))
}

fn resolve_cache(lineage: &[EntityDecl]) -> SqlentResult<Option<CachePolicy>> {
    for decl in lineage {
        match (&decl.cache, &decl.cache_ref) {
            (Some(_), Some(_)) => {
                return Err(SqlentError::metadata(
                    &decl.name,
                    "cache and cache_ref are mutually exclusive",
                ));
            }
            (Some(cache), None) => return Ok(Some(CachePolicy::Own(cache.clone()))),
            (None, Some(namespace)) => return Ok(Some(CachePolicy::Shared(namespace.clone()))),
            (None, None) => {}
        }
    }
    Ok(None)
}

fn resolve_properties(
    entity: &str,
    lineage: &[EntityDecl],
    naming: &dyn NamingStrategy,
) -> SqlentResult<Vec<PropertyDescriptor>> {
    let mut properties: Vec<PropertyDescriptor> = Vec::new();

    // Ancestors first so a derived declaration replaces the inherited one in place.
    for decl in lineage.iter().rev() {
        let mut seen = HashSet::new();
        for p in &decl.properties {
            if p.name.trim().is_empty() {
                return Err(SqlentError::metadata(&decl.name, "property name must not be blank"));
            }
            if !seen.insert(p.name.as_str()) {
                return Err(SqlentError::metadata(
                    &decl.name,
                    format!("property '{}' declared twice", p.name),
                ));
            }
            let existing = properties.iter().position(|e| e.name == p.name);
            if p.ignore {
                if let Some(i) = existing {
                    properties.remove(i);
                }
                continue;
            }
            if p.generated && p.reference.is_some() {
                return Err(SqlentError::metadata(
                    entity,
                    format!("generated property '{}' must not have a reference", p.name),
                ));
            }
            if let Some(reference) = &p.reference {
                if reference.trim().is_empty() {
                    return Err(SqlentError::metadata(
                        entity,
                        format!("property '{}' has a blank reference", p.name),
                    ));
                }
            }
            let resolved = PropertyDescriptor {
                name: p.name.clone(),
                aliases: p.aliases.iter().cloned().collect::<BTreeSet<_>>(),
                value_type: p.value_type,
                column: p
                    .column
                    .clone()
                    .unwrap_or_else(|| naming.column_name(entity, &p.name)),
                reference: p.reference.clone(),
                id: p.id,
                generated: p.generated,
                sql_type: p.sql_type,
                type_handler: p.type_handler.clone(),
            };
            match existing {
                Some(i) => properties[i] = resolved,
                None => properties.push(resolved),
            }
        }
    }

    check_aliases(entity, &properties)?;
    Ok(properties)
}

fn check_aliases(entity: &str, properties: &[PropertyDescriptor]) -> SqlentResult<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for p in properties {
        for alias in &p.aliases {
            if let Some(owner) = owners.insert(alias.as_str(), p.name.as_str()) {
                return Err(SqlentError::metadata(
                    entity,
                    format!(
                        "alias '#{}' declared by both '{}' and '{}'",
                        alias, owner, p.name
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn resolve_joins(entity: &str, lineage: &[EntityDecl]) -> SqlentResult<Vec<JoinDescriptor>> {
    // Most-derived first: the first declaration of a name wins.
    let mut declared: Vec<&JoinDecl> = Vec::new();
    for decl in lineage {
        let mut seen = HashSet::new();
        for join in &decl.joins {
            if join.name.trim().is_empty() {
                return Err(SqlentError::metadata(&decl.name, "join name must not be blank"));
            }
            if !seen.insert(join.name.as_str()) {
                return Err(SqlentError::metadata(
                    &decl.name,
                    format!("join '{}' declared twice", join.name),
                ));
            }
            if declared.iter().all(|j| j.name != join.name) {
                declared.push(join);
            }
        }
    }

    for join in &declared {
        if join.criterion.is_empty() {
            return Err(SqlentError::metadata(
                entity,
                format!("join '{}' has an empty criterion", join.name),
            ));
        }
    }

    let order = sort_joins(entity, &declared)?;
    Ok(order
        .into_iter()
        .map(|i| {
            let join = declared[i];
            JoinDescriptor {
                name: join.name.clone(),
                target: join.target.clone(),
                kind: join.kind,
                criterion: join.criterion.clone(),
            }
        })
        .collect())
}

/// Kahn's algorithm over "join depends on referenced join" edges.
///
/// Ties are broken by declaration order so the output is reproducible.
fn sort_joins(entity: &str, joins: &[&JoinDecl]) -> SqlentResult<Vec<usize>> {
    let index: HashMap<&str, usize> = joins
        .iter()
        .enumerate()
        .map(|(i, j)| (j.name.as_str(), i))
        .collect();

    let mut pending = vec![0usize; joins.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); joins.len()];
    for (i, join) in joins.iter().enumerate() {
        for name in join.criterion.reference_names() {
            if name == join.name {
                continue;
            }
            let target = *index
                .get(name.as_str())
                .ok_or_else(|| SqlentError::UnresolvableJoin {
                    entity: entity.to_string(),
                    join: join.name.clone(),
                    target: name.clone(),
                })?;
            pending[i] += 1;
            dependents[target].push(i);
        }
    }

    let mut order = Vec::with_capacity(joins.len());
    let mut done = vec![false; joins.len()];
    while order.len() < joins.len() {
        let next = (0..joins.len()).find(|&i| !done[i] && pending[i] == 0);
        let Some(next) = next else {
            let stuck: Vec<&str> = (0..joins.len())
                .filter(|&i| !done[i])
                .map(|i| joins[i].name.as_str())
                .collect();
            return Err(SqlentError::cycle(
                entity,
                format!("joins [{}] depend on each other", stuck.join(", ")),
            ));
        };
        done[next] = true;
        order.push(next);
        for &dependent in &dependents[next] {
            pending[dependent] -= 1;
        }
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Reference;
    use crate::ast::builders::*;
    use crate::metadata::cache::CacheConfig;
    use crate::metadata::declarations::PropertyDecl;
    use crate::metadata::naming::SnakeCaseNaming;

    fn join_on(name: &str, other: &str) -> JoinDecl {
        JoinDecl::new(
            name,
            "Target",
            eq("id", Reference::of(&format!("{}.id", other))),
        )
    }

    fn join_names(d: &EntityDescriptor) -> Vec<&str> {
        d.joins().iter().map(|j| j.name.as_str()).collect()
    }

    #[test]
    fn test_default_names() {
        let decl = EntityDecl::new("PostLite")
            .property(PropertyDecl::new("createdOn"))
            .property(PropertyDecl::new("title").column("subject"));
        let d = resolve(&[decl], &SnakeCaseNaming).unwrap();
        assert_eq!(d.table(), "post_lite");
        assert_eq!(d.properties()[0].column, "created_on");
        assert_eq!(d.properties()[1].column, "subject");
    }

    #[test]
    fn test_dependent_join_follows_its_dependency() {
        let decl = EntityDecl::new("E")
            .join(JoinDecl::new(
                "a",
                "A",
                eq("a.x", Reference::of("b.y")),
            ))
            .join(JoinDecl::new("b", "B", eq("b.id", Reference::of("id"))));
        let d = resolve(&[decl], &SnakeCaseNaming).unwrap();
        assert_eq!(join_names(&d), vec!["b", "a"]);
    }

    #[test]
    fn test_independent_joins_keep_declaration_order() {
        let decl = EntityDecl::new("E")
            .join(JoinDecl::new("z", "Z", eq("z.id", Reference::of("zid"))))
            .join(JoinDecl::new("m", "M", eq("m.id", Reference::of("mid"))))
            .join(JoinDecl::new("a", "A", eq("a.id", Reference::of("aid"))));
        let d = resolve(&[decl], &SnakeCaseNaming).unwrap();
        assert_eq!(join_names(&d), vec!["z", "m", "a"]);
    }

    #[test]
    fn test_cycle_all_rotations() {
        let joins = [
            join_on("join1", "join2"),
            join_on("join2", "join3"),
            join_on("join3", "join1"),
        ];
        for start in 0..3 {
            let mut decl = EntityDecl::new("Cyclic");
            for k in 0..3 {
                decl = decl.join(joins[(start + k) % 3].clone());
            }
            let err = resolve(&[decl], &SnakeCaseNaming).unwrap_err();
            assert!(
                matches!(&err, SqlentError::Cycle { entity, .. } if entity == "Cyclic"),
                "rotation {} gave {:?}",
                start,
                err
            );
        }
    }

    #[test]
    fn test_unknown_join_reference() {
        let decl = EntityDecl::new("E").join(join_on("a", "missing"));
        let err = resolve(&[decl], &SnakeCaseNaming).unwrap_err();
        assert!(matches!(
            err,
            SqlentError::UnresolvableJoin { ref join, ref target, .. }
                if join == "a" && target == "missing"
        ));
    }

    #[test]
    fn test_derived_join_wins() {
        let base = EntityDecl::new("Base")
            .join(JoinDecl::new("j", "A", eq("j.id", Reference::of("baseId"))));
        let derived = EntityDecl::new("Derived")
            .extends("Base")
            .join(JoinDecl::new("j", "A", eq("j.id", Reference::of("derivedId"))));
        let d = resolve(&[derived.clone(), base], &SnakeCaseNaming).unwrap();
        assert_eq!(d.joins().len(), 1);
        assert_eq!(d.joins()[0].criterion, derived.joins[0].criterion);
    }

    #[test]
    fn test_inherited_properties_replaced_in_place() {
        let base = EntityDecl::new("Base")
            .property(PropertyDecl::new("id").id())
            .property(PropertyDecl::new("name"))
            .property(PropertyDecl::new("secret"));
        let derived = EntityDecl::new("Derived")
            .property(PropertyDecl::new("name").column("display_name"))
            .property(PropertyDecl::new("secret").ignore())
            .property(PropertyDecl::new("extra"));
        let d = resolve(&[derived, base], &SnakeCaseNaming).unwrap();
        let names: Vec<&str> = d.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "extra"]);
        assert_eq!(d.property("name").unwrap().column, "display_name");
    }

    #[test]
    fn test_generated_reference_rejected() {
        let decl = EntityDecl::new("E")
            .property(PropertyDecl::new("id").generated().reference("j.id"));
        assert!(matches!(
            resolve(&[decl], &SnakeCaseNaming),
            Err(SqlentError::Metadata { .. })
        ));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let decl = EntityDecl::new("E")
            .property(PropertyDecl::new("a").alias("x"))
            .property(PropertyDecl::new("b").alias("x"));
        let err = resolve(&[decl], &SnakeCaseNaming).unwrap_err();
        assert!(err.to_string().contains("'#x'"));
    }

    #[test]
    fn test_alias_lookup() {
        let decl = EntityDecl::new("E").property(PropertyDecl::new("id").alias("id").alias("pk"));
        let d = resolve(&[decl], &SnakeCaseNaming).unwrap();
        assert_eq!(d.property("#pk").map(|p| p.name.as_str()), Some("id"));
        assert!(d.property("#nope").is_none());
    }

    #[test]
    fn test_cache_exclusive() {
        let decl = EntityDecl::new("E").cache(CacheConfig::new()).cache_ref("Other");
        assert!(matches!(
            resolve(&[decl], &SnakeCaseNaming),
            Err(SqlentError::Metadata { .. })
        ));
    }

    #[test]
    fn test_empty_join_criterion_rejected() {
        let decl = EntityDecl::new("E").join(JoinDecl::new("j", "A", none()));
        assert!(matches!(
            resolve(&[decl], &SnakeCaseNaming),
            Err(SqlentError::Metadata { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let decl = EntityDecl::new("E")
            .property(PropertyDecl::new("id"))
            .join(JoinDecl::new("j", "A", eq("j.id", Reference::of("id"))));
        let a = resolve(&[decl.clone()], &SnakeCaseNaming).unwrap();
        let b = resolve(&[decl], &SnakeCaseNaming).unwrap();
        assert_eq!(a, b);
    }
}
