//! Statement assembly tests (H2).

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use super::blog_registry;
use crate::ast::builders::*;
use crate::ast::{OrderBy, Projections, Update, Value};
use crate::bound_list::RowBounds;
use crate::error::SqlentError;
use crate::metadata::{CachePolicy, EntityDecl, PropertyDecl};
use crate::statement::{BindingSource, GeneratedKey, ResultShape, Statement, StatementKind};
use crate::transpiler::Dialect;

fn values(stmt: &Statement) -> Vec<Value> {
    stmt.bindings
        .iter()
        .map(|b| match &b.source {
            BindingSource::Value(v) => v.clone(),
            BindingSource::Property(p) => Value::from(format!("#{}", p)),
        })
        .collect()
}

const POST_LITE_FROM: &str = "FROM `post` t \
    LEFT JOIN `blog` j1 ON t.`blog_id` = j1.`id` \
    LEFT JOIN `author` j2 ON t.`author_id` = j2.`id`";

#[test]
fn test_select_entity_lists_every_property() {
    let stmt = blog_registry(Dialect::H2)
        .select("PostLite")
        .entities()
        .unwrap();
    assert_eq!(stmt.id, "PostLite.selectEntity");
    assert_eq!(stmt.kind, StatementKind::SelectEntity);
    assert_eq!(
        stmt.sql,
        format!(
            "SELECT t.`id` AS `id`,t.`blog_id` AS `blog_id`,t.`author_id` AS `author_id`,\
             t.`created_on` AS `created_on`,t.`subject` AS `subject`,t.`star` AS `star`,\
             t.`created_on` AS `create_time`,j2.`username` AS `author_name`,\
             j1.`title` AS `blog_title` {}",
            POST_LITE_FROM
        )
    );
    assert!(stmt.bindings.is_empty());
    match &stmt.shape {
        ResultShape::Entity { mappings } => {
            assert_eq!(mappings.len(), 9);
            assert!(mappings[0].id);
            assert_eq!(mappings[7].property, "authorName");
            assert_eq!(mappings[7].column, "author_name");
        }
        other => panic!("unexpected shape {:?}", other),
    }
}

#[test]
fn test_joins_follow_dependency_order() {
    let stmt = blog_registry(Dialect::H2).select("Post").count().unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM `post` t \
         LEFT JOIN `blog` j1 ON t.`blog_id` = j1.`id` \
         LEFT JOIN `author` j2 ON j2.`id` = j1.`author_id` \
         LEFT JOIN `author` j3 ON t.`author_id` = j3.`id`"
    );
}

#[test]
fn test_join_criterion_parameters_come_first() {
    let stmt = blog_registry(Dialect::H2)
        .select("PostOfSally")
        .criterion(gt("star", 3))
        .count()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM `post` t \
         INNER JOIN `author` j1 ON (t.`author_id` = j1.`id` AND j1.`username` = ?) \
         LEFT JOIN `blog` j2 ON t.`blog_id` = j2.`id` \
         LEFT JOIN `author` j3 ON t.`author_id` = j3.`id` \
         WHERE t.`star` > ?"
    );
    assert_eq!(values(&stmt), vec![Value::from("sally"), Value::Int(3)]);
}

#[test]
fn test_empty_criterion_omits_where() {
    let stmt = blog_registry(Dialect::H2)
        .select("User")
        .criterion(and(vec![none(), or(Vec::new())]))
        .entities()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT t.`id` AS `id`,t.`a` AS `a`,t.`age` AS `age`,t.`name` AS `name` FROM `user` t"
    );
}

#[test]
fn test_select_with_every_clause() {
    let stmt = blog_registry(Dialect::H2)
        .select("User")
        .criterion(ge("age", 18))
        .order_by(OrderBy::new().desc("age").asc("name"))
        .bounds(RowBounds::new(10, 5))
        .for_update()
        .entities()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT t.`id` AS `id`,t.`a` AS `a`,t.`age` AS `age`,t.`name` AS `name` \
         FROM `user` t WHERE t.`age` >= ? ORDER BY t.`age` DESC,t.`name` ASC \
         LIMIT ?, ? FOR UPDATE"
    );
    assert_eq!(
        values(&stmt),
        vec![Value::Int(18), Value::Int(10), Value::Int(5)]
    );
}

#[test]
fn test_projections() {
    let stmt = blog_registry(Dialect::H2)
        .select("PostLite")
        .projections(
            Projections::new()
                .count_as("total", "id")
                .max_as("best", "star")
                .property_as("author", "authorName")
                .count_distinct_as("blogs", "blogId"),
        )
        .unwrap();
    assert_eq!(stmt.id, "PostLite.selectProjections");
    assert_eq!(
        stmt.sql,
        format!(
            "SELECT COUNT(t.`id`) AS `total`,MAX(t.`star`) AS `best`,\
             j2.`username` AS `author`,COUNT(DISTINCT t.`blog_id`) AS `blogs` {}",
            POST_LITE_FROM
        )
    );
    assert_eq!(
        stmt.shape,
        ResultShape::Projections {
            names: vec!["total".into(), "best".into(), "author".into(), "blogs".into()],
            scalar: false,
        }
    );
}

#[test]
fn test_single_projection_is_scalar() {
    let stmt = blog_registry(Dialect::H2)
        .select("User")
        .projections(Projections::new().distinct("name"))
        .unwrap();
    assert_eq!(stmt.sql, "SELECT DISTINCT(t.`name`) AS `value` FROM `user` t");
    assert_eq!(
        stmt.shape,
        ResultShape::Projections {
            names: vec!["value".into()],
            scalar: true,
        }
    );
}

#[test]
fn test_empty_projections_rejected() {
    let err = blog_registry(Dialect::H2)
        .select("User")
        .projections(Projections::new())
        .unwrap_err();
    assert!(matches!(err, SqlentError::InvalidArgument(_)));
}

#[test]
fn test_exists() {
    let stmt = blog_registry(Dialect::H2)
        .select("User")
        .criterion(like("name", "s%"))
        .exists()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT EXISTS(SELECT 1 FROM `user` t WHERE t.`name` LIKE ?)"
    );
    assert_eq!(stmt.shape, ResultShape::Exists);
}

#[test]
fn test_insert_skips_virtual_and_generated_columns() {
    let stmt = blog_registry(Dialect::H2).insert("PostLite").unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO `post`(`blog_id`,`author_id`,`created_on`,`subject`,`star`) VALUES(?,?,?,?,?)"
    );
    assert_eq!(
        values(&stmt),
        vec![
            Value::from("#blogId"),
            Value::from("#authorId"),
            Value::from("#createdOn"),
            Value::from("#subject"),
            Value::from("#star"),
        ]
    );
    assert_eq!(
        stmt.shape,
        ResultShape::Affected {
            generated_keys: vec![GeneratedKey {
                property: "id".into(),
                column: "id".into(),
            }],
        }
    );
}

#[test]
fn test_insert_without_columns_rejected() {
    let registry = blog_registry(Dialect::H2);
    registry
        .register(EntityDecl::new("OnlyKeys").property(PropertyDecl::new("id").generated()))
        .unwrap();
    assert!(matches!(
        registry.insert("OnlyKeys"),
        Err(SqlentError::InvalidArgument(_))
    ));
}

#[test]
fn test_update() {
    let stmt = blog_registry(Dialect::H2)
        .update(
            "User",
            Update::new().set("name", "x").add("age", 1).nullify("a"),
            eq("id", 5),
        )
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE `user` t SET t.`name` = ?,t.`age` = t.`age` + ?,t.`a` = NULL WHERE t.`id` = ?"
    );
    assert_eq!(
        values(&stmt),
        vec![Value::from("x"), Value::Int(1), Value::Int(5)]
    );
}

#[test]
fn test_update_touches_base_table_only() {
    let registry = blog_registry(Dialect::H2);
    let err = registry
        .update(
            "PostLite",
            Update::new().subtract("star", 1),
            eq("authorName", "sally"),
        )
        .unwrap_err();
    assert!(matches!(err, SqlentError::UnknownEntity(ref join) if join == "joinAuthor"));

    let err = registry
        .update("PostLite", Update::new(), none())
        .unwrap_err();
    assert!(matches!(err, SqlentError::InvalidArgument(_)));
}

#[test]
fn test_update_entity_sets_physical_properties() {
    let registry = blog_registry(Dialect::H2);
    let entity: HashMap<String, Value> = [
        ("subject", Value::from("hello")),
        ("star", Value::Int(4)),
        ("blogId", Value::Null),
        ("authorName", Value::from("ignored")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let stmt = registry
        .update_entity("PostLite", &entity, true, eq("id", 9))
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE `post` t SET t.`subject` = ?,t.`star` = ? WHERE t.`id` = ?"
    );
    assert_eq!(
        values(&stmt),
        vec![Value::from("hello"), Value::Int(4), Value::Int(9)]
    );
    assert_eq!(stmt.id, "PostLite.update");

    let stmt = registry
        .update_entity("PostLite", &entity, false, eq("id", 9))
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE `post` t SET t.`id` = NULL,t.`blog_id` = NULL,t.`author_id` = NULL,\
         t.`created_on` = NULL,t.`subject` = ?,t.`star` = ? WHERE t.`id` = ?"
    );
}

#[test]
fn test_update_entity_without_values() {
    let registry = blog_registry(Dialect::H2);
    let err = registry
        .update_entity("PostLite", &HashMap::new(), true, none())
        .unwrap_err();
    assert!(matches!(err, SqlentError::InvalidArgument(_)));
}

#[test]
fn test_delete() {
    let stmt = blog_registry(Dialect::H2)
        .delete("User", is_in("id", [1, 2]))
        .unwrap();
    assert_eq!(stmt.sql, "DELETE FROM `user` t WHERE t.`id` IN(?,?)");
    assert_eq!(stmt.id, "User.delete");

    let all = blog_registry(Dialect::H2).delete("User", none()).unwrap();
    assert_eq!(all.sql, "DELETE FROM `user` t");
}

#[test]
fn test_schema_qualified_table() {
    let registry = blog_registry(Dialect::H2);
    registry
        .register(
            EntityDecl::new("Archived")
                .catalog("main")
                .schema("archive")
                .table("post")
                .property(PropertyDecl::new("id")),
        )
        .unwrap();
    let stmt = registry.delete("Archived", eq("id", 1)).unwrap();
    assert_eq!(
        stmt.sql,
        "DELETE FROM `main`.`archive`.`post` t WHERE t.`id` = ?"
    );
}

#[test]
fn test_cache_policy_is_forwarded() {
    let registry = blog_registry(Dialect::H2);
    match registry.descriptor("Author").unwrap().cache() {
        Some(CachePolicy::Own(cache)) => {
            assert!(cache.read_write);
            assert_eq!(cache.flush_interval_ms, None);
            assert_eq!(cache.properties.get("param1").map(String::as_str), Some("value1"));
        }
        other => panic!("unexpected cache {:?}", other),
    }
    assert!(registry.descriptor("User").unwrap().cache().is_none());
}
