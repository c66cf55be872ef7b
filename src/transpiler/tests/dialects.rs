use pretty_assertions::assert_eq;

use super::blog_registry;
use crate::ast::builders::*;
use crate::ast::{OrderBy, Update, Value};
use crate::bound_list::RowBounds;
use crate::error::SqlentError;
use crate::metadata::{EntityDecl, JoinDecl, JoinKind, PropertyDecl};
use crate::statement::{BindingSource, Statement, StatementKind};
use crate::transpiler::{Dialect, paginate};

fn values(stmt: &Statement) -> Vec<Value> {
    stmt.bindings
        .iter()
        .filter_map(|b| match &b.source {
            BindingSource::Value(v) => Some(v.clone()),
            BindingSource::Property(_) => None,
        })
        .collect()
}

fn with_full_join(dialect: Dialect) -> crate::registry::SqlRegistry {
    let registry = blog_registry(dialect);
    registry
        .register(
            EntityDecl::new("Audit")
                .join(
                    JoinDecl::new("who", "User", eq("userId", crate::ast::Reference::of("who.id")))
                        .kind(JoinKind::FullOuter),
                )
                .property(PropertyDecl::new("userId")),
        )
        .unwrap();
    registry
}

#[test]
fn test_postgres_select() {
    let stmt = blog_registry(Dialect::Postgres)
        .select("User")
        .criterion(and(vec![eq("age", 30), like("name", "s%")]))
        .order_by(OrderBy::new().asc("id"))
        .bounds(RowBounds::new(20, 10))
        .for_update()
        .entities()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT t.\"id\" AS \"id\",t.\"a\" AS \"a\",t.\"age\" AS \"age\",t.\"name\" AS \"name\" \
         FROM \"user\" t WHERE (t.\"age\" = $1 AND t.\"name\" LIKE $2) ORDER BY t.\"id\" ASC \
         LIMIT $3 OFFSET $4 FOR UPDATE"
    );
    assert_eq!(
        values(&stmt),
        vec![Value::Int(30), Value::from("s%"), Value::Int(10), Value::Int(20)]
    );
}

#[test]
fn test_postgres_update_target_is_unqualified() {
    let stmt = blog_registry(Dialect::Postgres)
        .update("User", Update::new().add("age", 1), eq("id", 9))
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE \"user\" t SET \"age\" = t.\"age\" + $1 WHERE t.\"id\" = $2"
    );
}

#[test]
fn test_sqlite_aliases_use_as() {
    let registry = blog_registry(Dialect::SQLite);
    let stmt = registry
        .update("User", Update::new().set("name", "x"), eq("id", 1))
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE \"user\" AS t SET \"name\" = ? WHERE t.\"id\" = ?"
    );

    let stmt = registry.delete("User", is_null("name")).unwrap();
    assert_eq!(stmt.sql, "DELETE FROM \"user\" AS t WHERE t.\"name\" IS NULL");

    let stmt = registry
        .select("User")
        .bounds(RowBounds::new(0, 3))
        .count()
        .unwrap();
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM \"user\" AS t");
}

#[test]
fn test_sqlite_rejects_for_update() {
    let err = blog_registry(Dialect::SQLite)
        .select("User")
        .for_update()
        .entities()
        .unwrap_err();
    assert!(matches!(err, SqlentError::UnsupportedOperation(_)));
}

#[test]
fn test_mysql_rejects_full_join() {
    let err = with_full_join(Dialect::MySQL)
        .select("Audit")
        .count()
        .unwrap_err();
    assert!(matches!(err, SqlentError::UnsupportedOperation(_)));

    let stmt = with_full_join(Dialect::H2).select("Audit").count().unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM `audit` t FULL JOIN `user` j1 ON t.`user_id` = j1.`id`"
    );
}

#[test]
fn test_mysql_window() {
    let stmt = blog_registry(Dialect::MySQL)
        .select("User")
        .bounds(RowBounds::new(5, 15))
        .projections(crate::ast::Projections::new().max("age"))
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT MAX(t.`age`) AS `value` FROM `user` t LIMIT ?, ?"
    );
    assert_eq!(values(&stmt), vec![Value::Int(5), Value::Int(15)]);
}

#[test]
fn test_paginate_h2() {
    let registry = blog_registry(Dialect::H2);
    let stmt = registry
        .select("User")
        .criterion(eq("age", 30))
        .entities()
        .unwrap();
    let paged = registry.paginate(&stmt, RowBounds::new(1, 2)).unwrap();

    assert_eq!(paged.count.id, "User.selectEntity!selectCount");
    assert_eq!(paged.count.kind, StatementKind::SelectCount);
    assert_eq!(
        paged.count.sql,
        format!("SELECT COUNT(*) FROM ({}) __subquery", stmt.sql)
    );
    assert_eq!(values(&paged.count), vec![Value::Int(30)]);

    assert_eq!(paged.limited.id, "User.selectEntity!selectLimit");
    assert_eq!(paged.limited.kind, StatementKind::SelectEntity);
    assert_eq!(
        paged.limited.sql,
        format!("SELECT * FROM ({}) __subquery LIMIT ?, ?", stmt.sql)
    );
    assert_eq!(
        values(&paged.limited),
        vec![Value::Int(30), Value::Int(1), Value::Int(2)]
    );
    assert_eq!(paged.limited.shape, stmt.shape);
}

#[test]
fn test_paginate_postgres_continues_numbering() {
    let registry = blog_registry(Dialect::Postgres);
    let stmt = registry
        .select("User")
        .criterion(eq("age", 30))
        .count()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM \"user\" t WHERE t.\"age\" = $1"
    );
    let paged = paginate(&stmt, RowBounds::new(1, 2), Dialect::Postgres).unwrap();
    assert_eq!(
        paged.limited.sql,
        format!("SELECT * FROM ({}) __subquery LIMIT $2 OFFSET $3", stmt.sql)
    );
    assert_eq!(
        values(&paged.limited),
        vec![Value::Int(30), Value::Int(2), Value::Int(1)]
    );
}

#[test]
fn test_paginate_rejects_writes() {
    let registry = blog_registry(Dialect::H2);
    let stmt = registry.delete("User", none()).unwrap();
    assert!(matches!(
        registry.paginate(&stmt, RowBounds::default()),
        Err(SqlentError::InvalidArgument(_))
    ));
}

#[test]
fn test_paginate_rejects_limited_or_locked_selects() {
    let registry = blog_registry(Dialect::H2);
    let limited = registry
        .select("User")
        .bounds(RowBounds::new(0, 10))
        .entities()
        .unwrap();
    let locked = registry.select("User").for_update().entities().unwrap();
    for stmt in [&limited, &locked] {
        assert!(!stmt.pageable);
        assert!(matches!(
            registry.paginate(stmt, RowBounds::new(1, 2)),
            Err(SqlentError::InvalidArgument(_))
        ));
    }

    // COUNT drops the window, so it can still be wrapped.
    let count = registry
        .select("User")
        .bounds(RowBounds::new(0, 10))
        .count()
        .unwrap();
    assert!(registry.paginate(&count, RowBounds::new(1, 2)).is_ok());
}

#[test]
fn test_negative_bounds_clamp_to_zero() {
    let stmt = blog_registry(Dialect::H2)
        .select("User")
        .bounds(RowBounds::new(-4, -1))
        .count()
        .unwrap();
    // COUNT ignores the window.
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM `user` t");

    let stmt = blog_registry(Dialect::H2)
        .select("User")
        .bounds(RowBounds::new(-4, -1))
        .entities()
        .unwrap();
    assert_eq!(values(&stmt), vec![Value::Int(0), Value::Int(0)]);
}

#[test]
fn test_dialect_names() {
    assert_eq!("pg".parse::<Dialect>().unwrap(), Dialect::Postgres);
    assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySQL);
    assert_eq!(Dialect::SQLite.to_string(), "SQLite");
    assert!(matches!(
        "oracle".parse::<Dialect>(),
        Err(SqlentError::Config(_))
    ));
}
