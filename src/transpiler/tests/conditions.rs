//! Criterion fragment tests.

use pretty_assertions::assert_eq;

use super::blog_registry;
use crate::ast::builders::*;
use crate::ast::{Criterion, Reference, Value};
use crate::error::{SqlentError, SqlentResult};
use crate::metadata::SqlType;
use crate::statement::{Binding, BindingSource};
use crate::transpiler::{Dialect, ParamContext, ToSqlFragment};

fn render_on(entity: &str, dialect: Dialect, c: &Criterion) -> SqlentResult<(String, Vec<Binding>)> {
    let registry = blog_registry(dialect);
    let ctx = registry.context(entity)?;
    let generator = dialect.generator();
    let mut params = ParamContext::new();
    let sql = c.to_sql(&ctx, generator.as_ref(), &mut params)?;
    Ok((sql, params.bindings))
}

fn render(c: &Criterion) -> (String, Vec<Value>) {
    let (sql, bindings) = render_on("User", Dialect::H2, c).unwrap();
    let values = bindings
        .into_iter()
        .map(|b| match b.source {
            BindingSource::Value(v) => v,
            other => panic!("unexpected binding {:?}", other),
        })
        .collect();
    (sql, values)
}

#[test]
fn test_eq_literal() {
    let (sql, values) = render(&eq("age", 30));
    assert_eq!(sql, "t.`age` = ?");
    assert_eq!(values, vec![Value::Int(30)]);
}

#[test]
fn test_empty_or_is_dropped() {
    let (sql, values) = render(&and(vec![eq("a", 1), or(Vec::new())]));
    assert_eq!(sql, "(t.`a` = ?)");
    assert_eq!(values, vec![Value::Int(1)]);
}

#[test]
fn test_in_list() {
    let (sql, values) = render(&is_in("id", [1, 2, 3]));
    assert_eq!(sql, "t.`id` IN(?,?,?)");
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_empty_in_is_contradiction() {
    let (sql, values) = render(&is_in("id", Vec::<i32>::new()));
    assert_eq!(sql, "(1=0)");
    assert!(values.is_empty());
}

#[test]
fn test_empty_criteria_render_nothing() {
    assert_eq!(render(&none()).0, "");
    assert_eq!(render(&not(none())).0, "");
    assert_eq!(render(&or(vec![and(Vec::new()), not(or(Vec::new()))])).0, "");
}

#[test]
fn test_constants() {
    assert_eq!(render(&true_value()).0, "(1=1)");
    assert_eq!(render(&false_value()).0, "(1=0)");
    assert_eq!(
        render(&or(vec![false_value(), eq("a", 1)])).0,
        "((1=0) OR t.`a` = ?)"
    );
}

#[test]
fn test_operators() {
    let c = and(vec![
        ne("a", 1),
        gt("age", 2),
        ge("age", 3),
        lt("age", 4),
        le("age", 5),
        is_null("name"),
        is_not_null("name"),
    ]);
    let (sql, values) = render(&c);
    assert_eq!(
        sql,
        "(t.`a` != ? AND t.`age` > ? AND t.`age` >= ? AND t.`age` < ? AND t.`age` <= ? \
         AND t.`name` IS NULL AND t.`name` IS NOT NULL)"
    );
    assert_eq!(values.len(), 5);
}

#[test]
fn test_like_between_and_negations() {
    let (sql, values) = render(&or(vec![
        like_escape("name", "50!%%", "!"),
        not_between("age", 18, 65),
        not_like("name", "x%"),
        not_in("id", [7]),
    ]));
    assert_eq!(
        sql,
        "(t.`name` LIKE ? ESCAPE ? OR NOT(t.`age` BETWEEN ? AND ?) \
         OR NOT(t.`name` LIKE ?) OR NOT(t.`id` IN(?)))"
    );
    assert_eq!(
        values,
        vec![
            Value::from("50!%%"),
            Value::from("!"),
            Value::Int(18),
            Value::Int(65),
            Value::from("x%"),
            Value::Int(7),
        ]
    );
}

#[test]
fn test_column_argument_binds_nothing() {
    let (sql, values) = render(&eq("a", Reference::of("id")));
    assert_eq!(sql, "t.`a` = t.`id`");
    assert!(values.is_empty());
}

#[test]
fn test_bindings_carry_type_hints() {
    let (_, bindings) = render_on("User", Dialect::H2, &and(vec![eq("age", 1), eq("name", "n")])).unwrap();
    assert_eq!(bindings[0].sql_type, Some(SqlType::Integer));
    assert_eq!(bindings[0].type_handler, None);
    assert_eq!(bindings[1].type_handler.as_deref(), Some("StringTypeHandler"));
}

#[test]
fn test_virtual_properties_resolve_through_joins() {
    let (sql, _) = render_on(
        "PostLite",
        Dialect::H2,
        &and(vec![eq("authorName", "sally"), lt("#ct", 5), eq("joinBlog.#id", 3)]),
    )
    .unwrap();
    assert_eq!(
        sql,
        "(j2.`username` = ? AND t.`created_on` < ? AND j1.`id` = ?)"
    );
}

#[test]
fn test_postgres_numbering() {
    let (sql, _) = render_on(
        "User",
        Dialect::Postgres,
        &and(vec![eq("a", 1), is_in("id", [2, 3])]),
    )
    .unwrap();
    assert_eq!(sql, "(t.\"a\" = $1 AND t.\"id\" IN($2,$3))");
}

#[test]
fn test_errors() {
    let bad_not = Criterion::Junction(crate::ast::Junction {
        op: crate::ast::JunctionOp::Not,
        children: vec![eq("a", 1), eq("a", 2)],
    });
    assert!(matches!(
        render_on("User", Dialect::H2, &bad_not),
        Err(SqlentError::InvalidArgument(_))
    ));

    let bad_arity = Criterion::Condition(crate::ast::Condition {
        op: crate::ast::ConditionOp::Between,
        property: "age".into(),
        args: vec![1.into()],
    });
    assert!(matches!(
        render_on("User", Dialect::H2, &bad_arity),
        Err(SqlentError::InvalidArgument(_))
    ));

    assert!(matches!(
        render_on("User", Dialect::H2, &eq("missing", 1)),
        Err(SqlentError::UnresolvableProperty(_))
    ));
    assert!(matches!(
        render_on("User", Dialect::H2, &eq("joinNothing.a", 1)),
        Err(SqlentError::UnknownEntity(_))
    ));
}
