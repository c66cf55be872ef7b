//! Criterion builders.
//!
//! ```
//! use sqlent::ast::builders::*;
//! use sqlent::ast::Reference;
//!
//! let c = and(vec![
//!     eq("authorId", Reference::of("joinAuthor.#id")),
//!     not_in("section", ["draft", "spam"]),
//! ]);
//! assert_eq!(c.reference_names().len(), 1);
//! ```

use crate::ast::{Arg, Condition, ConditionOp, Criterion, Junction, JunctionOp};

fn make_condition(property: &str, op: ConditionOp, args: Vec<Arg>) -> Criterion {
    Criterion::Condition(Condition {
        op,
        property: property.to_string(),
        args,
    })
}

fn make_junction(op: JunctionOp, children: impl IntoIterator<Item = Criterion>) -> Criterion {
    Criterion::Junction(Junction {
        op,
        children: children.into_iter().collect(),
    })
}

/// `property = arg`
pub fn eq(property: &str, arg: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Eq, vec![arg.into()])
}

pub fn ne(property: &str, arg: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Ne, vec![arg.into()])
}

pub fn gt(property: &str, arg: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Gt, vec![arg.into()])
}

pub fn ge(property: &str, arg: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Ge, vec![arg.into()])
}

pub fn lt(property: &str, arg: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Lt, vec![arg.into()])
}

pub fn le(property: &str, arg: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Le, vec![arg.into()])
}

pub fn is_null(property: &str) -> Criterion {
    make_condition(property, ConditionOp::IsNull, Vec::new())
}

pub fn is_not_null(property: &str) -> Criterion {
    make_condition(property, ConditionOp::IsNotNull, Vec::new())
}

pub fn like(property: &str, pattern: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Like, vec![pattern.into()])
}

/// `property LIKE pattern ESCAPE escape`
pub fn like_escape(property: &str, pattern: impl Into<Arg>, escape: impl Into<Arg>) -> Criterion {
    make_condition(
        property,
        ConditionOp::LikeEscape,
        vec![pattern.into(), escape.into()],
    )
}

pub fn between(property: &str, low: impl Into<Arg>, high: impl Into<Arg>) -> Criterion {
    make_condition(property, ConditionOp::Between, vec![low.into(), high.into()])
}

/// `property IN(args...)`
pub fn is_in<A: Into<Arg>>(property: &str, args: impl IntoIterator<Item = A>) -> Criterion {
    make_condition(
        property,
        ConditionOp::In,
        args.into_iter().map(Into::into).collect(),
    )
}

pub fn and(children: impl IntoIterator<Item = Criterion>) -> Criterion {
    make_junction(JunctionOp::And, children)
}

pub fn or(children: impl IntoIterator<Item = Criterion>) -> Criterion {
    make_junction(JunctionOp::Or, children)
}

pub fn not(child: Criterion) -> Criterion {
    make_junction(JunctionOp::Not, [child])
}

/// `NOT(a OR b ...)`
pub fn not_any(children: impl IntoIterator<Item = Criterion>) -> Criterion {
    not(or(children))
}

/// `NOT(a AND b ...)`
pub fn not_all(children: impl IntoIterator<Item = Criterion>) -> Criterion {
    not(and(children))
}

pub fn not_like(property: &str, pattern: impl Into<Arg>) -> Criterion {
    not(like(property, pattern))
}

pub fn not_like_escape(
    property: &str,
    pattern: impl Into<Arg>,
    escape: impl Into<Arg>,
) -> Criterion {
    not(like_escape(property, pattern, escape))
}

pub fn not_between(property: &str, low: impl Into<Arg>, high: impl Into<Arg>) -> Criterion {
    not(between(property, low, high))
}

pub fn not_in<A: Into<Arg>>(property: &str, args: impl IntoIterator<Item = A>) -> Criterion {
    not(is_in(property, args))
}

/// The canonical "no filter": an empty AND, compiled to an empty string.
pub fn none() -> Criterion {
    make_junction(JunctionOp::And, Vec::<Criterion>::new())
}

/// Always-true filter, e.g. for toggled optional clauses.
pub fn true_value() -> Criterion {
    Criterion::Constant(true)
}

pub fn false_value() -> Criterion {
    Criterion::Constant(false)
}
