//! Boolean filter trees.

use std::collections::BTreeSet;
use std::fmt;

use super::{Arg, Reference};

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    IsNull,
    IsNotNull,
    Like,
    /// LIKE with an explicit ESCAPE character as the second argument.
    LikeEscape,
    Between,
    In,
}

impl ConditionOp {
    /// Number of arguments the operator renders, `None` for variadic.
    pub fn arity(&self) -> Option<usize> {
        match self {
            ConditionOp::IsNull | ConditionOp::IsNotNull => Some(0),
            ConditionOp::LikeEscape | ConditionOp::Between => Some(2),
            ConditionOp::In => None,
            _ => Some(1),
        }
    }
}

/// Boolean connective of a [`Junction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionOp {
    And,
    Or,
    /// Negates its single child.
    Not,
}

/// `<property> <op> <args...>`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: ConditionOp,
    pub property: String,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub op: JunctionOp,
    pub children: Vec<Criterion>,
}

/// A filter expression. Immutable once built; see [`crate::ast::builders`].
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Condition(Condition),
    /// Tautology (`true`) or contradiction (`false`).
    Constant(bool),
    Junction(Junction),
}

impl Criterion {
    /// Every property reference in the tree, including column arguments.
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references(&self, refs: &mut Vec<Reference>) {
        match self {
            Criterion::Condition(c) => {
                refs.push(Reference::of(&c.property));
                refs.extend(c.args.iter().filter_map(Arg::as_reference).cloned());
            }
            Criterion::Constant(_) => {}
            Criterion::Junction(j) => {
                for child in &j.children {
                    child.collect_references(refs);
                }
            }
        }
    }

    /// Join names referenced anywhere in the tree.
    pub fn reference_names(&self) -> BTreeSet<String> {
        self.references()
            .iter()
            .filter_map(|r| r.join().map(str::to_string))
            .collect()
    }

    /// True when the tree compiles to an empty fragment (no filter at all).
    pub fn is_empty(&self) -> bool {
        match self {
            Criterion::Condition(_) | Criterion::Constant(_) => false,
            Criterion::Junction(j) => j.children.iter().all(Criterion::is_empty),
        }
    }
}

impl From<Condition> for Criterion {
    fn from(c: Condition) -> Self {
        Criterion::Condition(c)
    }
}

impl From<Junction> for Criterion {
    fn from(j: Junction) -> Self {
        Criterion::Junction(j)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.property;
        let arg = |i: usize| {
            self.args
                .get(i)
                .map(|a| a.to_string())
                .unwrap_or_else(|| "?".to_string())
        };
        match self.op {
            ConditionOp::Eq => write!(f, "{}={}", p, arg(0)),
            ConditionOp::Ne => write!(f, "{}!={}", p, arg(0)),
            ConditionOp::Gt => write!(f, "{}>{}", p, arg(0)),
            ConditionOp::Ge => write!(f, "{}>={}", p, arg(0)),
            ConditionOp::Lt => write!(f, "{}<{}", p, arg(0)),
            ConditionOp::Le => write!(f, "{}<={}", p, arg(0)),
            ConditionOp::IsNull => write!(f, "{} IS NULL", p),
            ConditionOp::IsNotNull => write!(f, "{} IS NOT NULL", p),
            ConditionOp::Like => write!(f, "{} LIKE {}", p, arg(0)),
            ConditionOp::LikeEscape => write!(f, "{} LIKE {} ESCAPE {}", p, arg(0), arg(1)),
            ConditionOp::Between => write!(f, "{} BETWEEN {} AND {}", p, arg(0), arg(1)),
            ConditionOp::In => {
                let items: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
                write!(f, "{} IN({})", p, items.join(","))
            }
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Condition(c) => write!(f, "{}", c),
            Criterion::Constant(true) => write!(f, "TRUE"),
            Criterion::Constant(false) => write!(f, "FALSE"),
            Criterion::Junction(j) => {
                let children: Vec<String> = j.children.iter().map(|c| c.to_string()).collect();
                match j.op {
                    JunctionOp::And => write!(f, "({})", children.join(" AND ")),
                    JunctionOp::Or => write!(f, "({})", children.join(" OR ")),
                    JunctionOp::Not => write!(f, "NOT({})", children.join("")),
                }
            }
        }
    }
}
