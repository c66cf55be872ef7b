use std::fmt;

use super::reference::normalize_prefix;
use super::Arg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    /// `col = arg`
    Set,
    /// `col = NULL`
    Nullify,
    /// `col = col + arg`
    Add,
    /// `col = col - arg`
    Subtract,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub op: UpdateOp,
    pub property: String,
    pub args: Vec<Arg>,
}

/// Ordered SET list of an UPDATE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    prefix: String,
    assignments: Vec<Assignment>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    pub fn set(self, property: &str, arg: impl Into<Arg>) -> Self {
        self.push(UpdateOp::Set, property, vec![arg.into()])
    }

    pub fn nullify(self, property: &str) -> Self {
        self.push(UpdateOp::Nullify, property, Vec::new())
    }

    pub fn add(self, property: &str, arg: impl Into<Arg>) -> Self {
        self.push(UpdateOp::Add, property, vec![arg.into()])
    }

    pub fn subtract(self, property: &str, arg: impl Into<Arg>) -> Self {
        self.push(UpdateOp::Subtract, property, vec![arg.into()])
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    fn push(mut self, op: UpdateOp, property: &str, args: Vec<Arg>) -> Self {
        self.assignments.push(Assignment {
            op,
            property: format!("{}{}", self.prefix, property),
            args,
        });
        self
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.property;
        let arg = self
            .args
            .first()
            .map(|a| a.to_string())
            .unwrap_or_default();
        match self.op {
            UpdateOp::Set => write!(f, "{}={}", p, arg),
            UpdateOp::Nullify => write!(f, "{}=NULL", p),
            UpdateOp::Add => write!(f, "{}={}+{}", p, p, arg),
            UpdateOp::Subtract => write!(f, "{}={}-{}", p, p, arg),
        }
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.assignments.iter().map(|a| a.to_string()).collect();
        write!(f, "[{}]", items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let u = Update::new().set("subject", "hi").nullify("body").add("star", 1);
        let ops: Vec<UpdateOp> = u.assignments().iter().map(|a| a.op).collect();
        assert_eq!(ops, vec![UpdateOp::Set, UpdateOp::Nullify, UpdateOp::Add]);
        assert_eq!(u.to_string(), "[subject='hi', body=NULL, star=star+1]");
    }

    #[test]
    fn test_prefix() {
        let u = Update::new().with_prefix("joinAuthor.").subtract("star", 2);
        assert_eq!(u.assignments()[0].property, "joinAuthor.star");
    }
}
