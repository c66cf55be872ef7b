use std::fmt;

use serde::Serialize;

use super::reference::normalize_prefix;

/// Result name used when a projection is added without one.
pub const DEFAULT_NAME: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionOp {
    Property,
    Distinct,
    Count,
    CountDistinct,
    Max,
    Min,
    Sum,
    Avg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub op: ProjectionOp,
    pub property: String,
}

/// Named select-list entries, in insertion order.
///
/// Re-using a name replaces the earlier entry in place. A projection set with
/// exactly one entry is a scalar query: the caller unwraps the single column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projections {
    prefix: String,
    entries: Vec<(String, Projection)>,
}

macro_rules! projection_methods {
    ($($op:ident => $fn:ident, $fn_as:ident;)*) => {
        $(
            pub fn $fn(self, property: &str) -> Self {
                self.push(DEFAULT_NAME, ProjectionOp::$op, property)
            }

            pub fn $fn_as(self, name: &str, property: &str) -> Self {
                self.push(name, ProjectionOp::$op, property)
            }
        )*
    };
}

impl Projections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    projection_methods! {
        Property => property, property_as;
        Distinct => distinct, distinct_as;
        Count => count, count_as;
        CountDistinct => count_distinct, count_distinct_as;
        Max => max, max_as;
        Min => min, min_as;
        Sum => sum, sum_as;
        Avg => avg, avg_as;
    }

    pub fn entries(&self) -> &[(String, Projection)] {
        &self.entries
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A single entry signals the caller to unwrap the row to its only value.
    pub fn is_scalar(&self) -> bool {
        self.entries.len() == 1
    }

    pub(crate) fn push(mut self, name: &str, op: ProjectionOp, property: &str) -> Self {
        let projection = Projection {
            op,
            property: format!("{}{}", self.prefix, property),
        };
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = projection,
            None => self.entries.push((name.to_string(), projection)),
        }
        self
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.property;
        match self.op {
            ProjectionOp::Property => write!(f, "{}", p),
            ProjectionOp::Distinct => write!(f, "DISTINCT {}", p),
            ProjectionOp::Count => write!(f, "COUNT({})", p),
            ProjectionOp::CountDistinct => write!(f, "COUNT(DISTINCT {})", p),
            ProjectionOp::Max => write!(f, "MAX({})", p),
            ProjectionOp::Min => write!(f, "MIN({})", p),
            ProjectionOp::Sum => write!(f, "SUM({})", p),
            ProjectionOp::Avg => write!(f, "AVG({})", p),
        }
    }
}

impl fmt::Display for Projections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .entries
            .iter()
            .map(|(name, p)| format!("{}: {}", name, p))
            .collect();
        write!(f, "{{{}}}", items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnamed_entry_is_scalar() {
        let p = Projections::new().max("star");
        assert!(p.is_scalar());
        assert_eq!(p.names(), vec![DEFAULT_NAME.to_string()]);
    }

    #[test]
    fn test_insertion_order_and_replace() {
        let p = Projections::new()
            .count_as("total", "id")
            .max_as("best", "star")
            .sum_as("total", "star");
        assert_eq!(p.names(), vec!["total".to_string(), "best".to_string()]);
        assert_eq!(p.entries()[0].1.op, ProjectionOp::Sum);
        assert_eq!(p.to_string(), "{total: SUM(star), best: MAX(star)}");
    }

    #[test]
    fn test_prefix() {
        let p = Projections::new().with_prefix("joinAuthor").property_as("name", "username");
        assert_eq!(p.entries()[0].1.property, "joinAuthor.username");
    }
}
