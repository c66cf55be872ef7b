use std::fmt;

use super::reference::normalize_prefix;

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub property: String,
    pub descending: bool,
}

/// Ordered list of sort keys.
///
/// A prefix set with [`OrderBy::with_prefix`] is prepended to every property
/// added afterwards, so `with_prefix("joinAuthor").asc("username")` sorts by
/// `joinAuthor.username`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    prefix: String,
    orders: Vec<Order>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    pub fn asc(self, property: &str) -> Self {
        self.push(property, false)
    }

    pub fn desc(self, property: &str) -> Self {
        self.push(property, true)
    }

    /// Ascending, or descending when `toggle` is set.
    pub fn asc_if(self, property: &str, toggle: bool) -> Self {
        self.push(property, toggle)
    }

    /// Descending, or ascending when `toggle` is unset.
    pub fn desc_if(self, property: &str, toggle: bool) -> Self {
        self.push(property, !toggle)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn push(mut self, property: &str, descending: bool) -> Self {
        self.orders.push(Order {
            property: format!("{}{}", self.prefix, property),
            descending,
        });
        self
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .orders
            .iter()
            .map(|o| format!("{} {}", o.property, if o.descending { "DESC" } else { "ASC" }))
            .collect();
        write!(f, "[{}]", items.join(", "))
    }
}
