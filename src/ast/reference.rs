use std::fmt;

use serde::Serialize;

use crate::error::{SqlentError, SqlentResult};

/// A property path, optionally qualified by a join name.
///
/// `joinAuthor.username` names `username` on the entity bound under
/// `joinAuthor`; a bare `username` names a property of the root entity.
/// A `#` prefix on the property part (`joinAuthor.#id`) looks the property
/// up by alias instead of by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Reference {
    join: Option<String>,
    property: String,
}

impl Reference {
    /// Split a path on its first `.`. An empty join part counts as unqualified.
    pub fn of(path: &str) -> Self {
        match path.split_once('.') {
            None => Self {
                join: None,
                property: path.to_string(),
            },
            Some((join, property)) => Self {
                join: (!join.is_empty()).then(|| join.to_string()),
                property: property.to_string(),
            },
        }
    }

    /// Like [`Reference::of`], but rejects blank paths and blank property parts.
    pub fn parse(path: &str) -> SqlentResult<Self> {
        if path.trim().is_empty() {
            return Err(SqlentError::invalid("property path must not be blank"));
        }
        let reference = Self::of(path);
        if reference.property.trim().is_empty() || reference.property == "#" {
            return Err(SqlentError::invalid(format!(
                "property path '{}' has no property part",
                path
            )));
        }
        Ok(reference)
    }

    pub fn join(&self) -> Option<&str> {
        self.join.as_deref()
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// True when the property part is an `#alias` lookup.
    pub fn is_alias(&self) -> bool {
        self.property.starts_with('#')
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.join {
            Some(join) => write!(f, "{}.{}", join, self.property),
            None => write!(f, "{}", self.property),
        }
    }
}

impl std::str::FromStr for Reference {
    type Err = SqlentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Normalize a builder prefix into `join.` form (or empty).
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('.') {
        prefix.to_string()
    } else {
        format!("{}.", prefix)
    }
}
