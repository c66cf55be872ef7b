//! Default table and column names.

use std::fmt;
use std::str::FromStr;

use crate::error::SqlentError;

/// Derives storage names for entities and properties that do not declare one.
pub trait NamingStrategy: Send + Sync {
    fn table_name(&self, entity: &str) -> String;
    fn column_name(&self, entity: &str, property: &str) -> String;
}

/// `PostLite` → `post_lite`, `createdOn` → `created_on`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCaseNaming;

/// Names are used unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNaming;

impl NamingStrategy for SnakeCaseNaming {
    fn table_name(&self, entity: &str) -> String {
        to_snake_case(entity)
    }

    fn column_name(&self, _entity: &str, property: &str) -> String {
        to_snake_case(property)
    }
}

impl NamingStrategy for IdentityNaming {
    fn table_name(&self, entity: &str) -> String {
        entity.to_string()
    }

    fn column_name(&self, _entity: &str, property: &str) -> String {
        property.to_string()
    }
}

/// Built-in strategies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Naming {
    #[default]
    SnakeCase,
    Identity,
}

impl Naming {
    pub fn strategy(self) -> Box<dyn NamingStrategy> {
        match self {
            Naming::SnakeCase => Box::new(SnakeCaseNaming),
            Naming::Identity => Box::new(IdentityNaming),
        }
    }
}

impl FromStr for Naming {
    type Err = SqlentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snake_case" | "snake" => Ok(Naming::SnakeCase),
            "identity" => Ok(Naming::Identity),
            other => Err(SqlentError::Config(format!(
                "unknown naming '{}', expected snake_case or identity",
                other
            ))),
        }
    }
}

impl fmt::Display for Naming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Naming::SnakeCase => write!(f, "snake_case"),
            Naming::Identity => write!(f, "identity"),
        }
    }
}

fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None => false,
                Some(p) if p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) => p.is_uppercase() && next.is_some_and(|n| n.is_lowercase()),
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
