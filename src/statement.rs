//! Compiled statements: what the execution layer receives.

use std::fmt;

use serde::Serialize;

use crate::ast::Value;
use crate::metadata::{SqlType, ValueType};

/// Logical operation a statement implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    SelectEntity,
    SelectProjections,
    SelectCount,
    SelectExists,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Base statement id, e.g. `selectEntity`.
    pub fn id(&self) -> &'static str {
        match self {
            StatementKind::SelectEntity => "selectEntity",
            StatementKind::SelectProjections => "selectProjections",
            StatementKind::SelectCount => "selectCount",
            StatementKind::SelectExists => "selectExists",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(
            self,
            StatementKind::SelectEntity
                | StatementKind::SelectProjections
                | StatementKind::SelectCount
                | StatementKind::SelectExists
        )
    }
}

/// Where a parameter value comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingSource {
    /// A literal taken from the query expression.
    Value(Value),
    /// A property of the entity value being inserted.
    Property(String),
}

/// One `?` (or `$n`) placeholder, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub source: BindingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<SqlType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_handler: Option<String>,
}

impl Binding {
    pub fn value(value: Value) -> Self {
        Self {
            source: BindingSource::Value(value),
            sql_type: None,
            type_handler: None,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            BindingSource::Value(v) => write!(f, "{}", v)?,
            BindingSource::Property(p) => write!(f, "#{{{}}}", p)?,
        }
        if let Some(t) = &self.sql_type {
            write!(f, " :: {}", t)?;
        }
        if let Some(h) = &self.type_handler {
            write!(f, " via {}", h)?;
        }
        Ok(())
    }
}

/// Maps one selected column back to an entity property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMapping {
    pub property: String,
    pub column: String,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<SqlType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_handler: Option<String>,
    pub id: bool,
}

/// A database-assigned column read back after an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedKey {
    pub property: String,
    pub column: String,
}

/// How the execution layer should materialize the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultShape {
    Entity { mappings: Vec<ResultMapping> },
    /// Named values per row; `scalar` asks the caller to unwrap the only column.
    Projections { names: Vec<String>, scalar: bool },
    Count,
    Exists,
    Affected { generated_keys: Vec<GeneratedKey> },
}

/// `(statement id, SQL text, ordered bindings, result shape)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub id: String,
    pub kind: StatementKind,
    pub sql: String,
    pub bindings: Vec<Binding>,
    pub shape: ResultShape,
    /// A plain select that can be wrapped for a bounded fetch: no inline
    /// LIMIT and no FOR UPDATE.
    #[serde(skip)]
    pub pageable: bool,
}

impl Statement {
    pub fn is_select(&self) -> bool {
        self.kind.is_select()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_ids() {
        assert_eq!(StatementKind::SelectEntity.id(), "selectEntity");
        assert_eq!(StatementKind::SelectExists.id(), "selectExists");
        assert!(StatementKind::SelectCount.is_select());
        assert!(!StatementKind::Delete.is_select());
    }

    #[test]
    fn test_binding_display() {
        let mut b = Binding::value(Value::from(30));
        b.sql_type = Some(SqlType::Integer);
        assert_eq!(b.to_string(), "30 :: INTEGER");
        let p = Binding {
            source: BindingSource::Property("subject".into()),
            sql_type: None,
            type_handler: Some("StringTypeHandler".into()),
        };
        assert_eq!(p.to_string(), "#{subject} via StringTypeHandler");
    }

    #[test]
    fn test_shape_serializes_tagged() {
        let json = serde_json::to_string(&ResultShape::Projections {
            names: vec!["value".into()],
            scalar: true,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"projections","names":["value"],"scalar":true}"#);
    }
}
