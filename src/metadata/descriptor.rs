//! Resolved, immutable entity metadata.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::cache::CachePolicy;
use crate::ast::Criterion;
use crate::error::SqlentError;

/// JDBC-style column type hint carried with bound parameters and result mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Varchar,
    Char,
    Clob,
    Smallint,
    Integer,
    Bigint,
    Decimal,
    Float,
    Double,
    Boolean,
    Date,
    Time,
    Timestamp,
    Blob,
    Other,
}

impl FromStr for SqlType {
    type Err = SqlentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s.to_lowercase().as_str() {
            "varchar" | "text" => SqlType::Varchar,
            "char" => SqlType::Char,
            "clob" => SqlType::Clob,
            "smallint" => SqlType::Smallint,
            "integer" | "int" => SqlType::Integer,
            "bigint" => SqlType::Bigint,
            "decimal" | "numeric" => SqlType::Decimal,
            "float" | "real" => SqlType::Float,
            "double" => SqlType::Double,
            "boolean" | "bool" => SqlType::Boolean,
            "date" => SqlType::Date,
            "time" => SqlType::Time,
            "timestamp" => SqlType::Timestamp,
            "blob" => SqlType::Blob,
            "other" => SqlType::Other,
            other => {
                return Err(SqlentError::Config(format!("unknown sql type '{}'", other)));
            }
        };
        Ok(t)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlType::Varchar => "VARCHAR",
            SqlType::Char => "CHAR",
            SqlType::Clob => "CLOB",
            SqlType::Smallint => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::Bigint => "BIGINT",
            SqlType::Decimal => "DECIMAL",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Blob => "BLOB",
            SqlType::Other => "OTHER",
        };
        write!(f, "{}", name)
    }
}

/// Application-side type of a property value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Any,
    Bool,
    Int,
    Float,
    String,
    Date,
    Timestamp,
    Bytes,
}

impl FromStr for ValueType {
    type Err = SqlentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(ValueType::Any),
            "bool" | "boolean" => Ok(ValueType::Bool),
            "int" | "integer" | "long" => Ok(ValueType::Int),
            "float" | "double" => Ok(ValueType::Float),
            "string" => Ok(ValueType::String),
            "date" => Ok(ValueType::Date),
            "timestamp" | "datetime" => Ok(ValueType::Timestamp),
            "bytes" => Ok(ValueType::Bytes),
            other => Err(SqlentError::Config(format!("unknown value type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    #[default]
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl FromStr for JoinKind {
    type Err = SqlentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inner" => Ok(JoinKind::Inner),
            "left" | "left_outer" => Ok(JoinKind::LeftOuter),
            "right" | "right_outer" => Ok(JoinKind::RightOuter),
            "full" | "full_outer" => Ok(JoinKind::FullOuter),
            other => Err(SqlentError::Config(format!(
                "unknown join kind '{}', expected inner, left, right or full",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub aliases: BTreeSet<String>,
    pub value_type: ValueType,
    pub column: String,
    /// Path this property borrows its column from. Makes the property virtual.
    pub reference: Option<String>,
    pub id: bool,
    pub generated: bool,
    pub sql_type: Option<SqlType>,
    pub type_handler: Option<String>,
}

impl PropertyDescriptor {
    pub fn is_virtual(&self) -> bool {
        self.reference.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinDescriptor {
    pub name: String,
    pub target: String,
    pub kind: JoinKind,
    #[serde(serialize_with = "serialize_display")]
    pub criterion: Criterion,
}

fn serialize_display<S: serde::Serializer>(c: &Criterion, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(c)
}

/// Everything needed to compile statements against one entity.
///
/// Built once by [`crate::metadata::resolve`] and shared behind an `Arc`.
/// `joins` is in dependency order: a join always follows every join its
/// criterion refers to.
#[derive(Debug, Clone, Serialize)]
pub struct EntityDescriptor {
    name: String,
    table: String,
    schema: Option<String>,
    catalog: Option<String>,
    cache: Option<CachePolicy>,
    joins: Vec<JoinDescriptor>,
    properties: Vec<PropertyDescriptor>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
    #[serde(skip)]
    by_alias: HashMap<String, usize>,
}

impl EntityDescriptor {
    pub(crate) fn new(
        name: String,
        table: String,
        schema: Option<String>,
        catalog: Option<String>,
        cache: Option<CachePolicy>,
        joins: Vec<JoinDescriptor>,
        properties: Vec<PropertyDescriptor>,
    ) -> Self {
        let by_name = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        let by_alias = properties
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.aliases.iter().map(move |a| (a.clone(), i)))
            .collect();
        Self {
            name,
            table,
            schema,
            catalog,
            cache,
            joins,
            properties,
            by_name,
            by_alias,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// `[catalog, schema, table]`, skipping the parts that are unset.
    pub fn table_path(&self) -> Vec<&str> {
        self.catalog
            .as_deref()
            .into_iter()
            .chain(self.schema.as_deref())
            .chain(std::iter::once(self.table.as_str()))
            .collect()
    }

    pub fn cache(&self) -> Option<&CachePolicy> {
        self.cache.as_ref()
    }

    pub fn joins(&self) -> &[JoinDescriptor] {
        &self.joins
    }

    pub fn join(&self, name: &str) -> Option<&JoinDescriptor> {
        self.joins.iter().find(|j| j.name == name)
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Index of a property by name, or by alias when written as `#alias`.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        match name.strip_prefix('#') {
            Some(alias) => self.by_alias.get(alias).copied(),
            None => self.by_name.get(name).copied(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.property_index(name).map(|i| &self.properties[i])
    }

    pub fn id_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.id)
    }
}

impl PartialEq for EntityDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.table == other.table
            && self.schema == other.schema
            && self.catalog == other.catalog
            && self.cache == other.cache
            && self.joins == other.joins
            && self.properties == other.properties
    }
}
