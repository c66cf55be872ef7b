//! Static entity declarations: the input of the metadata resolver.
//!
//! ```
//! use sqlent::ast::{builders::eq, Reference};
//! use sqlent::metadata::{EntityDecl, JoinDecl, JoinKind, PropertyDecl};
//!
//! let post = EntityDecl::new("Post")
//!     .table("post")
//!     .property(PropertyDecl::new("id").id().generated())
//!     .property(PropertyDecl::new("authorId"))
//!     .property(PropertyDecl::new("authorName").reference("joinAuthor.username"))
//!     .join(
//!         JoinDecl::new("joinAuthor", "Author", eq("authorId", Reference::of("joinAuthor.#id")))
//!             .kind(JoinKind::Inner),
//!     );
//! assert_eq!(post.properties.len(), 3);
//! ```

use super::cache::CacheConfig;
use super::descriptor::{JoinKind, SqlType, ValueType};
use crate::ast::Criterion;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDecl {
    pub name: String,
    pub table: Option<String>,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    /// Ancestor entity whose properties and joins are inherited.
    pub extends: Option<String>,
    pub cache: Option<CacheConfig>,
    pub cache_ref: Option<String>,
    pub properties: Vec<PropertyDecl>,
    pub joins: Vec<JoinDecl>,
}

impl EntityDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            table: None,
            schema: None,
            catalog: None,
            extends: None,
            cache: None,
            cache_ref: None,
            properties: Vec::new(),
            joins: Vec::new(),
        }
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    pub fn catalog(mut self, catalog: &str) -> Self {
        self.catalog = Some(catalog.to_string());
        self
    }

    pub fn extends(mut self, ancestor: &str) -> Self {
        self.extends = Some(ancestor.to_string());
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_ref(mut self, namespace: &str) -> Self {
        self.cache_ref = Some(namespace.to_string());
        self
    }

    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    pub fn join(mut self, join: JoinDecl) -> Self {
        self.joins.push(join);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub column: Option<String>,
    pub reference: Option<String>,
    pub aliases: Vec<String>,
    pub id: bool,
    pub generated: bool,
    pub value_type: ValueType,
    pub sql_type: Option<SqlType>,
    pub type_handler: Option<String>,
    /// Drops the property, including one inherited under the same name.
    pub ignore: bool,
}

impl PropertyDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn reference(mut self, path: &str) -> Self {
        self.reference = Some(path.to_string());
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn sql_type(mut self, sql_type: SqlType) -> Self {
        self.sql_type = Some(sql_type);
        self
    }

    pub fn type_handler(mut self, handler: &str) -> Self {
        self.type_handler = Some(handler.to_string());
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinDecl {
    pub name: String,
    pub target: String,
    pub kind: JoinKind,
    pub criterion: Criterion,
}

impl JoinDecl {
    /// A left outer join unless [`JoinDecl::kind`] says otherwise.
    pub fn new(name: &str, target: &str, criterion: Criterion) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            kind: JoinKind::LeftOuter,
            criterion,
        }
    }

    pub fn kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }
}
