//! # sqlent: entity-to-SQL compiler
//!
//! sqlent turns declared entities (tables, columns, joins, virtual
//! properties that follow a path through joins) and typed query expressions
//! into dialect-specific SQL with ordered parameter bindings. It never
//! talks to a database: the compiled [`Statement`](statement::Statement) is
//! handed to whatever implements [`StatementExecutor`](executor::StatementExecutor).
//!
//! ## Quick Example
//!
//! ```
//! use sqlent::prelude::*;
//!
//! let registry = SqlRegistry::new(MetadataRegistry::default(), Dialect::H2);
//! registry.register(
//!     EntityDecl::new("Author")
//!         .property(PropertyDecl::new("id").id().alias("id"))
//!         .property(PropertyDecl::new("username")),
//! )?;
//! registry.register(
//!     EntityDecl::new("Post")
//!         .join(JoinDecl::new(
//!             "joinAuthor",
//!             "Author",
//!             eq("authorId", Reference::of("joinAuthor.#id")),
//!         ))
//!         .property(PropertyDecl::new("id").id())
//!         .property(PropertyDecl::new("authorId"))
//!         .property(PropertyDecl::new("authorName").reference("joinAuthor.username")),
//! )?;
//!
//! let stmt = registry
//!     .select("Post")
//!     .criterion(eq("authorName", "sally"))
//!     .count()?;
//! assert_eq!(
//!     stmt.sql,
//!     "SELECT COUNT(*) FROM `post` t LEFT JOIN `author` j1 ON t.`author_id` = j1.`id` \
//!      WHERE j1.`username` = ?"
//! );
//! # Ok::<(), sqlent::error::SqlentError>(())
//! ```
//!
//! ## Layout
//!
//! | Module       | Role                                               |
//! |--------------|----------------------------------------------------|
//! | `ast`        | references, criteria, order-by, update, projections |
//! | `metadata`   | declarations resolved into entity descriptors      |
//! | `context`    | property path resolution for one query             |
//! | `transpiler` | dialect generators and statement assembly          |
//! | `registry`   | metadata + dialect, one call per logical operation |
//! | `parser`     | textual criterion/order/update/projection syntax   |
//! | `config`     | TOML schema files                                  |
//! | `executor`   | execution boundary and bounded fetches             |

pub mod ast;
pub mod bound_list;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod metadata;
pub mod parser;
pub mod registry;
pub mod statement;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::{
        Arg, Criterion, OrderBy, Projections, Reference, Update, Value,
    };
    pub use crate::bound_list::{BoundList, RowBounds};
    pub use crate::config::SchemaConfig;
    pub use crate::error::*;
    pub use crate::executor::{StatementExecutor, fetch_bounded};
    pub use crate::metadata::{
        CacheConfig, CachePolicy, EntityDecl, EntityDescriptor, Eviction, JoinDecl, JoinKind,
        MetadataRegistry, Naming, PropertyDecl, SqlType, ValueType,
    };
    pub use crate::parser::{parse_criterion, parse_order_by, parse_projections, parse_update};
    pub use crate::registry::SqlRegistry;
    pub use crate::statement::{Binding, ResultShape, Statement, StatementKind};
    pub use crate::transpiler::{Dialect, PagedStatements};
}

/// Parse a criterion in the textual syntax.
///
/// # Example
///
/// ```
/// use sqlent::ast::builders::*;
///
/// let c = sqlent::parse("age > 18 OR name IS NULL").unwrap();
/// assert_eq!(c, or(vec![gt("age", 18), is_null("name")]));
/// ```
pub fn parse(input: &str) -> error::SqlentResult<ast::Criterion> {
    parser::parse_criterion(input)
}
