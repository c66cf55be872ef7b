//! Schema file configuration.
//!
//! A schema file declares the naming strategy, the dialect and every entity
//! in TOML:
//!
//! ```toml
//! naming = "snake_case"
//! dialect = "mysql"
//!
//! [[entity]]
//! name = "Post"
//! table = "post"
//!
//! [[entity.property]]
//! name = "authorName"
//! reference = "joinAuthor.username"
//!
//! [[entity.join]]
//! name = "joinAuthor"
//! target = "Author"
//! on = "authorId = @joinAuthor.#id"
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{SqlentError, SqlentResult};
use crate::metadata::{
    CacheConfig, EntityDecl, JoinDecl, MetadataRegistry, Naming, PropertyDecl,
};
use crate::parser::parse_criterion;
use crate::registry::SqlRegistry;
use crate::transpiler::Dialect;

/// Environment variable naming the schema file.
pub const SCHEMA_ENV: &str = "SQLENT_SCHEMA";

/// Top-level schema file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// `snake_case` (default) or `identity`
    pub naming: Option<String>,

    /// `h2` (default), `mysql`, `postgres` or `sqlite`
    pub dialect: Option<String>,

    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityConfig {
    pub name: String,
    pub table: Option<String>,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub extends: Option<String>,
    pub cache: Option<CacheSection>,
    pub cache_ref: Option<String>,
    #[serde(default, rename = "property")]
    pub properties: Vec<PropertyConfig>,
    #[serde(default, rename = "join")]
    pub joins: Vec<JoinConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    pub implementation: Option<String>,
    pub eviction: Option<String>,
    pub flush_interval_ms: Option<i64>,
    pub size: Option<i64>,
    #[serde(default = "default_true")]
    pub read_write: bool,
    #[serde(default)]
    pub blocking: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyConfig {
    pub name: String,
    pub column: Option<String>,
    pub reference: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub id: bool,
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub ignore: bool,
    pub value_type: Option<String>,
    pub sql_type: Option<String>,
    pub type_handler: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinConfig {
    pub name: String,
    pub target: String,
    pub kind: Option<String>,
    /// Join criterion in the textual criterion syntax.
    pub on: String,
}

impl SchemaConfig {
    pub fn from_toml(text: &str) -> SqlentResult<Self> {
        toml::from_str(text).map_err(|e| SqlentError::Config(e.to_string()))
    }

    /// Read and parse a schema file.
    pub fn load(path: &Path) -> SqlentResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| SqlentError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(
            "Loaded {} entities from {}",
            config.entities.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn naming(&self) -> SqlentResult<Naming> {
        match &self.naming {
            Some(naming) => naming.parse(),
            None => Ok(Naming::default()),
        }
    }

    pub fn dialect(&self) -> SqlentResult<Dialect> {
        match &self.dialect {
            Some(dialect) => dialect.parse(),
            None => Ok(Dialect::default()),
        }
    }

    /// Entity declarations in file order.
    pub fn declarations(&self) -> SqlentResult<Vec<EntityDecl>> {
        self.entities.iter().map(EntityConfig::to_decl).collect()
    }

    /// Register every declared entity in a fresh registry. `dialect`
    /// overrides the file's dialect.
    pub fn build_registry(&self, dialect: Option<Dialect>) -> SqlentResult<SqlRegistry> {
        let dialect = match dialect {
            Some(dialect) => dialect,
            None => self.dialect()?,
        };
        let registry = SqlRegistry::new(MetadataRegistry::new(self.naming()?), dialect);
        for decl in self.declarations()? {
            registry.register(decl)?;
        }
        Ok(registry)
    }
}

impl EntityConfig {
    fn to_decl(&self) -> SqlentResult<EntityDecl> {
        let mut decl = EntityDecl::new(&self.name);
        decl.table = self.table.clone();
        decl.schema = self.schema.clone();
        decl.catalog = self.catalog.clone();
        decl.extends = self.extends.clone();
        decl.cache_ref = self.cache_ref.clone();
        if let Some(cache) = &self.cache {
            decl = decl.cache(cache.to_config()?);
        }
        for property in &self.properties {
            decl = decl.property(property.to_decl()?);
        }
        for join in &self.joins {
            decl = decl.join(join.to_decl(&self.name)?);
        }
        Ok(decl)
    }
}

impl CacheSection {
    fn to_config(&self) -> SqlentResult<CacheConfig> {
        let mut cache = CacheConfig::new()
            .read_write(self.read_write)
            .blocking(self.blocking);
        if let Some(implementation) = &self.implementation {
            cache = cache.implementation(implementation);
        }
        if let Some(eviction) = &self.eviction {
            cache = cache.eviction(eviction.parse()?);
        }
        if let Some(millis) = self.flush_interval_ms {
            cache = cache.flush_interval(millis);
        }
        if let Some(size) = self.size {
            cache = cache.size(size);
        }
        for (key, value) in &self.properties {
            cache = cache.property(key, value);
        }
        Ok(cache)
    }
}

impl PropertyConfig {
    fn to_decl(&self) -> SqlentResult<PropertyDecl> {
        let mut decl = PropertyDecl::new(&self.name);
        decl.column = self.column.clone();
        decl.reference = self.reference.clone();
        decl.aliases = self.aliases.clone();
        decl.id = self.id;
        decl.generated = self.generated;
        decl.ignore = self.ignore;
        decl.type_handler = self.type_handler.clone();
        if let Some(value_type) = &self.value_type {
            decl.value_type = value_type.parse()?;
        }
        if let Some(sql_type) = &self.sql_type {
            decl.sql_type = Some(sql_type.parse()?);
        }
        Ok(decl)
    }
}

impl JoinConfig {
    fn to_decl(&self, entity: &str) -> SqlentResult<JoinDecl> {
        let criterion = parse_criterion(&self.on).map_err(|e| {
            SqlentError::metadata(entity, format!("join '{}' criterion: {}", self.name, e))
        })?;
        let mut decl = JoinDecl::new(&self.name, &self.target, criterion);
        if let Some(kind) = &self.kind {
            decl = decl.kind(kind.parse()?);
        }
        Ok(decl)
    }
}

/// Locate the schema file: an explicit path, then `$SQLENT_SCHEMA`, then
/// `<config dir>/sqlent/schema.toml`.
pub fn schema_path(explicit: Option<&Path>) -> Option<PathBuf> {
    pick_schema_path(explicit, std::env::var_os(SCHEMA_ENV), dirs::config_dir())
}

fn pick_schema_path(
    explicit: Option<&Path>,
    env: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    config_dir.map(|dir| dir.join("sqlent").join("schema.toml"))
}
