//! Entity metadata: declarations in, immutable descriptors out.

pub mod cache;
pub mod declarations;
pub mod descriptor;
pub mod naming;
pub mod registry;
mod resolve;

pub use cache::{CacheConfig, CachePolicy, Eviction};
pub use declarations::{EntityDecl, JoinDecl, PropertyDecl};
pub use descriptor::{
    EntityDescriptor, JoinDescriptor, JoinKind, PropertyDescriptor, SqlType, ValueType,
};
pub use naming::{IdentityNaming, Naming, NamingStrategy, SnakeCaseNaming};
pub use registry::MetadataRegistry;
pub use resolve::resolve;
