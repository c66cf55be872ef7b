//! Query expression trees: property references, filters, ordering,
//! assignments and projections. Pure values; no I/O.

pub mod builders;
pub mod criterion;
pub mod order_by;
pub mod projections;
pub mod reference;
pub mod update;
pub mod values;

pub use criterion::{Condition, ConditionOp, Criterion, Junction, JunctionOp};
pub use order_by::{Order, OrderBy};
pub use projections::{DEFAULT_NAME, Projection, ProjectionOp, Projections};
pub use reference::Reference;
pub use update::{Assignment, Update, UpdateOp};
pub use values::{Arg, Value};
