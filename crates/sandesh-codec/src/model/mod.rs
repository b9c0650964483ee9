//! Value model, struct descriptors and struct instances.

pub mod instance;
pub mod kind;
pub mod schema;
pub mod text;
pub mod value;

pub use instance::{Presence, SetFields, Struct};
pub use kind::Kind;
pub use schema::{FieldBuilder, FieldSchema, SchemaRegistry, StructSchema, StructSchemaBuilder};
pub use value::Value;
