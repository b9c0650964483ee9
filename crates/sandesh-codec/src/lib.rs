//! sandesh-codec: schema-driven text codecs for self-describing telemetry records.
//!
//! Producers build typed struct instances and encode them into one of two
//! text wire formats; consumers decode them back using a registry of struct
//! descriptors. Every encoded field carries its own kind tag, so the text is
//! readable without the schema.
//!
//! # Quick Start
//!
//! ```rust
//! use sandesh_codec::{Kind, Protocol, SchemaRegistry, Struct, StructSchema, structurally_equal};
//!
//! let schema = StructSchema::builder("BasicTypesTest")
//!     .field(1, "bool_1", Kind::Bool)
//!     .field(2, "byte_1", Kind::Byte)
//!     .field_with(8, "str8", Kind::String, |f| f.default_value("Last field"))
//!     .build()
//!     .unwrap();
//! let mut registry = SchemaRegistry::new();
//! registry.register(schema.clone()).unwrap();
//!
//! let record = Struct::new(schema)
//!     .with("bool_1", true)
//!     .unwrap()
//!     .with("byte_1", 127i8)
//!     .unwrap();
//!
//! for protocol in Protocol::ALL {
//!     let text = protocol.encode(&record).unwrap();
//!     let decoded = protocol.decode(&text, "BasicTypesTest", &registry).unwrap();
//!     assert!(structurally_equal(&record, &decoded));
//! }
//! ```
//!
//! # Modules
//!
//! - [`model`]: Value kinds, values, struct descriptors and instances
//! - [`codec`]: Tagged-text (JSON) and markup (XML) encoders and decoders
//! - [`validate`]: Structural equality for round-trip checks
//! - [`util`]: Envelope timestamp formatting
//! - [`error`]: Error types
//! - [`limits`]: Security limits for decoding
//!
//! # Security
//!
//! Decoders accept untrusted input. Input size, nesting depth and container
//! sizes are bounded, and malformed text is rejected with an error rather
//! than a partially populated struct.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types at crate root
pub use codec::{
    EncodeOptions, Protocol, decode_markup, decode_tagged_text, encode_markup, encode_tagged_text,
    encode_tagged_text_with_options,
};
pub use error::{
    DecodeError, EncodeError, ErrorCode, FieldError, SchemaError, UnknownProtocol, ValueFormatError,
};
pub use model::{
    FieldSchema, Kind, Presence, SchemaRegistry, Struct, StructSchema, StructSchemaBuilder, Value,
};
pub use validate::{Mismatch, compare_structs, structurally_equal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
