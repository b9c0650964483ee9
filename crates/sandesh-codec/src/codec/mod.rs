//! Text encoding/decoding for sandesh structs.
//!
//! Two self-describing wire formats are supported:
//! - [`tagged`]: compact JSON with a kind tag on every field
//! - [`markup`]: verbose XML with kind, identifier and annotation attributes

pub mod markup;
pub mod primitives;
pub mod tagged;


use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use markup::{decode_markup, decode_markup_from, encode_markup, encode_markup_into};
pub use primitives::TextWriter;
pub use tagged::{
    EncodeOptions, decode_tagged_text, encode_tagged_text, encode_tagged_text_into,
    encode_tagged_text_with_options,
};

use crate::error::{DecodeError, EncodeError, UnknownProtocol};
use crate::model::{SchemaRegistry, Struct, StructSchema};

/// Wire format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// JSON with `TYPE`/`VAL` wrappers and a `TIMESTAMP` envelope.
    TaggedText,
    /// XML with `type`/`identifier` attributes.
    Markup,
}

impl Protocol {
    /// All supported protocols.
    pub const ALL: [Protocol; 2] = [Protocol::TaggedText, Protocol::Markup];

    /// Short name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::TaggedText => "json",
            Protocol::Markup => "xml",
        }
    }

    /// Encodes a struct, stamping tagged text with the current time.
    pub fn encode(&self, instance: &Struct) -> Result<String, EncodeError> {
        self.encode_with_options(instance, EncodeOptions::default())
    }

    /// Encodes a struct; `options` apply to tagged text only.
    pub fn encode_with_options(
        &self,
        instance: &Struct,
        options: EncodeOptions,
    ) -> Result<String, EncodeError> {
        match self {
            Protocol::TaggedText => encode_tagged_text_with_options(instance, options),
            Protocol::Markup => encode_markup(instance),
        }
    }

    /// Decodes a document holding one struct of type `type_name`.
    pub fn decode(
        &self,
        input: &str,
        type_name: &str,
        registry: &SchemaRegistry,
    ) -> Result<Struct, DecodeError> {
        match self {
            Protocol::TaggedText => decode_tagged_text(input, type_name, registry),
            Protocol::Markup => decode_markup(input, type_name, registry),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "tagged" => Ok(Protocol::TaggedText),
            "xml" | "markup" => Ok(Protocol::Markup),
            _ => Err(UnknownProtocol(s.to_string())),
        }
    }
}

/// Resolves a struct type through the registry.
pub(crate) fn lookup<'r>(
    registry: &'r SchemaRegistry,
    name: &str,
) -> Result<&'r Arc<StructSchema>, DecodeError> {
    registry.get(name).ok_or_else(|| DecodeError::UnknownType {
        name: name.to_string(),
    })
}
