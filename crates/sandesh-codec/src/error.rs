//! Error types for schema construction, field assignment, encoding and decoding.

use thiserror::Error;

/// Error codes shared by every error type in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Value of the wrong kind for a field
    KindMismatch,
    /// E002: Literal does not match its kind's grammar
    ValueFormat,
    /// E003: Struct type name does not match
    TypeMismatch,
    /// E004: Malformed container or document framing
    Structural,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::KindMismatch => "E001",
            ErrorCode::ValueFormat => "E002",
            ErrorCode::TypeMismatch => "E003",
            ErrorCode::Structural => "E004",
        }
    }
}

/// A literal that does not parse (or render) under its kind's grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[E002] invalid {kind} literal {text:?}: {reason}")]
pub struct ValueFormatError {
    /// Wire tag of the kind being parsed.
    pub kind: &'static str,
    /// The offending text.
    pub text: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

impl ValueFormatError {
    pub(crate) fn new(kind: &'static str, text: impl Into<String>, reason: &'static str) -> Self {
        Self {
            kind,
            text: text.into(),
            reason,
        }
    }
}

/// Error raised when assigning to or clearing a struct field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("[E001] field {field} of {type_name} expects {expected}, got {found}")]
    KindMismatch {
        type_name: String,
        field: String,
        expected: String,
        found: &'static str,
    },

    #[error("[E001] {type_name} has no field with identifier {id}")]
    UnknownId { type_name: String, id: u16 },

    #[error("[E001] {type_name} has no field named {name:?}")]
    UnknownName { type_name: String, name: String },

    #[error("[E001] duplicate key {key:?} in map field {field}")]
    DuplicateKey { field: String, key: String },
}

impl FieldError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::KindMismatch
    }
}

/// Error in a schema table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field {field} of {type_name} has identifier 0 (identifiers start at 1)")]
    ZeroIdentifier { type_name: String, field: String },

    #[error("identifier {id} is declared twice in {type_name}")]
    DuplicateIdentifier { type_name: String, id: u16 },

    #[error("field name {field:?} is declared twice in {type_name}")]
    DuplicateName { type_name: String, field: String },

    #[error("default for {type_name}.{field} is not a valid {expected}")]
    InvalidDefault {
        type_name: String,
        field: String,
        expected: String,
    },

    #[error("{type_name}.{field}: {key} cannot be used as a map key")]
    InvalidMapKey {
        type_name: String,
        field: String,
        key: String,
    },

    #[error("{type_name}.{field} refers to unregistered struct type {target}")]
    UnresolvedStruct {
        type_name: String,
        field: String,
        target: String,
    },

    #[error("struct type {type_name} is registered twice")]
    DuplicateType { type_name: String },

    #[error("{type_name}.{field}: annotation name {name:?} is reserved for markup attributes")]
    ReservedAnnotation {
        type_name: String,
        field: String,
        name: String,
    },

    #[error("{type_name}.{field}: annotation {name:?} is declared twice")]
    DuplicateAnnotation {
        type_name: String,
        field: String,
        name: String,
    },
}

/// Error during decoding of either wire format.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E002: Value format ===
    #[error("field {field}: {source}")]
    ValueFormat {
        field: String,
        #[source]
        source: ValueFormatError,
    },

    #[error("[E002] field {field} is tagged {found:?} on the wire but declared {expected}")]
    KindTagMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("[E002] duplicate key {key:?} in map field {field}")]
    DuplicateKey { field: String, key: String },

    // === E003: Type mismatch ===
    #[error("[E003] expected struct type {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("[E003] struct type {name} is not registered")]
    UnknownType { name: String },

    // === E004: Structural ===
    #[error("[E004] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[E004] expected {expected}, found {found:?}")]
    Unexpected { expected: &'static str, found: String },

    #[error("[E004] closing tag </{found}> does not match <{expected}>")]
    UnbalancedTag { expected: String, found: String },

    #[error("[E004] unterminated CDATA section")]
    UnterminatedCdata,

    #[error("[E004] {container} declares size {declared} but holds {actual} elements")]
    SizeMismatch {
        container: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("[E004] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[E004] nesting deeper than {max} levels")]
    NestingTooDeep { max: usize },

    #[error("[E004] malformed document: {context}")]
    Malformed { context: &'static str },

    #[error("[E004] malformed markup: {0}")]
    Markup(String),

    #[error("[E004] invalid JSON: {0}")]
    InvalidJson(String),
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::ValueFormat { .. }
            | DecodeError::KindTagMismatch { .. }
            | DecodeError::DuplicateKey { .. } => ErrorCode::ValueFormat,
            DecodeError::TypeMismatch { .. } | DecodeError::UnknownType { .. } => {
                ErrorCode::TypeMismatch
            }
            _ => ErrorCode::Structural,
        }
    }

    pub(crate) fn value_format(field: &str, source: ValueFormatError) -> Self {
        DecodeError::ValueFormat {
            field: field.to_string(),
            source,
        }
    }
}

/// A protocol name that is neither tagged text nor markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown protocol {0:?} (expected json or xml)")]
pub struct UnknownProtocol(pub String);

/// Error during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("field {field}: {source}")]
    ValueFormat {
        field: String,
        #[source]
        source: ValueFormatError,
    },

    #[error("[E004] markup writer failed: {0}")]
    Write(String),
}

impl EncodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EncodeError::ValueFormat { .. } => ErrorCode::ValueFormat,
            EncodeError::Write(_) => ErrorCode::Structural,
        }
    }
}
