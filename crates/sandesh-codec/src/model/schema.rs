//! Field and struct descriptors, their builder, and the schema registry.
//!
//! Descriptors are normally produced ahead of time from an interface
//! definition. They are immutable once built and shared through `Arc`, so a
//! registry can be handed by reference to any number of decoders.
//!
//! # Example
//!
//! ```rust
//! use sandesh_codec::model::{Kind, SchemaRegistry, StructSchema};
//!
//! let schema = StructSchema::builder("AnnotationsTest")
//!     .field_with(2, "i32_1", Kind::I32, |f| f.annotation("format", "%d"))
//!     .field_with(3, "string_1", Kind::String, |f| f.default_value("Last field"))
//!     .build()
//!     .unwrap();
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(schema).unwrap();
//! assert!(registry.get("AnnotationsTest").is_some());
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::SchemaError;
use crate::model::value::check;
use crate::model::{Kind, Value};

/// Descriptor of one named, numbered field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    id: u16,
    name: String,
    kind: Kind,
    default: Option<Value>,
    annotations: Vec<(String, String)>,
}

impl FieldSchema {
    /// Schema-assigned identifier, unique within the struct.
    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Value applied at construction, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Annotations in declaration order.
    pub fn annotations(&self) -> &[(String, String)] {
        &self.annotations
    }
}

/// Descriptor of a struct type: its name and fields in declaration order.
#[derive(Debug)]
pub struct StructSchema {
    name: String,
    fields: Vec<FieldSchema>,
    by_id: FxHashMap<u16, usize>,
    by_name: FxHashMap<String, usize>,
}

impl StructSchema {
    /// Starts building a struct descriptor.
    pub fn builder(name: impl Into<String>) -> StructSchemaBuilder {
        StructSchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order (the serialization order).
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the declaration index of the field with this identifier.
    pub fn index_of(&self, id: u16) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Returns the declaration index of the field with this name.
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn field_by_id(&self, id: u16) -> Option<&FieldSchema> {
        self.index_of(id).map(|i| &self.fields[i])
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldSchema> {
        self.index_of_name(name).map(|i| &self.fields[i])
    }
}

/// Attribute names every markup field element already carries.
const RESERVED_ANNOTATIONS: [&str; 2] = ["type", "identifier"];

/// Builder for a single field's optional parts.
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    default: Option<Value>,
    annotations: Vec<(String, String)>,
}

impl FieldBuilder {
    /// Declares a default, applied whenever an instance is constructed.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Adds an annotation emitted with every instance of the field.
    pub fn annotation(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.push((name.into(), value.into()));
        self
    }
}

/// Fluent builder for [`StructSchema`].
#[derive(Debug, Clone)]
pub struct StructSchemaBuilder {
    name: String,
    fields: Vec<FieldSchema>,
}

impl StructSchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a plain field.
    pub fn field(self, id: u16, name: impl Into<String>, kind: Kind) -> Self {
        self.field_with(id, name, kind, |f| f)
    }

    /// Adds a field configured by a builder function.
    pub fn field_with<F>(mut self, id: u16, name: impl Into<String>, kind: Kind, f: F) -> Self
    where
        F: FnOnce(FieldBuilder) -> FieldBuilder,
    {
        let extra = f(FieldBuilder {
            default: None,
            annotations: Vec::new(),
        });
        self.fields.push(FieldSchema {
            id,
            name: name.into(),
            kind,
            default: extra.default,
            annotations: extra.annotations,
        });
        self
    }

    /// Validates the fields and returns the shared descriptor.
    pub fn build(self) -> Result<Arc<StructSchema>, SchemaError> {
        let mut by_id = FxHashMap::default();
        let mut by_name = FxHashMap::default();

        for (index, field) in self.fields.iter().enumerate() {
            if field.id == 0 {
                return Err(SchemaError::ZeroIdentifier {
                    type_name: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if by_id.insert(field.id, index).is_some() {
                return Err(SchemaError::DuplicateIdentifier {
                    type_name: self.name.clone(),
                    id: field.id,
                });
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateName {
                    type_name: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            for (i, (name, _)) in field.annotations.iter().enumerate() {
                if RESERVED_ANNOTATIONS.contains(&name.as_str()) {
                    return Err(SchemaError::ReservedAnnotation {
                        type_name: self.name.clone(),
                        field: field.name.clone(),
                        name: name.clone(),
                    });
                }
                if field.annotations[..i].iter().any(|(earlier, _)| earlier == name) {
                    return Err(SchemaError::DuplicateAnnotation {
                        type_name: self.name.clone(),
                        field: field.name.clone(),
                        name: name.clone(),
                    });
                }
            }
            if let Some(key) = invalid_map_key(&field.kind) {
                return Err(SchemaError::InvalidMapKey {
                    type_name: self.name.clone(),
                    field: field.name.clone(),
                    key: key.to_string(),
                });
            }
            if let Some(default) = &field.default {
                if check(&field.kind, default).is_err() {
                    return Err(SchemaError::InvalidDefault {
                        type_name: self.name.clone(),
                        field: field.name.clone(),
                        expected: field.kind.to_string(),
                    });
                }
            }
        }

        Ok(Arc::new(StructSchema {
            name: self.name,
            fields: self.fields,
            by_id,
            by_name,
        }))
    }
}

fn invalid_map_key(kind: &Kind) -> Option<&Kind> {
    match kind {
        Kind::List(element) => invalid_map_key(element),
        Kind::Map(key, value) => {
            if !key.is_map_key() {
                Some(&**key)
            } else {
                invalid_map_key(value)
            }
        }
        _ => None,
    }
}

/// Read-only table of struct descriptors keyed by type name.
///
/// Decoders resolve nested `struct` kinds through it; it is passed
/// explicitly rather than held in process-wide state.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    structs: FxHashMap<String, Arc<StructSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor; each type name may be registered once.
    pub fn register(&mut self, schema: Arc<StructSchema>) -> Result<(), SchemaError> {
        if self.structs.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateType {
                type_name: schema.name().to_string(),
            });
        }
        self.structs.insert(schema.name().to_string(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<StructSchema>> {
        self.structs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    /// Checks that every nested struct type referenced by any field is registered.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for schema in self.structs.values() {
            for field in schema.fields() {
                let mut refs = Vec::new();
                field.kind().struct_refs(&mut refs);
                if let Some(target) = refs.into_iter().find(|name| !self.contains(name)) {
                    return Err(SchemaError::UnresolvedStruct {
                        type_name: schema.name().to_string(),
                        field: field.name().to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
