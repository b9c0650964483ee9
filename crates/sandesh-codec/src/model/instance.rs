//! Struct instances with per-field presence.

use std::fmt;
use std::sync::Arc;

use crate::error::FieldError;
use crate::model::value::{Violation, check};
use crate::model::{FieldSchema, StructSchema, Value};

/// Presence state of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Not set and no default; omitted from every encoding.
    Absent,
    /// Holding the declared default, applied at construction.
    Defaulted,
    /// Assigned explicitly after construction.
    Explicit,
}

#[derive(Clone)]
enum Slot {
    Absent,
    Defaulted,
    Set(Value),
}

/// A record of some struct type, holding values only for set fields.
///
/// Construction applies every declared default. Values are checked against
/// the declared kind when assigned, so an instance never holds a value of
/// the wrong kind.
#[derive(Clone)]
pub struct Struct {
    schema: Arc<StructSchema>,
    slots: Vec<Slot>,
}

impl Struct {
    /// Creates an instance with all declared defaults applied.
    pub fn new(schema: Arc<StructSchema>) -> Self {
        let slots = schema
            .fields()
            .iter()
            .map(|f| {
                if f.default().is_some() {
                    Slot::Defaulted
                } else {
                    Slot::Absent
                }
            })
            .collect();
        Self { schema, slots }
    }

    pub fn schema(&self) -> &Arc<StructSchema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Assigns a value to the field with the given identifier.
    pub fn set(&mut self, id: u16, value: impl Into<Value>) -> Result<(), FieldError> {
        let index = self.index_of(id)?;
        self.set_at(index, value.into())
    }

    /// Assigns a value to the field with the given name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FieldError> {
        let index = self.index_of_name(name)?;
        self.set_at(index, value.into())
    }

    /// Builder-style [`set_by_name`](Self::set_by_name).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, FieldError> {
        self.set_by_name(name, value)?;
        Ok(self)
    }

    /// Clears a field, including one holding its default.
    pub fn unset(&mut self, id: u16) -> Result<(), FieldError> {
        let index = self.index_of(id)?;
        self.slots[index] = Slot::Absent;
        Ok(())
    }

    pub fn unset_by_name(&mut self, name: &str) -> Result<(), FieldError> {
        let index = self.index_of_name(name)?;
        self.slots[index] = Slot::Absent;
        Ok(())
    }

    /// Returns true if the field is defaulted or explicitly set.
    pub fn is_set(&self, id: u16) -> bool {
        self.schema
            .index_of(id)
            .is_some_and(|i| !matches!(self.slots[i], Slot::Absent))
    }

    /// Returns the presence state, or `None` for an unknown identifier.
    pub fn presence(&self, id: u16) -> Option<Presence> {
        self.schema.index_of(id).map(|i| match self.slots[i] {
            Slot::Absent => Presence::Absent,
            Slot::Defaulted => Presence::Defaulted,
            Slot::Set(_) => Presence::Explicit,
        })
    }

    /// Returns the field's effective value (explicit or default).
    pub fn get(&self, id: u16) -> Option<&Value> {
        self.schema.index_of(id).and_then(|i| self.value_at(i))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.schema.index_of_name(name).and_then(|i| self.value_at(i))
    }

    /// Iterates set fields in declaration order.
    ///
    /// The iterator is lazy and `Clone`. Call this again, or clone before
    /// advancing, to walk the fields twice.
    pub fn iter_set_fields(&self) -> SetFields<'_> {
        SetFields {
            instance: self,
            index: 0,
        }
    }

    /// Stores an already-checked value; used by the decoders.
    pub(crate) fn put(&mut self, index: usize, value: Value) {
        self.slots[index] = Slot::Set(value);
    }

    fn set_at(&mut self, index: usize, value: Value) -> Result<(), FieldError> {
        let field = &self.schema.fields()[index];
        match check(field.kind(), &value) {
            Ok(()) => {
                self.slots[index] = Slot::Set(value);
                Ok(())
            }
            Err(Violation::Kind { found }) => Err(FieldError::KindMismatch {
                type_name: self.schema.name().to_string(),
                field: field.name().to_string(),
                expected: field.kind().to_string(),
                found,
            }),
            Err(Violation::DuplicateKey(key)) => Err(FieldError::DuplicateKey {
                field: field.name().to_string(),
                key,
            }),
        }
    }

    fn value_at(&self, index: usize) -> Option<&Value> {
        match &self.slots[index] {
            Slot::Absent => None,
            Slot::Defaulted => self.schema.fields()[index].default(),
            Slot::Set(value) => Some(value),
        }
    }

    fn index_of(&self, id: u16) -> Result<usize, FieldError> {
        self.schema.index_of(id).ok_or_else(|| FieldError::UnknownId {
            type_name: self.schema.name().to_string(),
            id,
        })
    }

    fn index_of_name(&self, name: &str) -> Result<usize, FieldError> {
        self.schema
            .index_of_name(name)
            .ok_or_else(|| FieldError::UnknownName {
                type_name: self.schema.name().to_string(),
                name: name.to_string(),
            })
    }
}

/// Iterator over the set fields of a [`Struct`].
#[derive(Clone)]
pub struct SetFields<'a> {
    instance: &'a Struct,
    index: usize,
}

impl<'a> Iterator for SetFields<'a> {
    type Item = (&'a FieldSchema, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let fields = self.instance.schema.fields();
        while self.index < fields.len() {
            let index = self.index;
            self.index += 1;
            if let Some(value) = self.instance.value_at(index) {
                return Some((&fields[index], value));
            }
        }
        None
    }
}

impl PartialEq for Struct {
    fn eq(&self, other: &Self) -> bool {
        crate::validate::structurally_equal(self, other)
    }
}

impl fmt::Debug for Struct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name());
        for (field, value) in self.iter_set_fields() {
            s.field(field.name(), value);
        }
        s.finish()
    }
}
