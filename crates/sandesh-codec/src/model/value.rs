//! Runtime values held by struct fields.

use std::net::{IpAddr, Ipv4Addr};

use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::model::text::key_text;
use crate::model::{Kind, Struct};

/// A typed value stored in a struct field, list element or map entry.
///
/// Semantic kinds keep their native representation: `Ipv4` is the 32-bit
/// address with the first octet in the most significant byte, `Uuid` is the
/// 16-byte value. Their canonical text is produced only at encode time.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U16(u16),
    U32(u32),
    U64(u64),
    Double(f64),
    String(String),
    Xml(String),
    Ipv4(u32),
    IpAddr(IpAddr),
    Uuid(Uuid),
    Struct(Struct),
    List(Vec<Value>),
    /// Entries in insertion order; keys are unique.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Creates an `xml` value from preformatted markup.
    pub fn xml(markup: impl Into<String>) -> Value {
        Value::Xml(markup.into())
    }

    /// Creates an `ipv4` value from an address.
    pub fn ipv4(addr: Ipv4Addr) -> Value {
        Value::Ipv4(u32::from(addr))
    }

    /// Creates a list value.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a map value. Duplicate keys are rejected when the value is
    /// assigned to a field.
    pub fn map<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the wire tag of this value's kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Xml(_) => "xml",
            Value::Ipv4(_) => "ipv4",
            Value::IpAddr(_) => "ipaddr",
            Value::Uuid(_) => "uuid_t",
            Value::Struct(_) => "struct",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Returns the text of a `string` or `xml` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Xml(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested struct of a `struct` value.
    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of a `list` value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a `map` value.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns any unsigned or non-negative signed integer widened to u64.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Byte(v) => u64::try_from(v).ok(),
            Value::I16(v) => u64::try_from(v).ok(),
            Value::I32(v) => u64::try_from(v).ok(),
            Value::I64(v) => u64::try_from(v).ok(),
            Value::U16(v) => Some(v.into()),
            Value::U32(v) | Value::Ipv4(v) => Some(v.into()),
            Value::U64(v) => Some(v),
            _ => None,
        }
    }
}

/// Why a value cannot be stored under a declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Violation {
    Kind { found: &'static str },
    DuplicateKey(String),
}

/// Checks that `value` (recursively) belongs to `kind`.
pub(crate) fn check(kind: &Kind, value: &Value) -> Result<(), Violation> {
    let ok = match (kind, value) {
        (Kind::Bool, Value::Bool(_))
        | (Kind::Byte, Value::Byte(_))
        | (Kind::I16, Value::I16(_))
        | (Kind::I32, Value::I32(_))
        | (Kind::I64, Value::I64(_))
        | (Kind::U16, Value::U16(_))
        | (Kind::U32, Value::U32(_))
        | (Kind::U64, Value::U64(_))
        | (Kind::Double, Value::Double(_))
        | (Kind::String, Value::String(_))
        | (Kind::Xml, Value::Xml(_))
        | (Kind::Ipv4, Value::Ipv4(_))
        | (Kind::IpAddr, Value::IpAddr(_))
        | (Kind::Uuid, Value::Uuid(_)) => true,
        (Kind::Struct(name), Value::Struct(s)) => s.type_name() == name,
        (Kind::List(element), Value::List(items)) => {
            for item in items {
                check(element, item)?;
            }
            true
        }
        (Kind::Map(key_kind, value_kind), Value::Map(entries)) => {
            for (k, v) in entries {
                check(key_kind, k)?;
                check(value_kind, v)?;
            }
            if let Some(dup) = first_duplicate_key(entries) {
                return Err(Violation::DuplicateKey(dup));
            }
            true
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(Violation::Kind { found: value.tag() })
    }
}

/// Returns the canonical text of the first key that appears twice.
pub(crate) fn first_duplicate_key(entries: &[(Value, Value)]) -> Option<String> {
    let mut seen = FxHashSet::default();
    for (key, _) in entries {
        if let Some(text) = key_text(key) {
            if !seen.insert(text.clone()) {
                return Some(text);
            }
        }
    }
    None
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::validate::values_equal(self, other)
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f64 => Double,
    String => String,
    IpAddr => IpAddr,
    Uuid => Uuid,
    Struct => Struct,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
