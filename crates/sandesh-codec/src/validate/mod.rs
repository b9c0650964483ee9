//! Deep structural equality for round-trip validation.
//!
//! Two structs are equal when they have the same type name and the same
//! effective value (explicit or defaulted) for every field. Annotations and
//! field identifiers take no part in the verdict. Lists compare
//! positionally; maps compare as key/value sets, so entry order is
//! irrelevant. Doubles are equal when `==` holds or both are NaN.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::model::text::key_text;
use crate::model::{Struct, Value};

/// The first difference found between two structs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Dotted path to the differing value, e.g. `lcst_1[1].lipaddr_1[0]`.
    /// Empty when the roots themselves differ.
    pub path: String,
    /// What differs.
    pub reason: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

impl std::error::Error for Mismatch {}

/// Returns true if the two structs are structurally equal.
pub fn structurally_equal(a: &Struct, b: &Struct) -> bool {
    compare_structs(a, b).is_ok()
}

/// Compares two structs, reporting the first difference.
pub fn compare_structs(a: &Struct, b: &Struct) -> Result<(), Mismatch> {
    let mut path = String::new();
    compare_struct_at(&mut path, a, b)
}

/// Returns true if two values are structurally equal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    let mut path = String::new();
    compare_value_at(&mut path, a, b).is_ok()
}

fn mismatch(path: &str, reason: impl Into<String>) -> Mismatch {
    Mismatch {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn compare_struct_at(path: &mut String, a: &Struct, b: &Struct) -> Result<(), Mismatch> {
    if a.type_name() != b.type_name() {
        return Err(mismatch(
            path,
            format!("struct type {} differs from {}", a.type_name(), b.type_name()),
        ));
    }
    // Fields declared only by the right-hand schema still count.
    let names = a.schema().fields().iter().map(|f| f.name()).chain(
        b.schema()
            .fields()
            .iter()
            .map(|f| f.name())
            .filter(|name| a.schema().index_of_name(name).is_none()),
    );
    for name in names {
        let base = path.len();
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(name);
        let result = match (a.get_by_name(name), b.get_by_name(name)) {
            (None, None) => Ok(()),
            (Some(_), None) => Err(mismatch(path, "set only on the left")),
            (None, Some(_)) => Err(mismatch(path, "set only on the right")),
            (Some(x), Some(y)) => compare_value_at(path, x, y),
        };
        path.truncate(base);
        result?;
    }
    Ok(())
}

fn compare_value_at(path: &mut String, a: &Value, b: &Value) -> Result<(), Mismatch> {
    let equal = match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Byte(x), Value::Byte(y)) => x == y,
        (Value::I16(x), Value::I16(y)) => x == y,
        (Value::I32(x), Value::I32(y)) => x == y,
        (Value::I64(x), Value::I64(y)) => x == y,
        (Value::U16(x), Value::U16(y)) => x == y,
        (Value::U32(x), Value::U32(y)) => x == y,
        (Value::U64(x), Value::U64(y)) => x == y,
        (Value::Double(x), Value::Double(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) | (Value::Xml(x), Value::Xml(y)) => x == y,
        (Value::Ipv4(x), Value::Ipv4(y)) => x == y,
        (Value::IpAddr(x), Value::IpAddr(y)) => x == y,
        (Value::Uuid(x), Value::Uuid(y)) => x == y,
        (Value::Struct(x), Value::Struct(y)) => return compare_struct_at(path, x, y),
        (Value::List(x), Value::List(y)) => return compare_lists(path, x, y),
        (Value::Map(x), Value::Map(y)) => return compare_maps(path, x, y),
        _ => {
            return Err(mismatch(
                path,
                format!("kind {} differs from {}", a.tag(), b.tag()),
            ));
        }
    };
    if equal {
        Ok(())
    } else {
        Err(mismatch(path, format!("{:?} differs from {:?}", a, b)))
    }
}

fn compare_lists(path: &mut String, a: &[Value], b: &[Value]) -> Result<(), Mismatch> {
    if a.len() != b.len() {
        return Err(mismatch(
            path,
            format!("list length {} differs from {}", a.len(), b.len()),
        ));
    }
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let base = path.len();
        path.push_str(&format!("[{}]", i));
        let result = compare_value_at(path, x, y);
        path.truncate(base);
        result?;
    }
    Ok(())
}

fn compare_maps(
    path: &mut String,
    a: &[(Value, Value)],
    b: &[(Value, Value)],
) -> Result<(), Mismatch> {
    if a.len() != b.len() {
        return Err(mismatch(
            path,
            format!("map size {} differs from {}", a.len(), b.len()),
        ));
    }
    // Keyed by tag and canonical text; the first entry wins, as in a linear scan.
    let mut index: FxHashMap<(&'static str, String), &Value> = FxHashMap::default();
    for (k, v) in b {
        if let Some(text) = key_text(k) {
            index.entry((k.tag(), text)).or_insert(v);
        }
    }
    let lookup = |key: &Value| match key_text(key) {
        Some(text) => index.get(&(key.tag(), text)).copied(),
        None => b.iter().find(|(k, _)| values_equal(k, key)).map(|(_, v)| v),
    };
    for (key, x) in a {
        let Some(y) = lookup(key) else {
            return Err(mismatch(path, format!("key {:?} missing on the right", key)));
        };
        let base = path.len();
        path.push_str(&format!("[{:?}]", key));
        let result = compare_value_at(path, x, y);
        path.truncate(base);
        result?;
    }
    Ok(())
}
