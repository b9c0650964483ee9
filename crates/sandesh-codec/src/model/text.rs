//! Canonical text rendering and parsing for scalar kinds.
//!
//! Both wire formats carry every scalar as text (or a JSON literal with the
//! same spelling), so this module is the single grammar for each kind:
//! - Integers: locale-independent decimal; only signed kinds accept a
//!   leading `-`, no kind accepts `+` or whitespace
//! - `double`: shortest decimal that round-trips, never exponent notation
//! - `ipv4`: dotted quad; parsing also accepts the 32-bit decimal form
//! - `ipaddr`: dotted quad or compressed IPv6
//! - `uuid_t`: lowercase 8-4-4-4-12 hex; parsing is case-insensitive

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use uuid::Uuid;

use crate::error::ValueFormatError;
use crate::model::{Kind, Value};

const UUID_GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Renders a scalar value in its canonical text form.
///
/// Non-finite doubles render as `nan`, `inf` and `-inf`. Containers and
/// structs have no scalar rendering and are rejected.
pub fn render(value: &Value) -> Result<String, ValueFormatError> {
    let text = match value {
        Value::Bool(v) => v.to_string(),
        Value::Byte(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::Double(v) if v.is_nan() => "nan".to_string(),
        Value::Double(v) => v.to_string(),
        Value::String(v) | Value::Xml(v) => v.clone(),
        Value::Ipv4(v) => format_ipv4(*v),
        Value::IpAddr(v) => v.to_string(),
        Value::Uuid(v) => format_uuid(v),
        Value::Struct(_) | Value::List(_) | Value::Map(_) => {
            return Err(ValueFormatError::new(value.tag(), "", "not a scalar value"));
        }
    };
    Ok(text)
}

/// Parses canonical text into a value of the given scalar kind.
pub fn parse(kind: &Kind, text: &str) -> Result<Value, ValueFormatError> {
    let value = match kind {
        Kind::Bool => match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(ValueFormatError::new("bool", text, "expected true or false")),
        },
        Kind::Byte => Value::Byte(parse_int(text, "byte", true)?),
        Kind::I16 => Value::I16(parse_int(text, "i16", true)?),
        Kind::I32 => Value::I32(parse_int(text, "i32", true)?),
        Kind::I64 => Value::I64(parse_int(text, "i64", true)?),
        Kind::U16 => Value::U16(parse_int(text, "u16", false)?),
        Kind::U32 => Value::U32(parse_int(text, "u32", false)?),
        Kind::U64 => Value::U64(parse_int(text, "u64", false)?),
        Kind::Double => Value::Double(
            text.parse()
                .map_err(|_| ValueFormatError::new("double", text, "expected a decimal number"))?,
        ),
        Kind::String => Value::String(text.to_string()),
        Kind::Xml => Value::Xml(text.to_string()),
        Kind::Ipv4 => Value::Ipv4(parse_ipv4(text)?),
        Kind::IpAddr => Value::IpAddr(
            text.parse::<IpAddr>()
                .map_err(|_| ValueFormatError::new("ipaddr", text, "neither IPv4 nor IPv6"))?,
        ),
        Kind::Uuid => Value::Uuid(parse_uuid(text)?),
        Kind::Struct(_) | Kind::List(_) | Kind::Map(_, _) => {
            return Err(ValueFormatError::new(kind.tag(), text, "not a scalar kind"));
        }
    };
    Ok(value)
}

/// Returns the canonical text of a value usable as a map key.
pub(crate) fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(_) | Value::Double(_) | Value::Xml(_) => None,
        Value::Struct(_) | Value::List(_) | Value::Map(_) => None,
        other => render(other).ok(),
    }
}

fn parse_int<T: FromStr>(
    text: &str,
    kind: &'static str,
    signed: bool,
) -> Result<T, ValueFormatError> {
    let digits = if signed {
        text.strip_prefix('-').unwrap_or(text)
    } else {
        text
    };
    if digits.is_empty() {
        return Err(ValueFormatError::new(kind, text, "no digits"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        let reason = if !signed && text.starts_with('-') {
            "negative value for an unsigned kind"
        } else {
            "expected decimal digits"
        };
        return Err(ValueFormatError::new(kind, text, reason));
    }
    text.parse()
        .map_err(|_| ValueFormatError::new(kind, text, "out of range"))
}

/// Formats a 32-bit address as a dotted quad, first octet most significant.
pub fn format_ipv4(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// Parses a dotted quad, or the plain 32-bit decimal form.
pub fn parse_ipv4(text: &str) -> Result<u32, ValueFormatError> {
    if text.contains('.') {
        text.parse::<Ipv4Addr>()
            .map(u32::from)
            .map_err(|_| ValueFormatError::new("ipv4", text, "malformed dotted quad"))
    } else {
        parse_int(text, "ipv4", false)
    }
}

/// Formats a UUID as lowercase hyphenated 8-4-4-4-12 hex.
pub fn format_uuid(uuid: &Uuid) -> String {
    uuid.hyphenated().to_string()
}

/// Parses a hyphenated UUID, accepting either case.
pub fn parse_uuid(text: &str) -> Result<Uuid, ValueFormatError> {
    let mut groups = 0;
    for (i, group) in text.split('-').enumerate() {
        if i >= UUID_GROUPS.len() || group.len() != UUID_GROUPS[i] {
            return Err(ValueFormatError::new("uuid_t", text, "expected 8-4-4-4-12 groups"));
        }
        if !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValueFormatError::new("uuid_t", text, "non-hex character"));
        }
        groups += 1;
    }
    if groups != UUID_GROUPS.len() {
        return Err(ValueFormatError::new("uuid_t", text, "expected 8-4-4-4-12 groups"));
    }
    Uuid::parse_str(text).map_err(|_| ValueFormatError::new("uuid_t", text, "malformed uuid"))
}
