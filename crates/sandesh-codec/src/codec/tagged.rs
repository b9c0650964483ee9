//! Tagged-text (JSON) encoding and decoding.
//!
//! Every field travels with its kind tag:
//!
//! ```text
//! {"BasicTypesTest":{"bool_1":{"TYPE":"bool","VAL":true}},"TIMESTAMP":"2018-10-11 15:20:51"}
//! ```
//!
//! Containers wrap their contents in a further `{"VAL": ..}` object. A struct
//! field carries `{"INSTANCE":"<type>","VAL":{..}}`; struct list items and map
//! values omit `INSTANCE`. The decoder accepts either form and ignores the
//! `VALUE` hint some producers add to map objects.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::{Map, Value as Json};
use tracing::{debug, trace};

use crate::codec::lookup;
use crate::codec::primitives::TextWriter;
use crate::error::{DecodeError, EncodeError, ValueFormatError};
use crate::limits::{MAX_CONTAINER_LEN, MAX_INPUT_LEN, MAX_NESTING_DEPTH};
use crate::model::text;
use crate::model::value::first_duplicate_key;
use crate::model::{FieldSchema, Kind, SchemaRegistry, Struct, StructSchema, Value};
use crate::util::datetime::{format_timestamp, now_unix_secs};

const TIMESTAMP: &str = "TIMESTAMP";
const TYPE: &str = "TYPE";
const VAL: &str = "VAL";
const INSTANCE: &str = "INSTANCE";

/// Options for tagged-text encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Unix time (seconds) written to the `TIMESTAMP` envelope key.
    ///
    /// `None` stamps the current wall-clock time. Pinning it makes the
    /// output reproducible.
    pub timestamp: Option<i64>,
}

impl EncodeOptions {
    /// Creates default options (wall-clock timestamp).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the envelope timestamp.
    pub fn with_timestamp(mut self, unix_secs: i64) -> Self {
        self.timestamp = Some(unix_secs);
        self
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a struct in the tagged-text format, stamped with the current time.
pub fn encode_tagged_text(instance: &Struct) -> Result<String, EncodeError> {
    encode_tagged_text_with_options(instance, EncodeOptions::default())
}

/// Encodes a struct in the tagged-text format with the given options.
pub fn encode_tagged_text_with_options(
    instance: &Struct,
    options: EncodeOptions,
) -> Result<String, EncodeError> {
    let mut w = TextWriter::with_capacity(256);
    encode_tagged_text_into(&mut w, instance, options)?;
    debug!(
        type_name = instance.type_name(),
        bytes = w.len(),
        "encoded tagged text"
    );
    Ok(w.into_string())
}

/// Appends the tagged-text form of a struct to an existing writer.
pub fn encode_tagged_text_into(
    w: &mut TextWriter,
    instance: &Struct,
    options: EncodeOptions,
) -> Result<(), EncodeError> {
    w.push('{');
    write_str(w, instance.type_name());
    w.push(':');
    write_fields(w, instance)?;
    w.push(',');
    write_str(w, TIMESTAMP);
    w.push(':');
    let secs = options.timestamp.unwrap_or_else(now_unix_secs);
    write_str(w, &format_timestamp(secs));
    w.push('}');
    Ok(())
}

fn write_fields(w: &mut TextWriter, instance: &Struct) -> Result<(), EncodeError> {
    w.push('{');
    for (i, (field, value)) in instance.iter_set_fields().enumerate() {
        if i > 0 {
            w.push(',');
        }
        write_str(w, field.name());
        w.append(":{\"TYPE\":");
        write_str(w, field.kind().tag());
        if !field.annotations().is_empty() {
            w.append(",\"ANNOTATION\":{");
            for (j, (name, ann)) in field.annotations().iter().enumerate() {
                if j > 0 {
                    w.push(',');
                }
                write_str(w, name);
                w.push(':');
                write_str(w, ann);
            }
            w.push('}');
        }
        w.append(",\"VAL\":");
        write_value(w, field, field.kind(), value, true)?;
        w.push('}');
    }
    w.push('}');
    Ok(())
}

/// Writes `value` of the declared `kind`. `INSTANCE` is written for struct
/// values only when `with_instance` is set (field position).
fn write_value(
    w: &mut TextWriter,
    field: &FieldSchema,
    kind: &Kind,
    value: &Value,
    with_instance: bool,
) -> Result<(), EncodeError> {
    match (kind, value) {
        (_, Value::Struct(nested)) => {
            w.push('{');
            if with_instance {
                w.append("\"INSTANCE\":");
                write_str(w, nested.type_name());
                w.push(',');
            }
            w.append("\"VAL\":");
            write_fields(w, nested)?;
            w.push('}');
        }
        (Kind::List(element), Value::List(items)) => {
            w.append("{\"VAL\":[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    w.push(',');
                }
                write_value(w, field, element, item, false)?;
            }
            w.append("]}");
        }
        (Kind::Map(_, val), Value::Map(entries)) => {
            w.append("{\"VAL\":{");
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    w.push(',');
                }
                write_str(w, &render(field, k)?);
                w.push(':');
                write_value(w, field, val, v, false)?;
            }
            w.append("}}");
        }
        (_, Value::Bool(b)) => w.append(if *b { "true" } else { "false" }),
        // JSON numbers cannot hold nan or inf; those travel as strings.
        (_, Value::Double(d)) if d.is_finite() => {
            let _ = write!(w, "{}", d);
        }
        (
            _,
            Value::Byte(_)
            | Value::I16(_)
            | Value::I32(_)
            | Value::I64(_)
            | Value::U16(_)
            | Value::U32(_)
            | Value::U64(_),
        ) => w.append(&render(field, value)?),
        (_, Value::String(s) | Value::Xml(s)) => write_str(w, s),
        (_, other) => write_str(w, &render(field, other)?),
    }
    Ok(())
}

fn render(field: &FieldSchema, value: &Value) -> Result<String, EncodeError> {
    text::render(value).map_err(|source| EncodeError::ValueFormat {
        field: field.name().to_string(),
        source,
    })
}

/// Writes a JSON string literal.
fn write_str(w: &mut TextWriter, s: &str) {
    let _ = write!(w, "{}", Json::from(s));
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a tagged-text document holding one struct of type `type_name`.
///
/// The `TIMESTAMP` envelope key is accepted but not validated.
pub fn decode_tagged_text(
    input: &str,
    type_name: &str,
    registry: &SchemaRegistry,
) -> Result<Struct, DecodeError> {
    if input.len() > MAX_INPUT_LEN {
        return Err(DecodeError::LengthExceedsLimit {
            field: "input",
            len: input.len(),
            max: MAX_INPUT_LEN,
        });
    }
    let schema = lookup(registry, type_name)?;
    let doc: Json =
        serde_json::from_str(input).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    let root = doc.as_object().ok_or(DecodeError::Malformed {
        context: "document is not an object",
    })?;

    let mut members = root.iter().filter(|(k, _)| k.as_str() != TIMESTAMP);
    let (found, body) = members.next().ok_or(DecodeError::Malformed {
        context: "document has no struct member",
    })?;
    if members.next().is_some() {
        return Err(DecodeError::Malformed {
            context: "document has more than one struct member",
        });
    }
    if found != type_name {
        return Err(DecodeError::TypeMismatch {
            expected: type_name.to_string(),
            found: found.clone(),
        });
    }
    let fields = body.as_object().ok_or(DecodeError::Malformed {
        context: "struct body is not an object",
    })?;

    let decoder = TaggedDecoder { registry };
    let instance = decoder.decode_struct(schema, fields, 0)?;
    debug!(type_name, bytes = input.len(), "decoded tagged text");
    Ok(instance)
}

struct TaggedDecoder<'r> {
    registry: &'r SchemaRegistry,
}

impl TaggedDecoder<'_> {
    fn decode_struct(
        &self,
        schema: &Arc<StructSchema>,
        fields: &Map<String, Json>,
        depth: usize,
    ) -> Result<Struct, DecodeError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        let mut instance = Struct::new(schema.clone());
        for (name, member) in fields {
            let Some(index) = schema.index_of_name(name) else {
                trace!(type_name = schema.name(), field = name.as_str(), "skipping unknown field");
                continue;
            };
            let field = &schema.fields()[index];
            let member = member.as_object().ok_or(DecodeError::Malformed {
                context: "field member is not an object",
            })?;
            match member.get(TYPE).and_then(Json::as_str) {
                Some(tag) if tag == field.kind().tag() => {}
                Some(tag) => {
                    return Err(DecodeError::KindTagMismatch {
                        field: field.name().to_string(),
                        expected: field.kind().tag(),
                        found: tag.to_string(),
                    });
                }
                None => {
                    return Err(DecodeError::Malformed {
                        context: "field member without a TYPE tag",
                    });
                }
            }
            let raw = member.get(VAL).ok_or(DecodeError::Malformed {
                context: "field member without a VAL",
            })?;
            let value = self.decode_value(field, field.kind(), raw, depth + 1)?;
            instance.put(index, value);
        }
        Ok(instance)
    }

    /// Decodes a field value, list item or map value of the declared `kind`.
    fn decode_value(
        &self,
        field: &FieldSchema,
        kind: &Kind,
        json: &Json,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        match kind {
            Kind::Struct(name) => {
                let wrapper = json.as_object().ok_or(DecodeError::Malformed {
                    context: "struct value is not an object",
                })?;
                if let Some(instance) = wrapper.get(INSTANCE) {
                    let found = instance.as_str().unwrap_or_default();
                    if found != name {
                        return Err(DecodeError::TypeMismatch {
                            expected: name.clone(),
                            found: found.to_string(),
                        });
                    }
                }
                let fields = wrapper
                    .get(VAL)
                    .and_then(Json::as_object)
                    .ok_or(DecodeError::Malformed {
                        context: "struct value without a VAL object",
                    })?;
                let schema = lookup(self.registry, name)?;
                self.decode_struct(schema, fields, depth + 1).map(Value::Struct)
            }
            Kind::List(element) => {
                let items = container(json)?.as_array().ok_or(DecodeError::Malformed {
                    context: "list VAL is not an array",
                })?;
                check_len(items.len())?;
                items
                    .iter()
                    .map(|item| self.decode_value(field, element, item, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            Kind::Map(key, val) => {
                let members = container(json)?.as_object().ok_or(DecodeError::Malformed {
                    context: "map VAL is not an object",
                })?;
                check_len(members.len())?;
                let mut entries = Vec::with_capacity(members.len());
                for (k, v) in members {
                    let k = text::parse(key, k)
                        .map_err(|e| DecodeError::value_format(field.name(), e))?;
                    let v = self.decode_value(field, val, v, depth + 1)?;
                    entries.push((k, v));
                }
                if let Some(key) = first_duplicate_key(&entries) {
                    return Err(DecodeError::DuplicateKey {
                        field: field.name().to_string(),
                        key,
                    });
                }
                Ok(Value::Map(entries))
            }
            scalar => {
                let literal = scalar_text(scalar, json).ok_or_else(|| {
                    DecodeError::value_format(
                        field.name(),
                        ValueFormatError::new(scalar.tag(), json.to_string(), "wrong JSON type"),
                    )
                })?;
                text::parse(scalar, &literal)
                    .map_err(|e| DecodeError::value_format(field.name(), e))
            }
        }
    }
}

/// Returns the `VAL` member of a container wrapper object.
fn container(json: &Json) -> Result<&Json, DecodeError> {
    json.as_object()
        .and_then(|wrapper| wrapper.get(VAL))
        .ok_or(DecodeError::Malformed {
            context: "container value without a VAL member",
        })
}

/// Returns the text of a JSON scalar of the shape expected for `kind`.
fn scalar_text<'j>(kind: &Kind, json: &'j Json) -> Option<Cow<'j, str>> {
    match (kind, json) {
        (Kind::Bool, Json::Bool(b)) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        (
            Kind::Byte
            | Kind::I16
            | Kind::I32
            | Kind::I64
            | Kind::U16
            | Kind::U32
            | Kind::U64
            | Kind::Double
            | Kind::Ipv4,
            Json::Number(n),
        ) => Some(Cow::Owned(n.to_string())),
        (
            Kind::String | Kind::Xml | Kind::Double | Kind::Ipv4 | Kind::IpAddr | Kind::Uuid,
            Json::String(s),
        ) => Some(Cow::Borrowed(s)),
        _ => None,
    }
}

fn check_len(len: usize) -> Result<(), DecodeError> {
    if len > MAX_CONTAINER_LEN {
        return Err(DecodeError::LengthExceedsLimit {
            field: "container size",
            len,
            max: MAX_CONTAINER_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::fixtures::{self, FIXED_TIMESTAMP};
    use crate::model::Presence;
    use crate::util::datetime::parse_timestamp;
    use crate::validate::compare_structs;

    fn pinned() -> EncodeOptions {
        EncodeOptions::new().with_timestamp(FIXED_TIMESTAMP)
    }

    fn decode(input: &str, type_name: &str) -> Result<Struct, DecodeError> {
        decode_tagged_text(input, type_name, &fixtures::registry())
    }

    fn roundtrip(instance: &Struct) -> String {
        let encoded = encode_tagged_text_with_options(instance, pinned()).unwrap();
        let decoded = decode(&encoded, instance.type_name()).unwrap();
        compare_structs(instance, &decoded).unwrap();
        encoded
    }

    #[test]
    fn test_scalar_members() {
        let instance = fixtures::new("BasicTypesTest")
            .with("bool_1", true)
            .unwrap()
            .with("byte_1", 127i8)
            .unwrap();
        let encoded = roundtrip(&instance);
        assert_eq!(
            encoded,
            r#"{"BasicTypesTest":{"bool_1":{"TYPE":"bool","VAL":true},"byte_1":{"TYPE":"byte","VAL":127},"str8":{"TYPE":"string","VAL":"Last field"}},"TIMESTAMP":"2018-10-11 15:20:51"}"#
        );
    }

    #[test]
    fn test_basic_types() {
        let encoded = roundtrip(&fixtures::basic_types());
        for member in [
            r#""double_1":{"TYPE":"double","VAL":12.345}"#,
            r#""u64_1":{"TYPE":"u64","VAL":18446744073709551615}"#,
            r#""xml_4":{"TYPE":"xml","VAL":"abc]]"}"#,
            r#""ipv4_1":{"TYPE":"ipv4","VAL":"255.255.255.255"}"#,
            r#""uuid_1":{"TYPE":"uuid_t","VAL":"00010203-0405-0607-0809-0a0b0c0d0e0f"}"#,
            r#""ipaddr_2":{"TYPE":"ipaddr","VAL":"2001:1::2"}"#,
        ] {
            assert!(encoded.contains(member), "missing {member}");
        }
    }

    #[test]
    fn test_annotations() {
        assert_eq!(roundtrip(&fixtures::annotations_test()), fixtures::TAGGED_ANNOTATIONS);
    }

    #[test]
    fn test_nested_and_container_roundtrips() {
        roundtrip(&fixtures::struct_test());
        roundtrip(&fixtures::container_types());
        let encoded = roundtrip(&fixtures::container_types_with_maps());
        for member in [
            r#""m_u16_str_":{"TYPE":"map","VAL":{"VAL":{"1":"vn1","2":"vn2"}}}"#,
            r#""nested_list":{"TYPE":"list","VAL":{"VAL":[{"VAL":[1,2,3]},{"VAL":[3,4,5]}]}}"#,
        ] {
            assert!(encoded.contains(member), "missing {member}");
        }
    }

    #[test]
    fn test_markup_payload_is_plain_string() {
        let instance = fixtures::new("BasicTypesTest")
            .with("string_1", fixtures::XML_MESSAGE)
            .unwrap()
            .with("xml_1", Value::xml(fixtures::XML_MESSAGE))
            .unwrap();
        roundtrip(&instance);
    }

    #[test]
    fn test_wall_clock_timestamp() {
        let encoded = encode_tagged_text(&fixtures::annotations_test()).unwrap();
        let doc: Json = serde_json::from_str(&encoded).unwrap();
        let stamp = doc[TIMESTAMP].as_str().unwrap();
        assert!(parse_timestamp(stamp).unwrap() >= FIXED_TIMESTAMP);
    }

    #[test]
    fn test_map_order_and_hints_tolerated() {
        let input = r#"{"ContainerTypesTest":{"m_str_str_":{"TYPE":"map","VAL":{"VALUE":"string","VAL":{"uuid2":"vm2","uuid1":"vm1"}}},"m_str_struct_":{"TYPE":"map","VAL":{"VAL":{"uuid1":{"INSTANCE":"StructBasicTypes","VAL":{"i16_1":{"TYPE":"i16","VAL":5678}}}}}}}}"#;
        let decoded = decode(input, "ContainerTypesTest").unwrap();
        assert_eq!(
            decoded.get_by_name("m_str_str_"),
            Some(&Value::map([("uuid1", "vm1"), ("uuid2", "vm2")]))
        );
        let nested = decoded.get_by_name("m_str_struct_").unwrap().as_map().unwrap()[0]
            .1
            .as_struct()
            .unwrap()
            .clone();
        assert_eq!(nested.get_by_name("i16_1"), Some(&Value::I16(5678)));
        assert_eq!(nested.presence(1), Some(Presence::Defaulted));
    }

    #[test]
    fn test_struct_instance_checked_when_present() {
        let input = r#"{"StructTest":{"st_1":{"TYPE":"struct","VAL":{"INSTANCE":"StructAnnotation","VAL":{}}}}}"#;
        let err = decode(input, "StructTest").unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: "StructBasicTypes".into(),
                found: "StructAnnotation".into(),
            }
        );

        let input = r#"{"StructTest":{"st_1":{"TYPE":"struct","VAL":{"VAL":{}}}}}"#;
        let decoded = decode(input, "StructTest").unwrap();
        assert!(decoded.is_set(1));
    }

    #[test]
    fn test_ipv4_decimal_forms() {
        let decoded = decode(
            r#"{"BasicTypesTest":{"ipv4_1":{"TYPE":"ipv4","VAL":4294967295}}}"#,
            "BasicTypesTest",
        )
        .unwrap();
        assert_eq!(decoded.get(16), Some(&Value::Ipv4(u32::MAX)));

        let decoded = decode(
            r#"{"BasicTypesTest":{"ipv4_1":{"TYPE":"ipv4","VAL":"167838209"}}}"#,
            "BasicTypesTest",
        )
        .unwrap();
        assert_eq!(decoded.get(16), Some(&Value::ipv4("10.1.2.1".parse().unwrap())));
    }

    #[test]
    fn test_integer_doubles() {
        let instance = fixtures::new("BasicTypesTest").with("double_1", 1.0).unwrap();
        let encoded = roundtrip(&instance);
        assert!(encoded.contains(r#""VAL":1}"#));
    }

    #[test]
    fn test_non_finite_doubles_as_strings() {
        for (value, member) in [
            (f64::NAN, r#""double_1":{"TYPE":"double","VAL":"nan"}"#),
            (f64::INFINITY, r#""double_1":{"TYPE":"double","VAL":"inf"}"#),
            (f64::NEG_INFINITY, r#""double_1":{"TYPE":"double","VAL":"-inf"}"#),
        ] {
            let instance = fixtures::new("BasicTypesTest").with("double_1", value).unwrap();
            let encoded = roundtrip(&instance);
            assert!(encoded.contains(member), "missing {member}");
        }

        let decoded = decode(
            r#"{"BasicTypesTest":{"double_1":{"TYPE":"double","VAL":"2.5"}}}"#,
            "BasicTypesTest",
        )
        .unwrap();
        assert_eq!(decoded.get_by_name("double_1"), Some(&Value::Double(2.5)));

        let err = decode(
            r#"{"BasicTypesTest":{"double_1":{"TYPE":"double","VAL":"fast"}}}"#,
            "BasicTypesTest",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::ValueFormat { ref field, .. } if field == "double_1"));
        assert_eq!(err.code(), ErrorCode::ValueFormat);
    }

    #[test]
    fn test_presence_after_decode() {
        let decoded = decode(
            r#"{"BasicTypesTest":{"i16_1":{"TYPE":"i16","VAL":-7}},"TIMESTAMP":"2018-10-11 15:20:51"}"#,
            "BasicTypesTest",
        )
        .unwrap();
        assert_eq!(decoded.presence(3), Some(Presence::Explicit));
        assert_eq!(decoded.get(3), Some(&Value::I16(-7)));
        assert_eq!(decoded.presence(8), Some(Presence::Defaulted));
        assert_eq!(decoded.presence(7), Some(Presence::Absent));
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let input = r#"{"AnnotationsTest":{"added_later":{"TYPE":"list","VAL":{"VAL":[1]}},"i32_1":{"TYPE":"i32","VAL":911}}}"#;
        let decoded = decode(input, "AnnotationsTest").unwrap();
        assert_eq!(decoded.iter_set_fields().count(), 1);
    }

    #[test]
    fn test_type_mismatch() {
        let err = decode(fixtures::TAGGED_ANNOTATIONS, "StructTest").unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: "StructTest".into(),
                found: "AnnotationsTest".into(),
            }
        );
    }

    #[test]
    fn test_kind_tag_mismatch() {
        let err = decode(
            r#"{"BasicTypesTest":{"ipv4_1":{"TYPE":"u32","VAL":1}}}"#,
            "BasicTypesTest",
        )
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::KindTagMismatch {
                field: "ipv4_1".into(),
                expected: "ipv4",
                found: "u32".into(),
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        for input in [
            r#"{"BasicTypesTest":{"byte_1":{"TYPE":"byte","VAL":128}}}"#,
            r#"{"BasicTypesTest":{"u16_1":{"TYPE":"u16","VAL":-1}}}"#,
            r#"{"BasicTypesTest":{"i32_1":{"TYPE":"i32","VAL":"5"}}}"#,
            r#"{"BasicTypesTest":{"i32_1":{"TYPE":"i32","VAL":1.5}}}"#,
            r#"{"BasicTypesTest":{"bool_1":{"TYPE":"bool","VAL":1}}}"#,
            r#"{"BasicTypesTest":{"uuid_1":{"TYPE":"uuid_t","VAL":"0001"}}}"#,
        ] {
            let err = decode(input, "BasicTypesTest").unwrap_err();
            assert!(matches!(err, DecodeError::ValueFormat { .. }), "{input}: {err}");
        }
    }

    #[test]
    fn test_duplicate_keys_after_parsing() {
        let input = r#"{"ContainerTypesTest":{"m_u16_str_":{"TYPE":"map","VAL":{"VAL":{"1":"a","01":"b"}}}}}"#;
        let err = decode(input, "ContainerTypesTest").unwrap_err();
        assert_eq!(
            err,
            DecodeError::DuplicateKey {
                field: "m_u16_str_".into(),
                key: "1".into(),
            }
        );
    }

    #[test]
    fn test_malformed_documents() {
        for input in [
            "[]",
            r#"{"TIMESTAMP":"2018-10-11 15:20:51"}"#,
            r#"{"BasicTypesTest":{},"Other":{}}"#,
            r#"{"BasicTypesTest":[]}"#,
            r#"{"BasicTypesTest":{"i32_1":{"VAL":1}}}"#,
            r#"{"BasicTypesTest":{"i32_1":{"TYPE":"i32"}}}"#,
            r#"{"ContainerTypesTest":{"lbool_1":{"TYPE":"list","VAL":[true]}}}"#,
        ] {
            let type_name = if input.contains("Container") {
                "ContainerTypesTest"
            } else {
                "BasicTypesTest"
            };
            let err = decode(input, type_name).unwrap_err();
            assert!(matches!(err, DecodeError::Malformed { .. }), "{input}: {err}");
        }

        let err = decode(r#"{"BasicTypesTest":"#, "BasicTypesTest").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson(_)));
        assert_eq!(err.code().code(), "E004");
    }
}
