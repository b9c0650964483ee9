//! Markup (XML) encoding and decoding.
//!
//! A struct becomes an element named for its type, and each set field a child
//! element carrying its kind tag, identifier and annotations:
//!
//! ```text
//! <BasicTypesTest type="sandesh"><i16_1 type="i16" identifier="3">4321</i16_1></BasicTypesTest>
//! ```
//!
//! Lists nest as `<list type=".." size="n">` and maps as
//! `<map key=".." value=".." size="n">` with alternating key and value
//! items. Struct items nest directly under their type name; every other item
//! is wrapped in `<element>`.
//!
//! Events are written through a [`quick_xml::Writer`] and read from a
//! [`quick_xml::Reader`]. XML declarations, comments and processing
//! instructions are skipped on input.

use std::io::Write;
use std::sync::Arc;

use quick_xml::errors::{IllFormedError, SyntaxError};
use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, trace};

use crate::codec::lookup;
use crate::codec::primitives::preview;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_CONTAINER_LEN, MAX_INPUT_LEN, MAX_NESTING_DEPTH};
use crate::model::text;
use crate::model::value::first_duplicate_key;
use crate::model::{FieldSchema, Kind, SchemaRegistry, Struct, StructSchema, Value};

const ELEMENT: &str = "element";
const LIST: &str = "list";
const MAP: &str = "map";
const CDATA_CLOSE: &str = "]]>";
/// Upper bound on capacity reserved from an untrusted `size` attribute.
const PREALLOC_LIMIT: usize = 1024;

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a struct in the markup format.
pub fn encode_markup(instance: &Struct) -> Result<String, EncodeError> {
    let mut writer = Writer::new(Vec::with_capacity(256));
    encode_markup_into(&mut writer, instance)?;
    let text = String::from_utf8(writer.into_inner()).map_err(write_failed)?;
    debug!(
        type_name = instance.type_name(),
        bytes = text.len(),
        "encoded markup"
    );
    Ok(text)
}

/// Appends the markup form of a struct to an existing writer.
pub fn encode_markup_into<W: Write>(
    writer: &mut Writer<W>,
    instance: &Struct,
) -> Result<(), EncodeError> {
    let root = BytesStart::new(instance.type_name()).with_attributes([("type", "sandesh")]);
    emit(writer, Event::Start(root))?;
    write_fields(writer, instance)?;
    close(writer, instance.type_name())
}

fn write_struct<W: Write>(writer: &mut Writer<W>, instance: &Struct) -> Result<(), EncodeError> {
    emit(writer, Event::Start(BytesStart::new(instance.type_name())))?;
    write_fields(writer, instance)?;
    close(writer, instance.type_name())
}

fn write_fields<W: Write>(writer: &mut Writer<W>, instance: &Struct) -> Result<(), EncodeError> {
    for (field, value) in instance.iter_set_fields() {
        let id = field.id().to_string();
        let mut start = BytesStart::new(field.name());
        start.push_attribute(("type", field.kind().tag()));
        start.push_attribute(("identifier", id.as_str()));
        for (name, ann) in field.annotations() {
            start.push_attribute((name.as_str(), ann.as_str()));
        }
        emit(writer, Event::Start(start))?;
        write_content(writer, field, field.kind(), value)?;
        close(writer, field.name())?;
    }
    Ok(())
}

/// Writes the content of an element holding `value` of the declared `kind`.
fn write_content<W: Write>(
    writer: &mut Writer<W>,
    field: &FieldSchema,
    kind: &Kind,
    value: &Value,
) -> Result<(), EncodeError> {
    match (kind, value) {
        (_, Value::Struct(nested)) => write_struct(writer, nested),
        (Kind::List(element), Value::List(items)) => {
            let size = items.len().to_string();
            let list = BytesStart::new(LIST)
                .with_attributes([("type", element.tag()), ("size", size.as_str())]);
            emit(writer, Event::Start(list))?;
            for item in items {
                write_item(writer, field, element, item)?;
            }
            close(writer, LIST)
        }
        (Kind::Map(key, val), Value::Map(entries)) => {
            let size = entries.len().to_string();
            let map = BytesStart::new(MAP).with_attributes([
                ("key", key.tag()),
                ("value", val.tag()),
                ("size", size.as_str()),
            ]);
            emit(writer, Event::Start(map))?;
            for (k, v) in entries {
                write_item(writer, field, key, k)?;
                write_item(writer, field, val, v)?;
            }
            close(writer, MAP)
        }
        (_, Value::Xml(markup)) => write_cdata(writer, markup),
        (_, Value::String(s)) => emit(writer, Event::Text(BytesText::from_escaped(escape(s)))),
        (_, scalar) => {
            let text = text::render(scalar).map_err(|source| EncodeError::ValueFormat {
                field: field.name().to_string(),
                source,
            })?;
            emit(writer, Event::Text(BytesText::from_escaped(escape(&text))))
        }
    }
}

/// Writes one list item, map key or map value.
fn write_item<W: Write>(
    writer: &mut Writer<W>,
    field: &FieldSchema,
    kind: &Kind,
    item: &Value,
) -> Result<(), EncodeError> {
    if let Value::Struct(nested) = item {
        return write_struct(writer, nested);
    }
    emit(writer, Event::Start(BytesStart::new(ELEMENT)))?;
    write_content(writer, field, kind, item)?;
    close(writer, ELEMENT)
}

/// Writes `markup` as CDATA. Each `]]>` inside it ends one section after the
/// `]]` and the next section starts with the `>`.
fn write_cdata<W: Write>(writer: &mut Writer<W>, markup: &str) -> Result<(), EncodeError> {
    let mut rest = markup;
    while let Some(at) = rest.find(CDATA_CLOSE) {
        let (section, tail) = rest.split_at(at + 2);
        emit(writer, Event::CData(BytesCData::new(section)))?;
        rest = tail;
    }
    emit(writer, Event::CData(BytesCData::new(rest)))
}

fn close<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), EncodeError> {
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), EncodeError> {
    writer.write_event(event).map_err(write_failed)
}

fn write_failed(err: impl std::fmt::Display) -> EncodeError {
    EncodeError::Write(err.to_string())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a markup document holding exactly one struct of type `type_name`.
///
/// Trailing whitespace and comments are allowed; any other trailing content
/// is an error.
pub fn decode_markup(
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
    let mut reader = Reader::from_str(input);
    let instance = decode_markup_from(&mut reader, type_name, registry)?;
    let end = usize::try_from(reader.buffer_position()).unwrap_or(input.len());
    match next_significant(&mut reader)? {
        None => Ok(instance),
        Some(_) => Err(DecodeError::Unexpected {
            expected: "end of input",
            found: preview(input.get(end..).unwrap_or_default().trim_start()),
        }),
    }
}

/// Decodes one root element from `reader`, leaving it just past the root's
/// end tag.
pub fn decode_markup_from(
    reader: &mut Reader<&[u8]>,
    type_name: &str,
    registry: &SchemaRegistry,
) -> Result<Struct, DecodeError> {
    let start = reader.buffer_position();
    let schema = lookup(registry, type_name)?;
    let root = match next_significant(reader)? {
        Some(Token::Start(tag)) => tag,
        Some(other) => return Err(unexpected("root element", &other)),
        None => return Err(DecodeError::UnexpectedEof { context: "root element" }),
    };
    if root.name != type_name {
        return Err(DecodeError::TypeMismatch {
            expected: type_name.to_string(),
            found: root.name,
        });
    }

    let mut decoder = MarkupDecoder { reader, registry };
    let instance = decoder.decode_struct(schema, &root, 0)?;
    debug!(
        type_name,
        bytes = decoder.reader.buffer_position() - start,
        "decoded markup"
    );
    Ok(instance)
}

/// An element start tag with its attributes unescaped.
#[derive(Debug)]
struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
    /// True for a self-closing `<name/>` element.
    empty: bool,
}

impl Tag {
    fn read(start: &BytesStart<'_>, empty: bool) -> Result<Self, DecodeError> {
        let name = utf8(start.name().as_ref())?.to_string();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DecodeError::Markup(e.to_string()))?;
            let key = utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            attrs.push((key, value));
        }
        Ok(Tag { name, attrs, empty })
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// The parts of the event stream the decoder acts on.
#[derive(Debug)]
enum Token {
    Start(Tag),
    End(String),
    /// Character data with references resolved.
    Text(String),
    /// Contents of one CDATA section.
    CData(String),
}

struct MarkupDecoder<'r, 'a> {
    reader: &'r mut Reader<&'a [u8]>,
    registry: &'r SchemaRegistry,
}

impl MarkupDecoder<'_, '_> {
    /// Reads the fields of a struct whose start tag has been consumed.
    fn decode_struct(
        &mut self,
        schema: &Arc<StructSchema>,
        open: &Tag,
        depth: usize,
    ) -> Result<Struct, DecodeError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        let mut instance = Struct::new(schema.clone());
        if open.empty {
            return Ok(instance);
        }
        loop {
            let tag = match self.next()? {
                Token::Start(tag) => tag,
                Token::End(name) if name == open.name => return Ok(instance),
                Token::End(name) => return Err(unbalanced(&open.name, &name)),
                other => return Err(unexpected("field element", &other)),
            };

            let index = tag
                .attr("identifier")
                .and_then(|id| id.trim().parse::<u16>().ok())
                .and_then(|id| schema.index_of(id))
                .or_else(|| schema.index_of_name(&tag.name));
            let Some(index) = index else {
                trace!(
                    type_name = schema.name(),
                    field = tag.name.as_str(),
                    "skipping unknown field"
                );
                self.skip_element(&tag)?;
                continue;
            };

            let field = &schema.fields()[index];
            check_tag(field, &tag, "type", field.kind())?;
            let value = self.decode_content(field, field.kind(), &tag, depth + 1)?;
            instance.put(index, value);
        }
    }

    /// Reads the content of `open` as a value of `kind`, through its end tag.
    fn decode_content(
        &mut self,
        field: &FieldSchema,
        kind: &Kind,
        open: &Tag,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        if open.empty && !kind.is_scalar() {
            return Err(DecodeError::Malformed {
                context: "container element without content",
            });
        }
        match kind {
            Kind::Struct(name) => {
                let inner = self.expect_start("nested struct element")?;
                let value = self.decode_nested(name, &inner, depth)?;
                self.expect_end(&open.name)?;
                Ok(value)
            }
            Kind::List(element) => {
                let list = self.expect_start("list element")?;
                if list.name != LIST {
                    return Err(unexpected_tag("<list>", &list));
                }
                check_tag(field, &list, "type", element)?;
                let declared = declared_size(&list)?;
                let mut items = Vec::with_capacity(declared.min(PREALLOC_LIMIT));
                if !list.empty {
                    while let Some(item) = self.next_item(LIST)? {
                        items.push(self.decode_item(field, element, &item, depth)?);
                    }
                }
                check_size(LIST, declared, items.len())?;
                self.expect_end(&open.name)?;
                Ok(Value::List(items))
            }
            Kind::Map(key, val) => {
                let map = self.expect_start("map element")?;
                if map.name != MAP {
                    return Err(unexpected_tag("<map>", &map));
                }
                check_tag(field, &map, "key", key)?;
                check_tag(field, &map, "value", val)?;
                let declared = declared_size(&map)?;
                let mut entries = Vec::with_capacity(declared.min(PREALLOC_LIMIT));
                if !map.empty {
                    while let Some(item) = self.next_item(MAP)? {
                        let k = self.decode_item(field, key, &item, depth)?;
                        let item = self.next_item(MAP)?.ok_or(DecodeError::Malformed {
                            context: "map key without a value",
                        })?;
                        let v = self.decode_item(field, val, &item, depth)?;
                        entries.push((k, v));
                    }
                }
                check_size(MAP, declared, entries.len())?;
                if let Some(key) = first_duplicate_key(&entries) {
                    return Err(DecodeError::DuplicateKey {
                        field: field.name().to_string(),
                        key,
                    });
                }
                self.expect_end(&open.name)?;
                Ok(Value::Map(entries))
            }
            scalar => {
                let raw = self.read_text(open)?;
                let text = match scalar {
                    Kind::String | Kind::Xml => raw.as_str(),
                    _ => raw.trim(),
                };
                text::parse(scalar, text).map_err(|e| DecodeError::value_format(field.name(), e))
            }
        }
    }

    /// Decodes one list item, map key or map value.
    fn decode_item(
        &mut self,
        field: &FieldSchema,
        kind: &Kind,
        item: &Tag,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match kind {
            Kind::Struct(name) => self.decode_nested(name, item, depth),
            _ if item.name == ELEMENT => self.decode_content(field, kind, item, depth + 1),
            _ => Err(unexpected_tag("<element>", item)),
        }
    }

    fn decode_nested(
        &mut self,
        name: &str,
        open: &Tag,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if open.name != name {
            return Err(DecodeError::TypeMismatch {
                expected: name.to_string(),
                found: open.name.clone(),
            });
        }
        let schema = lookup(self.registry, name)?;
        self.decode_struct(schema, open, depth + 1).map(Value::Struct)
    }

    /// Returns the next item start tag, or `None` at `</container>`.
    fn next_item(&mut self, container: &str) -> Result<Option<Tag>, DecodeError> {
        match self.next()? {
            Token::Start(tag) => Ok(Some(tag)),
            Token::End(name) if name == container => Ok(None),
            Token::End(name) => Err(unbalanced(container, &name)),
            other => Err(unexpected("container item", &other)),
        }
    }

    /// Collects text and CDATA up to the end tag of `open`.
    fn read_text(&mut self, open: &Tag) -> Result<String, DecodeError> {
        let mut text = String::new();
        if open.empty {
            return Ok(text);
        }
        loop {
            match next_token(self.reader)? {
                Some(Token::Text(t) | Token::CData(t)) => text.push_str(&t),
                Some(Token::End(name)) if name == open.name => return Ok(text),
                Some(Token::End(name)) => return Err(unbalanced(&open.name, &name)),
                Some(Token::Start(tag)) => return Err(unexpected_tag("text content", &tag)),
                None => return Err(DecodeError::UnexpectedEof { context: "element text" }),
            }
        }
    }

    fn skip_element(&mut self, open: &Tag) -> Result<(), DecodeError> {
        if open.empty {
            return Ok(());
        }
        let mut open_tags = 1usize;
        while open_tags > 0 {
            match next_token(self.reader)? {
                Some(Token::Start(tag)) if !tag.empty => open_tags += 1,
                Some(Token::End(_)) => open_tags -= 1,
                Some(_) => {}
                None => return Err(DecodeError::UnexpectedEof { context: "skipped element" }),
            }
        }
        Ok(())
    }

    fn expect_start(&mut self, context: &'static str) -> Result<Tag, DecodeError> {
        match self.next()? {
            Token::Start(tag) => Ok(tag),
            other => Err(unexpected(context, &other)),
        }
    }

    fn expect_end(&mut self, name: &str) -> Result<(), DecodeError> {
        match self.next()? {
            Token::End(found) if found == name => Ok(()),
            Token::End(found) => Err(unbalanced(name, &found)),
            other => Err(unexpected("closing tag", &other)),
        }
    }

    /// Next token that is not blank text; end of input is an error here.
    fn next(&mut self) -> Result<Token, DecodeError> {
        next_significant(self.reader)?.ok_or(DecodeError::UnexpectedEof { context: "element" })
    }
}

/// Reads the next token, or `None` at end of input.
fn next_token(reader: &mut Reader<&[u8]>) -> Result<Option<Token>, DecodeError> {
    loop {
        let token = match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => Token::Start(Tag::read(&start, false)?),
            Event::Empty(start) => Token::Start(Tag::read(&start, true)?),
            Event::End(end) => Token::End(utf8(end.name().as_ref())?.to_string()),
            Event::Text(t) => Token::Text(t.unescape().map_err(xml_error)?.into_owned()),
            Event::CData(c) => Token::CData(utf8(&c)?.to_string()),
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
            Event::Eof => return Ok(None),
        };
        return Ok(Some(token));
    }
}

fn next_significant(reader: &mut Reader<&[u8]>) -> Result<Option<Token>, DecodeError> {
    loop {
        match next_token(reader)? {
            Some(Token::Text(t)) if t.trim().is_empty() => continue,
            other => return Ok(other),
        }
    }
}

fn xml_error(err: quick_xml::Error) -> DecodeError {
    match err {
        quick_xml::Error::IllFormed(IllFormedError::MismatchedEndTag { expected, found }) => {
            DecodeError::UnbalancedTag { expected, found }
        }
        quick_xml::Error::Syntax(SyntaxError::UnclosedCData) => DecodeError::UnterminatedCdata,
        other => DecodeError::Markup(other.to_string()),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(bytes).map_err(|_| DecodeError::Malformed {
        context: "markup is not valid UTF-8",
    })
}

fn check_tag(field: &FieldSchema, tag: &Tag, attr: &str, kind: &Kind) -> Result<(), DecodeError> {
    match tag.attr(attr) {
        Some(found) if found != kind.tag() => Err(DecodeError::KindTagMismatch {
            field: field.name().to_string(),
            expected: kind.tag(),
            found: found.to_string(),
        }),
        _ => Ok(()),
    }
}

fn declared_size(tag: &Tag) -> Result<usize, DecodeError> {
    let Some(raw) = tag.attr("size") else {
        return Err(DecodeError::Malformed {
            context: "container without a size attribute",
        });
    };
    let size: usize = raw.trim().parse().map_err(|_| DecodeError::Unexpected {
        expected: "a decimal size",
        found: raw.to_string(),
    })?;
    if size > MAX_CONTAINER_LEN {
        return Err(DecodeError::LengthExceedsLimit {
            field: "container size",
            len: size,
            max: MAX_CONTAINER_LEN,
        });
    }
    Ok(size)
}

fn check_size(container: &'static str, declared: usize, actual: usize) -> Result<(), DecodeError> {
    if declared == actual {
        Ok(())
    } else {
        Err(DecodeError::SizeMismatch {
            container,
            declared,
            actual,
        })
    }
}

fn unbalanced(expected: &str, found: &str) -> DecodeError {
    DecodeError::UnbalancedTag {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

fn unexpected(expected: &'static str, found: &Token) -> DecodeError {
    let found = match found {
        Token::Start(tag) => format!("<{}>", tag.name),
        Token::End(name) => format!("</{}>", name),
        Token::Text(t) => preview(t),
        Token::CData(c) => format!("<![CDATA[{}", preview(c)),
    };
    DecodeError::Unexpected { expected, found }
}

fn unexpected_tag(expected: &'static str, tag: &Tag) -> DecodeError {
    DecodeError::Unexpected {
        expected,
        found: format!("<{}>", tag.name),
    }
}
