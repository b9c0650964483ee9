//! The closed set of value kinds a field may declare.

use std::fmt;

/// Declared kind of a field, list element or map key/value.
///
/// Containers and nested structs make the kind recursive; `Struct` names the
/// nested type, which is resolved through a
/// [`SchemaRegistry`](crate::model::SchemaRegistry) when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    /// Signed 8-bit integer.
    Byte,
    I16,
    I32,
    I64,
    U16,
    U32,
    U64,
    Double,
    String,
    /// Text carried as preformatted markup.
    Xml,
    /// 32-bit IPv4 address.
    Ipv4,
    /// IPv4 or IPv6 address.
    IpAddr,
    Uuid,
    /// Nested struct of the named type.
    Struct(String),
    List(Box<Kind>),
    Map(Box<Kind>, Box<Kind>),
}

impl Kind {
    /// Shorthand for `Kind::List(Box::new(element))`.
    pub fn list(element: Kind) -> Kind {
        Kind::List(Box::new(element))
    }

    /// Shorthand for `Kind::Map(Box::new(key), Box::new(value))`.
    pub fn map(key: Kind, value: Kind) -> Kind {
        Kind::Map(Box::new(key), Box::new(value))
    }

    /// Shorthand for `Kind::Struct(name.into())`.
    pub fn structure(name: impl Into<String>) -> Kind {
        Kind::Struct(name.into())
    }

    /// Returns the type tag written on the wire for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Byte => "byte",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Xml => "xml",
            Kind::Ipv4 => "ipv4",
            Kind::IpAddr => "ipaddr",
            Kind::Uuid => "uuid_t",
            Kind::Struct(_) => "struct",
            Kind::List(_) => "list",
            Kind::Map(_, _) => "map",
        }
    }

    /// Returns true for kinds without nested values.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Kind::Struct(_) | Kind::List(_) | Kind::Map(_, _))
    }

    /// Returns true if values of this kind may key a map.
    ///
    /// Keys need exact equality and a canonical text form usable as an
    /// object key, which rules out `bool`, `double`, `xml` and containers.
    pub fn is_map_key(&self) -> bool {
        matches!(
            self,
            Kind::Byte
                | Kind::I16
                | Kind::I32
                | Kind::I64
                | Kind::U16
                | Kind::U32
                | Kind::U64
                | Kind::String
                | Kind::Ipv4
                | Kind::IpAddr
                | Kind::Uuid
        )
    }

    /// Visits every struct type name referenced by this kind.
    pub(crate) fn struct_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Kind::Struct(name) => out.push(name),
            Kind::List(element) => element.struct_refs(out),
            Kind::Map(key, value) => {
                key.struct_refs(out);
                value.struct_refs(out);
            }
            _ => {}
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Struct(name) => write!(f, "struct {}", name),
            Kind::List(element) => write!(f, "list<{}>", element),
            Kind::Map(key, value) => write!(f, "map<{},{}>", key, value),
            other => f.write_str(other.tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(Kind::Uuid.tag(), "uuid_t");
        assert_eq!(Kind::list(Kind::U16).tag(), "list");
        assert_eq!(Kind::structure("StructBasicTypes").tag(), "struct");
    }

    #[test]
    fn test_display_nests() {
        let kind = Kind::map(Kind::String, Kind::list(Kind::list(Kind::U16)));
        assert_eq!(kind.to_string(), "map<string,list<list<u16>>>");
    }

    #[test]
    fn test_map_keys() {
        assert!(Kind::I16.is_map_key());
        assert!(Kind::U16.is_map_key());
        assert!(Kind::String.is_map_key());
        assert!(!Kind::Double.is_map_key());
        assert!(!Kind::Bool.is_map_key());
        assert!(!Kind::list(Kind::I32).is_map_key());
    }

    #[test]
    fn test_struct_refs() {
        let kind = Kind::map(Kind::String, Kind::list(Kind::structure("Inner")));
        let mut refs = Vec::new();
        kind.struct_refs(&mut refs);
        assert_eq!(refs, vec!["Inner"]);
    }
}
