//! Test schemas and records shared by the codec test suites.

use std::net::IpAddr;
use std::sync::Arc;

use uuid::Uuid;

use crate::model::{Kind, SchemaRegistry, Struct, StructSchema, Value};

pub const UUID_1: &str = "00010203-0405-0607-0809-0a0b0c0d0e0f";
pub const UUID_2: &str = "00010203-0405-0607-0423-023434265323";
pub const UUID_3: &str = "11110203-0405-0607-0809-0a0b0c0d0e0f";

pub fn uuid(text: &str) -> Value {
    Value::Uuid(Uuid::parse_str(text).unwrap())
}

pub fn ip(text: &str) -> Value {
    Value::IpAddr(text.parse::<IpAddr>().unwrap())
}

/// Registry holding every test struct type.
pub fn registry() -> SchemaRegistry {
    let structs = [
        StructSchema::builder("BasicTypesTest")
            .field(1, "bool_1", Kind::Bool)
            .field(2, "byte_1", Kind::Byte)
            .field(3, "i16_1", Kind::I16)
            .field(4, "i32_1", Kind::I32)
            .field(5, "i64_1", Kind::I64)
            .field(6, "double_1", Kind::Double)
            .field(7, "string_1", Kind::String)
            .field_with(8, "str8", Kind::String, |f| f.default_value("Last field"))
            .field(9, "u16_1", Kind::U16)
            .field(10, "u32_1", Kind::U32)
            .field(11, "u64_1", Kind::U64)
            .field(12, "xml_1", Kind::Xml)
            .field(13, "xml_2", Kind::Xml)
            .field(14, "xml_3", Kind::Xml)
            .field(15, "xml_4", Kind::Xml)
            .field(16, "ipv4_1", Kind::Ipv4)
            .field(17, "uuid_1", Kind::Uuid)
            .field(18, "ipaddr_1", Kind::IpAddr)
            .field(19, "ipaddr_2", Kind::IpAddr)
            .build(),
        StructSchema::builder("StructBasicTypes")
            .field_with(1, "str1", Kind::String, |f| f.default_value("First field"))
            .field(2, "bool_1", Kind::Bool)
            .field(3, "i16_1", Kind::I16)
            .field_with(4, "str4", Kind::String, |f| f.default_value("Last field"))
            .field(5, "u16_1", Kind::U16)
            .field(6, "u32_1", Kind::U32)
            .field(7, "u64_1", Kind::U64)
            .field(8, "xml_1", Kind::Xml)
            .field(9, "xml_2", Kind::Xml)
            .field(10, "xml_3", Kind::Xml)
            .field(11, "xml_4", Kind::Xml)
            .field(12, "ipv4_1", Kind::Ipv4)
            .field(13, "uuid_1", Kind::Uuid)
            .field_with(14, "uuid_2", Kind::Uuid, |f| f.default_value(uuid(UUID_2)))
            .build(),
        StructSchema::builder("StructTest")
            .field(1, "st_1", Kind::structure("StructBasicTypes"))
            .field(2, "st_2", Kind::structure("StructBasicTypes"))
            .build(),
        StructSchema::builder("StructContainerTypes")
            .field(1, "li32_1", Kind::list(Kind::I32))
            .field(2, "lstring_1", Kind::list(Kind::String))
            .field(3, "lbst_1", Kind::list(Kind::structure("StructBasicTypes")))
            .field(4, "luuid_1", Kind::list(Kind::Uuid))
            .field(5, "lipaddr_1", Kind::list(Kind::IpAddr))
            .build(),
        StructSchema::builder("ContainerTypesTest")
            .field(1, "lbool_1", Kind::list(Kind::Bool))
            .field(2, "lbyte_1", Kind::list(Kind::Byte))
            .field(3, "lbst_1", Kind::list(Kind::structure("StructBasicTypes")))
            .field(4, "lcst_1", Kind::list(Kind::structure("StructContainerTypes")))
            .field(5, "m_u16_str_", Kind::map(Kind::U16, Kind::String))
            .field(6, "m_str_str_", Kind::map(Kind::String, Kind::String))
            .field(
                7,
                "m_str_struct_",
                Kind::map(Kind::String, Kind::structure("StructBasicTypes")),
            )
            .field(8, "nested_list", Kind::list(Kind::list(Kind::U16)))
            .build(),
        StructSchema::builder("StructAnnotation")
            .field_with(1, "string_1", Kind::String, |f| f.annotation("key", "Test"))
            .field_with(2, "i16_1", Kind::I16, |f| f.annotation("format", "%x"))
            .build(),
        StructSchema::builder("AnnotationsTest")
            .field(1, "st1_1", Kind::structure("StructAnnotation"))
            .field_with(2, "i32_1", Kind::I32, |f| f.annotation("format", "%d"))
            .field_with(3, "string_1", Kind::String, |f| f.annotation("key", "Contrail"))
            .build(),
    ];

    let mut registry = SchemaRegistry::new();
    for schema in structs {
        registry.register(schema.unwrap()).unwrap();
    }
    registry.validate().unwrap();
    registry
}

pub fn schema(name: &str) -> Arc<StructSchema> {
    registry().get(name).unwrap().clone()
}

pub fn new(name: &str) -> Struct {
    Struct::new(schema(name))
}

pub fn basic_types() -> Struct {
    new("BasicTypesTest")
        .with("bool_1", true)
        .unwrap()
        .with("byte_1", 127i8)
        .unwrap()
        .with("i16_1", 4321i16)
        .unwrap()
        .with("i32_1", 54321)
        .unwrap()
        .with("i64_1", 654321i64)
        .unwrap()
        .with("double_1", 12.345)
        .unwrap()
        .with("string_1", "Basic Types Test")
        .unwrap()
        .with("u16_1", 65535u16)
        .unwrap()
        .with("u32_1", 4294967295u32)
        .unwrap()
        .with("u64_1", 18446744073709551615u64)
        .unwrap()
        .with("ipv4_1", Value::Ipv4(4294967295))
        .unwrap()
        .with("xml_1", Value::xml("<abc>"))
        .unwrap()
        .with("xml_2", Value::xml("abc"))
        .unwrap()
        .with("xml_3", Value::xml("abc]"))
        .unwrap()
        .with("xml_4", Value::xml("abc]]"))
        .unwrap()
        .with("uuid_1", uuid(UUID_1))
        .unwrap()
        .with("ipaddr_1", ip("10.1.2.1"))
        .unwrap()
        .with("ipaddr_2", ip("2001:1::2"))
        .unwrap()
}

pub const MARKUP_BASIC_TYPES: &str = r#"<BasicTypesTest type="sandesh"><bool_1 type="bool" identifier="1">true</bool_1><byte_1 type="byte" identifier="2">127</byte_1><i16_1 type="i16" identifier="3">4321</i16_1><i32_1 type="i32" identifier="4">54321</i32_1><i64_1 type="i64" identifier="5">654321</i64_1><double_1 type="double" identifier="6">12.345</double_1><string_1 type="string" identifier="7">Basic Types Test</string_1><str8 type="string" identifier="8">Last field</str8><u16_1 type="u16" identifier="9">65535</u16_1><u32_1 type="u32" identifier="10">4294967295</u32_1><u64_1 type="u64" identifier="11">18446744073709551615</u64_1><xml_1 type="xml" identifier="12"><![CDATA[<abc>]]></xml_1><xml_2 type="xml" identifier="13"><![CDATA[abc]]></xml_2><xml_3 type="xml" identifier="14"><![CDATA[abc]]]></xml_3><xml_4 type="xml" identifier="15"><![CDATA[abc]]]]></xml_4><ipv4_1 type="ipv4" identifier="16">255.255.255.255</ipv4_1><uuid_1 type="uuid_t" identifier="17">00010203-0405-0607-0809-0a0b0c0d0e0f</uuid_1><ipaddr_1 type="ipaddr" identifier="18">10.1.2.1</ipaddr_1><ipaddr_2 type="ipaddr" identifier="19">2001:1::2</ipaddr_2></BasicTypesTest>"#;

pub const XML_MESSAGE: &str =
    r#"<sandesh_types><type1>"systemlog"</type1><type2>'objectlog'</type2><type3>uve & trace</type3></sandesh_types>"#;

pub const MARKUP_XML_STRING: &str = r#"<BasicTypesTest type="sandesh"><string_1 type="string" identifier="7">&lt;sandesh_types&gt;&lt;type1&gt;&quot;systemlog&quot;&lt;/type1&gt;&lt;type2&gt;&apos;objectlog&apos;&lt;/type2&gt;&lt;type3&gt;uve &amp; trace&lt;/type3&gt;&lt;/sandesh_types&gt;</string_1><str8 type="string" identifier="8">Last field</str8></BasicTypesTest>"#;

pub const MARKUP_XML_CDATA: &str = r#"<BasicTypesTest type="sandesh"><str8 type="string" identifier="8">Last field</str8><xml_1 type="xml" identifier="12"><![CDATA[<sandesh_types><type1>"systemlog"</type1><type2>'objectlog'</type2><type3>uve & trace</type3></sandesh_types>]]></xml_1></BasicTypesTest>"#;

pub fn struct_test() -> Struct {
    let st_1 = new("StructBasicTypes")
        .with("bool_1", false)
        .unwrap()
        .with("i16_1", 9876i16)
        .unwrap()
        .with("u16_1", 65535u16)
        .unwrap();
    let st_2 = new("StructBasicTypes")
        .with("i16_1", 1111i16)
        .unwrap()
        .with("u32_1", 4294967295u32)
        .unwrap()
        .with("u64_1", u64::MAX)
        .unwrap()
        .with("ipv4_1", Value::Ipv4(u32::MAX))
        .unwrap()
        .with("xml_1", Value::xml("<abc>"))
        .unwrap()
        .with("xml_2", Value::xml("abc"))
        .unwrap()
        .with("xml_3", Value::xml("abc]"))
        .unwrap()
        .with("xml_4", Value::xml("abc]]"))
        .unwrap()
        .with("uuid_1", uuid(UUID_1))
        .unwrap();
    new("StructTest")
        .with("st_1", st_1)
        .unwrap()
        .with("st_2", st_2)
        .unwrap()
}

pub const MARKUP_STRUCT: &str = r#"<StructTest type="sandesh"><st_1 type="struct" identifier="1"><StructBasicTypes><str1 type="string" identifier="1">First field</str1><bool_1 type="bool" identifier="2">false</bool_1><i16_1 type="i16" identifier="3">9876</i16_1><str4 type="string" identifier="4">Last field</str4><u16_1 type="u16" identifier="5">65535</u16_1><uuid_2 type="uuid_t" identifier="14">00010203-0405-0607-0423-023434265323</uuid_2></StructBasicTypes></st_1><st_2 type="struct" identifier="2"><StructBasicTypes><str1 type="string" identifier="1">First field</str1><i16_1 type="i16" identifier="3">1111</i16_1><str4 type="string" identifier="4">Last field</str4><u32_1 type="u32" identifier="6">4294967295</u32_1><u64_1 type="u64" identifier="7">18446744073709551615</u64_1><xml_1 type="xml" identifier="8"><![CDATA[<abc>]]></xml_1><xml_2 type="xml" identifier="9"><![CDATA[abc]]></xml_2><xml_3 type="xml" identifier="10"><![CDATA[abc]]]></xml_3><xml_4 type="xml" identifier="11"><![CDATA[abc]]]]></xml_4><ipv4_1 type="ipv4" identifier="12">255.255.255.255</ipv4_1><uuid_1 type="uuid_t" identifier="13">00010203-0405-0607-0809-0a0b0c0d0e0f</uuid_1><uuid_2 type="uuid_t" identifier="14">00010203-0405-0607-0423-023434265323</uuid_2></StructBasicTypes></st_2></StructTest>"#;

fn basic_pair() -> (Struct, Struct) {
    (
        new("StructBasicTypes").with("i16_1", 5678i16).unwrap(),
        new("StructBasicTypes").with("bool_1", true).unwrap(),
    )
}

/// Lists of scalars, structs and structs holding lists.
pub fn container_types() -> Struct {
    let (st1, st2) = basic_pair();
    let lbst = Value::list([st1, st2]);
    let ctype_1 = new("StructContainerTypes")
        .with("li32_1", Value::list([1111, 2222, 3333]))
        .unwrap()
        .with("lstring_1", Value::list(["nicira", "midokura", "contrail"]))
        .unwrap()
        .with("lbst_1", lbst.clone())
        .unwrap()
        .with("luuid_1", Value::list([uuid(UUID_1), uuid(UUID_3)]))
        .unwrap();
    let ctype_2 = new("StructContainerTypes")
        .with("li32_1", Value::List(Vec::new()))
        .unwrap()
        .with("lstring_1", Value::list(["nvgre", "vxlan"]))
        .unwrap()
        .with(
            "lipaddr_1",
            Value::list([ip("192.168.1.10"), ip("2001:0:3238::fefb")]),
        )
        .unwrap();
    new("ContainerTypesTest")
        .with("lbool_1", Value::list([true, true, false, true]))
        .unwrap()
        .with("lbyte_1", Value::list([123i8, 12, 23]))
        .unwrap()
        .with("lbst_1", lbst)
        .unwrap()
        .with("lcst_1", Value::list([ctype_1, ctype_2]))
        .unwrap()
}

/// [`container_types`] plus maps and a list of lists.
pub fn container_types_with_maps() -> Struct {
    let (st1, st2) = basic_pair();
    container_types()
        .with("m_u16_str_", Value::map([(1u16, "vn1"), (2u16, "vn2")]))
        .unwrap()
        .with("m_str_str_", Value::map([("uuid1", "vm1"), ("uuid2", "vm2")]))
        .unwrap()
        .with("m_str_struct_", Value::map([("uuid1", st1), ("uuid2", st2)]))
        .unwrap()
        .with(
            "nested_list",
            Value::list([Value::list([1u16, 2, 3]), Value::list([3u16, 4, 5])]),
        )
        .unwrap()
}

pub const MARKUP_CONTAINERS: &str = r#"<ContainerTypesTest type="sandesh"><lbool_1 type="list" identifier="1"><list type="bool" size="4"><element>true</element><element>true</element><element>false</element><element>true</element></list></lbool_1><lbyte_1 type="list" identifier="2"><list type="byte" size="3"><element>123</element><element>12</element><element>23</element></list></lbyte_1><lbst_1 type="list" identifier="3"><list type="struct" size="2"><StructBasicTypes><str1 type="string" identifier="1">First field</str1><i16_1 type="i16" identifier="3">5678</i16_1><str4 type="string" identifier="4">Last field</str4><uuid_2 type="uuid_t" identifier="14">00010203-0405-0607-0423-023434265323</uuid_2></StructBasicTypes><StructBasicTypes><str1 type="string" identifier="1">First field</str1><bool_1 type="bool" identifier="2">true</bool_1><str4 type="string" identifier="4">Last field</str4><uuid_2 type="uuid_t" identifier="14">00010203-0405-0607-0423-023434265323</uuid_2></StructBasicTypes></list></lbst_1><lcst_1 type="list" identifier="4"><list type="struct" size="2"><StructContainerTypes><li32_1 type="list" identifier="1"><list type="i32" size="3"><element>1111</element><element>2222</element><element>3333</element></list></li32_1><lstring_1 type="list" identifier="2"><list type="string" size="3"><element>nicira</element><element>midokura</element><element>contrail</element></list></lstring_1><lbst_1 type="list" identifier="3"><list type="struct" size="2"><StructBasicTypes><str1 type="string" identifier="1">First field</str1><i16_1 type="i16" identifier="3">5678</i16_1><str4 type="string" identifier="4">Last field</str4><uuid_2 type="uuid_t" identifier="14">00010203-0405-0607-0423-023434265323</uuid_2></StructBasicTypes><StructBasicTypes><str1 type="string" identifier="1">First field</str1><bool_1 type="bool" identifier="2">true</bool_1><str4 type="string" identifier="4">Last field</str4><uuid_2 type="uuid_t" identifier="14">00010203-0405-0607-0423-023434265323</uuid_2></StructBasicTypes></list></lbst_1><luuid_1 type="list" identifier="4"><list type="uuid_t" size="2"><element>00010203-0405-0607-0809-0a0b0c0d0e0f</element><element>11110203-0405-0607-0809-0a0b0c0d0e0f</element></list></luuid_1></StructContainerTypes><StructContainerTypes><li32_1 type="list" identifier="1"><list type="i32" size="0"></list></li32_1><lstring_1 type="list" identifier="2"><list type="string" size="2"><element>nvgre</element><element>vxlan</element></list></lstring_1><lipaddr_1 type="list" identifier="5"><list type="ipaddr" size="2"><element>192.168.1.10</element><element>2001:0:3238::fefb</element></list></lipaddr_1></StructContainerTypes></list></lcst_1></ContainerTypesTest>"#;

pub fn annotations_test() -> Struct {
    let anno = new("StructAnnotation")
        .with("string_1", "VM")
        .unwrap()
        .with("i16_1", 345i16)
        .unwrap();
    new("AnnotationsTest")
        .with("st1_1", anno)
        .unwrap()
        .with("i32_1", 911)
        .unwrap()
        .with("string_1", "VN")
        .unwrap()
}

pub const MARKUP_ANNOTATIONS: &str = r#"<AnnotationsTest type="sandesh"><st1_1 type="struct" identifier="1"><StructAnnotation><string_1 type="string" identifier="1" key="Test">VM</string_1><i16_1 type="i16" identifier="2" format="%x">345</i16_1></StructAnnotation></st1_1><i32_1 type="i32" identifier="2" format="%d">911</i32_1><string_1 type="string" identifier="3" key="Contrail">VN</string_1></AnnotationsTest>"#;

/// Tagged text for [`annotations_test`] at 2018-10-11 15:20:51 UTC.
pub const TAGGED_ANNOTATIONS: &str = r#"{"AnnotationsTest":{"st1_1":{"TYPE":"struct","VAL":{"INSTANCE":"StructAnnotation","VAL":{"string_1":{"TYPE":"string","ANNOTATION":{"key":"Test"},"VAL":"VM"},"i16_1":{"TYPE":"i16","ANNOTATION":{"format":"%x"},"VAL":345}}}},"i32_1":{"TYPE":"i32","ANNOTATION":{"format":"%d"},"VAL":911},"string_1":{"TYPE":"string","ANNOTATION":{"key":"Contrail"},"VAL":"VN"}},"TIMESTAMP":"2018-10-11 15:20:51"}"#;

pub const FIXED_TIMESTAMP: i64 = 1_539_271_251;
