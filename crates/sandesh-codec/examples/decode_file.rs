//! Simple decoder to inspect sandesh text files.
//!
//! `cargo run --example decode_file -- <path> [TypeName]` decodes a `.json`
//! or `.xml` file against the demo schemas below. Without a path it prints a
//! sample record in both encodings instead.

use std::fs;
use std::path::Path;

use sandesh_codec::{Kind, Presence, Protocol, SchemaRegistry, Struct, StructSchema, Value};

fn registry() -> SchemaRegistry {
    let interface = StructSchema::builder("VmInterfaceAgent")
        .field(1, "name", Kind::String)
        .field(2, "vm_uuid", Kind::Uuid)
        .field(3, "ip_address", Kind::Ipv4)
        .field(4, "ip6_address", Kind::IpAddr)
        .field_with(5, "active", Kind::Bool, |f| f.default_value(true))
        .build()
        .expect("VmInterfaceAgent schema");
    let vrouter = StructSchema::builder("VrouterAgent")
        .field_with(1, "name", Kind::String, |f| f.annotation("key", "ObjectVRouter"))
        .field(2, "interfaces", Kind::list(Kind::structure("VmInterfaceAgent")))
        .field(3, "vn_stats", Kind::map(Kind::String, Kind::U64))
        .field(4, "config", Kind::Xml)
        .field_with(5, "build_info", Kind::String, |f| f.default_value("unknown"))
        .build()
        .expect("VrouterAgent schema");

    let mut registry = SchemaRegistry::new();
    registry.register(interface).expect("register VmInterfaceAgent");
    registry.register(vrouter).expect("register VrouterAgent");
    registry.validate().expect("schemas resolve");
    registry
}

fn sample(registry: &SchemaRegistry) -> Struct {
    let interface = Struct::new(registry.get("VmInterfaceAgent").expect("registered").clone())
        .with("name", "tap0")
        .and_then(|s| s.with("vm_uuid", uuid::Uuid::new_v4()))
        .and_then(|s| s.with("ip_address", Value::ipv4("10.1.1.3".parse().expect("ipv4"))))
        .and_then(|s| {
            let ip6: std::net::IpAddr = "2001:db8::3".parse().expect("ipv6");
            s.with("ip6_address", ip6)
        })
        .expect("interface fields");
    Struct::new(registry.get("VrouterAgent").expect("registered").clone())
        .with("name", "compute-1")
        .and_then(|s| s.with("interfaces", Value::list([interface])))
        .and_then(|s| s.with("vn_stats", Value::map([("vn-red", 1200u64), ("vn-blue", 87)])))
        .and_then(|s| s.with("config", Value::xml("<flows max=\"512\"/>")))
        .expect("vrouter fields")
}

fn format_value(v: &Value) -> String {
    match v {
        Value::String(s) | Value::Xml(s) => {
            let preview: String = s.chars().take(60).collect();
            if s.chars().count() > 60 {
                format!("{:?}...", preview)
            } else {
                format!("{:?}", preview)
            }
        }
        Value::Struct(s) => {
            format!("{} {{ {} fields }}", s.type_name(), s.iter_set_fields().count())
        }
        Value::List(items) => format!("LIST[{}]", items.len()),
        Value::Map(entries) => format!("MAP[{}]", entries.len()),
        other => sandesh_codec::model::text::render(other).unwrap_or_default(),
    }
}

fn print_struct(instance: &Struct, indent: usize) {
    let pad = " ".repeat(indent);
    for field in instance.schema().fields() {
        let presence = instance.presence(field.id()).unwrap_or(Presence::Absent);
        let Some(value) = instance.get(field.id()) else {
            println!("{}{} ({}): absent", pad, field.name(), field.kind());
            continue;
        };
        println!(
            "{}{} ({}, {:?}) = {}",
            pad,
            field.name(),
            field.kind(),
            presence,
            format_value(value)
        );
        match value {
            Value::Struct(nested) => print_struct(nested, indent + 4),
            Value::List(items) => {
                for item in items.iter().take(5) {
                    if let Value::Struct(nested) = item {
                        println!("{}  - {}", pad, nested.type_name());
                        print_struct(nested, indent + 6);
                    } else {
                        println!("{}  - {}", pad, format_value(item));
                    }
                }
                if items.len() > 5 {
                    println!("{}  ... and {} more", pad, items.len() - 5);
                }
            }
            Value::Map(entries) => {
                for (k, v) in entries {
                    println!("{}  {} => {}", pad, format_value(k), format_value(v));
                }
            }
            _ => {}
        }
    }
}

fn main() {
    let registry = registry();
    let Some(path) = std::env::args().nth(1) else {
        let record = sample(&registry);
        for protocol in Protocol::ALL {
            let text = protocol.encode(&record).expect("Failed to encode");
            println!("=== {} ({} bytes) ===\n{}\n", protocol, text.len(), text);
        }
        return;
    };
    let type_name = std::env::args().nth(2).unwrap_or_else(|| "VrouterAgent".to_string());

    let protocol = match Path::new(&path).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.parse::<Protocol>().expect("Unknown file extension"),
        None => Protocol::Markup,
    };

    println!("Reading: {} as {}", path, protocol);
    let text = fs::read_to_string(&path).expect("Failed to read file");
    println!("File size: {} bytes", text.len());

    let instance = protocol
        .decode(&text, &type_name, &registry)
        .expect("Failed to decode");

    println!("\n=== {} ===", instance.type_name());
    print_struct(&instance, 2);
}
