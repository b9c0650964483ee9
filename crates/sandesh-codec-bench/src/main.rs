//! Benchmark for sandesh text encodings using synthetic flow records.
//!
//! Builds a batch of flow-log records, then times encoding and decoding in
//! each protocol and checks every decoded batch against the original.
//!
//! Usage: `bench-flow-records [--count N] [--protocol json|xml]`

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use sandesh_codec::{
    EncodeOptions, Kind, Protocol, SchemaRegistry, Struct, StructSchema, Value, compare_structs,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Keeps the markup batch well under the decoder's input limit.
const DEFAULT_COUNT: usize = 5_000;
const ENCODE_ITERS: u32 = 5;
const DECODE_ITERS: u32 = 5;

#[derive(Parser, Debug)]
#[command(name = "bench-flow-records")]
#[command(about = "Time both sandesh text encodings on a synthetic flow-record batch")]
struct Args {
    /// Number of flow records in the batch.
    #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
    count: usize,
    /// Benchmark only this protocol (`json` or `xml`). Both run when omitted.
    #[arg(short, long)]
    protocol: Option<Protocol>,
}

// =============================================================================
// SCHEMA
// =============================================================================

fn registry() -> SchemaRegistry {
    let record = StructSchema::builder("FlowLogData")
        .field(1, "flowuuid", Kind::Uuid)
        .field(2, "direction_ing", Kind::Byte)
        .field(3, "sourcevn", Kind::String)
        .field(4, "sourceip", Kind::IpAddr)
        .field(5, "destvn", Kind::String)
        .field(6, "destip", Kind::IpAddr)
        .field(7, "protocol", Kind::Byte)
        .field(8, "sport", Kind::U16)
        .field(9, "dport", Kind::U16)
        .field(10, "setup_time", Kind::U64)
        .field(11, "bytes", Kind::U64)
        .field(12, "packets", Kind::U64)
        .field(13, "vrouter_ip", Kind::Ipv4)
        .field(14, "diff_bytes", Kind::I64)
        .field(15, "avg_rtt", Kind::Double)
        .field_with(16, "action", Kind::String, |f| f.default_value("pass"))
        .field(17, "tags", Kind::list(Kind::String))
        .field(18, "underlay", Kind::map(Kind::String, Kind::U32))
        .field(19, "policy", Kind::Xml)
        .build()
        .expect("FlowLogData schema");
    let batch = StructSchema::builder("FlowLogBatch")
        .field_with(1, "hostname", Kind::String, |f| {
            f.default_value("compute-1").annotation("key", "ObjectVRouter")
        })
        .field(2, "records", Kind::list(Kind::structure("FlowLogData")))
        .field_with(3, "generated_at", Kind::U64, |f| f.annotation("format", "%lu"))
        .build()
        .expect("FlowLogBatch schema");

    let mut registry = SchemaRegistry::new();
    registry.register(record).expect("register FlowLogData");
    registry.register(batch).expect("register FlowLogBatch");
    registry.validate().expect("schemas resolve");
    registry
}

// =============================================================================
// DATA GENERATION
// =============================================================================

/// Deterministic xorshift so runs are comparable.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

fn flow_record(schema: &Arc<StructSchema>, rng: &mut Rng, i: usize) -> Struct {
    let v6 = i % 4 == 0;
    let (src, dst) = if v6 {
        (
            IpAddr::V6(Ipv6Addr::from((u128::from(rng.next()) << 64) | 1)),
            IpAddr::V6(Ipv6Addr::from((u128::from(rng.next()) << 64) | 2)),
        )
    } else {
        (
            IpAddr::V4(Ipv4Addr::from(rng.next() as u32)),
            IpAddr::V4(Ipv4Addr::from(rng.next() as u32)),
        )
    };
    let mut record = Struct::new(schema.clone())
        .with("flowuuid", Uuid::new_v4())
        .and_then(|r| r.with("direction_ing", (i % 2) as i8))
        .and_then(|r| r.with("sourcevn", format!("default-domain:demo:vn{}", i % 16)))
        .and_then(|r| r.with("sourceip", src))
        .and_then(|r| r.with("destvn", "default-domain:demo:public"))
        .and_then(|r| r.with("destip", dst))
        .and_then(|r| r.with("protocol", if i % 3 == 0 { 17i8 } else { 6 }))
        .and_then(|r| r.with("sport", rng.next() as u16))
        .and_then(|r| r.with("dport", 443u16))
        .and_then(|r| r.with("setup_time", 1_539_271_251_000_000 + i as u64))
        .and_then(|r| r.with("bytes", rng.next() % 10_000_000))
        .and_then(|r| r.with("packets", rng.next() % 10_000))
        .and_then(|r| {
            let vrouter = Ipv4Addr::new(10, 0, (i / 256) as u8, i as u8);
            r.with("vrouter_ip", Value::ipv4(vrouter))
        })
        .and_then(|r| r.with("diff_bytes", (rng.next() % 2_000) as i64 - 1_000))
        .and_then(|r| r.with("avg_rtt", (rng.next() % 100_000) as f64 / 1000.0))
        .and_then(|r| r.with("tags", Value::list(["app=web", "tier=frontend", "site=lab & co"])))
        .and_then(|r| {
            r.with(
                "underlay",
                Value::map([("10.0.0.1", rng.next() as u32), ("10.0.0.2", rng.next() as u32)]),
            )
        })
        .expect("flow record fields");
    if i % 8 == 0 {
        record
            .set_by_name("policy", Value::xml("<rule action=\"deny\"><![CDATA[x]]></rule>"))
            .expect("policy field");
    }
    if i % 5 == 0 {
        record.set_by_name("action", "drop").expect("action field");
    }
    record
}

fn flow_batch(registry: &SchemaRegistry, count: usize) -> Struct {
    let record_schema = registry.get("FlowLogData").expect("FlowLogData registered");
    let batch_schema = registry.get("FlowLogBatch").expect("FlowLogBatch registered");
    let mut rng = Rng(0x2545_f491_4f6c_dd1d);
    let records: Vec<Value> = (0..count)
        .map(|i| Value::Struct(flow_record(record_schema, &mut rng, i)))
        .collect();
    Struct::new(batch_schema.clone())
        .with("records", Value::List(records))
        .and_then(|b| b.with("generated_at", 1_539_271_251u64))
        .expect("batch fields")
}

// =============================================================================
// BENCHMARK
// =============================================================================

fn bench(protocol: Protocol, batch: &Struct, registry: &SchemaRegistry, count: usize) {
    let options = EncodeOptions::new().with_timestamp(1_539_271_251);

    // Warmup
    let encoded = protocol
        .encode_with_options(batch, options)
        .expect("Failed to encode");

    let encode_start = Instant::now();
    for _ in 0..ENCODE_ITERS {
        let again = protocol
            .encode_with_options(batch, options)
            .expect("Failed to encode");
        assert_eq!(again.len(), encoded.len(), "encoding should be deterministic");
    }
    let encode_time = encode_start.elapsed() / ENCODE_ITERS;

    println!("\n=== {} ===", protocol);
    println!(
        "Encoded: {} bytes ({:.1} bytes/record)",
        encoded.len(),
        encoded.len() as f64 / count.max(1) as f64
    );
    println!(
        "Encode: {:?} (avg of {} iterations)",
        encode_time, ENCODE_ITERS
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    let decode_start = Instant::now();
    let mut decoded = None;
    for _ in 0..DECODE_ITERS {
        decoded = Some(
            protocol
                .decode(&encoded, batch.type_name(), registry)
                .expect("Failed to decode"),
        );
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;

    println!(
        "Decode: {:?} (avg of {} iterations)",
        decode_time, DECODE_ITERS
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );

    let decoded = decoded.expect("at least one decode iteration");
    let compare_start = Instant::now();
    match compare_structs(batch, &decoded) {
        Ok(()) => println!("Round trip: equal (checked in {:?})", compare_start.elapsed()),
        Err(mismatch) => {
            warn!(%protocol, %mismatch, "round trip differs");
            std::process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let protocols = match args.protocol {
        Some(protocol) => vec![protocol],
        None => Protocol::ALL.to_vec(),
    };

    let registry = registry();
    let build_start = Instant::now();
    let batch = flow_batch(&registry, args.count);
    info!(count = args.count, elapsed = ?build_start.elapsed(), "built flow batch");

    for protocol in protocols {
        bench(protocol, &batch, &registry, args.count);
    }
}
