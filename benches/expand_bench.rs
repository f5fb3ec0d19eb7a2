//! Benchmarks for parsing and expanding declaration sources.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use member_synth::coding_keys::{self, NamingStrategy};
use member_synth::parser;
use member_synth::public_init;
use member_synth::syntax::Span;
use member_synth::{expand_source, RenderOptions};

/// A source file with `count` annotated structs of `fields` members each.
fn make_source(count: usize, fields: usize) -> String {
    let mut source = String::from("import Foundation\n\n");
    for i in 0..count {
        source.push_str(&format!("@PublicInit\n@CodingKeys(using: .snake_case)\npublic struct Model{}: Codable {{\n", i));
        for f in 0..fields {
            match f % 4 {
                0 => source.push_str(&format!("    public let fieldNumber{}: Int\n", f)),
                1 => source.push_str(&format!("    public var fieldName{} = \"value\"\n", f)),
                2 => source.push_str(&format!("    public var fieldList{}: [String]? = nil\n", f)),
                _ => source.push_str(&format!("    public var fieldFlag{}: Bool {{ true }}\n", f)),
            }
        }
        source.push_str("}\n\n");
    }
    source
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for count in [1, 10, 100] {
        let source = make_source(count, 8);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
            b.iter(|| parser::parse(black_box(source)).unwrap())
        });
    }
    group.finish();
}

fn bench_synthesize(c: &mut Criterion) {
    let file = parser::parse(&make_source(1, 32)).unwrap();
    let decl = &file.declarations[0];

    c.bench_function("public_init_32_fields", |b| {
        b.iter(|| public_init::synthesize(black_box(decl), Span::default()).unwrap())
    });
    c.bench_function("coding_keys_32_fields", |b| {
        b.iter(|| coding_keys::synthesize(black_box(decl), NamingStrategy::SnakeCase))
    });
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_source");
    let options = RenderOptions::default();
    for count in [1, 10, 100] {
        let source = make_source(count, 8);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
            b.iter(|| expand_source(black_box(source), &options).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_synthesize, bench_expand);
criterion_main!(benches);
