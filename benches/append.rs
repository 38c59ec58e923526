use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pg_append::{append_binary, append_identifier, append_map, append_text, append_value};
use pg_append::{Hstore, QuoteMode, Value};

fn benchmark_text(c: &mut Criterion) {
    let plain = "the quick brown fox jumps over the lazy dog";
    let escaped = "it's a \"quoted\" \\ string with 'many' quotes";

    c.bench_function("append_text_plain_literal", |b| {
        let mut buf = Vec::with_capacity(128);
        b.iter(|| {
            buf.clear();
            append_text(&mut buf, black_box(plain), QuoteMode::Literal);
        })
    });

    c.bench_function("append_text_escaped_identifier", |b| {
        let mut buf = Vec::with_capacity(128);
        b.iter(|| {
            buf.clear();
            append_text(&mut buf, black_box(escaped), QuoteMode::Identifier);
        })
    });
}

fn benchmark_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_binary");

    for size in [16, 256, 4096].iter() {
        let data: Vec<u8> = (0..*size).map(|i| (i % 256) as u8).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            let mut buf = Vec::with_capacity(data.len() * 2 + 4);
            b.iter(|| {
                buf.clear();
                append_binary(&mut buf, Some(black_box(data)), QuoteMode::Literal);
            })
        });
    }

    group.finish();
}

fn benchmark_identifier(c: &mut Criterion) {
    c.bench_function("append_identifier_dotted", |b| {
        let mut buf = Vec::with_capacity(64);
        b.iter(|| {
            buf.clear();
            append_identifier(&mut buf, black_box("public.users.email"), QuoteMode::Identifier);
        })
    });
}

fn benchmark_values(c: &mut Criterion) {
    let row = vec![
        Value::from(42),
        Value::from("Alice"),
        Value::from(19.99),
        Value::from(true),
        Value::Null,
    ];

    c.bench_function("append_value_row", |b| {
        let mut buf = Vec::with_capacity(128);
        b.iter(|| {
            buf.clear();
            for value in black_box(&row) {
                append_value(&mut buf, value, QuoteMode::Literal);
                buf.push(b',');
            }
        })
    });
}

fn benchmark_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_map");

    for size in [4, 32, 256].iter() {
        let map: Hstore = (0..*size)
            .map(|i| (format!("key{}", i), format!("value {}", i)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            let mut buf = Vec::new();
            b.iter(|| {
                buf.clear();
                append_map(&mut buf, Some(black_box(map)), QuoteMode::Literal);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_text,
    benchmark_binary,
    benchmark_identifier,
    benchmark_values,
    benchmark_map
);
criterion_main!(benches);
