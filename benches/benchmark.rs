use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use rawquery::prelude::*;

// A creature file with many records and a handful of properties each.
fn creatures(records: usize) -> TokenSequence {
    let mut seq = TokenSequence::new("creature_bench");
    seq.push(Token::new("OBJECT", ["CREATURE"]));
    for i in 0..records {
        seq.push(Token::new("CREATURE", [format!("BEAST_{}", i)]));
        seq.push(Token::new("NAME", ["beast", "beasts", "beast"]));
        seq.push(Token::new("TILE", [format!("{}", i % 256)]));
        seq.push(Token::new("COLOR", ["6", "0", "0"]));
        seq.push(Token::bare("PET"));
    }
    seq
}

fn query_benchmark(c: &mut Criterion) {
    let seq = creatures(10_000);
    let mut data = Dataset::new();
    data.add_source(seq.clone());
    let middle = seq.get("CREATURE:BEAST_5000").ok().flatten();

    c.bench_function("all by name", |b| {
        b.iter(|| seq.all(black_box("TILE")).map(|found| found.len()))
    });
    c.bench_function("all by pattern", |b| {
        b.iter(|| {
            seq.all(black_box(Criteria::new().name_pattern("T.LE").arg_pattern(0, "1")))
                .map(|found| found.len())
        })
    });
    c.bench_function("get near the end", |b| {
        b.iter(|| seq.get(black_box("CREATURE:BEAST_9999")).map(|found| found.is_some()))
    });
    c.bench_function("property lookup", |b| {
        b.iter(|| middle.map(|owner| owner.get_prop(black_box("COLOR"))))
    });
    c.bench_function("object lookup", |b| {
        b.iter(|| data.get_obj(black_box("CREATURE:BEAST_7500")).map(|found| found.is_some()))
    });
}

criterion_group!(benches, query_benchmark);
criterion_main!(benches);
