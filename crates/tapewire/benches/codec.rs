// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec hot-path benchmarks: steady-state encode, decode, length, and deep
//! clone on an already-compiled type.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tapewire::{
    Cloner, CodecRegistry, EnumDescriptor, EnumVariant, Record, ScalarKind, Timestamp,
    TypeDescriptorBuilder, Value,
};

fn build_registry() -> (CodecRegistry, Record) {
    let registry = CodecRegistry::new();
    let side = EnumDescriptor::new(vec![
        EnumVariant::new("Buy", 0),
        EnumVariant::new("Sell", 1),
    ])
    .with_width(1);
    let desc = registry
        .register(
            TypeDescriptorBuilder::new("Fill")
                .scalar_field("qty", ScalarKind::I32, 1)
                .scalar_field("seq", ScalarKind::U64, 2)
                .scalar_field("px", ScalarKind::F64, 3)
                .enum_field("side", side, 4)
                .string_field("note", 5)
                .symbol_field("symbol", 6)
                .wrapped_field("at", "Timestamp", 7)
                .build(),
        )
        .expect("register");

    let mut rec = Record::blank(&desc);
    rec.set("qty", 250i32).expect("qty");
    rec.set("seq", 881_244_002u64).expect("seq");
    rec.set("px", 4512.75f64).expect("px");
    rec.set_value("side", Value::Enum(1)).expect("side");
    rec.set("note", "partial fill, resting remainder").expect("note");
    rec.set("symbol", registry.symbols().intern("ES")).expect("symbol");
    rec.set("at", Timestamp(1_755_000_000_123_456)).expect("at");
    (registry, rec)
}

fn bench_encode(c: &mut Criterion) {
    let (registry, rec) = build_registry();
    // Warm the codec cache so the loop measures steady state.
    let bytes = registry.encode(&rec).expect("encode");

    c.bench_function("encode_fill", |b| {
        b.iter(|| registry.encode(black_box(&rec)).expect("encode"))
    });

    c.bench_function("encoded_len_fill", |b| {
        b.iter(|| registry.encoded_len(black_box(&rec)).expect("len"))
    });

    c.bench_function("decode_fill", |b| {
        b.iter(|| {
            registry
                .decode_bytes("Fill", black_box(&bytes))
                .expect("decode")
        })
    });
}

fn bench_clone(c: &mut Criterion) {
    let (_registry, rec) = build_registry();
    let shared = rec.into_shared();
    let cloner = Cloner::new();
    cloner.clone_record(&shared);

    c.bench_function("deep_clone_fill", |b| {
        b.iter(|| cloner.clone_record(black_box(&shared)))
    });
}

criterion_group!(benches, bench_encode, bench_clone);
criterion_main!(benches);
