#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use vson::prelude::*;

const N_BIG_ARR: usize = 2000;

fn big_arr() -> Value {
    let values: Vec<Value> = (0..N_BIG_ARR).map(|i| Value::from(i as i64)).collect();
    Value::from(values)
}

const N_ARR: usize = 10;
const N_MAP: usize = 10;

fn big_nested() -> Value {
    let row: Vec<Value> = (0..N_ARR).map(|i| Value::from(i as i64)).collect();
    let outer = Table::new();
    for i in 0..N_MAP {
        let m = Table::new();
        for j in 0..N_ARR {
            m.set(Value::from(format!("k{}", j)), Value::from(row.clone()));
        }
        m.set(Value::from("id"), Value::from(i as i64));
        outer.push(Value::Table(m));
    }
    Value::Table(outer)
}

fn bench_encode(c: &mut Criterion) {
    let flat = big_arr();
    let nested = big_nested();
    c.bench_function("encode a flat 2000-element array", |b| {
        b.iter(|| black_box(value_to_bytes(&flat, &[], false).unwrap()))
    });
    c.bench_function("encode nested maps of arrays", |b| {
        b.iter(|| black_box(value_to_bytes(&nested, &[], false).unwrap()))
    });
}

fn bench_decode(c: &mut Criterion) {
    let (bytes, _) = value_to_bytes(&big_nested(), &[], false).unwrap();
    c.bench_function(
        &format!("decode nested maps of arrays ({} bytes)", bytes.len()),
        |b| b.iter(|| black_box(bytes_to_value(&bytes, &[]).unwrap())),
    );
}

fn bench_transport(c: &mut Criterion) {
    let (bytes, _) = value_to_bytes(&big_arr(), &[], false).unwrap();
    let transport = bytes_to_r85(&bytes);
    c.bench_function(&format!("radix-85 encode {} bytes", bytes.len()), |b| {
        b.iter(|| black_box(bytes_to_r85(&bytes)))
    });
    c.bench_function(&format!("radix-85 decode {} chars", transport.len()), |b| {
        b.iter(|| black_box(r85_to_bytes(&transport).unwrap()))
    });
}

fn bench_cipher(c: &mut Criterion) {
    let (bytes, _) = value_to_bytes(&big_arr(), &[], false).unwrap();
    c.bench_function(&format!("encrypt {} bytes", bytes.len()), |b| {
        b.iter(|| {
            let mut buffer = bytes.clone();
            encrypt_bytes(&mut buffer, b"benchmark key").unwrap();
            black_box(buffer)
        })
    });
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_transport,
    bench_cipher
);
criterion_main!(benches);
