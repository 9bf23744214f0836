use std::hint::black_box;
use std::io;

use criterion::{Criterion, criterion_group, criterion_main};

use rowdump::emit::RowEmitter;

fn bench_emit(c: &mut Criterion) {
    let plain: Vec<u8> = b"abcdefghijklmnopqrstuvwxyz0123456789"
        .iter()
        .copied()
        .cycle()
        .take(4096)
        .collect();
    let hostile: Vec<u8> = b"\\\t\n\rvalue"
        .iter()
        .copied()
        .cycle()
        .take(4096)
        .collect();

    c.bench_function("emit_row_plain_4k", |b| {
        let mut emitter = RowEmitter::new(io::sink());
        b.iter(|| {
            emitter
                .emit_row([Some(black_box(plain.as_slice())), None])
                .unwrap();
        });
    });

    c.bench_function("emit_row_hostile_4k", |b| {
        let mut emitter = RowEmitter::new(io::sink());
        b.iter(|| {
            emitter
                .emit_row([Some(black_box(hostile.as_slice())), None])
                .unwrap();
        });
    });
}

criterion_group!(benches, bench_emit);
criterion_main!(benches);
