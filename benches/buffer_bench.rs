// benches/buffer_bench.rs
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use serbuf::{Buffer, ByteSwapper, FieldKind, RecordLayout, SeekType};

fn bench_scalar_put_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar");
    group.throughput(Throughput::Bytes(4 * 1024));

    group.bench_function("put_u32_x1024", |b| {
        let mut buf = Buffer::new(4 * 1024);
        b.iter(|| {
            buf.clear();
            for i in 0..1024u32 {
                buf.put_u32(black_box(i)).unwrap();
            }
        });
    });

    group.bench_function("get_u32_x1024", |b| {
        let mut buf = Buffer::new(4 * 1024);
        for i in 0..1024u32 {
            buf.put_u32(i).unwrap();
        }
        b.iter(|| {
            buf.seek_get(SeekType::Head, 0).unwrap();
            let mut acc = 0u32;
            for _ in 0..1024 {
                acc = acc.wrapping_add(buf.get_u32().unwrap());
            }
            black_box(acc)
        });
    });

    group.bench_function("get_u32_swapped_x1024", |b| {
        let mut buf = Buffer::new(4 * 1024);
        buf.activate_byte_swapping(true);
        for i in 0..1024u32 {
            buf.put_u32(i).unwrap();
        }
        b.iter(|| {
            buf.seek_get(SeekType::Head, 0).unwrap();
            let mut acc = 0u32;
            for _ in 0..1024 {
                acc = acc.wrapping_add(buf.get_u32().unwrap());
            }
            black_box(acc)
        });
    });

    group.finish();
}

fn bench_bulk_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk");
    let payload = vec![0xA5u8; 64 * 1024];
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("put_bytes_64k", |b| {
        let mut buf = Buffer::new(64 * 1024);
        b.iter(|| {
            buf.clear();
            buf.put_bytes(black_box(&payload)).unwrap();
        });
    });

    group.bench_function("get_into_64k", |b| {
        let mut buf = Buffer::new(64 * 1024);
        buf.put_bytes(&payload).unwrap();
        let mut out = vec![0u8; 64 * 1024];
        b.iter(|| {
            buf.seek_get(SeekType::Head, 0).unwrap();
            buf.get_into(black_box(&mut out)).unwrap();
        });
    });

    group.finish();
}

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");

    group.bench_function("format_ints_x256", |b| {
        let mut buf = Buffer::text(4 * 1024);
        b.iter(|| {
            buf.clear();
            for i in 0..256i32 {
                buf.put_i32(black_box(i)).unwrap();
                buf.put_char(b' ').unwrap();
            }
        });
    });

    group.bench_function("scan_ints_x256", |b| {
        let mut src = String::new();
        for i in 0..256 {
            src.push_str(&i.to_string());
            src.push(' ');
        }
        b.iter(|| {
            let mut buf = Buffer::text_from_str(&src);
            let mut acc = 0i32;
            for _ in 0..256 {
                acc = acc.wrapping_add(buf.get_i32().unwrap());
            }
            black_box(acc)
        });
    });

    group.finish();
}

fn bench_record_swap(c: &mut Criterion) {
    let layout = RecordLayout::new(16)
        .field(0, FieldKind::U32)
        .field(4, FieldKind::U32)
        .array(8, FieldKind::U16, 4);
    let mut swap = ByteSwapper::new();
    swap.activate_byte_swapping(true);
    let src = [0x5Au8; 16];

    c.bench_function("swap_record_16b", |b| {
        let mut dst = [0u8; 16];
        b.iter(|| {
            swap.swap_record(black_box(&mut dst), black_box(&src), &layout)
                .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_scalar_put_get,
    bench_bulk_bytes,
    bench_text,
    bench_record_swap
);
criterion_main!(benches);
