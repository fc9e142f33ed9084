//! Benchmarks for pixmap transforms.
//!
//! Run with: `cargo bench -p pixmap-bench`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pixmap_core::{PixelBuffer, Rgb};
use pixmap_ops::{ForkJoin, Kernel, Operation};

fn test_image(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, 255, |x, y| {
        Rgb::new((x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8)
    })
}

/// Sequential cutoff sweep for the pointwise and mirror transforms.
fn bench_cutoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutoff");
    let img = test_image(1024, 1024);
    group.throughput(Throughput::Elements(img.len() as u64));

    for cutoff in [256, 4096, 65536, img.len()] {
        let engine = ForkJoin::new(cutoff).unwrap();
        for op in [Operation::Negate, Operation::Greyscale, Operation::Mirror] {
            group.bench_with_input(BenchmarkId::new(op.name(), cutoff), &img, |b, img| {
                b.iter(|| op.apply(black_box(img), &engine).unwrap())
            });
        }
    }

    group.finish();
}

/// Gaussian blur across radii.
fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("blur");
    group.sample_size(20);
    let img = test_image(512, 512);
    let engine = ForkJoin::default();
    group.throughput(Throughput::Elements(img.len() as u64));

    for radius in [1usize, 3, 7] {
        let op = Operation::GaussianBlur { radius, sigma: radius as f64 / 2.0 + 0.5 };
        group.bench_with_input(BenchmarkId::new("gaussian", radius), &img, |b, img| {
            b.iter(|| op.apply(black_box(img), &engine).unwrap())
        });
    }

    group.bench_function("kernel_r15", |b| {
        b.iter(|| Kernel::gaussian(black_box(15), black_box(4.0)).unwrap())
    });

    group.finish();
}

/// PPM encode/decode.
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppm");
    let img = test_image(1024, 768);
    let bytes = pixmap_io::ppm::encode(&img);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode", |b| b.iter(|| pixmap_io::ppm::encode(black_box(&img))));
    group.bench_function("decode", |b| {
        b.iter(|| pixmap_io::ppm::decode(black_box(&bytes)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_cutoff, bench_blur, bench_codec);
criterion_main!(benches);
