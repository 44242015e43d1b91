use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use patchwork::image::Image;
use patchwork::imgproc::interpolation::InterpolationMode;
use patchwork::mask::{ExtractMask, MaskExtractor};
use patchwork::transform::rotate;
use patchwork::Raster;

fn synthetic_patch(size: usize) -> Raster {
    let c = (size as f32 - 1.0) / 2.0;
    let r2 = (size as f32 / 3.0).powi(2);
    let mut data = Vec::with_capacity(size * size * 3);
    for y in 0..size {
        for x in 0..size {
            let (dx, dy) = (x as f32 - c, y as f32 - c);
            if dx * dx + dy * dy <= r2 {
                data.extend_from_slice(&[120, 20, 200]);
            } else {
                data.extend_from_slice(&[90, 200, 120]);
            }
        }
    }
    Raster::from(Image::<u8, 3>::new([size, size].into(), data).unwrap())
}

fn bench_rotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rotate");

    for size in [128, 256, 512].iter() {
        group.throughput(criterion::Throughput::Elements((*size * *size) as u64));

        let patch = synthetic_patch(*size);

        group.bench_with_input(BenchmarkId::new("bilinear_30deg", size), &patch, |b, p| {
            b.iter(|| {
                rotate(
                    black_box(p),
                    black_box(30.0),
                    InterpolationMode::Bilinear,
                )
            })
        });
    }
    group.finish();
}

fn bench_extractors(c: &mut Criterion) {
    let mut group = c.benchmark_group("MaskExtractor");

    for size in [128, 256, 512].iter() {
        group.throughput(criterion::Throughput::Elements((*size * *size) as u64));

        let patch = synthetic_patch(*size);
        let rotated = rotate(&patch, 30.0, InterpolationMode::Bilinear).unwrap();

        for (name, extractor) in [
            ("fast", MaskExtractor::fast()),
            ("content_aware", MaskExtractor::content_aware()),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &rotated, |b, p| {
                b.iter(|| extractor.extract(black_box(p)))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_rotate, bench_extractors);
criterion_main!(benches);
