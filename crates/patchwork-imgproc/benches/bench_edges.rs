use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use patchwork_image::Image;
use patchwork_imgproc::{
    edges::canny,
    morphology::{dilate, Kernel, KernelShape},
};

fn bench_canny(c: &mut Criterion) {
    let mut group = c.benchmark_group("Canny");
    let mut rng = rand::rng();

    for (width, height) in [(256, 224), (512, 448)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
        let image = Image::<u8, 1>::new([*width, *height].into(), data).unwrap();
        let output = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("l1_hysteresis", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| canny(black_box(src), black_box(&mut dst), 50.0, 150.0))
            },
        );

        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        group.bench_with_input(
            BenchmarkId::new("dilate_box3_x2", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| dilate(black_box(src), black_box(&mut dst), &kernel, 2))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_canny);
criterion_main!(benches);
