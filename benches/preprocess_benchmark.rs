use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hijaiyah::classifier::{count_distinct_values, is_blank, preprocess};
use hijaiyah::{Canvas, CanvasSettings};
use ndarray::Array3;

fn sample_drawing() -> Array3<u8> {
    let settings = CanvasSettings::default();
    let mut canvas = Canvas::new(&settings);
    canvas.stroke(&[[200.0, 40.0], [200.0, 260.0]], &settings);
    canvas.stroke(&[[120.0, 250.0], [280.0, 250.0], [300.0, 220.0]], &settings);
    canvas.pixels()
}

fn bench_preprocess(c: &mut Criterion) {
    let drawing = sample_drawing();
    let mut group = c.benchmark_group("Preprocess");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("canvas_400x300", |b| b.iter(|| {
        preprocess(black_box(drawing.view())).unwrap()
    }));

    let large = Array3::from_shape_fn((1080, 1920, 4), |(y, x, c)| ((x + y + c) % 256) as u8);
    group.bench_function("image_1920x1080", |b| b.iter(|| {
        preprocess(black_box(large.view())).unwrap()
    }));

    group.finish();
}

fn bench_blank_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("BlankCheck");
    group.sample_size(50);

    let blank = Canvas::new(&CanvasSettings::default()).pixels();
    group.bench_function("blank_canvas", |b| b.iter(|| is_blank(black_box(blank.view()))));

    let drawing = sample_drawing();
    group.bench_function("drawn_canvas", |b| b.iter(|| {
        count_distinct_values(black_box(drawing.view()))
    }));

    group.finish();
}

criterion_group!(benches, bench_preprocess, bench_blank_check);
criterion_main!(benches);
