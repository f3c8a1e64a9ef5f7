use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use todo_client::signature::{DrawingSurface, Point, RasterSurface};

fn scribble(surface: &mut RasterSurface) {
    let mut previous = Point::new(10.0, 100.0);
    for i in 1..80 {
        let x = 10.0 + i as f64 * 4.5;
        let y = 100.0 + (i as f64 * 0.4).sin() * 60.0;
        let next = Point::new(x, y);
        surface.draw_segment(previous, next);
        previous = next;
    }
}

fn bench_drawing(c: &mut Criterion) {
    c.bench_function("draw_segment", |b| {
        let mut surface = RasterSurface::new(400, 200);
        b.iter(|| {
            surface.draw_segment(
                black_box(Point::new(20.0, 20.0)),
                black_box(Point::new(380.0, 180.0)),
            )
        })
    });

    c.bench_function("draw_scribble", |b| {
        let mut surface = RasterSurface::new(400, 200);
        b.iter(|| scribble(black_box(&mut surface)))
    });
}

fn bench_export(c: &mut Criterion) {
    let blank = RasterSurface::new(400, 200);
    c.bench_function("export_blank_png", |b| b.iter(|| blank.export()));

    let mut signed = RasterSurface::new(400, 200);
    scribble(&mut signed);
    c.bench_function("export_signed_png", |b| b.iter(|| signed.export()));

    let payload = signed.export().unwrap();
    c.bench_function("png_to_data_url", |b| {
        b.iter(|| black_box(&payload).to_data_url())
    });
}

criterion_group!(benches, bench_drawing, bench_export);
criterion_main!(benches);
