use criterion::{Criterion, criterion_group, criterion_main};
use skin_painter::{
    brush_engine::{
        brush::Brush,
        paint_buffer::PaintBuffer,
        stamp::StampTexture,
    },
    canvas::surface::PaintSurface,
    utils::{color::Color, vector::Vec2},
};
use std::hint::black_box;
use std::sync::Arc;

fn bench_stamp_generation(c: &mut Criterion) {
    let brush = Brush::circle(96, Color::red(), 0.5);
    c.bench_function("circle_stamp_96px", |b| {
        b.iter(|| StampTexture::generate(black_box(&brush)));
    });
}

fn bench_line_flush(c: &mut Criterion) {
    let brush = Brush::circle(24, Color::rgb(20, 120, 220), 0.5);
    let mut buffer = PaintBuffer::new();
    buffer.set_stamp(Some(Arc::new(StampTexture::generate(&brush))));
    let mut surface = PaintSurface::new(512, 512);

    c.bench_function("line_400px_flush_512", |b| {
        b.iter(|| {
            buffer.add_line(Vec2::new(50.0, 60.0), Vec2::new(450.0, 300.0));
            buffer.flush_to(&mut surface);
            buffer.clear();
        });
    });
}

criterion_group!(benches, bench_stamp_generation, bench_line_flush);
criterion_main!(benches);
