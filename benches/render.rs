use criterion::{criterion_group, criterion_main, Criterion, black_box};

use glam::Vec2;

use skymood::render::software;
use skymood::sky::{shade, FrameUniforms};
use skymood::{SceneState, Style, TimeOfDay, Variant, WeatherClass};

fn state(weather: WeatherClass, time_of_day: TimeOfDay, style: Style) -> SceneState {
    SceneState {
        weather,
        time_of_day,
        style,
        variant: Variant::new(0),
        viewport: [320, 180],
    }
}

fn bench_shade_pixel(c: &mut Criterion) {
    let frame = |w, tod, style| FrameUniforms::new(12.5, &state(w, tod, style));
    let clear = frame(WeatherClass::Clear, TimeOfDay::Day, Style::Realistic);
    let storm = frame(WeatherClass::Storm, TimeOfDay::Night, Style::Realistic);
    let soft = frame(WeatherClass::Cloudy, TimeOfDay::Sunset, Style::Soft);
    let uv = Vec2::new(0.37, 0.42);

    c.bench_function("shade_clear_day", |b| {
        b.iter(|| shade(black_box(uv), black_box(&clear)));
    });
    c.bench_function("shade_storm_night", |b| {
        b.iter(|| shade(black_box(uv), black_box(&storm)));
    });
    c.bench_function("shade_soft_sunset", |b| {
        b.iter(|| shade(black_box(uv), black_box(&soft)));
    });
}

fn bench_software_frame(c: &mut Criterion) {
    let overcast = state(WeatherClass::Overcast, TimeOfDay::Day, Style::Realistic);
    let uniforms = FrameUniforms::new(3.0, &overcast);

    let mut group = c.benchmark_group("software_frame");
    group.sample_size(20);
    group.bench_function("320x180", |b| {
        b.iter(|| software::render_frame(black_box(&uniforms), 320, 180));
    });
    group.finish();
}

criterion_group!(benches, bench_shade_pixel, bench_software_frame);
criterion_main!(benches);
