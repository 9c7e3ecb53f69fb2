//! Parallax engine benchmarks
//!
//! Run with: cargo bench -p parallax-core

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parallax_common::ParallaxSettings;
use parallax_core::{
    compose, evaluate, BindingOptions, Easing, NamedEasing, ParallaxController, Property,
    ResolveContext, Segment, StaticLayout,
};

fn generate_segments(count: usize) -> Vec<Segment> {
    let easings = NamedEasing::ALL;
    (0..count)
        .map(|i| {
            let start = (i * 150) as f64;
            Segment::new(start)
                .duration(100.0)
                .easing(Easing::Named(easings[i % easings.len()]))
                .property(Property::new("translateY", 0.0, -50.0))
                .property(Property::new("rotate", 0.0, 90.0))
                .property(Property::new("opacity", 0.0, 1.0))
                .property(Property::new("blur", 4.0, 0.0))
                .property(Property::new("backgroundColor", "#102030", "rgba(200, 100, 50, 0.5)"))
        })
        .collect()
}

fn layout(segment_count: usize) -> StaticLayout {
    let mut layout = StaticLayout::new(800.0, (segment_count * 150 + 2000) as f64);
    layout.add_element("#target", 1000.0, 300.0);
    layout
}

fn evaluation_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for count in [1usize, 10, 100] {
        let segments = generate_segments(count);
        let layout = layout(count);
        let element = layout.target_element().expect("target element");
        let scroll = (count * 150) as f64 * 0.6;

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("pass", count), &segments, |b, segments| {
            b.iter(|| {
                let ctx = ResolveContext::new(&layout, element);
                let evaluation = evaluate(black_box(scroll), segments, &ctx);
                compose(&evaluation.values)
            })
        });
    }

    group.finish();
}

fn controller_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller");

    let segments = generate_segments(20);
    let layout = layout(20);
    let element = layout.target_element().expect("target element");
    let mut controller = ParallaxController::new(element, segments, ParallaxSettings::default())
        .with_options(BindingOptions {
            animate_when_not_in_viewport: true,
            ..Default::default()
        });

    group.bench_function("scroll_sweep", |b| {
        b.iter(|| {
            for scroll in (0..3000).step_by(16) {
                black_box(controller.update(scroll as f64, &layout));
            }
            controller.take_events()
        })
    });

    group.finish();
}

criterion_group!(benches, evaluation_benchmarks, controller_benchmarks);

criterion_main!(benches);
