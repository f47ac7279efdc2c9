//! Benchmark sensor casting and marking samples.

use autopark::config::{MarkingConfig, SensorConfig};
use autopark::sensors::SensorArray;
use autopark::world::{ImageSampler, MarkingDetector, WorldBounds};
use autopark::{Obstacle, Point2D, Pose2D};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

fn create_lot() -> ImageSampler {
    ImageSampler::from_image(RgbImage::from_fn(800, 600, |x, y| {
        if x % 120 < 4 && y > 350 {
            Rgb([250, 220, 40])
        } else {
            Rgb([60, 60, 60])
        }
    }))
}

/// Deterministic mix of every obstacle shape
fn create_obstacles(n: usize) -> Vec<Obstacle> {
    (0..n)
        .map(|i| {
            let x = 50.0 + (i as f32 * 137.0) % 700.0;
            let y = 50.0 + (i as f32 * 89.0) % 500.0;
            match i % 3 {
                0 => Obstacle::circle(Point2D::new(x, y), 15.0),
                1 => Obstacle::car(Point2D::new(x, y)),
                _ => Obstacle::line(Point2D::new(x, y), Point2D::new(x + 40.0, y + 10.0)),
            }
        })
        .collect()
}

fn bench_sensor_cast(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensor_cast");
    let lot = create_lot();
    let bounds = WorldBounds::new(800.0, 600.0);
    let sensors = SensorArray::new(
        &SensorConfig::default(),
        MarkingDetector::new(MarkingConfig::default()),
    );
    let pose = Pose2D::new(400.0, 300.0, 0.4);

    for n in [0, 10, 50, 200].iter() {
        let obstacles = create_obstacles(*n);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                let scan = sensors.cast(black_box(pose), black_box(&obstacles), &lot, bounds);
                black_box(scan)
            })
        });
    }

    group.finish();
}

fn bench_area_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("area_sample");
    let lot = create_lot();
    let detector = MarkingDetector::new(MarkingConfig::default());

    for radius in [40, 70, 80].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(radius), radius, |b, &r| {
            b.iter(|| {
                let sample = detector.area_sample(&lot, black_box(Point2D::new(360.0, 400.0)), r);
                black_box(sample.count)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sensor_cast, bench_area_sample);
criterion_main!(benches);
