use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tile_list::finder::IntersectingTilesFinder;
use tile_list::geometry::primitives::Boundary;
use tile_list::geometry::{Geometry, Point, Polygon};
use tile_list::projection::{lat_to_y, lat_to_y_exact, WebMercator};
use tile_list::Config;

/// A rough circle around Berlin
fn circle(points: usize) -> Geometry {
    let ring = (0..points)
        .map(|i| {
            let angle = i as f64 / points as f64 * std::f64::consts::TAU;
            Point::new(13.4 + 0.5 * angle.cos(), 52.5 + 0.3 * angle.sin())
        })
        .collect();
    Geometry::Polygon(Polygon::new(ring, Vec::new()))
}

/// A zigzag line crossing central europe
fn zigzag(points: usize) -> Geometry {
    Geometry::Line(
        (0..points)
            .map(|i| Point::new(2.0 + i as f64 * 0.05, 48.0 + (i % 2) as f64 * 0.2))
            .collect(),
    )
}

fn find(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tile Finder");
    group.sample_size(20);

    for max_zoom in [10, 14] {
        for (name, geometry, buffer) in [
            ("polygon", circle(256), 0.0),
            ("line", zigzag(256), 0.0),
            ("buffered line", zigzag(256), 500.0),
        ] {
            let config = Config {
                max_zoom,
                buffer,
                boundary: Boundary::HalfOpen,
                ..Config::default()
            };
            group.bench_with_input(
                BenchmarkId::new(name, max_zoom),
                &geometry,
                |b, geometry| {
                    b.iter(|| {
                        let mut finder = IntersectingTilesFinder::new(config, WebMercator).unwrap();
                        finder.add_geometry(geometry).unwrap();
                        finder.len()
                    })
                },
            );
        }
    }

    group.finish();
}

fn projection(c: &mut Criterion) {
    let latitudes: Vec<f64> = (0..1000).map(|i| -77.0 + i as f64 * 0.154).collect();

    let mut group = c.benchmark_group("Latitude");
    group.bench_function("polynomial", |b| {
        b.iter(|| latitudes.iter().map(|&lat| lat_to_y(lat)).sum::<f64>())
    });
    group.bench_function("exact", |b| {
        b.iter(|| latitudes.iter().map(|&lat| lat_to_y_exact(lat)).sum::<f64>())
    });
    group.finish();
}

criterion_group!(benches, find, projection);
criterion_main!(benches);
