// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition benchmarks.
//!
//! Measures:
//! - Cell enumeration and classification for polygons of growing size
//! - The effect of geometry preparation on the classification loop
//! - Batch throughput across many small polygons

#![allow(missing_docs, reason = "Benchmark entry points are generated by criterion.")]

use std::f64::consts::PI;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::{Coord, Geometry, LineString, Polygon};
use gridcover_decompose::{DecomposeOptions, Decomposer, Region, decompose_batch};
use gridcover_index::GridSpec;

/// A regular polygon with `sides` vertices around a center, radius in degrees.
fn regular_polygon(center_lat: f64, center_lon: f64, radius: f64, sides: u32) -> Polygon<f64> {
    let ring: Vec<_> = (0..=sides)
        .map(|i| {
            let angle = f64::from(i % sides) * 2.0 * PI / f64::from(sides);
            Coord {
                x: center_lon + radius * angle.cos(),
                y: center_lat + radius * angle.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::new(ring), vec![])
}

fn region(polygon: Polygon<f64>) -> Region {
    Region::from_geometry(&Geometry::Polygon(polygon)).unwrap()
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    let grid = GridSpec::new(0.1).unwrap();
    let decomposer = Decomposer::new(&grid);

    for radius in [0.5, 2.0, 8.0] {
        let shape = region(regular_polygon(45.0, 7.0, radius, 64));
        let cells = decomposer.cells(&shape).unwrap().len();
        group.throughput(Throughput::Elements(cells as u64));
        group.bench_with_input(BenchmarkId::new("polygon64", radius), &shape, |b, shape| {
            b.iter(|| black_box(decomposer.cells(shape).unwrap().len()));
        });
    }

    group.finish();
}

fn bench_acceleration(c: &mut Criterion) {
    let mut group = c.benchmark_group("acceleration");
    let grid = GridSpec::new(0.25).unwrap();
    // Many vertices make each relate call expensive without preparation.
    let shape = region(regular_polygon(-20.0, 130.0, 5.0, 1024));

    for accelerate in [true, false] {
        let options = DecomposeOptions::default().with_accelerate(accelerate);
        let decomposer = Decomposer::with_options(&grid, options);
        group.bench_with_input(
            BenchmarkId::new("accelerate", accelerate),
            &shape,
            |b, shape| {
                b.iter(|| {
                    black_box(decomposer.visit_cells(shape, |record| {
                        black_box(record);
                    }))
                });
            },
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let grid = GridSpec::new(0.5).unwrap();
    let decomposer = Decomposer::new(&grid);

    for count in [16_u32, 256] {
        let geometries: Vec<_> = (0..count)
            .map(|i| {
                let lat = -60.0 + f64::from(i % 16) * 7.5;
                let lon = -170.0 + f64::from(i / 16) * 20.0;
                Geometry::Polygon(regular_polygon(lat, lon, 2.0, 12))
            })
            .collect();

        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(
            BenchmarkId::new("sequential", count),
            &geometries,
            |b, geometries| {
                b.iter(|| {
                    for geometry in geometries {
                        black_box(decomposer.decompose(Some(geometry)).unwrap());
                    }
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", count),
            &geometries,
            |b, geometries| {
                b.iter(|| black_box(decompose_batch(&decomposer, geometries)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decompose, bench_acceleration, bench_batch);
criterion_main!(benches);
