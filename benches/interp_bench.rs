// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use velres_grid::core::{ColumnPicks, GridGeometry, GridParams, Pick, PickSet, WaterBottom};
use velres_grid::interp::{Interpolator, Mode};

/// Build a model-sized geometry with analyzed columns every `stride`
/// columns, and a pick set with a short profile per analyzed column.
/// Every 13th analyzed column is excluded to exercise the repair passes.
fn make_inputs(nx: usize, nz: usize, stride: usize) -> (GridGeometry, PickSet) {
    let dx = 100.0;
    let fx = 15000.0;
    let geometry = GridGeometry::new(GridParams {
        nz,
        dz: 25.0,
        fz: 0.0,
        nx,
        dx,
        fx,
        cdp_min: fx,
        cdp_max: fx + dx * (nx - 1) as f64,
        cdp_step: dx * stride as f64,
    })
    .unwrap();

    let mut picks = PickSet::new();
    for (count, i) in geometry.analyzed_columns().enumerate() {
        let cdp = fx + dx * i as f64;
        let column = if count % 13 == 5 {
            ColumnPicks {
                cdp,
                picks: vec![Pick {
                    depth: 0.0,
                    value: 999.0,
                    lambda: 0.0,
                }],
            }
        } else {
            let base = (i % 7) as f64 * 3.0 - 10.0;
            ColumnPicks {
                cdp,
                picks: (0..5)
                    .map(|k| Pick {
                        depth: 500.0 + 1500.0 * k as f64,
                        value: base + k as f64,
                        lambda: 30.0,
                    })
                    .collect(),
            }
        };
        picks.insert(i, column);
    }
    (geometry, picks)
}

/// Production-sized model, standard mode.
fn bench_standard_701x321(c: &mut Criterion) {
    let (geometry, picks) = make_inputs(701, 321, 10);
    let interpolator = Interpolator::new(geometry);
    c.bench_function("standard_701x321", |b| {
        b.iter(|| black_box(interpolator.interpolate(&picks).unwrap()));
    });
}

/// Production-sized model, marine mode with water-bottom blanking.
fn bench_marine_701x321(c: &mut Criterion) {
    let (geometry, picks) = make_inputs(701, 321, 10);
    let wb = WaterBottom::new(
        (0..701)
            .map(|i| (15000.0 + 100.0 * i as f64, 100.0 + (i % 40) as f64 * 5.0))
            .collect(),
    );
    let interpolator = Interpolator::new(geometry)
        .with_mode(Mode::Marine(wb))
        .unwrap();
    c.bench_function("marine_701x321", |b| {
        b.iter(|| black_box(interpolator.interpolate(&picks).unwrap()));
    });
}

/// Grid size scaling at a fixed analyzed-column stride.
fn bench_grid_size_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_size_scaling");
    for &(nx, nz) in &[(101, 81), (351, 161), (701, 321), (1401, 641)] {
        let (geometry, picks) = make_inputs(nx, nz, 10);
        let interpolator = Interpolator::new(geometry);
        group.bench_function(format!("{}x{}", nx, nz), |b| {
            b.iter(|| black_box(interpolator.interpolate(&picks).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_standard_701x321,
    bench_marine_701x321,
    bench_grid_size_scaling,
);
criterion_main!(benches);
