// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use ndarray::{Array2, Zip};

use crate::core::ResidualGrid;
use crate::error::{Result, VelresError};

/// Add a dense residual grid into a velocity model of identical dimensions,
/// in place. Model columns are independent, so the addition runs as a
/// parallel map over columns.
pub fn add_residual(model: &mut Array2<f32>, residual: &ResidualGrid) -> Result<()> {
    if model.dim() != (residual.nx(), residual.nz()) {
        return Err(VelresError::ShapeMismatch {
            expected: residual.len(),
            got: model.len(),
        });
    }

    Zip::from(model.rows_mut())
        .and(residual.data().rows())
        .par_for_each(|mut column, correction| {
            for (v, &r) in column.iter_mut().zip(correction.iter()) {
                *v += r as f32;
            }
        });

    Ok(())
}

/// Add a residual grid into a model using a bounded worker pool.
///
/// With `threads = None` the addition runs on the global pool.
pub fn add_residual_with_threads(
    model: &mut Array2<f32>,
    residual: &ResidualGrid,
    threads: Option<usize>,
) -> Result<()> {
    match threads {
        None => add_residual(model, residual),
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| VelresError::Other(format!("thread pool error: {}", e)))?;
            pool.install(|| add_residual(model, residual))
        }
    }
}

/// Mean and maximum absolute difference between two models, with the flat
/// position (column-major) of the largest difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelDelta {
    /// Mean absolute difference over all cells.
    pub mean_abs: f64,
    /// Largest absolute difference.
    pub max_abs: f64,
    /// Flat index of the largest difference in output traversal order.
    pub max_index: usize,
}

/// Compare two equally-shaped models element-wise.
pub fn compare_models(a: &Array2<f32>, b: &Array2<f32>) -> Result<ModelDelta> {
    if a.dim() != b.dim() {
        return Err(VelresError::ShapeMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    if a.is_empty() {
        return Err(VelresError::Other("cannot compare empty models".to_string()));
    }

    let mut sum_abs = 0.0f64;
    let mut max_abs = 0.0f64;
    let mut max_index = 0usize;
    for (index, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x as f64 - y as f64).abs();
        sum_abs += diff;
        if diff > max_abs {
            max_abs = diff;
            max_index = index;
        }
    }

    Ok(ModelDelta {
        mean_abs: sum_abs / a.len() as f64,
        max_abs,
        max_index,
    })
}
