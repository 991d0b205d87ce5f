// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1};

use crate::error::{Result, VelresError};

/// Sentinel value marking an analyzed column that contributed no usable picks.
pub const EXCLUDED: f64 = 999.0;

/// Test a pick value or grid cell against the excluded-column sentinel.
pub fn is_excluded_value(value: f64) -> bool {
    (value - EXCLUDED).abs() < 1e-6
}

/// Grid sampling parameters as they appear in a parameter file:
/// vertical samples, then horizontal samples, then the analyzed CDP range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    /// Number of depth samples per column.
    pub nz: usize,
    /// Depth sampling interval.
    pub dz: f64,
    /// Depth of the first sample.
    pub fz: f64,
    /// Number of horizontal columns.
    pub nx: usize,
    /// Horizontal sampling interval.
    pub dx: f64,
    /// Horizontal coordinate of the first column.
    pub fx: f64,
    /// First analyzed CDP.
    pub cdp_min: f64,
    /// Last analyzed CDP.
    pub cdp_max: f64,
    /// Spacing between analyzed CDPs (a positive multiple of dx).
    pub cdp_step: f64,
}

/// Validated grid geometry: the model sampling plus the derived set of
/// analyzed columns `{nmin, nmin+nstep, ..., nmax}` (0-based indices).
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    params: GridParams,
    nmin: usize,
    nmax: usize,
    nstep: usize,
}

impl GridGeometry {
    /// Validate raw grid parameters and derive the analyzed-column set.
    ///
    /// # Errors
    /// Returns an error if a sample count is zero, a sampling interval is
    /// zero or non-finite, `cdp_step` is not a positive multiple of `dx`,
    /// the CDP range is inverted or off the analyzed stride, or either end
    /// of the range maps outside the model.
    pub fn new(params: GridParams) -> Result<Self> {
        if params.nz == 0 {
            return Err(VelresError::InvalidSampleCount {
                name: "nz",
                value: params.nz as f64,
            });
        }
        if params.nx == 0 {
            return Err(VelresError::InvalidSampleCount {
                name: "nx",
                value: params.nx as f64,
            });
        }
        if !params.dz.is_finite() || params.dz == 0.0 {
            return Err(VelresError::InvalidSampleInterval {
                name: "dz",
                value: params.dz,
            });
        }
        if !params.dx.is_finite() || params.dx == 0.0 {
            return Err(VelresError::InvalidSampleInterval {
                name: "dx",
                value: params.dx,
            });
        }

        // cdp_step must be a positive whole number of columns
        let ratio = params.cdp_step / params.dx;
        if !(params.cdp_step > 0.0)
            || !ratio.is_finite()
            || ratio < 0.5
            || (ratio - ratio.round()).abs() > 1e-6
        {
            return Err(VelresError::InvalidCdpStep {
                step: params.cdp_step,
                dx: params.dx,
            });
        }
        let nstep = ratio.round() as usize;

        if params.cdp_min > params.cdp_max {
            return Err(VelresError::InvalidCdpRange {
                cdp_min: params.cdp_min,
                cdp_max: params.cdp_max,
            });
        }

        let nmin = column_for(params.cdp_min, params.fx, params.dx, params.nx)?;
        let nmax = column_for(params.cdp_max, params.fx, params.dx, params.nx)?;
        if nmin > nmax {
            return Err(VelresError::InvalidCdpRange {
                cdp_min: params.cdp_min,
                cdp_max: params.cdp_max,
            });
        }
        if (nmax - nmin) % nstep != 0 {
            return Err(VelresError::UnalignedCdpRange {
                cdp_min: params.cdp_min,
                cdp_max: params.cdp_max,
                cdp_step: params.cdp_step,
            });
        }

        Ok(GridGeometry {
            params,
            nmin,
            nmax,
            nstep,
        })
    }

    /// Number of depth samples per column.
    pub fn nz(&self) -> usize {
        self.params.nz
    }

    /// Number of horizontal columns.
    pub fn nx(&self) -> usize {
        self.params.nx
    }

    /// The raw parameters this geometry was built from.
    pub fn params(&self) -> &GridParams {
        &self.params
    }

    /// 0-based index of the first analyzed column.
    pub fn nmin(&self) -> usize {
        self.nmin
    }

    /// 0-based index of the last analyzed column.
    pub fn nmax(&self) -> usize {
        self.nmax
    }

    /// Analyzed-column stride in columns.
    pub fn nstep(&self) -> usize {
        self.nstep
    }

    /// Depth coordinate of the 0-based sample index `j`.
    pub fn depth_at(&self, j: usize) -> f64 {
        self.params.fz + self.params.dz * j as f64
    }

    /// Horizontal coordinate of the 0-based column index `i`.
    pub fn x_at(&self, i: usize) -> f64 {
        self.params.fx + self.params.dx * i as f64
    }

    /// Iterate the 0-based analyzed column indices in ascending order.
    pub fn analyzed_columns(&self) -> impl Iterator<Item = usize> {
        (self.nmin..=self.nmax).step_by(self.nstep)
    }

    /// Whether the 0-based column index `i` was analyzed.
    pub fn is_analyzed(&self, i: usize) -> bool {
        i >= self.nmin && i <= self.nmax && (i - self.nmin) % self.nstep == 0
    }

    /// Map a CDP value to its 0-based column index.
    ///
    /// # Errors
    /// Returns `ColumnOffGrid` if the CDP falls outside the model.
    pub fn column_of_cdp(&self, cdp: f64) -> Result<usize> {
        column_for(cdp, self.params.fx, self.params.dx, self.params.nx)
    }

    /// Total number of grid cells.
    pub fn num_cells(&self) -> usize {
        self.params.nx * self.params.nz
    }
}

/// Map a CDP to a 0-based column index, truncating toward zero the way the
/// original integer conversion does. CDPs are expected to land on exact
/// column positions.
fn column_for(cdp: f64, fx: f64, dx: f64, nx: usize) -> Result<usize> {
    let raw = (cdp - fx) / dx;
    let column = if raw.is_finite() { raw.trunc() as i64 } else { -1 };
    if column < 0 || column >= nx as i64 {
        return Err(VelresError::ColumnOffGrid {
            cdp,
            column: column + 1,
            nx,
        });
    }
    Ok(column as usize)
}

/// A single residual-velocity pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    /// Depth of the pick.
    pub depth: f64,
    /// Residual-velocity value at that depth.
    pub value: f64,
    /// Auxiliary picking parameter carried through unused.
    pub lambda: f64,
}

/// All picks contributed by one analyzed column, ordered by increasing depth.
#[derive(Debug, Clone)]
pub struct ColumnPicks {
    /// CDP value the group was recorded at.
    pub cdp: f64,
    /// The ordered picks.
    pub picks: Vec<Pick>,
}

impl ColumnPicks {
    /// Whether this column was flagged as contributing no usable picks.
    pub fn is_excluded(&self) -> bool {
        match self.picks.first() {
            Some(p) => is_excluded_value(p.value),
            None => true,
        }
    }
}

/// Pick groups keyed by 0-based column index. A column appearing more than
/// once keeps the last group read.
#[derive(Debug, Clone, Default)]
pub struct PickSet {
    columns: BTreeMap<usize, ColumnPicks>,
}

impl PickSet {
    /// Create an empty pick set.
    pub fn new() -> Self {
        PickSet::default()
    }

    /// Insert a pick group for the given 0-based column.
    pub fn insert(&mut self, column: usize, picks: ColumnPicks) {
        self.columns.insert(column, picks);
    }

    /// The pick group for a 0-based column, if the stream contained one.
    pub fn get(&self, column: usize) -> Option<&ColumnPicks> {
        self.columns.get(&column)
    }

    /// Number of columns with a pick group.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the stream contained no groups at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate (column, group) pairs in ascending column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ColumnPicks)> {
        self.columns.iter().map(|(&c, p)| (c, p))
    }
}

/// Sea-floor depth per model column, as `(x, depth)` pairs in column order.
#[derive(Debug, Clone)]
pub struct WaterBottom {
    entries: Vec<(f64, f64)>,
}

impl WaterBottom {
    /// Build a profile from `(x, depth)` pairs, one per model column.
    pub fn new(entries: Vec<(f64, f64)>) -> Self {
        WaterBottom { entries }
    }

    /// Number of columns covered by the profile.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the profile is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sea-floor depth for the 0-based column `i`.
    pub fn depth(&self, i: usize) -> f64 {
        self.entries[i].1
    }
}

/// A dense residual field of shape `[nx, nz]`, allocated once and populated
/// by the interpolator. Stored row-per-model-column so that the natural
/// iteration order is the column-major file order (depth varies fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualGrid {
    data: Array2<f64>,
}

impl ResidualGrid {
    /// Allocate a zero-filled grid of `nx` columns by `nz` depth samples.
    pub fn new(nx: usize, nz: usize) -> Self {
        ResidualGrid {
            data: Array2::zeros((nx, nz)),
        }
    }

    /// Build a grid from values in output order (depth varies fastest).
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the value count is not `nx * nz`.
    pub fn from_values(nx: usize, nz: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != nx * nz {
            return Err(VelresError::ShapeMismatch {
                expected: nx * nz,
                got: values.len(),
            });
        }
        let data = Array2::from_shape_vec((nx, nz), values)
            .map_err(|e| VelresError::Other(format!("grid shape error: {}", e)))?;
        Ok(ResidualGrid { data })
    }

    /// Number of horizontal columns.
    pub fn nx(&self) -> usize {
        self.data.nrows()
    }

    /// Number of depth samples per column.
    pub fn nz(&self) -> usize {
        self.data.ncols()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at column `i`, depth sample `j` (0-based).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j]]
    }

    /// Set the value at column `i`, depth sample `j` (0-based).
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[[i, j]] = value;
    }

    /// The full depth profile of column `i`.
    pub fn profile(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    /// Overwrite column `dst` with the depth profile of column `src`.
    pub fn copy_profile(&mut self, dst: usize, src: usize) {
        let profile = self.data.row(src).to_owned();
        self.data.row_mut(dst).assign(&profile);
    }

    /// Fill every depth sample of column `i` with `value`.
    pub fn fill_profile(&mut self, i: usize, value: f64) {
        self.data.row_mut(i).fill(value);
    }

    /// Iterate all cells in output order: all nz depths of column 1, then
    /// column 2, and so on.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    /// Borrow the underlying array.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }
}
