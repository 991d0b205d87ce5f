// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::{
    is_excluded_value, GridGeometry, PickSet, ResidualGrid, WaterBottom, EXCLUDED,
};
use crate::error::{Result, VelresError};
use crate::kernel::{lateral_blend, profile_value};

/// How columns outside the analyzed range are filled.
///
/// The land and marine processing flows produce observably different grids
/// at the edges: land jobs zero everything outside the analyzed range, while
/// marine jobs hold the boundary column's profile and then blank everything
/// above the sea floor.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Zero-fill outside the analyzed range.
    Standard,
    /// Edge-hold outside the analyzed range, then zero at and above the
    /// sea floor given by the water-bottom profile.
    Marine(WaterBottom),
}

/// Converts sparse per-column picks into a dense residual field matching the
/// model sampling.
///
/// The phases run strictly in order: vertical interpolation of analyzed
/// columns, boundary repair of excluded end columns, left-to-right repair of
/// excluded interior columns, horizontal fill of every remaining column, and
/// (marine only) water-bottom blanking. The later repair phases read columns
/// resolved by the earlier ones, so the order is load-bearing.
#[derive(Debug)]
pub struct Interpolator {
    geometry: GridGeometry,
    mode: Mode,
}

impl Interpolator {
    /// Create an interpolator for the given geometry in standard mode.
    pub fn new(geometry: GridGeometry) -> Self {
        Interpolator {
            geometry,
            mode: Mode::Standard,
        }
    }

    /// Select the fill mode (builder method).
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if a marine water-bottom profile does not
    /// cover exactly one entry per model column.
    pub fn with_mode(mut self, mode: Mode) -> Result<Self> {
        if let Mode::Marine(ref wb) = mode {
            if wb.len() != self.geometry.nx() {
                return Err(VelresError::ShapeMismatch {
                    expected: self.geometry.nx(),
                    got: wb.len(),
                });
            }
        }
        self.mode = mode;
        Ok(self)
    }

    /// The validated geometry this interpolator was built for.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Run all phases and return the fully populated grid.
    ///
    /// Analyzed columns without a pick group are treated as excluded and
    /// repaired from their neighbors like any other excluded column.
    ///
    /// # Errors
    /// Returns `InterpolationGap` if an excluded column cannot be repaired
    /// because no non-excluded analyzed column exists in the scan direction.
    pub fn interpolate(&self, picks: &PickSet) -> Result<ResidualGrid> {
        let mut grid = ResidualGrid::new(self.geometry.nx(), self.geometry.nz());
        self.fill_analyzed(picks, &mut grid);
        self.repair_boundaries(&mut grid)?;
        self.repair_interior(&mut grid)?;
        self.fill_remaining(&mut grid);
        if let Mode::Marine(ref wb) = self.mode {
            self.mask_water_bottom(wb, &mut grid);
        }
        Ok(grid)
    }

    /// Phase 1: vertical interpolation of each analyzed column's picks onto
    /// the depth sampling. Excluded or absent columns get the sentinel.
    fn fill_analyzed(&self, picks: &PickSet, grid: &mut ResidualGrid) {
        let geom = &self.geometry;
        for i in geom.analyzed_columns() {
            match picks.get(i) {
                Some(group) if !group.is_excluded() => {
                    for j in 0..geom.nz() {
                        grid.set(i, j, profile_value(&group.picks, geom.depth_at(j)));
                    }
                }
                _ => grid.fill_profile(i, EXCLUDED),
            }
        }
    }

    /// Phase 2: if either end of the analyzed range is excluded, copy the
    /// nearest non-excluded analyzed profile over it (rightward scan for the
    /// first column, leftward for the last).
    fn repair_boundaries(&self, grid: &mut ResidualGrid) -> Result<()> {
        let geom = &self.geometry;
        let columns: Vec<usize> = geom.analyzed_columns().collect();

        if is_excluded_value(grid.get(geom.nmin(), 0)) {
            let src = columns
                .iter()
                .copied()
                .find(|&n| !is_excluded_value(grid.get(n, 0)))
                .ok_or(VelresError::InterpolationGap {
                    column: geom.nmin() + 1,
                })?;
            grid.copy_profile(geom.nmin(), src);
        }

        if is_excluded_value(grid.get(geom.nmax(), 0)) {
            let src = columns
                .iter()
                .rev()
                .copied()
                .find(|&n| !is_excluded_value(grid.get(n, 0)))
                .ok_or(VelresError::InterpolationGap {
                    column: geom.nmax() + 1,
                })?;
            grid.copy_profile(geom.nmax(), src);
        }

        Ok(())
    }

    /// Phase 3: scan the interior analyzed columns left to right; each
    /// excluded one is blended in x between its already-resolved left
    /// neighbor and the next non-excluded analyzed column to its right.
    fn repair_interior(&self, grid: &mut ResidualGrid) -> Result<()> {
        let geom = &self.geometry;
        let columns: Vec<usize> = geom.analyzed_columns().collect();

        for idx in 1..columns.len().saturating_sub(1) {
            let i = columns[idx];
            if !is_excluded_value(grid.get(i, 0)) {
                continue;
            }
            // Phase 2 guarantees the last analyzed column is resolved, so a
            // miss here means the boundary repair was skipped.
            let valid = columns[idx + 1..]
                .iter()
                .copied()
                .find(|&n| !is_excluded_value(grid.get(n, 0)))
                .ok_or(VelresError::InterpolationGap { column: i + 1 })?;
            let left = i - geom.nstep();

            let x_left = geom.x_at(left);
            let x_valid = geom.x_at(valid);
            let x = geom.x_at(i);
            for j in 0..geom.nz() {
                let value =
                    lateral_blend(x_left, grid.get(left, j), x_valid, grid.get(valid, j), x);
                grid.set(i, j, value);
            }
        }

        Ok(())
    }

    /// Phase 4: resolve every column outside the analyzed stride. Columns
    /// beyond the analyzed range are zeroed (standard) or held at the
    /// boundary profile (marine); columns between analyzed neighbors are
    /// blended in x from the bracketing pair.
    fn fill_remaining(&self, grid: &mut ResidualGrid) {
        let geom = &self.geometry;
        let (nmin, nmax, nstep) = (geom.nmin(), geom.nmax(), geom.nstep());
        let edge_hold = matches!(self.mode, Mode::Marine(_));

        for i in 0..geom.nx() {
            if i < nmin || i > nmax {
                if edge_hold {
                    grid.copy_profile(i, if i < nmin { nmin } else { nmax });
                } else {
                    grid.fill_profile(i, 0.0);
                }
            } else if (i - nmin) % nstep != 0 {
                let bracket = nmin + ((i - nmin) / nstep) * nstep;
                let right = bracket + nstep;

                let x_left = geom.x_at(bracket);
                let x_right = geom.x_at(right);
                let x = geom.x_at(i);
                for j in 0..geom.nz() {
                    let value = lateral_blend(
                        x_left,
                        grid.get(bracket, j),
                        x_right,
                        grid.get(right, j),
                        x,
                    );
                    grid.set(i, j, value);
                }
            }
        }
    }

    /// Phase 5 (marine): zero every sample at or above the sea floor.
    fn mask_water_bottom(&self, wb: &WaterBottom, grid: &mut ResidualGrid) {
        let geom = &self.geometry;
        for i in 0..geom.nx() {
            let floor = wb.depth(i);
            for j in 0..geom.nz() {
                if geom.depth_at(j) <= floor {
                    grid.set(i, j, 0.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnPicks, GridParams, Pick};

    fn geometry(nx: usize, cdp_max: f64) -> GridGeometry {
        GridGeometry::new(GridParams {
            nz: 3,
            dz: 10.0,
            fz: 0.0,
            nx,
            dx: 100.0,
            fx: 0.0,
            cdp_min: 0.0,
            cdp_max,
            cdp_step: 200.0,
        })
        .unwrap()
    }

    fn group(cdp: f64, picks: &[(f64, f64)]) -> ColumnPicks {
        ColumnPicks {
            cdp,
            picks: picks
                .iter()
                .map(|&(depth, value)| Pick {
                    depth,
                    value,
                    lambda: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn missing_group_is_repaired_like_excluded() {
        // Analyzed columns 0, 2, 4; column 2 has no group at all.
        let geom = geometry(5, 400.0);
        let mut picks = PickSet::new();
        picks.insert(0, group(0.0, &[(0.0, 4.0)]));
        picks.insert(4, group(400.0, &[(0.0, 8.0)]));

        let grid = Interpolator::new(geom).interpolate(&picks).unwrap();
        for j in 0..3 {
            assert!((grid.get(2, j) - 6.0).abs() < 1e-9);
        }
    }

    #[test]
    fn all_excluded_surfaces_gap() {
        let geom = geometry(5, 400.0);
        let mut picks = PickSet::new();
        for i in [0usize, 2, 4] {
            picks.insert(i, group(geom.x_at(i), &[(0.0, 999.0)]));
        }
        let err = Interpolator::new(geom).interpolate(&picks).unwrap_err();
        assert!(matches!(err, VelresError::InterpolationGap { column: 1 }));
    }

    #[test]
    fn excluded_first_column_copies_nearest_right() {
        let geom = geometry(5, 400.0);
        let mut picks = PickSet::new();
        picks.insert(0, group(0.0, &[(0.0, 999.0)]));
        picks.insert(2, group(200.0, &[(0.0, 999.0)]));
        picks.insert(4, group(400.0, &[(0.0, 7.0)]));

        let grid = Interpolator::new(geom).interpolate(&picks).unwrap();
        for j in 0..3 {
            assert_eq!(grid.get(0, j), 7.0);
            // Interior column then blends between two identical profiles.
            assert!((grid.get(2, j) - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn excluded_last_column_copies_nearest_left() {
        let geom = geometry(5, 400.0);
        let mut picks = PickSet::new();
        picks.insert(0, group(0.0, &[(0.0, 3.0)]));
        picks.insert(2, group(200.0, &[(0.0, 5.0)]));
        picks.insert(4, group(400.0, &[(0.0, 999.0)]));

        let grid = Interpolator::new(geom).interpolate(&picks).unwrap();
        for j in 0..3 {
            assert_eq!(grid.get(4, j), 5.0);
        }
    }

    #[test]
    fn chained_interior_repair_resolves_left_to_right() {
        // Analyzed columns 0, 2, 4, 6, 8; columns 2 and 4 both excluded.
        let geom = geometry(9, 800.0);
        let mut picks = PickSet::new();
        picks.insert(0, group(0.0, &[(0.0, 0.0)]));
        picks.insert(2, group(200.0, &[(0.0, 999.0)]));
        picks.insert(4, group(400.0, &[(0.0, 999.0)]));
        picks.insert(6, group(600.0, &[(0.0, 6.0)]));
        picks.insert(8, group(800.0, &[(0.0, 8.0)]));

        let grid = Interpolator::new(geom).interpolate(&picks).unwrap();
        // Column 2 blends 0 (at x=0) with 6 (at x=600) evaluated at x=200.
        assert!((grid.get(2, 0) - 2.0).abs() < 1e-9);
        // Column 4 then blends the resolved column 2 with column 6.
        assert!((grid.get(4, 0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn marine_requires_full_water_bottom() {
        let geom = geometry(5, 400.0);
        let wb = WaterBottom::new(vec![(0.0, 5.0); 3]);
        let err = Interpolator::new(geom)
            .with_mode(Mode::Marine(wb))
            .unwrap_err();
        assert!(matches!(
            err,
            VelresError::ShapeMismatch {
                expected: 5,
                got: 3
            }
        ));
    }

    #[test]
    fn standard_mode_zeroes_outside_range() {
        // Analyzed columns 2 and 4 within a 7-column model.
        let geom = GridGeometry::new(GridParams {
            nz: 3,
            dz: 10.0,
            fz: 0.0,
            nx: 7,
            dx: 100.0,
            fx: 0.0,
            cdp_min: 200.0,
            cdp_max: 400.0,
            cdp_step: 200.0,
        })
        .unwrap();
        let mut picks = PickSet::new();
        picks.insert(2, group(200.0, &[(0.0, 5.0)]));
        picks.insert(4, group(400.0, &[(0.0, 9.0)]));

        let grid = Interpolator::new(geom).interpolate(&picks).unwrap();
        for i in [0usize, 1, 5, 6] {
            for j in 0..3 {
                assert_eq!(grid.get(i, j), 0.0, "column {} depth {}", i, j);
            }
        }
        for j in 0..3 {
            assert_eq!(grid.get(2, j), 5.0);
            assert!((grid.get(3, j) - 7.0).abs() < 1e-9);
            assert_eq!(grid.get(4, j), 9.0);
        }
    }
}
