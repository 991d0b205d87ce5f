// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use ndarray::Array2;

use crate::core::{ColumnPicks, GridGeometry, GridParams, Pick, PickSet, ResidualGrid, WaterBottom};
use crate::error::{Result, VelresError};

/// Number of values in a grid parameter file.
const NUM_PARAMS: usize = 9;

/// Load and validate a grid parameter file.
///
/// The file carries 9 newline-separated numeric values in the order
/// `nz, dz, fz, nx, dx, fx, cdp_min, cdp_max, cdp_step`.
pub fn read_grid_params(path: &Path) -> Result<GridGeometry> {
    let text = std::fs::read_to_string(path)?;
    let mut values = Vec::with_capacity(NUM_PARAMS);

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut tokens = raw.split_whitespace();
        let Some(token) = tokens.next() else {
            continue;
        };
        if tokens.next().is_some() {
            return Err(VelresError::Parse {
                line,
                message: "expected a single numeric value".to_string(),
            });
        }
        values.push(parse_numeric(token, line)?);
    }

    if values.len() != NUM_PARAMS {
        return Err(VelresError::ParameterCount {
            expected: NUM_PARAMS,
            got: values.len(),
        });
    }

    let params = GridParams {
        nz: integral_count(values[0], "nz")?,
        dz: values[1],
        fz: values[2],
        nx: integral_count(values[3], "nx")?,
        dx: values[4],
        fx: values[5],
        cdp_min: values[6],
        cdp_max: values[7],
        cdp_step: values[8],
    };
    GridGeometry::new(params)
}

/// Read a pick stream: repeating groups of a count line followed by that
/// many `cdp depth value lambda` lines, until end of stream.
///
/// Each group is mapped to its column through the group's first CDP value.
/// Groups must list picks in nondecreasing depth order; a column appearing
/// in more than one group keeps the last group.
pub fn read_picks<R: BufRead>(reader: R, geometry: &GridGeometry) -> Result<PickSet> {
    let mut set = PickSet::new();
    let mut lines = reader.lines().enumerate();
    let mut last_line = 0usize;

    loop {
        // Group header: the pick count.
        let Some((idx, raw)) = next_data_line(&mut lines, &mut last_line)? else {
            break;
        };
        let line = idx + 1;
        let count = parse_pick_count(&raw, line)?;

        let mut picks: Vec<Pick> = Vec::with_capacity(count);
        let mut cdp = 0.0;
        for _ in 0..count {
            let Some((idx, raw)) = next_data_line(&mut lines, &mut last_line)? else {
                return Err(VelresError::Parse {
                    line: last_line + 1,
                    message: "unexpected end of stream inside pick group".to_string(),
                });
            };
            let line = idx + 1;
            let fields: Vec<&str> = raw.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(VelresError::Parse {
                    line,
                    message: format!("expected 4 fields (cdp depth value lambda), got {}", fields.len()),
                });
            }
            let row_cdp = parse_numeric(fields[0], line)?;
            let pick = Pick {
                depth: parse_numeric(fields[1], line)?,
                value: parse_numeric(fields[2], line)?,
                lambda: parse_numeric(fields[3], line)?,
            };
            if let Some(prev) = picks.last() {
                if pick.depth < prev.depth {
                    return Err(VelresError::Parse {
                        line,
                        message: format!(
                            "picks out of depth order ({} after {})",
                            pick.depth, prev.depth
                        ),
                    });
                }
            } else {
                cdp = row_cdp;
            }
            picks.push(pick);
        }

        let column = geometry.column_of_cdp(cdp)?;
        set.insert(column, ColumnPicks { cdp, picks });
    }

    Ok(set)
}

/// Read a pick file (see [`read_picks`]).
pub fn read_picks_file(path: &Path, geometry: &GridGeometry) -> Result<PickSet> {
    let file = File::open(path)?;
    read_picks(BufReader::new(file), geometry)
}

/// Read a water-bottom profile: one `x depth` pair per line.
pub fn read_water_bottom(path: &Path) -> Result<WaterBottom> {
    let text = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 2 {
            return Err(VelresError::Parse {
                line,
                message: format!("expected 2 fields (x depth), got {}", fields.len()),
            });
        }
        let x = parse_numeric(fields[0], line)?;
        let depth = parse_numeric(fields[1], line)?;
        entries.push((x, depth));
    }

    Ok(WaterBottom::new(entries))
}

/// Write a residual grid as ASCII, one value per line, all nz depths of
/// column 1 first, then column 2, and so on.
pub fn write_grid_ascii(grid: &ResidualGrid, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    for value in grid.values() {
        writeln!(w, "{:.6}", value)?;
    }
    w.flush()?;
    Ok(())
}

/// Read an ASCII grid written by [`write_grid_ascii`] (or any one-value-per-
/// line file in the same traversal order) into an `[nx, nz]` grid.
pub fn read_grid_ascii(path: &Path, nx: usize, nz: usize) -> Result<ResidualGrid> {
    let text = std::fs::read_to_string(path)?;
    let mut values = Vec::with_capacity(nx * nz);

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut tokens = raw.split_whitespace();
        let Some(token) = tokens.next() else {
            continue;
        };
        if tokens.next().is_some() {
            return Err(VelresError::Parse {
                line,
                message: "expected a single value per line".to_string(),
            });
        }
        values.push(parse_numeric(token, line)?);
    }

    ResidualGrid::from_values(nx, nz, values)
}

/// Load a velocity model from a vfile: float32 little-endian binary in
/// column-major order (depth varies fastest), the storage convention of the
/// surrounding model-building tools.
pub fn read_vfile(path: &Path, nx: usize, nz: usize) -> Result<Array2<f32>> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    if bytes.len() % 4 != 0 {
        return Err(VelresError::Other(format!(
            "vfile size {} is not a whole number of float32 values",
            bytes.len()
        )));
    }
    let count = bytes.len() / 4;
    if count != nx * nz {
        return Err(VelresError::ShapeMismatch {
            expected: nx * nz,
            got: count,
        });
    }

    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Array2::from_shape_vec((nx, nz), values)
        .map_err(|e| VelresError::Other(format!("vfile shape error: {}", e)))
}

/// Write a velocity model as a vfile (see [`read_vfile`]).
pub fn write_vfile(model: &Array2<f32>, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    for &value in model.iter() {
        w.write_all(&value.to_le_bytes())?;
    }
    w.flush()?;
    Ok(())
}

/// Write a residual grid in vfile form, narrowing each value to float32.
pub fn write_grid_vfile(grid: &ResidualGrid, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    for value in grid.values() {
        w.write_all(&(value as f32).to_le_bytes())?;
    }
    w.flush()?;
    Ok(())
}

fn parse_numeric(token: &str, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| VelresError::Parse {
        line,
        message: format!("'{}' is not a number", token),
    })
}

fn integral_count(value: f64, name: &'static str) -> Result<usize> {
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
        return Err(VelresError::InvalidSampleCount { name, value });
    }
    Ok(value as usize)
}

fn parse_pick_count(raw: &str, line: usize) -> Result<usize> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    if fields.len() != 1 {
        return Err(VelresError::Parse {
            line,
            message: "expected a pick count on its own line".to_string(),
        });
    }
    let count = fields[0].parse::<usize>().map_err(|_| VelresError::Parse {
        line,
        message: format!("'{}' is not a valid pick count", fields[0]),
    })?;
    if count == 0 {
        return Err(VelresError::Parse {
            line,
            message: "pick count must be at least 1".to_string(),
        });
    }
    Ok(count)
}

/// Advance to the next non-blank line, tracking the last line number seen.
fn next_data_line<I>(lines: &mut I, last_line: &mut usize) -> Result<Option<(usize, String)>>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    for (idx, line) in lines {
        let line = line?;
        *last_line = idx + 1;
        if !line.trim().is_empty() {
            return Ok(Some((idx, line)));
        }
    }
    Ok(None)
}
