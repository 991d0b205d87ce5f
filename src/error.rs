// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur during grid setup, input parsing, or interpolation.
#[derive(Debug)]
pub enum VelresError {
    /// Sample count (nz or nx) is not a positive integer.
    InvalidSampleCount {
        /// The parameter name ("nz" or "nx").
        name: &'static str,
        /// The value provided.
        value: f64,
    },
    /// Sampling interval (dz or dx) is zero or not finite.
    InvalidSampleInterval {
        /// The parameter name ("dz" or "dx").
        name: &'static str,
        /// The value provided.
        value: f64,
    },
    /// cdp_step is not a positive multiple of dx.
    InvalidCdpStep {
        /// The cdp_step value provided.
        step: f64,
        /// The horizontal sampling interval.
        dx: f64,
    },
    /// cdp_min exceeds cdp_max.
    InvalidCdpRange {
        /// The first analyzed CDP.
        cdp_min: f64,
        /// The last analyzed CDP.
        cdp_max: f64,
    },
    /// cdp_max does not land on the analyzed-column stride.
    UnalignedCdpRange {
        /// The first analyzed CDP.
        cdp_min: f64,
        /// The last analyzed CDP.
        cdp_max: f64,
        /// The analyzed-column spacing in CDP units.
        cdp_step: f64,
    },
    /// A CDP value maps to a column outside the model grid.
    ColumnOffGrid {
        /// The offending CDP value.
        cdp: f64,
        /// The 1-based column it mapped to.
        column: i64,
        /// Number of columns in the model.
        nx: usize,
    },
    /// Grid parameter file does not contain the expected number of values.
    ParameterCount {
        /// Number of values expected.
        expected: usize,
        /// Number of values found.
        got: usize,
    },
    /// A text input line could not be parsed.
    Parse {
        /// 1-based line number of the offending line.
        line: usize,
        /// Explanation of what was expected.
        message: String,
    },
    /// Element count of an input does not match the model dimensions.
    ShapeMismatch {
        /// Number of elements expected.
        expected: usize,
        /// Number of elements found.
        got: usize,
    },
    /// Excluded-column repair found no non-excluded column to borrow from.
    InterpolationGap {
        /// The 1-based column that could not be repaired.
        column: usize,
    },
    /// I/O error occurred.
    IoError(std::io::Error),
    /// Other error with a descriptive message.
    Other(String),
}

impl fmt::Display for VelresError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VelresError::InvalidSampleCount { name, value } => {
                write!(
                    f,
                    "invalid sample count: {} = {} (must be a positive integer)",
                    name, value
                )
            }
            VelresError::InvalidSampleInterval { name, value } => {
                write!(
                    f,
                    "invalid sampling interval: {} = {} (must be nonzero and finite)",
                    name, value
                )
            }
            VelresError::InvalidCdpStep { step, dx } => {
                write!(
                    f,
                    "invalid cdp_step: {} (must be a positive multiple of dx = {})",
                    step, dx
                )
            }
            VelresError::InvalidCdpRange { cdp_min, cdp_max } => {
                write!(
                    f,
                    "invalid CDP range: cdp_min {} exceeds cdp_max {}",
                    cdp_min, cdp_max
                )
            }
            VelresError::UnalignedCdpRange {
                cdp_min,
                cdp_max,
                cdp_step,
            } => {
                write!(
                    f,
                    "CDP range {}..{} is not a whole number of steps of {}",
                    cdp_min, cdp_max, cdp_step
                )
            }
            VelresError::ColumnOffGrid { cdp, column, nx } => {
                write!(
                    f,
                    "CDP {} maps to column {} outside the grid (1..={})",
                    cdp, column, nx
                )
            }
            VelresError::ParameterCount { expected, got } => {
                write!(
                    f,
                    "grid parameter file has {} values, expected {}",
                    got, expected
                )
            }
            VelresError::Parse { line, message } => {
                write!(f, "parse error at line {}: {}", line, message)
            }
            VelresError::ShapeMismatch { expected, got } => {
                write!(
                    f,
                    "shape mismatch: expected {} values, got {}",
                    expected, got
                )
            }
            VelresError::InterpolationGap { column } => {
                write!(
                    f,
                    "no non-excluded column available to repair column {}",
                    column
                )
            }
            VelresError::IoError(e) => write!(f, "I/O error: {}", e),
            VelresError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for VelresError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VelresError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VelresError {
    fn from(e: std::io::Error) -> Self {
        VelresError::IoError(e)
    }
}

/// Convenience type alias for Results with VelresError.
pub type Result<T> = std::result::Result<T, VelresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_sample_count() {
        let e = VelresError::InvalidSampleCount {
            name: "nz",
            value: -3.0,
        };
        assert_eq!(
            e.to_string(),
            "invalid sample count: nz = -3 (must be a positive integer)"
        );
    }

    #[test]
    fn display_invalid_sample_interval() {
        let e = VelresError::InvalidSampleInterval {
            name: "dx",
            value: 0.0,
        };
        assert_eq!(
            e.to_string(),
            "invalid sampling interval: dx = 0 (must be nonzero and finite)"
        );
    }

    #[test]
    fn display_invalid_cdp_step() {
        let e = VelresError::InvalidCdpStep {
            step: 150.0,
            dx: 100.0,
        };
        assert_eq!(
            e.to_string(),
            "invalid cdp_step: 150 (must be a positive multiple of dx = 100)"
        );
    }

    #[test]
    fn display_column_off_grid() {
        let e = VelresError::ColumnOffGrid {
            cdp: 90000.0,
            column: 901,
            nx: 701,
        };
        assert_eq!(
            e.to_string(),
            "CDP 90000 maps to column 901 outside the grid (1..=701)"
        );
    }

    #[test]
    fn display_interpolation_gap() {
        let e = VelresError::InterpolationGap { column: 1 };
        assert_eq!(
            e.to_string(),
            "no non-excluded column available to repair column 1"
        );
    }

    #[test]
    fn display_parse() {
        let e = VelresError::Parse {
            line: 12,
            message: "expected 4 fields".to_string(),
        };
        assert_eq!(e.to_string(), "parse error at line 12: expected 4 fields");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = VelresError::IoError(io_err);
        assert!(e.to_string().contains("file not found"));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let e: VelresError = io_err.into();
        assert!(matches!(e, VelresError::IoError(_)));
    }
}
