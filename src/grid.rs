//! Uniform spatial discretization of the domain.

use std::fmt;
use std::ops::Range;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::Profile;
use crate::error::{WaveError, WaveResult};

/// Number of spatial axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    #[serde(rename = "1d")]
    One,
    #[serde(rename = "2d")]
    Two,
}

impl Dimension {
    pub fn axes(self) -> usize {
        match self {
            Dimension::One => 1,
            Dimension::Two => 2,
        }
    }

    /// Largest Courant number for which the explicit scheme stays bounded.
    ///
    /// 2D assumes equal spacing along both axes.
    pub fn cfl_max(self) -> f64 {
        match self {
            Dimension::One => 1.,
            Dimension::Two => std::f64::consts::FRAC_1_SQRT_2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::One => write!(f, "1D"),
            Dimension::Two => write!(f, "2D"),
        }
    }
}

/// Memory layout of a snapshot: `[[f64; nx]; ny]`, row-major.
///
/// A 1D field is a single row, `ny == 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Shape {
    pub ny: usize,
    pub nx: usize,
}

impl Shape {
    pub fn len(&self) -> usize {
        self.ny * self.nx
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_line(&self) -> bool {
        self.ny == 1
    }

    /// Rows whose points are updated by the stencil.
    pub fn interior_rows(&self) -> Range<usize> {
        if self.is_line() {
            0..1
        } else {
            1..self.ny.saturating_sub(1).max(1)
        }
    }

    /// Columns whose points are updated by the stencil.
    pub fn interior_cols(&self) -> Range<usize> {
        1..self.nx.saturating_sub(1).max(1)
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.nx + col
    }
}

/// Square (or segment) domain `[0, length]^D` sampled at `resolution + 1`
/// points per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    length: f64,
    resolution: usize,
    dx: f64,
    dimension: Dimension,
}

impl Grid {
    pub fn new(length: f64, resolution: usize, dimension: Dimension) -> WaveResult<Grid> {
        if !(length.is_finite() && length > 0.) {
            return Err(WaveError::config("length", length, "must be positive and finite"));
        }
        if resolution == 0 {
            return Err(WaveError::config("resolution", 0., "must be positive"));
        }
        Ok(Grid {
            length,
            resolution,
            dx: length / resolution as f64,
            dimension,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn points_per_axis(&self) -> usize {
        self.resolution + 1
    }

    pub fn shape(&self) -> Shape {
        let n = self.points_per_axis();
        match self.dimension {
            Dimension::One => Shape { ny: 1, nx: n },
            Dimension::Two => Shape { ny: n, nx: n },
        }
    }

    pub fn point_count(&self) -> usize {
        self.points_per_axis().pow(self.dimension.axes() as u32)
    }

    /// Axis samples `0, dx, 2dx, ..., length`.
    pub fn coordinates(&self) -> Array1<f64> {
        let dx = self.dx;
        Array1::from_shape_fn(self.points_per_axis(), |j| j as f64 * dx)
    }

    /// Coordinate mesh `(X, Y)` with `X[[r, c]] = x_c` and `Y[[r, c]] = y_r`.
    pub fn mesh(&self) -> (Array2<f64>, Array2<f64>) {
        let n = self.points_per_axis();
        let dx = self.dx;
        let x = Array2::from_shape_fn((n, n), |(_, c)| c as f64 * dx);
        let y = Array2::from_shape_fn((n, n), |(r, _)| r as f64 * dx);
        (x, y)
    }

    /// Evaluates `profile` at every grid point, in snapshot layout.
    pub fn sample(&self, profile: &Profile) -> Vec<f64> {
        let shape = self.shape();
        let dx = self.dx;
        let mut out = Vec::with_capacity(shape.len());
        for row in 0..shape.ny {
            for col in 0..shape.nx {
                out.push(profile.eval(col as f64 * dx, row as f64 * dx));
            }
        }
        out
    }
}
