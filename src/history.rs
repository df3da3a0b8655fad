//! Time series of field snapshots produced by a run.

use ndarray::{ArrayView1, ArrayView2, ArrayViewD, IxDyn};

use crate::grid::{Dimension, Grid};

/// A snapshot chosen for display, with its physical time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub time: f64,
}

/// Every snapshot of a run, stored contiguously as `[[f64; points]; len]`.
///
/// Snapshot `i` is the field at time `i * dt`. The storage is allocated once
/// when the run starts; once `Simulation::run` returns the history is only
/// read.
#[derive(Debug, Clone)]
pub struct FieldHistory {
    data: Vec<f64>,
    len: usize,
    points: usize,
    dt: f64,
    grid: Grid,
}

impl FieldHistory {
    pub(crate) fn zeros(grid: Grid, len: usize, dt: f64) -> Self {
        let points = grid.point_count();
        FieldHistory {
            data: vec![0.; len * points],
            len,
            points,
            dt,
            grid,
        }
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn time(&self, i: usize) -> f64 {
        i as f64 * self.dt
    }

    /// Snapshot `i` in row-major layout.
    pub fn as_slice(&self, i: usize) -> &[f64] {
        assert!(i < self.len, "snapshot {} out of range 0..{}", i, self.len);
        &self.data[i * self.points..(i + 1) * self.points]
    }

    /// Snapshot `i`, shaped `[n]` in 1D and `[n, n]` in 2D.
    pub fn snapshot(&self, i: usize) -> ArrayViewD<'_, f64> {
        let dim = IxDyn(&vec![self.grid.points_per_axis(); self.grid.dimension().axes()]);
        ArrayViewD::from_shape(dim, self.as_slice(i)).expect("snapshot length matches the grid")
    }

    /// Snapshot `i` of a 1D run.
    pub fn line(&self, i: usize) -> ArrayView1<'_, f64> {
        assert_eq!(self.grid.dimension(), Dimension::One);
        ArrayView1::from(self.as_slice(i))
    }

    /// Snapshot `i` of a 2D run, indexed `[[row, col]]` = `[[y, x]]`.
    pub fn plane(&self, i: usize) -> ArrayView2<'_, f64> {
        assert_eq!(self.grid.dimension(), Dimension::Two);
        let n = self.grid.points_per_axis();
        ArrayView2::from_shape((n, n), self.as_slice(i)).expect("snapshot length matches the grid")
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.points.max(1)).take(self.len)
    }

    /// Number of frames shown when playing back at `playback_speed`
    /// snapshots per frame.
    pub fn frame_count(&self, playback_speed: f64) -> usize {
        if !(playback_speed > 0.) || self.len == 0 {
            return 0;
        }
        ((self.len - 1) as f64 / playback_speed).floor() as usize + 1
    }

    /// Maps a display frame to the snapshot it shows.
    ///
    /// Returns `None` past the end of the history or for a non-positive speed.
    pub fn frame(&self, frame_index: usize, playback_speed: f64) -> Option<Frame> {
        if !(playback_speed > 0.) {
            return None;
        }
        let index = (frame_index as f64 * playback_speed).floor() as usize;
        if index >= self.len {
            return None;
        }
        Some(Frame {
            index,
            time: self.time(index),
        })
    }

    pub fn max_abs_at(&self, i: usize) -> f64 {
        self.as_slice(i).iter().fold(0., |m, x| f64::max(m, x.abs()))
    }

    /// Largest magnitude over all snapshots. NaN propagates as infinity.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0., |m, &x| {
            if x.is_nan() {
                f64::INFINITY
            } else {
                f64::max(m, x.abs())
            }
        })
    }

    pub fn sum_at(&self, i: usize) -> f64 {
        self.as_slice(i).iter().sum()
    }

    pub(crate) fn first_mut(&mut self) -> &mut [f64] {
        &mut self.data[..self.points]
    }

    /// Snapshot 0 and a writable snapshot 1.
    pub(crate) fn bootstrap_slices(&mut self) -> (&[f64], &mut [f64]) {
        let p = self.points;
        let (head, tail) = self.data.split_at_mut(p);
        (&*head, &mut tail[..p])
    }

    /// Snapshots `i - 1` and `i`, and a writable snapshot `i + 1`.
    pub(crate) fn step_slices(&mut self, i: usize) -> (&[f64], &[f64], &mut [f64]) {
        debug_assert!(i >= 1 && i + 1 < self.len);
        let p = self.points;
        let (head, tail) = self.data.split_at_mut((i + 1) * p);
        let (prev, cur) = head[(i - 1) * p..].split_at(p);
        (prev, cur, &mut tail[..p])
    }
}
