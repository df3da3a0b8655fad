//! Time step selection from a Courant number.

use crate::error::{WaveError, WaveResult};
use crate::grid::Dimension;

/// Derives `dt = cfl * dx / speed`, refusing Courant numbers above the
/// bound of the dimension instead of clamping them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StabilityPolicy {
    dimension: Dimension,
}

impl StabilityPolicy {
    pub fn new(dimension: Dimension) -> Self {
        StabilityPolicy { dimension }
    }

    pub fn cfl_max(&self) -> f64 {
        self.dimension.cfl_max()
    }

    /// Checked step size. `Err(WaveError::Unstable)` if `cfl > cfl_max`.
    pub fn time_step(&self, dx: f64, speed: f64, cfl: f64) -> WaveResult<f64> {
        let dt = self.time_step_unchecked(dx, speed, cfl)?;
        // tolerates rounding in a caller-computed `sqrt(2) / 2`
        let max = self.cfl_max();
        if cfl > max * (1. + 4. * f64::EPSILON) {
            return Err(WaveError::Unstable {
                cfl,
                max,
                dimension: self.dimension,
            });
        }
        Ok(dt)
    }

    /// Step size without the stability bound. Inputs must still be positive.
    pub fn time_step_unchecked(&self, dx: f64, speed: f64, cfl: f64) -> WaveResult<f64> {
        if !(dx.is_finite() && dx > 0.) {
            return Err(WaveError::config("dx", dx, "must be positive and finite"));
        }
        if !(speed.is_finite() && speed > 0.) {
            return Err(WaveError::config("speed", speed, "must be positive and finite"));
        }
        if !(cfl.is_finite() && cfl > 0.) {
            return Err(WaveError::config("cfl", cfl, "must be positive and finite"));
        }
        Ok(cfl * dx / speed)
    }
}
