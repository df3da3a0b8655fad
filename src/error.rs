//! Error type shared by configuration, stability and boundary parsing.

use thiserror::Error;

use crate::boundary::Side;
use crate::grid::Dimension;

pub type WaveResult<T> = Result<T, WaveError>;

/// Everything that can go wrong before the first step is taken.
///
/// Stepping itself cannot fail: once a `Simulation` is built, the recurrence
/// is defined for any pair of prior snapshots.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveError {
    /// A parameter is outside its admissible range.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    Configuration {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The Courant number exceeds the stability bound of the dimension.
    ///
    /// Running anyway produces unbounded amplitude growth.
    #[error("Courant number {cfl} exceeds the stability bound {max} of a {dimension} grid")]
    Unstable {
        cfl: f64,
        max: f64,
        dimension: Dimension,
    },

    /// A boundary policy tag that names none of the known policies.
    #[error("unsupported boundary policy `{tag}` (expected dirichlet, neumann, absorbing or periodic)")]
    UnsupportedBoundaryPolicy { tag: String },

    /// A boundary entry for a side the grid does not have.
    #[error("a {dimension} grid has no {side} side")]
    UnsupportedSide { side: Side, dimension: Dimension },
}

impl WaveError {
    pub(crate) fn config(field: &'static str, value: f64, reason: &'static str) -> Self {
        WaveError::Configuration {
            field,
            value,
            reason,
        }
    }
}
