//! Edge policies and the per-side lookup table evaluated after each
//! interior update.
//!
//! Every side owns the flat indices of its edge points, of the points one
//! cell inward along the boundary normal, and of the inward points of the
//! opposite side. The table is built once from the grid shape, so applying a
//! rule is a plain loop over precomputed indices.
//!
//! | policy    | `edge[i + 1]`                                        |
//! |-----------|------------------------------------------------------|
//! | Dirichlet | `0`                                                  |
//! | Neumann   | `inner[i + 1] (+ dx * g(dt * i))`                    |
//! | Absorbing | `edge[i] + speed * (inner[i] - edge[i]) * dt / dx`   |
//! | Periodic  | `(inner[i + 1] + opposite_inner[i + 1]) / 2`         |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ndarray::Axis;

use crate::error::WaveError;
use crate::grid::{Dimension, Grid, Shape};

/// A side of the domain.
///
/// Rows run along `y` and columns along `x`: `Top` is row `0`, `Bottom` the
/// last row, `Left` column `0` and `Right` the last column. A 1D domain only
/// has `Left` and `Right`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Left,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Right, Side::Bottom];

    /// Order in which the sides are applied each step.
    ///
    /// In 2D the corner points belong to two sides and keep the value of the
    /// side applied last.
    pub fn evaluation_order(dimension: Dimension) -> &'static [Side] {
        match dimension {
            Dimension::One => &[Side::Left, Side::Right],
            Dimension::Two => &Side::ALL,
        }
    }

    /// Axis of the snapshot array along the boundary normal.
    pub fn axis(self) -> Axis {
        match self {
            Side::Top | Side::Bottom => Axis(0),
            Side::Left | Side::Right => Axis(1),
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    fn slot(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Left => 1,
            Side::Right => 2,
            Side::Bottom => 3,
        }
    }

    /// Flat indices of the line of points `depth` cells inward from this side.
    fn line(self, shape: Shape, depth: usize) -> Vec<usize> {
        let far = matches!(self, Side::Right | Side::Bottom);
        let Axis(normal) = self.axis();
        // extent along the normal, then along the side
        let (across, along) = if normal == 0 {
            (shape.ny, shape.nx)
        } else {
            (shape.nx, shape.ny)
        };
        let k = if far { across - 1 - depth } else { depth };
        (0..along)
            .map(|m| if normal == 0 { shape.index(k, m) } else { shape.index(m, k) })
            .collect()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Top => "top",
            Side::Left => "left",
            Side::Right => "right",
            Side::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Prescribed boundary-normal gradient `g(t)` of a Neumann side.
#[derive(Clone)]
pub struct Forcing(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl Forcing {
    pub fn new<F>(g: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Forcing(Arc::new(g))
    }

    pub fn constant(gradient: f64) -> Self {
        Forcing::new(move |_| gradient)
    }

    #[inline]
    pub fn eval(&self, t: f64) -> f64 {
        (self.0)(t)
    }
}

impl fmt::Debug for Forcing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Forcing(..)")
    }
}

#[derive(Debug, Clone, Default)]
pub enum BoundaryPolicy {
    /// Homogeneous fixed value.
    #[default]
    Dirichlet,
    /// Zero gradient, or the gradient `g(t)` when forced.
    Neumann { forcing: Option<Forcing> },
    /// One-way outgoing wave condition.
    Absorbing,
    /// Edge takes the mean of its own and the opposite side's inward neighbour.
    Periodic,
}

impl BoundaryPolicy {
    pub fn neumann() -> Self {
        BoundaryPolicy::Neumann { forcing: None }
    }

    pub fn neumann_forced(forcing: Forcing) -> Self {
        BoundaryPolicy::Neumann {
            forcing: Some(forcing),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BoundaryPolicy::Dirichlet => "dirichlet",
            BoundaryPolicy::Neumann { .. } => "neumann",
            BoundaryPolicy::Absorbing => "absorbing",
            BoundaryPolicy::Periodic => "periodic",
        }
    }
}

impl FromStr for BoundaryPolicy {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dirichlet" => Ok(BoundaryPolicy::Dirichlet),
            "neumann" => Ok(BoundaryPolicy::neumann()),
            "absorbing" => Ok(BoundaryPolicy::Absorbing),
            "periodic" => Ok(BoundaryPolicy::Periodic),
            _ => Err(WaveError::UnsupportedBoundaryPolicy { tag: s.to_string() }),
        }
    }
}

/// One policy per side. Sides a 1D grid does not have are ignored.
#[derive(Debug, Clone, Default)]
pub struct BoundarySpec {
    policies: [BoundaryPolicy; 4],
}

impl BoundarySpec {
    pub fn uniform(policy: BoundaryPolicy) -> Self {
        BoundarySpec {
            policies: [policy.clone(), policy.clone(), policy.clone(), policy],
        }
    }

    pub fn line(left: BoundaryPolicy, right: BoundaryPolicy) -> Self {
        BoundarySpec::default()
            .with(Side::Left, left)
            .with(Side::Right, right)
    }

    pub fn with(mut self, side: Side, policy: BoundaryPolicy) -> Self {
        self.policies[side.slot()] = policy;
        self
    }

    pub fn policy(&self, side: Side) -> &BoundaryPolicy {
        &self.policies[side.slot()]
    }
}

/// A side's policy resolved against a concrete grid and time step.
#[derive(Debug, Clone)]
pub struct BoundaryRule {
    side: Side,
    policy: BoundaryPolicy,
    edge: Vec<usize>,
    inner: Vec<usize>,
    opposite_inner: Vec<usize>,
    dx: f64,
    dt: f64,
    speed: f64,
}

impl BoundaryRule {
    fn new(side: Side, policy: BoundaryPolicy, grid: &Grid, dt: f64, speed: f64) -> Self {
        let shape = grid.shape();
        BoundaryRule {
            side,
            policy,
            edge: side.line(shape, 0),
            inner: side.line(shape, 1),
            opposite_inner: side.opposite().line(shape, 1),
            dx: grid.dx(),
            dt,
            speed,
        }
    }

    /// The rules of every side of `grid`, in evaluation order.
    pub fn table(spec: &BoundarySpec, grid: &Grid, dt: f64, speed: f64) -> Vec<BoundaryRule> {
        Side::evaluation_order(grid.dimension())
            .iter()
            .map(|&side| BoundaryRule::new(side, spec.policy(side).clone(), grid, dt, speed))
            .collect()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }

    /// Writes this side's edge values of snapshot `step + 1`.
    ///
    /// `current` is snapshot `step`; `next` must already hold the interior of
    /// snapshot `step + 1`.
    pub fn apply(&self, step: usize, current: &[f64], next: &mut [f64]) {
        debug_assert_eq!(current.len(), next.len());
        match self.policy {
            BoundaryPolicy::Dirichlet => {
                for &e in &self.edge {
                    next[e] = 0.;
                }
            }
            BoundaryPolicy::Neumann { ref forcing } => {
                let shift = forcing
                    .as_ref()
                    .map(|g| self.dx * g.eval(self.dt * step as f64));
                for (&e, &n) in self.edge.iter().zip(&self.inner) {
                    next[e] = match shift {
                        Some(s) => next[n] + s,
                        None => next[n],
                    };
                }
            }
            BoundaryPolicy::Absorbing => {
                for (&e, &n) in self.edge.iter().zip(&self.inner) {
                    next[e] =
                        current[e] + self.speed * (current[n] - current[e]) * self.dt / self.dx;
                }
            }
            BoundaryPolicy::Periodic => {
                let pairs = self.inner.iter().zip(&self.opposite_inner);
                for (&e, (&n, &o)) in self.edge.iter().zip(pairs) {
                    next[e] = 0.5 * (next[n] + next[o]);
                }
            }
        }
    }
}
