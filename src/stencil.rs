//! Finite difference kernels on flat snapshot slices.
//!
//! All kernels use the layout described by [`Shape`]: `[[f64; nx]; ny]`,
//! with a 1D field stored as the single row `ny == 1`. Only interior points
//! are written; edge values are left for the boundary rules.

use crate::grid::Shape;

/// Scheme coefficients fixed for the whole run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coefficients {
    /// `c²τ²/h²`, where τ is the time step and h is the space step.
    pub mu: f64,
    /// `γτ`.
    pub damping: f64,
    /// τ.
    pub dt: f64,
}

impl Coefficients {
    pub fn new(speed: f64, gamma: f64, dt: f64, dx: f64) -> Self {
        Coefficients {
            mu: speed.powi(2) * (dt / dx).powi(2),
            damping: gamma * dt,
            dt,
        }
    }
}

/// Second difference at flat index `k`: axis neighbours minus `2D` times the
/// center.
#[inline]
pub fn laplacian(v: &[f64], shape: Shape, k: usize) -> f64 {
    if shape.is_line() {
        v[k - 1] + v[k + 1] - 2. * v[k]
    } else {
        let nx = shape.nx;
        v[k - 1] + v[k + 1] + v[k - nx] + v[k + nx] - 4. * v[k]
    }
}

/// Computes the interior of snapshot 1 from snapshot 0 by a second order
/// Taylor expansion in time.
///
/// - `u`: value at step `0`
/// - `velocity`: initial time derivative, zero when `None`
/// - `w`: computed value at step `1`
pub fn bootstrap_step(
    u: &[f64],
    velocity: Option<&[f64]>,
    w: &mut [f64],
    shape: Shape,
    c: Coefficients,
) {
    let n = shape.len();
    assert_eq!(u.len(), n);
    assert_eq!(w.len(), n);
    if let Some(v0) = velocity {
        assert_eq!(v0.len(), n);
    }

    for i in shape.interior_rows() {
        for j in shape.interior_cols() {
            let k = shape.index(i, j);
            let mut x = u[k] + 0.5 * c.mu * laplacian(u, shape, k);
            if let Some(v0) = velocity {
                // u_tt = c²∇²u - γu_t contributes -γτ²/2 to the velocity term
                x += c.dt * v0[k] * (1. - 0.5 * c.damping);
            }
            w[k] = x;
        }
    }
}

fn leapfrog_sub(
    u: &[f64],
    v: &[f64],
    w: &mut [f64],
    shape: Shape,
    rows: (usize, usize),
    c: Coefficients,
) {
    let (rs, re) = rows;
    let nx = shape.nx;
    debug_assert!(rs < re);
    debug_assert!(re <= shape.ny);
    debug_assert_eq!(u.len(), shape.len());
    debug_assert_eq!(v.len(), shape.len());
    debug_assert_eq!(w.len(), (re - rs) * nx);

    let interior = shape.interior_rows();
    let w_offset = rs * nx;
    let g = c.damping;

    for i in rs.max(interior.start)..re.min(interior.end) {
        for j in shape.interior_cols() {
            let k = shape.index(i, j);
            w[k - w_offset] =
                (4. * v[k] - u[k] * (2. - g) + 2. * c.mu * laplacian(v, shape, k)) / (2. + g);
        }
    }
}

/// Performs one step of the damped leapfrog scheme on the interior.
///
/// The discretization is the standard central 2nd order difference in both
/// space and time, with the damping term averaged between steps `n - 1` and
/// `n + 1`. With `γ = 0` this is `w = 2v - u + μ∇²v`.
///
/// - `u`: value at step `n - 1`
/// - `v`: value at step `n`
/// - `w`: computed value at step `n + 1`
pub fn leapfrog_step(u: &[f64], v: &[f64], w: &mut [f64], shape: Shape, c: Coefficients) {
    let n = shape.len();
    assert_eq!(u.len(), n);
    assert_eq!(v.len(), n);
    assert_eq!(w.len(), n);

    leapfrog_sub(u, v, w, shape, (0, shape.ny), c);
}

/// Same as `leapfrog_step`, splitting the rows between rayon workers.
///
/// Produces bitwise identical results: no point of `w` depends on another
/// point of `w`.
#[cfg(feature = "parallel")]
pub fn leapfrog_step_parallel(
    u: &[f64],
    v: &[f64],
    w: &mut [f64],
    shape: Shape,
    c: Coefficients,
) {
    let n = shape.len();
    assert_eq!(u.len(), n);
    assert_eq!(v.len(), n);
    assert_eq!(w.len(), n);

    fn inner(
        u: &[f64],
        v: &[f64],
        w: &mut [f64],
        shape: Shape,
        rows: (usize, usize),
        c: Coefficients,
    ) {
        let elems_per_thread = 200 * 1024;
        let (row_start, row_end) = rows;
        if row_end - row_start > 1 && w.len() > elems_per_thread {
            let mid = (row_start + row_end) / 2;
            let (top, bottom) = w.split_at_mut((mid - row_start) * shape.nx);
            rayon::join(
                || inner(u, v, top, shape, (row_start, mid), c),
                || inner(u, v, bottom, shape, (mid, row_end), c),
            );
        } else {
            leapfrog_sub(u, v, w, shape, rows, c);
        }
    }

    inner(u, v, w, shape, (0, shape.ny), c);
}
