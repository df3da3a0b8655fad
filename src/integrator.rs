//! The time stepping driver.
//!
//! A [`Simulation`] is built once from validated parameters. Running it
//! samples the initial condition into snapshot 0, computes snapshot 1 with
//! the Taylor bootstrap, then advances the leapfrog recurrence, applying the
//! boundary rules after each interior update.

use log::{debug, info, trace, warn};

use crate::boundary::{BoundaryPolicy, BoundaryRule, BoundarySpec, Side};
use crate::config::{Profile, SimulationParameters};
use crate::error::{WaveError, WaveResult};
use crate::grid::Grid;
use crate::history::FieldHistory;
use crate::stability::StabilityPolicy;
use crate::stencil::{self, Coefficients};

/// Builder for [`Simulation`]. Nothing is validated until [`build`].
///
/// [`build`]: SimulationBuilder::build
#[derive(Debug)]
pub struct SimulationBuilder {
    params: SimulationParameters,
    initial: Option<Profile>,
    velocity: Option<Profile>,
    boundaries: BoundarySpec,
    allow_unstable: bool,
}

impl SimulationBuilder {
    /// Initial displacement `u0`. Defaults to zero.
    pub fn initial(mut self, profile: Profile) -> Self {
        self.initial = Some(profile);
        self
    }

    /// Initial velocity `∂u/∂t` at `t = 0`. Defaults to zero.
    pub fn velocity(mut self, profile: Profile) -> Self {
        self.velocity = Some(profile);
        self
    }

    pub fn boundaries(mut self, spec: BoundarySpec) -> Self {
        self.boundaries = spec;
        self
    }

    pub fn boundary(mut self, side: Side, policy: BoundaryPolicy) -> Self {
        self.boundaries = self.boundaries.with(side, policy);
        self
    }

    /// Accept a Courant number above the stability bound.
    ///
    /// The run will blow up; this exists to reproduce that.
    pub fn allow_unstable(mut self) -> Self {
        self.allow_unstable = true;
        self
    }

    pub fn build(self) -> WaveResult<Simulation> {
        let p = self.params;
        p.validate()?;
        let grid = Grid::new(p.length, p.resolution, p.dimension)?;

        let policy = StabilityPolicy::new(p.dimension);
        let dt = match policy.time_step(grid.dx(), p.speed, p.cfl) {
            Ok(dt) => dt,
            Err(WaveError::Unstable { cfl, max, .. }) if self.allow_unstable => {
                warn!(
                    "Courant number {} exceeds the {} bound {}, the run is unstable",
                    cfl, p.dimension, max
                );
                policy.time_step_unchecked(grid.dx(), p.speed, p.cfl)?
            }
            Err(e) => return Err(e),
        };

        let initial = self.initial.clone().unwrap_or_else(Profile::zero);
        let initial = sample_finite(&grid, &initial, "initial")?;
        let velocity = match self.velocity {
            Some(ref profile) => Some(sample_finite(&grid, profile, "velocity")?),
            None => None,
        };

        let rules = BoundaryRule::table(&self.boundaries, &grid, dt, p.speed);
        for rule in &rules {
            debug!("{} boundary: {}", rule.side(), rule.policy().tag());
        }

        Ok(Simulation {
            coefficients: Coefficients::new(p.speed, p.gamma, dt, grid.dx()),
            grid,
            params: p,
            dt,
            rules,
            initial,
            velocity,
        })
    }
}

fn sample_finite(grid: &Grid, profile: &Profile, field: &'static str) -> WaveResult<Vec<f64>> {
    let values = grid.sample(profile);
    match values.iter().find(|x| !x.is_finite()) {
        Some(&bad) => Err(WaveError::config(field, bad, "must be finite at every grid point")),
        None => Ok(values),
    }
}

/// A validated run: grid, time step, boundary table and sampled initial data.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    params: SimulationParameters,
    dt: f64,
    coefficients: Coefficients,
    rules: Vec<BoundaryRule>,
    initial: Vec<f64>,
    velocity: Option<Vec<f64>>,
}

impl Simulation {
    pub fn builder(params: SimulationParameters) -> SimulationBuilder {
        SimulationBuilder {
            params,
            initial: None,
            velocity: None,
            boundaries: BoundarySpec::default(),
            allow_unstable: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn num_steps(&self) -> usize {
        self.params.num_steps
    }

    /// Boundary rules in evaluation order.
    pub fn rules(&self) -> &[BoundaryRule] {
        &self.rules
    }

    pub fn run(&self) -> FieldHistory {
        self.run_with(|_, _| {})
    }

    /// Runs all steps, handing each snapshot to `observer` once it is final.
    pub fn run_with<F>(&self, mut observer: F) -> FieldHistory
    where
        F: FnMut(usize, &[f64]),
    {
        let n = self.params.num_steps;
        let shape = self.grid.shape();
        info!(
            "running {} wave simulation: {} points, {} steps, dt = {:.4e}",
            self.grid.dimension(),
            shape.len(),
            n,
            self.dt
        );

        let mut history = FieldHistory::zeros(self.grid.clone(), n, self.dt);
        history.first_mut().copy_from_slice(&self.initial);
        observer(0, history.as_slice(0));
        if n < 2 {
            return history;
        }

        {
            let (u0, u1) = history.bootstrap_slices();
            stencil::bootstrap_step(u0, self.velocity.as_deref(), u1, shape, self.coefficients);
        }
        debug!("bootstrap step done");
        observer(1, history.as_slice(1));

        for i in 1..n - 1 {
            let (prev, cur, next) = history.step_slices(i);
            self.advance(prev, cur, next);
            for rule in &self.rules {
                rule.apply(i, cur, next);
            }
            trace!("step {} of {}", i + 1, n - 1);
            observer(i + 1, next);
        }

        info!("finished {} steps, t = {:.4}", n - 1, history.time(n - 1));
        history
    }

    #[cfg(not(feature = "parallel"))]
    fn advance(&self, prev: &[f64], cur: &[f64], next: &mut [f64]) {
        stencil::leapfrog_step(prev, cur, next, self.grid.shape(), self.coefficients);
    }

    #[cfg(feature = "parallel")]
    fn advance(&self, prev: &[f64], cur: &[f64], next: &mut [f64]) {
        stencil::leapfrog_step_parallel(prev, cur, next, self.grid.shape(), self.coefficients);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::Dimension;

    fn params(resolution: usize, num_steps: usize) -> SimulationParameters {
        SimulationParameters {
            length: 1.,
            resolution,
            speed: 1.,
            gamma: 0.,
            cfl: 1.,
            num_steps,
            dimension: Dimension::One,
        }
    }

    #[test]
    fn rejects_unstable_courant_number() {
        let p = SimulationParameters {
            cfl: 1.2,
            ..params(10, 10)
        };
        assert!(matches!(
            Simulation::builder(p.clone()).build(),
            Err(WaveError::Unstable { .. })
        ));
        let sim = Simulation::builder(p).allow_unstable().build().unwrap();
        assert!((sim.dt() - 0.12).abs() < 1e-15);
    }

    #[test]
    fn rejects_non_finite_initial_condition() {
        let result = Simulation::builder(params(4, 3))
            .initial(Profile::line(|x| 1. / (x - 0.5)))
            .build();
        assert!(matches!(
            result,
            Err(WaveError::Configuration { field: "initial", .. })
        ));
    }

    #[test]
    fn short_runs() {
        let sim = Simulation::builder(params(4, 1))
            .initial(Profile::line(|x| x))
            .build()
            .unwrap();
        let h = sim.run();
        assert_eq!(h.len(), 1);
        assert_eq!(h.as_slice(0), &[0., 0.25, 0.5, 0.75, 1.]);

        let sim = Simulation::builder(params(4, 2))
            .initial(Profile::line(|x| x))
            .build()
            .unwrap();
        let h = sim.run();
        // linear data has no curvature; bootstrap edges stay zero
        assert_eq!(h.as_slice(1), &[0., 0.25, 0.5, 0.75, 0.]);
    }

    #[test]
    fn observer_sees_every_snapshot_in_order() {
        let sim = Simulation::builder(params(8, 6))
            .initial(Profile::line(|x| (std::f64::consts::PI * x).sin()))
            .build()
            .unwrap();
        let mut seen = Vec::new();
        let h = sim.run_with(|i, snapshot| seen.push((i, snapshot.to_vec())));
        assert_eq!(seen.len(), 6);
        for (i, snapshot) in seen {
            assert_eq!(snapshot.as_slice(), h.as_slice(i));
        }
    }

    #[test]
    fn initial_velocity_moves_the_field() {
        let sim = Simulation::builder(params(10, 2))
            .velocity(Profile::line(|_| 1.))
            .build()
            .unwrap();
        let h = sim.run();
        assert_eq!(h.as_slice(0), &[0.; 11][..]);
        assert!((h.as_slice(1)[5] - sim.dt()).abs() < 1e-15);
    }

    #[test]
    fn builder_sides_override_uniform_boundaries() {
        let sim = Simulation::builder(params(4, 3))
            .boundaries(BoundarySpec::uniform(BoundaryPolicy::Periodic))
            .boundary(Side::Right, BoundaryPolicy::Absorbing)
            .build()
            .unwrap();
        let tags: Vec<_> = sim.rules().iter().map(|r| r.policy().tag()).collect();
        assert_eq!(tags, vec!["periodic", "absorbing"]);
    }
}
