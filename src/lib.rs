//! Finite difference method for the damped scalar wave equation
//!
//! ```text
//! u_tt + γ u_t = c² ∇²u
//! ```
//!
//! on a segment or a square, with Dirichlet, Neumann, absorbing or periodic
//! data on each side.
//!
//! The scheme is the explicit leapfrog recurrence, second order in both space
//! and time, started by a Taylor step. The time step is fixed by the Courant
//! number `c τ / h`, which must not exceed `1` in 1D and `1/√2` in 2D.
//!
//! ```
//! use fdm_wave::{BoundaryPolicy, BoundarySpec, Profile, Simulation, SimulationParameters};
//!
//! let params = SimulationParameters {
//!     resolution: 50,
//!     num_steps: 100,
//!     ..SimulationParameters::default()
//! };
//! let history = Simulation::builder(params)
//!     .initial(Profile::line(|x| (std::f64::consts::PI * x).sin()))
//!     .boundaries(BoundarySpec::uniform(BoundaryPolicy::Dirichlet))
//!     .build()
//!     .unwrap()
//!     .run();
//!
//! assert_eq!(history.len(), 100);
//! assert!(history.max_abs() <= 1. + 1e-9);
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod grid;
pub mod history;
pub mod integrator;
pub mod stability;
pub mod stencil;

pub use boundary::{BoundaryPolicy, BoundaryRule, BoundarySpec, Forcing, Side};
pub use config::{
    BoundariesConfig, BoundaryEntry, Preset, Profile, ScenarioConfig, SimulationParameters,
    SineMode,
};
pub use error::{WaveError, WaveResult};
pub use grid::{Dimension, Grid, Shape};
pub use history::{FieldHistory, Frame};
pub use integrator::{Simulation, SimulationBuilder};
pub use stability::StabilityPolicy;
