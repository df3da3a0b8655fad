//! Run configuration: physical and numerical parameters, initial
//! conditions, and a `serde`-deserializable scenario description.
//!
//! A scenario in YAML:
//!
//! ```yaml
//! parameters:
//!   length: 1.0
//!   resolution: 100
//!   speed: 1.0
//!   gamma: 0.1
//!   cfl: 1.0
//!   num_steps: 2000
//!   dimension: 1d
//! initial:
//!   kind: sine
//!   modes:
//!     - { amplitude: 0.5, wavenumber: 2.0 }
//!     - { amplitude: 0.5, wavenumber: 3.0 }
//! boundaries:
//!   left: dirichlet
//!   right: { policy: neumann, gradient: 0.5 }
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryPolicy, BoundarySpec, Forcing, Side};
use crate::error::{WaveError, WaveResult};
use crate::grid::Dimension;
use crate::integrator::Simulation;

/// A scalar function of position, `u(x, y)`. 1D profiles ignore `y`.
#[derive(Clone)]
pub struct Profile(Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>);

impl Profile {
    pub fn line<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Profile(Arc::new(move |x, _| f(x)))
    }

    pub fn plane<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Profile(Arc::new(f))
    }

    pub fn zero() -> Self {
        Profile::plane(|_, _| 0.)
    }

    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        (self.0)(x, y)
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Profile(..)")
    }
}

/// One term `amplitude * sin(wavenumber * π * x / length)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SineMode {
    pub amplitude: f64,
    pub wavenumber: f64,
}

/// Built-in initial conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Preset {
    /// Sum of sine modes; in 2D each mode is the product of the `x` and `y`
    /// sines.
    Sine { modes: Vec<SineMode> },
    /// `amplitude * exp(-|r - center|² / width²)`, centered in the domain by
    /// default.
    Gaussian {
        #[serde(default = "Preset::unit")]
        amplitude: f64,
        width: f64,
        #[serde(default)]
        center: Option<[f64; 2]>,
    },
}

impl Preset {
    fn unit() -> f64 {
        1.
    }

    /// The profile on a domain of side `length`.
    pub fn profile(&self, length: f64, dimension: Dimension) -> Profile {
        match *self {
            Preset::Sine { ref modes } => {
                let modes = modes.clone();
                let two_d = dimension == Dimension::Two;
                Profile::plane(move |x, y| {
                    modes
                        .iter()
                        .map(|m| {
                            let k = m.wavenumber * PI / length;
                            let s = m.amplitude * (k * x).sin();
                            if two_d {
                                s * (k * y).sin()
                            } else {
                                s
                            }
                        })
                        .sum()
                })
            }
            Preset::Gaussian {
                amplitude,
                width,
                center,
            } => {
                let [cx, cy] = center.unwrap_or([length / 2., length / 2.]);
                let two_d = dimension == Dimension::Two;
                Profile::plane(move |x, y| {
                    let mut r2 = (x - cx).powi(2);
                    if two_d {
                        r2 += (y - cy).powi(2);
                    }
                    amplitude * (-r2 / width.powi(2)).exp()
                })
            }
        }
    }

    fn validate(&self) -> WaveResult<()> {
        if let Preset::Gaussian { width, .. } = *self {
            if !(width.is_finite() && width > 0.) {
                return Err(WaveError::config("width", width, "must be positive and finite"));
            }
        }
        Ok(())
    }
}

/// Physical and numerical parameters of a run.
///
/// When deserialized, a missing `cfl` takes the stability bound of the
/// chosen `dimension`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParametersFile")]
pub struct SimulationParameters {
    pub length: f64,
    /// Cells per axis; there are `resolution + 1` points per axis.
    pub resolution: usize,
    pub speed: f64,
    pub gamma: f64,
    /// Courant number `speed * dt / dx`.
    pub cfl: f64,
    pub num_steps: usize,
    pub dimension: Dimension,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            length: 1.,
            resolution: 100,
            speed: 1.,
            gamma: 0.,
            cfl: Dimension::One.cfl_max(),
            num_steps: 2000,
            dimension: Dimension::One,
        }
    }
}

/// `SimulationParameters` as written in a scenario file.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ParametersFile {
    length: f64,
    resolution: usize,
    speed: f64,
    gamma: f64,
    cfl: Option<f64>,
    num_steps: usize,
    dimension: Dimension,
}

impl Default for ParametersFile {
    fn default() -> Self {
        let p = SimulationParameters::default();
        ParametersFile {
            length: p.length,
            resolution: p.resolution,
            speed: p.speed,
            gamma: p.gamma,
            cfl: None,
            num_steps: p.num_steps,
            dimension: p.dimension,
        }
    }
}

impl From<ParametersFile> for SimulationParameters {
    fn from(file: ParametersFile) -> Self {
        SimulationParameters {
            length: file.length,
            resolution: file.resolution,
            speed: file.speed,
            gamma: file.gamma,
            cfl: file.cfl.unwrap_or_else(|| file.dimension.cfl_max()),
            num_steps: file.num_steps,
            dimension: file.dimension,
        }
    }
}

impl SimulationParameters {
    /// Checks every parameter except the stability bound on `cfl`.
    pub fn validate(&self) -> WaveResult<()> {
        if !(self.length.is_finite() && self.length > 0.) {
            return Err(WaveError::config("length", self.length, "must be positive and finite"));
        }
        if self.resolution == 0 {
            return Err(WaveError::config("resolution", 0., "must be positive"));
        }
        if !(self.speed.is_finite() && self.speed > 0.) {
            return Err(WaveError::config("speed", self.speed, "must be positive and finite"));
        }
        if !(self.gamma.is_finite() && self.gamma >= 0.) {
            return Err(WaveError::config("gamma", self.gamma, "must be non-negative and finite"));
        }
        if !(self.cfl.is_finite() && self.cfl > 0.) {
            return Err(WaveError::config("cfl", self.cfl, "must be positive and finite"));
        }
        if self.num_steps == 0 {
            return Err(WaveError::config("num_steps", 0., "must be positive"));
        }
        Ok(())
    }
}

/// A boundary entry: either a bare policy tag, or a tag with a constant
/// Neumann gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum BoundaryEntry {
    Tag(String),
    Detailed {
        policy: String,
        #[serde(default)]
        gradient: Option<f64>,
    },
}

impl BoundaryEntry {
    pub fn resolve(&self) -> WaveResult<BoundaryPolicy> {
        match *self {
            BoundaryEntry::Tag(ref tag) => tag.parse(),
            BoundaryEntry::Detailed {
                ref policy,
                gradient,
            } => {
                let policy: BoundaryPolicy = policy.parse()?;
                match (policy, gradient) {
                    (policy, None) => Ok(policy),
                    (BoundaryPolicy::Neumann { .. }, Some(g)) if g.is_finite() => {
                        Ok(BoundaryPolicy::neumann_forced(Forcing::constant(g)))
                    }
                    (BoundaryPolicy::Neumann { .. }, Some(g)) => {
                        Err(WaveError::config("gradient", g, "must be finite"))
                    }
                    (_, Some(g)) => Err(WaveError::config(
                        "gradient",
                        g,
                        "only a neumann boundary takes a gradient",
                    )),
                }
            }
        }
    }
}

/// Per-side boundary entries. Missing sides default to Dirichlet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundariesConfig {
    pub top: Option<BoundaryEntry>,
    pub left: Option<BoundaryEntry>,
    pub right: Option<BoundaryEntry>,
    pub bottom: Option<BoundaryEntry>,
}

impl BoundariesConfig {
    /// Typed policies per side. A side the grid of `dimension` does not have
    /// is an error.
    pub fn resolve(&self, dimension: Dimension) -> WaveResult<BoundarySpec> {
        let entries = [
            (Side::Top, &self.top),
            (Side::Left, &self.left),
            (Side::Right, &self.right),
            (Side::Bottom, &self.bottom),
        ];
        let mut spec = BoundarySpec::default();
        for (side, entry) in entries {
            if let Some(entry) = entry {
                if !Side::evaluation_order(dimension).contains(&side) {
                    return Err(WaveError::UnsupportedSide { side, dimension });
                }
                spec = spec.with(side, entry.resolve()?);
            }
        }
        Ok(spec)
    }
}

/// Top-level scenario loaded from a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub parameters: SimulationParameters,
    pub initial: Preset,
    /// Initial time derivative; zero when absent.
    #[serde(default)]
    pub velocity: Option<Preset>,
    #[serde(default)]
    pub boundaries: BoundariesConfig,
}

impl ScenarioConfig {
    /// Resolves tags and presets and validates the result.
    pub fn build(&self) -> WaveResult<Simulation> {
        let p = &self.parameters;
        self.initial.validate()?;
        let mut builder = Simulation::builder(p.clone())
            .initial(self.initial.profile(p.length, p.dimension))
            .boundaries(self.boundaries.resolve(p.dimension)?);
        if let Some(ref velocity) = self.velocity {
            velocity.validate()?;
            builder = builder.velocity(velocity.profile(p.length, p.dimension));
        }
        builder.build()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_parameters_are_valid() {
        assert_eq!(SimulationParameters::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_each_bad_parameter() {
        let base = SimulationParameters::default();
        let cases: Vec<(&str, SimulationParameters)> = vec![
            ("length", SimulationParameters { length: 0., ..base.clone() }),
            ("resolution", SimulationParameters { resolution: 0, ..base.clone() }),
            ("speed", SimulationParameters { speed: -1., ..base.clone() }),
            ("gamma", SimulationParameters { gamma: -0.1, ..base.clone() }),
            ("cfl", SimulationParameters { cfl: 0., ..base.clone() }),
            ("num_steps", SimulationParameters { num_steps: 0, ..base.clone() }),
        ];
        for (name, params) in cases {
            match params.validate() {
                Err(WaveError::Configuration { field, .. }) => assert_eq!(field, name),
                other => panic!("{}: unexpected {:?}", name, other),
            }
        }
    }

    #[test]
    fn sine_preset_matches_closed_form() {
        let preset = Preset::Sine {
            modes: vec![
                SineMode { amplitude: 0.5, wavenumber: 2. },
                SineMode { amplitude: 0.5, wavenumber: 3. },
            ],
        };
        let u = preset.profile(1., Dimension::One);
        let x: f64 = 0.3;
        let expected = 0.5 * (2. * PI * x).sin() + 0.5 * (3. * PI * x).sin();
        assert!((u.eval(x, 0.7) - expected).abs() < 1e-15);

        let u = preset.profile(2., Dimension::Two);
        let expected = 0.5 * (PI * 0.3).sin() * (PI * 0.7).sin()
            + 0.5 * (1.5 * PI * 0.3).sin() * (1.5 * PI * 0.7).sin();
        assert!((u.eval(0.3, 0.7) - expected).abs() < 1e-15);
    }

    #[test]
    fn gaussian_preset_is_centered() {
        let preset = Preset::Gaussian {
            amplitude: 2.,
            width: 0.1,
            center: None,
        };
        let u = preset.profile(1., Dimension::Two);
        assert_eq!(u.eval(0.5, 0.5), 2.);
        assert!((u.eval(0.6, 0.5) - 2. * (-1f64).exp()).abs() < 1e-15);
        assert_eq!(u.eval(0.6, 0.5), u.eval(0.5, 0.4));
    }

    #[test]
    fn boundary_entries_resolve() {
        let entry = BoundaryEntry::Tag("periodic".into());
        assert!(matches!(entry.resolve(), Ok(BoundaryPolicy::Periodic)));

        let entry = BoundaryEntry::Detailed {
            policy: "neumann".into(),
            gradient: Some(0.5),
        };
        match entry.resolve() {
            Ok(BoundaryPolicy::Neumann { forcing: Some(g) }) => assert_eq!(g.eval(3.), 0.5),
            other => panic!("unexpected {:?}", other),
        }

        let entry = BoundaryEntry::Detailed {
            policy: "absorbing".into(),
            gradient: Some(0.5),
        };
        assert!(matches!(
            entry.resolve(),
            Err(WaveError::Configuration { field: "gradient", .. })
        ));

        let entry = BoundaryEntry::Tag("sticky".into());
        assert!(matches!(
            entry.resolve(),
            Err(WaveError::UnsupportedBoundaryPolicy { .. })
        ));
    }

    #[test]
    fn missing_sides_default_to_dirichlet() {
        let config = BoundariesConfig {
            left: Some(BoundaryEntry::Tag("absorbing".into())),
            ..BoundariesConfig::default()
        };
        let spec = config.resolve(Dimension::One).unwrap();
        assert!(matches!(spec.policy(Side::Left), BoundaryPolicy::Absorbing));
        assert!(matches!(spec.policy(Side::Right), BoundaryPolicy::Dirichlet));
    }

    #[test]
    fn line_has_no_top_or_bottom() {
        let config = BoundariesConfig {
            bottom: Some(BoundaryEntry::Tag("periodic".into())),
            ..BoundariesConfig::default()
        };
        assert_eq!(
            config.resolve(Dimension::One).unwrap_err(),
            WaveError::UnsupportedSide {
                side: Side::Bottom,
                dimension: Dimension::One,
            }
        );
        let spec = config.resolve(Dimension::Two).unwrap();
        assert!(matches!(spec.policy(Side::Bottom), BoundaryPolicy::Periodic));
    }

    #[test]
    fn missing_cfl_follows_the_dimension() {
        let p = SimulationParameters::from(ParametersFile {
            dimension: Dimension::Two,
            ..ParametersFile::default()
        });
        assert_eq!(p.cfl, std::f64::consts::FRAC_1_SQRT_2);
        assert_eq!(p.validate(), Ok(()));

        let p = SimulationParameters::from(ParametersFile {
            cfl: Some(0.5),
            dimension: Dimension::Two,
            ..ParametersFile::default()
        });
        assert_eq!(p.cfl, 0.5);
        assert_eq!(
            SimulationParameters::from(ParametersFile::default()),
            SimulationParameters::default()
        );
    }
}
