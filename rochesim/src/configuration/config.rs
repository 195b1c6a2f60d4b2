//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – run options (viewer, trajectory recording, end time, seed)
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`BodyConfig`]       – the planet's initial state
//! - [`AsteroidConfig`]   – the spiral asteroid cloud
//! - [`OutputConfig`]     – where the append-only sinks write
//! - [`ViewerConfig`]     – camera scale and simulation speed of the window
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   viewer: false                 # true -> bevy window, runs until closed
//!   trajectory_recording: true    # write every position every tick
//!   max_time: 50.0                # simulated end time (required when viewer is false)
//!   seed: 42                      # optional, shuffle RNG seed
//!
//! parameters:
//!   h0: 0.001                     # fixed step size
//!   G: 1.0                        # gravitational constant
//!   collision_passes: 3           # contact relaxation sweeps per tick
//!   output_frames: 200            # ticks between diagnostics samples
//!
//! planet:
//!   x: [0.0, 0.0]
//!   v: [0.0, 0.0]
//!   m: 1000.0
//!   radius: 10.0
//!
//! asteroid:
//!   count: 200
//!   x: [60.0, 0.0]                # spiral origin
//!   v: [0.0, 4.0]                 # shared initial velocity
//!   m: 0.01
//!   radius: 0.5
//!
//! output:
//!   diagnostics: "output/diagnostics.dat"
//!   trajectory: "output/positions.dat"
//!
//! viewer:
//!   scale: 30.0
//!   ticks_per_frame: 10
//! ```
//!
//! `output` and `viewer` may be omitted.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Run options
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub viewer: bool, // open the bevy window
    #[serde(default)]
    pub trajectory_recording: bool, // per-tick positions to output.trajectory
    pub max_time: Option<f64>, // simulated end time, `None` runs until the viewer quits
    pub seed: Option<u64>, // deterministic shuffle order when set
}

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub h0: f64, // time step size
    pub G: f64, // gravitational constant
    pub collision_passes: u32, // contact sweeps per tick
    pub output_frames: u64, // ticks between diagnostics samples
}

/// Configuration for the planet's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 2], // initial position
    pub v: [f64; 2], // initial velocity
    pub m: f64, // mass
    pub radius: f64, // contact radius, also the drawn radius
}

/// The asteroid cloud, laid out on a spiral around `x`
#[derive(Deserialize, Debug, Clone)]
pub struct AsteroidConfig {
    pub count: usize, // number of mass points
    pub x: [f64; 2], // spiral origin
    pub v: [f64; 2], // velocity shared by every point
    pub m: f64, // mass of each point
    pub radius: f64, // radius of each point, also sets the spiral pitch
}

/// Output file locations, relative to the working directory
#[derive(Deserialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_diagnostics_path")]
    pub diagnostics: Option<String>,
    #[serde(default = "default_trajectory_path")]
    pub trajectory: String,
}

fn default_diagnostics_path() -> Option<String> {
    Some("output/diagnostics.dat".to_string())
}

fn default_trajectory_path() -> String {
    "output/positions.dat".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            diagnostics: default_diagnostics_path(),
            trajectory: default_trajectory_path(),
        }
    }
}

/// Window settings, only read when `engine.viewer` is on
#[derive(Deserialize, Debug, Clone)]
pub struct ViewerConfig {
    #[serde(default = "default_scale")]
    pub scale: f32, // world units -> pixels
    #[serde(default = "default_ticks_per_frame")]
    pub ticks_per_frame: u32, // simulation ticks per rendered frame
}

fn default_scale() -> f32 {
    30.0
}

fn default_ticks_per_frame() -> u32 {
    10
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            ticks_per_frame: default_ticks_per_frame(),
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub planet: BodyConfig,
    pub asteroid: AsteroidConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParam(format!("{name} must be finite and > 0, got {value}")))
    }
}

fn finite2(name: &str, value: [f64; 2]) -> Result<()> {
    if value.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(Error::InvalidParam(format!("{name} must be finite, got {value:?}")))
    }
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Reject scenarios that are programming errors rather than physics:
    /// non-positive masses, radii or step size, zero passes or sampling interval,
    /// an empty cloud, or a headless run with no end time.
    pub fn validate(&self) -> Result<()> {
        let p = &self.parameters;
        positive("parameters.h0", p.h0)?;
        if !p.G.is_finite() || p.G < 0.0 {
            return Err(Error::InvalidParam(format!("parameters.G must be finite and >= 0, got {}", p.G)));
        }
        if p.collision_passes == 0 {
            return Err(Error::InvalidParam("parameters.collision_passes must be >= 1".into()));
        }
        if p.output_frames == 0 {
            return Err(Error::InvalidParam("parameters.output_frames must be >= 1".into()));
        }

        positive("planet.m", self.planet.m)?;
        positive("planet.radius", self.planet.radius)?;
        finite2("planet.x", self.planet.x)?;
        finite2("planet.v", self.planet.v)?;

        let a = &self.asteroid;
        if a.count == 0 {
            return Err(Error::InvalidParam("asteroid.count must be >= 1".into()));
        }
        positive("asteroid.m", a.m)?;
        positive("asteroid.radius", a.radius)?;
        finite2("asteroid.x", a.x)?;
        finite2("asteroid.v", a.v)?;

        if let Some(t) = self.engine.max_time {
            positive("engine.max_time", t)?;
        }
        if self.engine.max_time.is_none() && !self.engine.viewer {
            return Err(Error::InvalidParam(
                "engine.max_time is required when engine.viewer is false".into(),
            ));
        }

        if self.engine.viewer {
            if !(self.viewer.scale.is_finite() && self.viewer.scale > 0.0) {
                return Err(Error::InvalidParam("viewer.scale must be finite and > 0".into()));
            }
            if self.viewer.ticks_per_frame == 0 {
                return Err(Error::InvalidParam("viewer.ticks_per_frame must be >= 1".into()));
            }
        }
        Ok(())
    }
}
