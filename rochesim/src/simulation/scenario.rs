//! Build fully-initialized simulations from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - run options (`RunOptions`)
//! - numerical parameters (`Parameters`)
//! - system state (`System`: planet + spiral cloud at t = 0)
//! - the RNG seed and output/viewer settings
//!
//! `into_loop` turns it into a ready `SimulationLoop` with file sinks opened.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{OutputConfig, ScenarioConfig, ViewerConfig};
use crate::error::Result;
use crate::io::sinks::{TsvDiagnosticsWriter, TsvTrajectoryWriter};
use crate::simulation::engine::RunOptions;
use crate::simulation::params::Parameters;
use crate::simulation::run_loop::{Outputs, SimulationLoop};
use crate::simulation::spiral::build_spiral;
use crate::simulation::states::{Body, NVec2, System};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub options: RunOptions,
    pub parameters: Parameters,
    pub system: System,
    pub seed: u64,
    pub output: OutputConfig,
    pub viewer: ViewerConfig,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        cfg.validate()?;

        // Planet: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let p = &cfg.planet;
        let planet = Body::new(NVec2::from(p.x), NVec2::from(p.v), p.radius, p.m);

        // Asteroid cloud on the spiral
        let a = &cfg.asteroid;
        let cloud = build_spiral(a.count, a.radius, a.m, NVec2::from(a.x), NVec2::from(a.v));

        // Initial system state: bodies at t = 0
        let system = System::new(planet, cloud);

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            h0: p_cfg.h0,
            G: p_cfg.G,
            collision_passes: p_cfg.collision_passes,
            output_frames: p_cfg.output_frames,
        };

        // Run options (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let options = RunOptions {
            trajectory_recording: e_cfg.trajectory_recording,
            viewer: e_cfg.viewer,
            max_time: e_cfg.max_time,
        };

        // Unseeded runs draw a seed here so the binary can print it for replay
        let seed = e_cfg.seed.unwrap_or_else(|| rand::thread_rng().gen());

        Ok(Self {
            options,
            parameters,
            system,
            seed,
            output: cfg.output,
            viewer: cfg.viewer,
        })
    }

    /// Open the file sinks this scenario asks for.
    pub fn open_outputs(&self) -> Result<Outputs> {
        let mut outputs = Outputs::default();
        if let Some(path) = &self.output.diagnostics {
            outputs.diagnostics = Some(Box::new(TsvDiagnosticsWriter::create(path)?));
        }
        if self.options.trajectory_recording {
            outputs.trajectory = Some(Box::new(TsvTrajectoryWriter::create(&self.output.trajectory)?));
        }
        Ok(outputs)
    }

    /// Build the loop with the configured file sinks.
    pub fn into_loop(self) -> Result<SimulationLoop> {
        let outputs = self.open_outputs()?;
        self.into_loop_with(outputs)
    }

    /// Build the loop with caller-supplied sinks.
    pub fn into_loop_with(self, outputs: Outputs) -> Result<SimulationLoop> {
        let rng = StdRng::seed_from_u64(self.seed);
        SimulationLoop::new(self.system, self.parameters, self.options, rng, outputs)
    }
}
