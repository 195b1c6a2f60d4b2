pub mod simulation;
pub mod configuration;
pub mod io;
pub mod frontend;
pub mod benchmark;
pub mod error;

pub use error::{Error, Result};

pub use simulation::states::{Body, System, NVec2, PLANET};
pub use simulation::vector::VectorExt;
pub use simulation::params::Parameters;
pub use simulation::engine::RunOptions;
pub use simulation::forces::gravity;
pub use simulation::collision::{collide, collision_pass, resolve_collisions};
pub use simulation::integrator::{gravity_pass, physics_step, shuffle_order};
pub use simulation::spiral::build_spiral;
pub use simulation::diagnostics::{sample, Diagnostics};
pub use simulation::run_loop::{SimulationLoop, LoopState, Termination, Outputs, CancelHandle, RunSummary};
pub use simulation::scenario::Scenario;

pub use configuration::config::{EngineConfig, ParametersConfig, BodyConfig, AsteroidConfig, OutputConfig, ViewerConfig, ScenarioConfig};

pub use io::{DiagnosticsSink, TrajectorySink, Viewer, ViewFrame, BodyTag};

pub use frontend::{viewer2d::run_2d, headless::run_headless};

pub use benchmark::benchmark::bench_tick;
