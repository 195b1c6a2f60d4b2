//! The fixed-timestep driver.
//!
//! `SimulationLoop` owns the body arena for the whole run and moves through
//! `Initializing -> Running -> Terminated`. Each `tick` first polls the
//! cancellation token (end time reached, or an external quit request), then
//! runs the physics step, samples diagnostics every `output_frames` ticks and
//! forwards the tick's state to whichever collaborators are attached.
//!
//! Frontends call `tick` from their own frame loop; `run` is the plain
//! synchronous loop for library callers and tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::Resource;
use log::{debug, error, info, warn};
use rand::rngs::StdRng;

use super::diagnostics::{sample, Diagnostics};
use super::engine::RunOptions;
use super::integrator::physics_step;
use super::params::Parameters;
use super::states::System;
use crate::error::Result;
use crate::io::sinks::{DiagnosticsSink, TrajectorySink};
use crate::io::viewer::{ViewFrame, Viewer};

pub type DiagnosticsOutput = Box<dyn DiagnosticsSink + Send + Sync>;
pub type TrajectoryOutput = Box<dyn TrajectorySink + Send + Sync>;

/// Sinks fed by the loop. Either may be absent.
#[derive(Default)]
pub struct Outputs {
    pub diagnostics: Option<DiagnosticsOutput>,
    pub trajectory: Option<TrajectoryOutput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    EndTimeReached,
    QuitRequested,
    /// The physics step returned an error.
    Fault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Terminated(Termination),
}

impl LoopState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, LoopState::Terminated(_))
    }
}

/// Shared flag for asking a running loop to stop. Cloneable and thread-safe.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Satisfied by an external request or by the simulated clock passing `deadline`.
#[derive(Debug)]
struct CancelToken {
    handle: CancelHandle,
    deadline: Option<f64>,
}

impl CancelToken {
    fn poll(&self, t: f64) -> Option<Termination> {
        if self.handle.is_cancelled() {
            return Some(Termination::QuitRequested);
        }
        match self.deadline {
            Some(end) if t >= end => Some(Termination::EndTimeReached),
            _ => None,
        }
    }
}

/// Outcome of `SimulationLoop::run`.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub ticks: u64,
    pub t: f64,
    pub termination: Termination,
    pub last_sample: Option<Diagnostics>,
}

#[derive(Resource)]
pub struct SimulationLoop {
    system: System,
    params: Parameters,
    options: RunOptions,
    rng: StdRng,
    outputs: Outputs,
    token: CancelToken,
    state: LoopState,
    ticks: u64,
    start_t: f64,
    last_sample: Option<Diagnostics>,
    sink_failures: u64,
}

impl SimulationLoop {
    pub fn new(system: System, params: Parameters, options: RunOptions, rng: StdRng, outputs: Outputs) -> Result<Self> {
        params.validate()?;
        options.validate()?;
        system.check_finite()?;

        let token = CancelToken {
            handle: CancelHandle::default(),
            deadline: options.max_time,
        };
        let start_t = system.t;

        Ok(Self {
            system,
            params,
            options,
            rng,
            outputs,
            token,
            state: LoopState::Initializing,
            ticks: 0,
            start_t,
            last_sample: None,
            sink_failures: 0,
        })
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_sample(&self) -> Option<Diagnostics> {
        self.last_sample
    }

    /// Number of sink writes that failed so far.
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.token.handle.clone()
    }

    /// Simulated time derived from the tick count, free of accumulated rounding.
    fn elapsed(&self) -> f64 {
        self.start_t + self.ticks as f64 * self.params.h0
    }

    /// Snapshot for the viewer.
    pub fn frame(&self) -> ViewFrame<'_> {
        ViewFrame {
            t: self.system.t,
            bodies: &self.system.bodies,
            focus: self.system.view_target().pos,
        }
    }

    /// Advance one tick, or finish if the cancellation token fired.
    pub fn tick(&mut self, viewer: Option<&mut dyn Viewer>) -> Result<LoopState> {
        if self.state.is_terminated() {
            return Ok(self.state);
        }

        if let Some(reason) = self.token.poll(self.elapsed()) {
            self.finish(reason);
            return Ok(self.state);
        }

        if self.state == LoopState::Initializing {
            info!(
                "simulation running: {} bodies, dt = {}, {} collision passes",
                self.system.len(),
                self.params.h0,
                self.params.collision_passes
            );
            self.state = LoopState::Running;
        }

        if let Err(e) = physics_step(&mut self.system, &self.params, &mut self.rng) {
            error!("physics step failed at t = {}: {e}", self.system.t);
            self.finish(Termination::Fault);
            return Err(e);
        }
        self.ticks += 1;

        if self.ticks % self.params.output_frames == 0 {
            self.sample_diagnostics()?;
        }

        if self.options.trajectory_recording {
            self.record_trajectory();
        }

        if let Some(viewer) = viewer {
            viewer.present(&self.frame());
            if viewer.quit_requested() {
                debug!("viewer requested quit at t = {}", self.system.t);
                self.token.handle.cancel();
            }
        }

        Ok(self.state)
    }

    /// Tick until the loop terminates.
    pub fn run(&mut self, mut viewer: Option<&mut dyn Viewer>) -> Result<RunSummary> {
        loop {
            if let LoopState::Terminated(termination) = self.tick(viewer.as_mut().map(|v| &mut **v as &mut dyn Viewer))? {
                return Ok(RunSummary {
                    ticks: self.ticks,
                    t: self.system.t,
                    termination,
                    last_sample: self.last_sample,
                });
            }
        }
    }

    fn sample_diagnostics(&mut self) -> Result<()> {
        let diagnostics = match sample(&self.system, self.params.G) {
            Ok(d) => d,
            Err(e) => {
                error!("diagnostics failed at t = {}: {e}", self.system.t);
                self.finish(Termination::Fault);
                return Err(e);
            }
        };
        info!("{diagnostics}");

        if let Some(sink) = self.outputs.diagnostics.as_mut() {
            if let Err(e) = sink.record(&diagnostics) {
                warn!("diagnostics sink write failed: {e}");
                self.sink_failures += 1;
            }
        }
        self.last_sample = Some(diagnostics);
        Ok(())
    }

    fn record_trajectory(&mut self) {
        if let Some(sink) = self.outputs.trajectory.as_mut() {
            if let Err(e) = sink.record(self.system.t, &self.system.bodies) {
                warn!("trajectory sink write failed: {e}");
                self.sink_failures += 1;
            }
        }
    }

    fn finish(&mut self, reason: Termination) {
        if let Some(sink) = self.outputs.diagnostics.as_mut() {
            if let Err(e) = sink.flush() {
                warn!("diagnostics sink flush failed: {e}");
                self.sink_failures += 1;
            }
        }
        if let Some(sink) = self.outputs.trajectory.as_mut() {
            if let Err(e) = sink.flush() {
                warn!("trajectory sink flush failed: {e}");
                self.sink_failures += 1;
            }
        }
        info!("simulation terminated ({reason:?}) after {} ticks at t = {}", self.ticks, self.system.t);
        self.state = LoopState::Terminated(reason);
    }
}
