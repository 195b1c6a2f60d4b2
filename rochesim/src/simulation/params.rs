//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size `h0`,
//! - gravitational constant `G`,
//! - number of collision relaxation passes per tick,
//! - diagnostics sampling interval in ticks

use crate::error::{Error, Result};

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub h0: f64, // step size
    pub G: f64, // gravitational constant
    pub collision_passes: u32, // O(n^2) contact sweeps per tick
    pub output_frames: u64, // ticks between diagnostics samples
}

impl Parameters {
    /// Reject parameter sets that cannot drive a run.
    pub fn validate(&self) -> Result<()> {
        if !self.h0.is_finite() || self.h0 <= 0.0 {
            return Err(Error::InvalidParam(format!("h0 must be finite and > 0, got {}", self.h0)));
        }
        if !self.G.is_finite() || self.G < 0.0 {
            return Err(Error::InvalidParam(format!("G must be finite and >= 0, got {}", self.G)));
        }
        if self.collision_passes == 0 {
            return Err(Error::InvalidParam("collision_passes must be >= 1".into()));
        }
        if self.output_frames == 0 {
            return Err(Error::InvalidParam("output_frames must be >= 1".into()));
        }
        Ok(())
    }
}
