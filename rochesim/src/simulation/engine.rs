//! High-level runtime options
//!
//! Selects which collaborators a run feeds and how it ends. The loop branches
//! on these at runtime; nothing here is fixed at build time.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub trajectory_recording: bool, // write every body position every tick
    pub viewer: bool, // interactive window, runs until the user quits
    pub max_time: Option<f64>, // simulated end time
}

impl RunOptions {
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.max_time {
            if !t.is_finite() || t <= 0.0 {
                return Err(Error::InvalidParam(format!("max_time must be finite and > 0, got {t}")));
            }
        }
        if self.max_time.is_none() && !self.viewer {
            return Err(Error::InvalidParam(
                "headless runs need max_time, otherwise nothing ends them".into(),
            ));
        }
        Ok(())
    }
}
