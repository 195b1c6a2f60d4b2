//! Windowless runner: drives the loop from a bevy app with only the minimal
//! plugins plus logging, until the simulated end time is reached.

use bevy::app::AppExit;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use log::error;

use crate::simulation::run_loop::{LoopState, SimulationLoop};

/// Ticks per app update. Keeps schedule overhead small next to the O(n^2) physics.
const TICKS_PER_UPDATE: u32 = 500;

pub fn run_headless(sim: SimulationLoop) -> AppExit {
    println!("run_headless: simulating {} bodies without a window", sim.system().len());

    App::new()
        .insert_resource(sim)
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_systems(Update, headless_step_system)
        .run()
}

fn headless_step_system(mut sim: ResMut<SimulationLoop>, mut exit: EventWriter<AppExit>) {
    for _ in 0..TICKS_PER_UPDATE {
        match sim.tick(None) {
            Ok(LoopState::Terminated(_)) => {
                exit.send(AppExit::Success);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!("simulation stopped: {e}");
                exit.send(AppExit::error());
                return;
            }
        }
    }
}
