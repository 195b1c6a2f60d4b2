use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::simulation::collision::resolve_collisions;
use crate::simulation::integrator::{gravity_pass, physics_step};
use crate::simulation::params::Parameters;
use crate::simulation::spiral::build_spiral;
use crate::simulation::states::{Body, NVec2, System};

/// Helper to build a planet plus a spiral cloud of `n` bodies
fn make_system(n: usize) -> System {
    let planet = Body::new(NVec2::zeros(), NVec2::zeros(), 10.0, 1000.0);
    let cloud = build_spiral(n, 0.5, 0.01, NVec2::new(60.0, 0.0), NVec2::new(0.0, 4.0));
    System::new(planet, cloud)
}

fn make_params() -> Parameters {
    Parameters {
        h0: 0.001,
        G: 1.0,
        collision_passes: 3,
        output_frames: 200,
    }
}

/// Time one full tick and its two O(n^2) phases for growing cloud sizes.
/// Prints CSV, paste into a spreadsheet to graph.
pub fn bench_tick() -> Result<()> {
    let ns = [100, 200, 400, 800, 1600];
    let params = make_params();
    let mut rng = StdRng::seed_from_u64(42);

    println!("N,tick_ms,gravity_ms,collision_ms");

    for n in ns {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 400 { 10 } else { 2 };
        let template = make_system(n);

        // Full tick
        let mut sys = template.clone();
        physics_step(&mut sys, &params, &mut rng)?; // warm-up
        let t0 = Instant::now();
        for _ in 0..steps {
            physics_step(&mut sys, &params, &mut rng)?;
        }
        let tick_ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        // Gravity + drift only
        let mut sys = template.clone();
        let t1 = Instant::now();
        for _ in 0..steps {
            gravity_pass(&mut sys, &params)?;
        }
        let gravity_ms = t1.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        // Collision passes only
        let mut sys = template.clone();
        let t2 = Instant::now();
        for _ in 0..steps {
            resolve_collisions(&mut sys, params.collision_passes)?;
        }
        let collision_ms = t2.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6},{:.6},{:.6}", n + 1, tick_ms, gravity_ms, collision_ms);
    }
    Ok(())
}
