//! Periodic consistency measurements of the running system.
//!
//! Momentum should stay roughly constant. Energy of the cloud relative to the
//! planet drifts under explicit Euler steps, which is expected rather than a fault.

use std::fmt;

use super::forces::potential_energy;
use super::states::{NVec2, System, PLANET};
use crate::error::Result;

/// One diagnostics sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub t: f64, // simulated time at the end of the sampled tick
    pub planet_to_centroid: f64, // |x_planet - mean(x_asteroid)|
    pub avg_distance: f64, // mean distance over distinct asteroid pairs
    pub momentum: NVec2, // sum of m v over every body, planet included
    pub energy: f64, // kinetic + potential (w.r.t. the planet) of the asteroids
}

impl Diagnostics {
    #[inline]
    pub fn momentum_magnitude(&self) -> f64 {
        self.momentum.norm()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t: {:.3}; Momentum: {:.6}; Average distance: {:.6}; Distance to planet: {:.6}; Energy: {:.5}",
            self.t,
            self.momentum_magnitude(),
            self.avg_distance,
            self.planet_to_centroid,
            self.energy,
        )
    }
}

/// Total linear momentum of every body.
pub fn total_momentum(sys: &System) -> NVec2 {
    sys.bodies.iter().fold(NVec2::zeros(), |acc, b| acc + b.momentum())
}

/// Kinetic energy of the asteroids plus their potential energy in the planet's field.
#[allow(non_snake_case)]
pub fn cloud_energy(sys: &System, G: f64) -> Result<f64> {
    let planet = sys.planet();
    let mut total = 0.0;
    for (k, body) in sys.asteroids().iter().enumerate() {
        let potential = potential_energy(G, body, planet).map_err(|e| e.between(k + 1, PLANET))?;
        total += body.kinetic_energy() + potential;
    }
    Ok(total)
}

/// Mean distance over all distinct unordered pairs of asteroids. 0 for fewer than two.
pub fn average_pair_distance(sys: &System) -> f64 {
    let cloud = sys.asteroids();
    let n = cloud.len();
    if n < 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += (cloud[j].pos - cloud[i].pos).norm();
        }
    }
    let pairs = (n * (n - 1) / 2) as f64;
    sum / pairs
}

/// Distance from the planet to the centroid of the asteroid cloud. 0 for an empty cloud.
pub fn planet_to_centroid(sys: &System) -> f64 {
    let cloud = sys.asteroids();
    if cloud.is_empty() {
        return 0.0;
    }
    let centroid = cloud.iter().fold(NVec2::zeros(), |acc, b| acc + b.pos) / cloud.len() as f64;
    (sys.planet().pos - centroid).norm()
}

/// Take a full sample of the current state.
#[allow(non_snake_case)]
pub fn sample(sys: &System, G: f64) -> Result<Diagnostics> {
    Ok(Diagnostics {
        t: sys.t,
        planet_to_centroid: planet_to_centroid(sys),
        avg_distance: average_pair_distance(sys),
        momentum: total_momentum(sys),
        energy: cloud_energy(sys, G)?,
    })
}
