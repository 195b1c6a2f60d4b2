//! Core state types for the planet / asteroid-cloud simulation.
//!
//! - `Body`   a circular mass point using `NVec2`
//! - `System` the body arena plus the role indices and the current time `t`
//!
//! Bodies live in one contiguous `Vec` for the whole run. Roles (planet, camera
//! focus) are indices into it, and the per-tick shuffle permutes `order`, never
//! the storage itself.

use nalgebra::Vector2;

use crate::error::{Error, Result};

pub type NVec2 = Vector2<f64>;

/// Arena index of the planet. The planet is always stored first.
pub const PLANET: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: NVec2, // position
    pub vel: NVec2, // velocity
    pub radius: f64, // contact radius
    pub mass: f64, // mass
}

impl Body {
    pub fn new(pos: NVec2, vel: NVec2, radius: f64, mass: f64) -> Self {
        Self { pos, vel, radius, mass }
    }

    /// Linear momentum m·v
    #[inline]
    pub fn momentum(&self) -> NVec2 {
        self.mass * self.vel
    }

    /// Kinetic energy 1/2 m |v|^2
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.norm_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().chain(self.vel.iter()).all(|c| c.is_finite())
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // planet at index 0, asteroid cloud after it
    pub order: Vec<usize>, // iteration order for the O(n^2) passes, planet always first
    pub view: usize, // camera focus, no physical role
    pub t: f64, // simulated time
}

impl System {
    /// Build the arena from a planet and its asteroid cloud.
    /// The camera follows the first asteroid, or the planet when the cloud is empty.
    pub fn new(planet: Body, cloud: Vec<Body>) -> Self {
        let mut bodies = Vec::with_capacity(cloud.len() + 1);
        bodies.push(planet);
        bodies.extend(cloud);

        let order = (0..bodies.len()).collect();
        let view = if bodies.len() > 1 { 1 } else { PLANET };

        Self { bodies, order, view, t: 0.0 }
    }

    #[inline]
    pub fn planet(&self) -> &Body {
        &self.bodies[PLANET]
    }

    /// All bodies except the planet, in storage order.
    #[inline]
    pub fn asteroids(&self) -> &[Body] {
        &self.bodies[PLANET + 1..]
    }

    #[inline]
    pub fn view_target(&self) -> &Body {
        &self.bodies[self.view]
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Fail with `NonFinite` if any body has a NaN or infinite component.
    pub fn check_finite(&self) -> Result<()> {
        match self.bodies.iter().position(|b| !b.is_finite()) {
            Some(i) => Err(Error::NonFinite(format!("body {i} at t = {}", self.t))),
            None => Ok(()),
        }
    }
}

/// Mutable access to two distinct bodies of the arena at once.
pub(crate) fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = bodies.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}
