//! Fixed-step time integration for the planet / asteroid system
//!
//! One tick is: sequential gravity kick + drift, shuffle of the cloud's
//! iteration order, collision relaxation, time advance.
//!
//! The gravity pass updates each body in place as soon as its own sum is done:
//! body `o` gets every pairwise kick applied immediately, then drifts with its
//! new velocity, and bodies later in `order` already see `o` at its new
//! position. The result depends on iteration order (hence the shuffle) and the
//! pass cannot be split across threads without changing the physics.

use rand::seq::SliceRandom;
use rand::Rng;

use super::collision::resolve_collisions;
use super::forces::gravity;
use super::params::Parameters;
use super::states::{System, PLANET};
use crate::error::{Error, Result};

/// Gravity kick and Euler drift for every body, in `sys.order`.
///
/// For each body o:
///   v_o += dt * F(o, v) / m_o   for every other body v, applied one pair at a time
///   x_o += dt * v_o
pub fn gravity_pass(sys: &mut System, params: &Parameters) -> Result<()> {
    let dt = params.h0;

    for &o in &sys.order {
        for &v in &sys.order {
            if o == v {
                continue;
            }
            // Force on o from v, with v's current (possibly already advanced) position
            let force = gravity(params.G, &sys.bodies[o], &sys.bodies[v]).map_err(|e| e.between(o, v))?;

            let body = &mut sys.bodies[o];
            body.vel += dt * (force / body.mass);
        }

        // Drift with the velocity just computed
        let body = &mut sys.bodies[o];
        body.pos += dt * body.vel;
        if !body.is_finite() {
            return Err(Error::NonFinite(format!("body {o} after the gravity kick at t = {}", sys.t)));
        }
    }
    Ok(())
}

/// Uniformly permute the asteroid part of the iteration order. The planet stays first.
pub fn shuffle_order<R: Rng + ?Sized>(sys: &mut System, rng: &mut R) {
    debug_assert_eq!(sys.order.first(), Some(&PLANET));
    if sys.order.len() > 2 {
        sys.order[PLANET + 1..].shuffle(rng);
    }
}

/// Advance the system by one tick of `params.h0`.
/// Returns the number of contacts resolved by the collision passes.
pub fn physics_step<R: Rng + ?Sized>(sys: &mut System, params: &Parameters, rng: &mut R) -> Result<usize> {
    if sys.is_empty() {
        return Ok(0);
    }

    gravity_pass(sys, params)?;

    // Vary pair order between ticks so no fixed sweep direction biases the cloud
    shuffle_order(sys, rng);

    let contacts = resolve_collisions(sys, params.collision_passes)?;

    sys.t += params.h0;

    sys.check_finite()?;
    Ok(contacts)
}
