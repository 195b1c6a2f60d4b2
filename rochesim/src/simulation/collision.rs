//! Pairwise contact resolution
//!
//! Overlapping bodies are pushed apart along the contact normal and their
//! relative normal velocity is removed (perfectly inelastic along the normal,
//! tangential velocity untouched). Repeating the O(n^2) sweep a few times per
//! tick relaxes chains of overlaps; dense clusters may keep some residual overlap.

use crate::error::Result;
use crate::simulation::states::{pair_mut, Body, System};
use crate::simulation::vector::VectorExt;

/// Resolve contact between `a` and `b`. Returns whether they overlapped.
///
/// No-op when `r_a + r_b - |x_b - x_a| < 0`.
pub fn collide(a: &mut Body, b: &mut Body) -> Result<bool> {
    // dist points from a to b
    let dist = b.pos - a.pos;

    // Penetration depth; negative means a gap between the surfaces
    let diff = a.radius + b.radius - dist.size();
    if diff < 0.0 {
        return Ok(false);
    }

    // Contact normal (fails for coincident centres)
    let n = dist.unit()?;

    // Positional correction: each body moves half the depth, in opposite directions
    let pos_response = n * diff;
    a.pos -= 0.5 * pos_response;
    b.pos += 0.5 * pos_response;

    // Relative velocity along the normal
    let vel_response = n * (a.vel - b.vel).dot_product(&n);

    // Split the response by the other body's mass fraction so that
    // m_a * dv_a + m_b * dv_b = 0 and the normal relative velocity vanishes
    let total = a.mass + b.mass;
    a.vel -= b.mass / total * vel_response;
    b.vel += a.mass / total * vel_response;

    Ok(true)
}

/// One full sweep over every ordered pair in `sys.order`. Returns the number of contacts resolved.
pub fn collision_pass(sys: &mut System) -> Result<usize> {
    let mut contacts = 0;
    for &i in &sys.order {
        for &j in &sys.order {
            if i == j {
                continue;
            }
            let (a, b) = pair_mut(&mut sys.bodies, i, j);
            if collide(a, b).map_err(|e| e.between(i, j))? {
                contacts += 1;
            }
        }
    }
    Ok(contacts)
}

/// Run `passes` sweeps. Returns the total number of contacts resolved.
pub fn resolve_collisions(sys: &mut System, passes: u32) -> Result<usize> {
    let mut contacts = 0;
    for _ in 0..passes {
        contacts += collision_pass(sys)?;
    }
    Ok(contacts)
}
