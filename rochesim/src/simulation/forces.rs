//! Newtonian gravity between two bodies
//!
//! No softening: the model is point masses with hard contact radii, and the
//! collision passes keep distinct bodies apart. A zero separation is reported
//! as an error instead of producing an infinite force.

use crate::error::{Error, Result};
use crate::simulation::states::{Body, NVec2};
use crate::simulation::vector::VectorExt;

/// Gravitational force exerted on `a` by `b`
///
/// F = G * (m_a * m_b) / |r|^2 * unit(r), with r = x_b - x_a.
/// Points from `a` toward `b`, so `gravity(a, b) == -gravity(b, a)`.
#[allow(non_snake_case)]
pub fn gravity(G: f64, a: &Body, b: &Body) -> Result<NVec2> {
    // r is the displacement vector from a to b
    let r = b.pos - a.pos;

    // Direction first: fails for coincident bodies before we divide by |r|^2
    let r_hat = r.unit()?;

    // |r|^2
    let r2 = r.norm_squared();

    Ok(G * (a.mass * b.mass) / r2 * r_hat)
}

/// Gravitational potential energy of the pair, -G m_a m_b / |r|
#[allow(non_snake_case)]
pub fn potential_energy(G: f64, a: &Body, b: &Body) -> Result<f64> {
    let d = (b.pos - a.pos).size();
    if !d.is_finite() {
        return Err(Error::NonFinite(format!("distance {d} between bodies")));
    }
    if d == 0.0 {
        return Err(Error::DegenerateVector);
    }
    Ok(-G * a.mass * b.mass / d)
}
