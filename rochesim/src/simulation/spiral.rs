//! Initial layout of the asteroid cloud along an Archimedean spiral.
//!
//! r = a * phi, x = r cos(phi), y = r sin(phi), starting at phi = 3 with
//! a = 0.321660216662 * body radius. The angle advances by 1/r per point, so
//! neighbours stay roughly one unit of arc length apart while the spiral widens.
//! Shape is fully deterministic.

use super::states::{Body, NVec2};

/// Angle of the first point on the spiral.
pub const PHI_START: f64 = 3.0;

/// Spiral pitch per unit of body radius.
pub const SPIRAL_FACTOR: f64 = 0.321660216662;

/// Iterator over `(r, phi)` polar coordinates of successive spiral points.
struct SpiralPoints {
    a: f64,
    phi: f64,
}

impl Iterator for SpiralPoints {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let r = self.a * self.phi;
        let point = (r, self.phi);
        self.phi += 1.0 / r;
        Some(point)
    }
}

fn spiral_points(body_radius: f64) -> SpiralPoints {
    SpiralPoints {
        a: SPIRAL_FACTOR * body_radius,
        phi: PHI_START,
    }
}

/// Build `count` identical bodies on the spiral, translated by `origin` and all
/// moving with the same `velocity`.
pub fn build_spiral(count: usize, radius: f64, mass: f64, origin: NVec2, velocity: NVec2) -> Vec<Body> {
    spiral_points(radius)
        .take(count)
        .map(|(r, phi)| {
            let offset = NVec2::new(r * phi.cos(), r * phi.sin());
            Body::new(offset + origin, velocity, radius, mass)
        })
        .collect()
}

/// Polar radius of each generated point, in generation order.
pub fn spiral_radii(count: usize, radius: f64) -> Vec<f64> {
    spiral_points(radius).take(count).map(|(r, _)| r).collect()
}
