use rand::rngs::StdRng;
use rand::SeedableRng;

use rochesim::simulation::collision::{collide, collision_pass, resolve_collisions};
use rochesim::simulation::diagnostics::{average_pair_distance, planet_to_centroid, sample, total_momentum};
use rochesim::simulation::forces::gravity;
use rochesim::simulation::integrator::{gravity_pass, physics_step, shuffle_order};
use rochesim::simulation::params::Parameters;
use rochesim::simulation::spiral::{build_spiral, spiral_radii, PHI_START, SPIRAL_FACTOR};
use rochesim::simulation::states::{Body, NVec2, System, PLANET};
use rochesim::Error;

/// Body at rest at (x, y)
pub fn body(x: f64, y: f64, radius: f64, m: f64) -> Body {
    Body::new(NVec2::new(x, y), NVec2::zeros(), radius, m)
}

/// Planet at the origin plus one body on the +x axis at `dist`
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    System::new(body(0.0, 0.0, 0.1, m1), vec![body(dist, 0.0, 0.1, m2)])
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        h0: 0.001,
        G: 0.1,
        collision_passes: 1,
        output_frames: 100,
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let g = test_params().G;
    let configs = [
        (body(0.0, 0.0, 1.0, 2.0), body(1.0, 0.0, 1.0, 3.0)),
        (body(-3.5, 2.0, 0.2, 1000.0), body(4.0, -1.25, 0.5, 0.01)),
        (body(1e3, 1e3, 1.0, 5.0), body(1e3 + 1e-3, 1e3 - 2e-3, 1.0, 7.0)),
    ];

    for (a, b) in configs {
        let f_ab = gravity(g, &a, &b).unwrap();
        let f_ba = gravity(g, &b, &a).unwrap();
        let net = f_ab + f_ba;
        assert!(net.norm() <= 1e-12 * f_ab.norm(), "F(a,b) + F(b,a) = {:?}", net);
    }
}

#[test]
fn gravity_points_toward_other_body() {
    let sys = two_body_system(2.0, 1.0, 1.0);
    let p = test_params();

    let f = gravity(p.G, &sys.bodies[0], &sys.bodies[1]).unwrap();
    let dx = sys.bodies[1].pos - sys.bodies[0].pos;

    assert!(f.dot(&dx) > 0.0, "force is not toward the second body");
    assert!(close(f.y, 0.0, 1e-15));
    // G m1 m2 / d^2
    assert!(close(f.x, 0.1 * 1.0 * 1.0 / 4.0, 1e-15));
}

#[test]
fn gravity_inverse_square_law() {
    let p = test_params();
    let sys_r = two_body_system(1.0, 1.0, 1.0);
    let sys_2r = two_body_system(2.0, 1.0, 1.0);

    let f_r = gravity(p.G, &sys_r.bodies[0], &sys_r.bodies[1]).unwrap();
    let f_2r = gravity(p.G, &sys_2r.bodies[0], &sys_2r.bodies[1]).unwrap();

    let ratio = f_r.norm() / f_2r.norm();
    assert!(close(ratio, 4.0, 1e-12), "Expected 4x, got {}", ratio);
}

#[test]
fn gravity_between_coincident_bodies_is_an_error() {
    let a = body(1.0, 1.0, 0.5, 1.0);
    let b = body(1.0, 1.0, 0.5, 1.0);
    assert!(matches!(gravity(1.0, &a, &b), Err(Error::DegenerateVector)));
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn collision_conserves_pair_momentum() {
    let mut a = Body::new(NVec2::new(0.0, 0.0), NVec2::new(1.0, 0.5), 1.0, 2.0);
    let mut b = Body::new(NVec2::new(1.5, 0.2), NVec2::new(-1.0, 0.0), 1.0, 3.0);
    let p_before = a.momentum() + b.momentum();

    assert!(collide(&mut a, &mut b).unwrap());

    let p_after = a.momentum() + b.momentum();
    assert!((p_after - p_before).norm() < 1e-12, "{:?} -> {:?}", p_before, p_after);
}

#[test]
fn collision_is_inelastic_along_normal_only() {
    let mut a = Body::new(NVec2::new(0.0, 0.0), NVec2::new(1.0, 0.5), 1.0, 2.0);
    let mut b = Body::new(NVec2::new(1.5, 0.0), NVec2::new(-1.0, 0.25), 1.0, 3.0);

    collide(&mut a, &mut b).unwrap();

    // normal is +x: relative normal velocity is gone, tangential components untouched
    assert!(close(a.vel.x - b.vel.x, 0.0, 1e-12));
    assert!(close(a.vel.y, 0.5, 1e-15));
    assert!(close(b.vel.y, 0.25, 1e-15));
    // both now move with the pair's normal centre-of-mass velocity
    let v_cm = (2.0 * 1.0 + 3.0 * -1.0) / 5.0;
    assert!(close(a.vel.x, v_cm, 1e-12));
}

#[test]
fn collision_without_overlap_is_noop() {
    let mut a = Body::new(NVec2::new(0.0, 0.0), NVec2::new(1.0, 0.0), 0.5, 1.0);
    let mut b = Body::new(NVec2::new(1.5, 0.0), NVec2::new(-1.0, 0.0), 0.5, 1.0);
    let (a0, b0) = (a, b);

    assert!(!collide(&mut a, &mut b).unwrap());
    assert_eq!(a, a0);
    assert_eq!(b, b0);
}

#[test]
fn collision_pass_separates_overlapping_pair_at_rest() {
    let (ra, rb) = (1.0, 0.5);
    let d = 1.0;
    let mut sys = System::new(body(0.0, 0.0, ra, 4.0), vec![body(d, 0.0, rb, 1.0)]);

    collision_pass(&mut sys).unwrap();

    let sep = (sys.bodies[1].pos - sys.bodies[0].pos).norm();
    assert!(close(sep, ra + rb, 1e-12), "separation {} != {}", sep, ra + rb);
    // each moved half of the 0.5 overlap
    assert!(close(sys.bodies[0].pos.x, -0.25, 1e-12));
    assert!(close(sys.bodies[1].pos.x, 1.25, 1e-12));
    for b in &sys.bodies {
        assert_eq!(b.vel, NVec2::zeros());
    }
}

#[test]
fn collision_of_coincident_bodies_is_fatal() {
    let mut sys = System::new(body(0.0, 0.0, 1.0, 1.0), vec![body(0.0, 0.0, 1.0, 1.0)]);
    let err = collision_pass(&mut sys).unwrap_err();
    assert!(matches!(err, Error::Degenerate { a: 0, b: 1 }), "{err}");
}

/// Sum of pairwise penetration depths over distinct pairs
fn total_overlap(sys: &System) -> f64 {
    let b = &sys.bodies;
    let mut sum = 0.0;
    for i in 0..b.len() {
        for j in (i + 1)..b.len() {
            sum += (b[i].radius + b[j].radius - (b[j].pos - b[i].pos).norm()).max(0.0);
        }
    }
    sum
}

#[test]
fn repeated_passes_relax_a_chain_of_overlaps() {
    // A overlaps B overlaps C, 0.2 deep each
    let chain = System::new(
        Body::new(NVec2::new(0.0, 0.0), NVec2::new(1.0, 0.0), 1.0, 2.0),
        vec![
            Body::new(NVec2::new(1.8, 0.0), NVec2::zeros(), 1.0, 1.0),
            Body::new(NVec2::new(3.6, 0.0), NVec2::new(-1.0, 0.5), 1.0, 3.0),
        ],
    );
    let momentum_before = total_momentum(&chain);
    let initial = total_overlap(&chain);

    let mut single = chain.clone();
    collision_pass(&mut single).unwrap();

    let mut relaxed = chain.clone();
    let contacts = resolve_collisions(&mut relaxed, 3).unwrap();

    let after_one = total_overlap(&single);
    let after_three = total_overlap(&relaxed);
    assert!(contacts > 0);
    assert!(after_one < initial, "one pass: {after_one} vs {initial}");
    assert!(after_three < after_one, "three passes: {after_three} vs one pass: {after_one}");

    let drift = (total_momentum(&relaxed) - momentum_before).norm();
    assert!(drift < 1e-12, "momentum changed by {drift}");
}

// ==================================================================================
// Spiral tests
// ==================================================================================

#[test]
fn spiral_has_requested_count_distinct_points_and_growing_radius() {
    let n = 500;
    let origin = NVec2::new(60.0, -3.0);
    let vel = NVec2::new(0.0, 4.0);
    let cloud = build_spiral(n, 0.5, 0.01, origin, vel);

    assert_eq!(cloud.len(), n);

    for b in &cloud {
        assert_eq!(b.vel, vel);
        assert_eq!(b.radius, 0.5);
        assert_eq!(b.mass, 0.01);
    }

    for i in 0..n {
        for j in (i + 1)..n {
            assert!(cloud[i].pos != cloud[j].pos, "points {i} and {j} coincide");
        }
    }

    let radii = spiral_radii(n, 0.5);
    assert!(radii.windows(2).all(|w| w[1] >= w[0]));
    for (b, r) in cloud.iter().zip(&radii) {
        assert!(close((b.pos - origin).norm(), *r, 1e-9));
    }
}

#[test]
fn spiral_starts_at_phi_three() {
    let radius = 2.0;
    let cloud = build_spiral(1, radius, 1.0, NVec2::zeros(), NVec2::zeros());
    let r = SPIRAL_FACTOR * radius * PHI_START;
    assert!(close(cloud[0].pos.x, r * PHI_START.cos(), 1e-12));
    assert!(close(cloud[0].pos.y, r * PHI_START.sin(), 1e-12));
}

#[test]
fn spiral_of_zero_bodies_is_empty() {
    assert!(build_spiral(0, 0.5, 1.0, NVec2::zeros(), NVec2::zeros()).is_empty());
}

// ==================================================================================
// Physics step tests
// ==================================================================================

#[test]
fn zero_timestep_is_identity() {
    let planet = body(0.0, 0.0, 1.0, 1000.0);
    let cloud = vec![
        Body::new(NVec2::new(10.0, 0.0), NVec2::new(0.0, 3.0), 0.5, 0.1),
        Body::new(NVec2::new(0.0, 10.0), NVec2::new(-3.0, 0.0), 0.5, 0.1),
        Body::new(NVec2::new(-10.0, 0.0), NVec2::new(0.0, -3.0), 0.5, 0.1),
        Body::new(NVec2::new(5.0, 5.0), NVec2::new(1.0, -1.0), 0.5, 0.1),
    ];
    let mut sys = System::new(planet, cloud);
    let before = sys.bodies.clone();

    let mut p = test_params();
    p.h0 = 0.0;
    p.collision_passes = 3;
    physics_step(&mut sys, &p, &mut rng()).unwrap();

    assert_eq!(sys.bodies, before);
    assert_eq!(sys.t, 0.0);
}

#[test]
fn circular_orbit_returns_to_start_after_one_period() {
    let (g, m_planet, m, d): (f64, f64, f64, f64) = (1.0, 1000.0, 1e-3, 10.0);
    let v = (g * m_planet / d).sqrt();

    let planet = body(0.0, 0.0, 1.0, m_planet);
    let moon = Body::new(NVec2::new(d, 0.0), NVec2::new(0.0, v), 0.1, m);
    let mut sys = System::new(planet, vec![moon]);
    let start = sys.bodies[1].pos;

    let p = Parameters {
        h0: 1e-4,
        G: g,
        collision_passes: 1,
        output_frames: 1000,
    };
    let period = 2.0 * std::f64::consts::PI * d / v;
    let steps = (period / p.h0).round() as usize;

    let mut rng = rng();
    let mut min_r = f64::INFINITY;
    let mut max_r = 0.0_f64;
    for _ in 0..steps {
        let contacts = physics_step(&mut sys, &p, &mut rng).unwrap();
        assert_eq!(contacts, 0, "orbit should never touch the planet");
        let r = (sys.bodies[1].pos - sys.bodies[0].pos).norm();
        min_r = min_r.min(r);
        max_r = max_r.max(r);
    }

    let err = (sys.bodies[1].pos - start).norm();
    assert!(err < 0.05 * d, "position error after one period: {}", err);
    assert!(min_r > 0.99 * d && max_r < 1.01 * d, "radius range [{min_r}, {max_r}]");
}

#[test]
fn physics_step_propagates_degenerate_geometry() {
    let mut sys = System::new(body(3.0, 3.0, 1.0, 10.0), vec![body(3.0, 3.0, 1.0, 1.0)]);
    let err = physics_step(&mut sys, &test_params(), &mut rng()).unwrap_err();
    assert!(matches!(err, Error::Degenerate { .. }), "{err}");
}

#[test]
fn overflowing_pair_is_reported_as_non_finite() {
    let mut sys = System::new(body(0.0, 0.0, 1.0, 1e200), vec![body(100.0, 0.0, 1.0, 1e200)]);
    let p = Parameters {
        h0: 0.1,
        G: 1.0,
        collision_passes: 1,
        output_frames: 1,
    };
    let err = physics_step(&mut sys, &p, &mut rng()).unwrap_err();
    assert!(matches!(err, Error::NonFinite(_)), "{err}");
}

/// Planet plus two bodies close enough to pull on each other
fn three_body_system() -> System {
    System::new(
        body(0.0, 0.0, 1.0, 1000.0),
        vec![body(5.0, 0.5, 0.2, 1.0), body(5.5, -0.5, 0.2, 1.0)],
    )
}

#[test]
fn gravity_pass_updates_bodies_in_iteration_order() {
    let p = Parameters {
        h0: 0.01,
        G: 1.0,
        collision_passes: 1,
        output_frames: 1,
    };

    let mut forward = three_body_system();
    forward.order = vec![0, 1, 2];
    gravity_pass(&mut forward, &p).unwrap();

    let mut reversed = three_body_system();
    reversed.order = vec![0, 2, 1];
    gravity_pass(&mut reversed, &p).unwrap();

    // body 2 has already drifted when body 1 is visited in the reversed order
    let gap = (forward.bodies[1].pos - reversed.bodies[1].pos).norm();
    assert!(gap > 1e-12, "order had no effect on body 1");

    // Body 1 by hand in the forward order: it sees the planet after its drift
    // and body 2 before its drift.
    let [mut planet, mut b1, b2]: [Body; 3] = three_body_system().bodies.try_into().unwrap();
    let dt = p.h0;
    for other in [b1, b2] {
        planet.vel += dt * (gravity(p.G, &planet, &other).unwrap() / planet.mass);
    }
    planet.pos += dt * planet.vel;
    for other in [planet, b2] {
        b1.vel += dt * (gravity(p.G, &b1, &other).unwrap() / b1.mass);
    }
    b1.pos += dt * b1.vel;

    assert!((forward.bodies[0].pos - planet.pos).norm() < 1e-14);
    assert!((forward.bodies[1].pos - b1.pos).norm() < 1e-14);
    assert!((forward.bodies[1].vel - b1.vel).norm() < 1e-14);
}

#[test]
fn shuffle_keeps_planet_first_and_is_seed_deterministic() {
    let cloud = build_spiral(50, 0.5, 0.01, NVec2::new(60.0, 0.0), NVec2::zeros());
    let mut a = System::new(body(0.0, 0.0, 10.0, 1000.0), cloud.clone());
    let mut b = System::new(body(0.0, 0.0, 10.0, 1000.0), cloud);

    let mut rng_a = StdRng::seed_from_u64(9);
    let mut rng_b = StdRng::seed_from_u64(9);
    for _ in 0..5 {
        shuffle_order(&mut a, &mut rng_a);
        shuffle_order(&mut b, &mut rng_b);
        assert_eq!(a.order, b.order);
        assert_eq!(a.order[0], PLANET);

        let mut sorted = a.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..a.len()).collect::<Vec<_>>());
    }
    // storage and view target do not move with the order
    assert_eq!(a.view, 1);
    assert_eq!(a.bodies, b.bodies);
}

// ==================================================================================
// Diagnostics tests
// ==================================================================================

#[test]
fn static_pair_diagnostics() {
    let sys = two_body_system(7.0, 1000.0, 1.0);
    let d = sample(&sys, 1.0).unwrap();

    assert_eq!(d.momentum_magnitude(), 0.0);
    assert!(close(d.planet_to_centroid, 7.0, 1e-12));
    // a one-body cloud has no pairs
    assert_eq!(d.avg_distance, 0.0);
    assert!(close(d.energy, -1000.0 / 7.0, 1e-9));
}

#[test]
fn static_cloud_average_distance_is_separation() {
    let sys = System::new(
        body(0.0, 0.0, 1.0, 1000.0),
        vec![body(10.0, 0.0, 0.5, 1.0), body(13.0, 4.0, 0.5, 1.0)],
    );
    let d = sample(&sys, 1.0).unwrap();

    assert_eq!(d.momentum_magnitude(), 0.0);
    assert!(close(d.avg_distance, 5.0, 1e-12));
    assert!(close(d.planet_to_centroid, (11.5_f64 * 11.5 + 2.0 * 2.0).sqrt(), 1e-12));
}

#[test]
fn average_distance_is_mean_over_pairs() {
    // unit right triangle: sides 1, 1, sqrt(2)
    let sys = System::new(
        body(-50.0, 0.0, 1.0, 1.0),
        vec![body(0.0, 0.0, 0.1, 1.0), body(1.0, 0.0, 0.1, 1.0), body(0.0, 1.0, 0.1, 1.0)],
    );
    let expected = (1.0 + 1.0 + 2.0_f64.sqrt()) / 3.0;
    assert!(close(average_pair_distance(&sys), expected, 1e-12));
    assert!(close(planet_to_centroid(&sys), (50.0_f64 + 1.0 / 3.0).hypot(1.0 / 3.0), 1e-12));
}

#[test]
fn momentum_includes_planet() {
    let mut sys = two_body_system(5.0, 10.0, 1.0);
    sys.bodies[0].vel = NVec2::new(1.0, 0.0);
    sys.bodies[1].vel = NVec2::new(0.0, -2.0);
    let d = sample(&sys, 1.0).unwrap();
    assert_eq!(d.momentum, NVec2::new(10.0, -2.0));
}
