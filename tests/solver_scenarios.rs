//! End-to-end scenarios for the event-driven solver.
//!
//! Everything here goes through the public API re-exported from the crate
//! root. Scenes are built so the analytic times of impact are known.

use toi_solver::{
    ConvexBody, ConvexPolygon, ImpactSchedule, PhysicsError, Solver, SolverConfig, Transform, Vec2,
};

const EPSILON: f64 = 1e-9;

// ============================================================================
// Helpers
// ============================================================================

fn square(side: f64, x: f64, y: f64, velocity: Vec2) -> ConvexBody {
    ConvexBody::from_polygon(
        ConvexPolygon::rectangle(side, side).unwrap(),
        Transform::from_translation(Vec2::new(x, y)),
    )
    .with_velocity(velocity)
}

/// Steps the solver and returns the times of every collision it resolved.
fn run(solver: &mut Solver, steps: usize, dt: f64) -> Vec<f64> {
    let mut times = Vec::new();
    for _ in 0..steps {
        solver.advance(dt).unwrap();
        times.extend(solver.collision_events().iter().map(|event| event.time));
    }
    times
}

/// Largest separation along any edge normal of either polygon. Negative
/// means the polygons overlap by that much.
fn separation(a: &ConvexBody, b: &ConvexBody) -> f64 {
    fn one_sided(from: &ConvexBody, to: &ConvexBody) -> f64 {
        from.edges()
            .map(|(start, end)| {
                // Clockwise winding: the outward normal is the edge rotated
                // counter-clockwise.
                let normal = (end - start).perpendicular().normalize();
                to.world_vertices()
                    .map(|v| normal.dot(v - start))
                    .fold(f64::INFINITY, f64::min)
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }
    one_sided(a, b).max(one_sided(b, a))
}

// ============================================================================
// Head-on
// ============================================================================

#[test]
fn test_head_on_collision_at_analytic_time() {
    let mut solver = Solver::new();
    let a = solver.add_body(square(2.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    let b = solver.add_body(square(2.0, 5.0, 0.0, Vec2::new(-1.0, 0.0)));

    let times = run(&mut solver, 8, 1.0);

    // Gap of 8 closing at 2 units per second.
    assert_eq!(times.len(), 1);
    assert!((times[0] - 4.0).abs() < EPSILON);
    assert_eq!(solver.body(a).unwrap().velocity(), Vec2::new(-1.0, 0.0));
    assert_eq!(solver.body(b).unwrap().velocity(), Vec2::new(1.0, 0.0));
    assert!((solver.body(a).unwrap().center_of_mass().x + 5.0).abs() < EPSILON);
    assert!((solver.body(b).unwrap().center_of_mass().x - 5.0).abs() < EPSILON);
}

#[test]
fn test_unit_squares_meet_when_the_gap_closes() {
    let mut solver = Solver::new();
    solver.add_body(square(1.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    solver.add_body(square(1.0, 5.0, 0.0, Vec2::new(-1.0, 0.0)));

    // Faces start 9 apart.
    let times = run(&mut solver, 6, 1.0);
    assert_eq!(times.len(), 1);
    assert!((times[0] - 4.5).abs() < EPSILON);
}

#[test]
fn test_large_step_does_not_tunnel() {
    let mut solver = Solver::new();
    let a = solver.add_body(square(2.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    let b = solver.add_body(square(2.0, 5.0, 0.0, Vec2::new(-1.0, 0.0)));

    solver.advance(10.0).unwrap();

    let events = solver.collision_events();
    assert_eq!(events.len(), 1);
    assert!((events[0].time - 4.0).abs() < EPSILON);
    assert!((events[0].normal.x - 1.0).abs() < EPSILON);
    assert!((events[0].closing_speed - 2.0).abs() < EPSILON);
    // Six seconds of separating after the bounce.
    assert!((solver.body(a).unwrap().center_of_mass().x + 7.0).abs() < EPSILON);
    assert!((solver.body(b).unwrap().center_of_mass().x - 7.0).abs() < EPSILON);
    assert_eq!(solver.time(), 10.0);
}

#[test]
fn test_collision_between_frames() {
    let mut solver = Solver::new();
    let a = solver.add_body(square(2.0, 0.0, 0.0, Vec2::ZERO));
    let b = solver.add_body(square(2.0, 10.0, 0.0, Vec2::new(-3.0, 0.0)));

    let times = run(&mut solver, 3, 1.0);

    assert_eq!(times.len(), 1);
    assert!((times[0] - 8.0 / 3.0).abs() < EPSILON);
    assert_eq!(solver.body(a).unwrap().velocity(), Vec2::new(-3.0, 0.0));
    assert_eq!(solver.body(b).unwrap().velocity(), Vec2::ZERO);
    assert!((solver.body(a).unwrap().center_of_mass().x + 1.0).abs() < EPSILON);
    assert!((solver.body(b).unwrap().center_of_mass().x - 2.0).abs() < EPSILON);
}

// ============================================================================
// Chains and overlap
// ============================================================================

#[test]
fn test_cradle_passes_momentum_along() {
    let mut solver = Solver::new();
    let a = solver.add_body(square(2.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    let b = solver.add_body(square(2.0, 0.0, 0.0, Vec2::ZERO));
    let c = solver.add_body(square(2.0, 5.0, 0.0, Vec2::ZERO));

    let times = run(&mut solver, 10, 1.0);

    assert_eq!(times.len(), 2);
    assert!((times[0] - 3.0).abs() < EPSILON);
    assert!((times[1] - 6.0).abs() < EPSILON);

    assert_eq!(solver.body(a).unwrap().velocity(), Vec2::ZERO);
    assert_eq!(solver.body(b).unwrap().velocity(), Vec2::ZERO);
    assert_eq!(solver.body(c).unwrap().velocity(), Vec2::new(1.0, 0.0));
    assert!((solver.body(a).unwrap().center_of_mass().x + 2.0).abs() < EPSILON);
    assert!((solver.body(b).unwrap().center_of_mass().x - 3.0).abs() < EPSILON);
    assert!((solver.body(c).unwrap().center_of_mass().x - 9.0).abs() < EPSILON);
    assert!(solver
        .contacts()
        .all(|contact| contact.schedule() == ImpactSchedule::Never));
}

#[test]
fn test_vertex_against_face_never_overlaps() {
    let diamond = ConvexPolygon::new(vec![
        Vec2::new(0.0, 1.5),
        Vec2::new(1.5, 0.0),
        Vec2::new(0.0, -1.5),
        Vec2::new(-1.5, 0.0),
    ])
    .unwrap();

    let mut solver = Solver::new();
    solver.add_body(square(2.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    solver.add_body(
        ConvexBody::from_polygon(diamond, Transform::from_translation(Vec2::new(5.0, 0.4)))
            .with_velocity(Vec2::new(-1.0, 0.0)),
    );

    let mut times = Vec::new();
    for _ in 0..40 {
        solver.advance(0.25).unwrap();
        times.extend(solver.collision_events().iter().map(|event| event.time));

        let bodies = solver.bodies();
        let gap = separation(&bodies[0], &bodies[1]);
        assert!(gap > -1e-6, "bodies overlap by {} at t={}", -gap, solver.time());
    }

    assert_eq!(times.len(), 1);
    assert!((times[0] - 3.75).abs() < EPSILON);
}

// ============================================================================
// Bookkeeping
// ============================================================================

#[test]
fn test_contact_count_invariant() {
    let mut solver = Solver::new();
    for n in 1..=8 {
        solver.add_body(square(1.0, 3.0 * n as f64, 0.0, Vec2::ZERO));
        assert_eq!(solver.contact_count(), n * (n - 1) / 2);
        solver.advance(0.5).unwrap();
        assert_eq!(solver.contact_count(), n * (n - 1) / 2);
    }
    assert_eq!(solver.body_count(), 8);
}

#[test]
fn test_steering_a_body_into_another() {
    let mut solver = Solver::new();
    let a = solver.add_body(square(2.0, -5.0, 0.0, Vec2::ZERO));
    let b = solver.add_body(square(2.0, 5.0, 0.0, Vec2::ZERO));

    assert!(run(&mut solver, 2, 1.0).is_empty());

    // Gap of 8 at t = 2 closing at 4 units per second.
    solver.set_velocity(a, Vec2::new(4.0, 0.0)).unwrap();
    let times = run(&mut solver, 3, 1.0);

    assert_eq!(times.len(), 1);
    assert!((times[0] - 4.0).abs() < EPSILON);
    assert_eq!(solver.body(a).unwrap().velocity(), Vec2::ZERO);
    assert_eq!(solver.body(b).unwrap().velocity(), Vec2::new(4.0, 0.0));
}

#[test]
fn test_invalid_steps_are_rejected() {
    let mut solver = Solver::new();
    solver.add_body(square(2.0, 0.0, 0.0, Vec2::ZERO));

    assert_eq!(solver.advance(-1.0), Err(PhysicsError::InvalidTimeStep(-1.0)));
    assert!(matches!(
        solver.advance(f64::INFINITY),
        Err(PhysicsError::InvalidTimeStep(_))
    ));
    assert_eq!(solver.time(), 0.0);
}

#[test]
fn test_degenerate_contact_is_parked_and_step_completes() {
    let mut solver = Solver::new();
    let broken = solver.add_body(square(2.0, 0.0, 10.0, Vec2::new(f64::NAN, 0.0)));
    let b = solver.add_body(square(2.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    let c = solver.add_body(square(2.0, 5.0, 0.0, Vec2::new(-1.0, 0.0)));

    let result = solver.advance(1.0);
    match result {
        Err(PhysicsError::DegenerateContact { first, second }) => {
            assert_eq!(first, broken);
            assert_eq!(second, b);
        }
        other => panic!("expected a degenerate contact, got {other:?}"),
    }
    assert_eq!(solver.time(), 1.0);

    for contact in solver.contacts() {
        if contact.involves(broken) {
            assert_eq!(contact.schedule(), ImpactSchedule::Never);
        } else {
            assert_eq!(contact.pair(), (b, c));
            match contact.schedule() {
                ImpactSchedule::At(toi) => assert!((toi - 4.0).abs() < EPSILON),
                other => panic!("unexpected schedule {other}"),
            }
        }
    }

    // Parked contacts are not due again, so the next step is clean.
    assert!(solver.advance(1.0).is_ok());
    assert_eq!(solver.time(), 2.0);
}

#[test]
fn test_non_finite_velocity_is_rejected() {
    let mut solver = Solver::new();
    let a = solver.add_body(square(2.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    solver.add_body(square(2.0, 5.0, 0.0, Vec2::new(-1.0, 0.0)));

    assert!(matches!(
        solver.set_velocity(a, Vec2::new(f64::NAN, 0.0)),
        Err(PhysicsError::NonFiniteVelocity(_))
    ));
    assert_eq!(solver.body(a).unwrap().velocity(), Vec2::new(1.0, 0.0));
    assert!(solver.advance(1.0).is_ok());
}

#[test]
fn test_event_cap_defers_work() {
    let config = SolverConfig {
        max_events_per_step: 1,
        ..SolverConfig::default()
    };
    let mut solver = Solver::with_config(config);
    solver.add_body(square(2.0, -5.0, 0.0, Vec2::new(1.0, 0.0)));
    solver.add_body(square(2.0, 5.0, 0.0, Vec2::new(-1.0, 0.0)));
    solver.add_body(square(2.0, 0.0, 20.0, Vec2::ZERO));

    // Three fresh contacts, only one may be evaluated per step.
    solver.advance(0.1).unwrap();
    let pending = solver
        .contacts()
        .filter(|contact| contact.schedule() == ImpactSchedule::Reprocess)
        .count();
    assert_eq!(pending, 2);

    solver.advance(0.1).unwrap();
    solver.advance(0.1).unwrap();
    assert!(solver
        .contacts()
        .all(|contact| contact.schedule() != ImpactSchedule::Reprocess));
}

#[test]
fn test_rejects_malformed_polygons() {
    assert_eq!(
        ConvexBody::new(vec![Vec2::ZERO, Vec2::new(1.0, 0.0)]).err(),
        Some(PhysicsError::TooFewVertices { count: 2 })
    );
    assert_eq!(
        ConvexBody::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
        ])
        .err(),
        Some(PhysicsError::DegenerateEdge { index: 1 })
    );
}
