// tests/motion_properties.rs
use canvas_turtle::{
    MotionEngine, RecordingSurface, Segment, SurfaceBounds, Turtle, TurtleConfig, TurtleState,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn turtle(width: f32, height: f32) -> Turtle<RecordingSurface> {
    let config = TurtleConfig {
        seed: Some(1),
        ..Default::default()
    };
    Turtle::with_config(
        RecordingSurface::new(width, height),
        RecordingSurface::new(width, height),
        config,
    )
}

fn total_length(segments: &[Segment]) -> f32 {
    segments.iter().map(Segment::length).sum()
}

#[test]
fn test_no_wrap_straight_line() {
    let engine = MotionEngine::default();
    let bounds = SurfaceBounds::centered(Vec2::new(20.0, 20.0));

    for heading in [0.0f64, 30.0, 135.0, 212.5, 300.0] {
        let state = TurtleState {
            position: Vec2::new(3.0, 4.0),
            heading,
            wrap_enabled: false,
            ..Default::default()
        };
        let motion = engine.forward(&state, 50.0, &bounds).unwrap();

        let (sin, cos) = heading.to_radians().sin_cos();
        let expected = Vec2::new((3.0 + 50.0 * sin) as f32, (4.0 + 50.0 * cos) as f32);

        assert_eq!(motion.segments.len(), 1, "heading {heading}");
        assert_eq!(motion.segments[0].from, Vec2::new(3.0, 4.0));
        assert!(motion.segments[0].to.distance(expected) < 1e-3);
        assert_eq!(motion.state.position, motion.segments[0].to);
        assert_eq!(motion.state.heading, heading);
    }
}

#[test]
fn test_distance_is_conserved_across_wraps() {
    let engine = MotionEngine::default();
    let bounds = SurfaceBounds::centered(Vec2::new(20.0, 20.0));

    for heading in [17.0f64, 30.0, 45.0, 123.0, 250.0, 333.0] {
        for distance in [0.5f32, 37.0, 250.0] {
            let state = TurtleState {
                position: Vec2::new(-2.0, 6.0),
                heading,
                ..Default::default()
            };
            let motion = engine.forward(&state, distance, &bounds).unwrap();
            let traced = total_length(&motion.segments);
            assert!(
                (traced - distance).abs() < 1e-4 * distance.max(1.0),
                "heading {heading}, distance {distance}: traced {traced}"
            );
        }
    }
}

#[test]
fn test_wrap_teleport_example() {
    let engine = MotionEngine::default();
    let bounds = SurfaceBounds::centered(Vec2::new(20.0, 20.0));
    let state = TurtleState {
        position: Vec2::new(9.0, 0.0),
        heading: 90.0,
        ..Default::default()
    };

    let motion = engine.forward(&state, 3.0, &bounds).unwrap();

    assert_eq!(
        motion.segments,
        vec![
            Segment::new(Vec2::new(9.0, 0.0), Vec2::new(10.0, 0.0)),
            Segment::new(Vec2::new(-10.0, 0.0), Vec2::new(-8.0, 0.0)),
        ]
    );
    assert_eq!(motion.state.position, Vec2::new(-8.0, 0.0));
    assert_eq!(motion.wraps, 1);
}

#[test]
fn test_wrapped_segments_stay_on_surface() {
    let engine = MotionEngine::default();
    let bounds = SurfaceBounds::centered(Vec2::new(20.0, 20.0));
    let state = TurtleState {
        heading: 30.0,
        ..Default::default()
    };

    let motion = engine.forward(&state, 100.0, &bounds).unwrap();

    assert!(motion.wraps > 1);
    for s in &motion.segments {
        for p in [s.from, s.to] {
            assert!(p.x >= -10.0 - 1e-4 && p.x <= 10.0 + 1e-4, "{p:?}");
            assert!(p.y >= -10.0 - 1e-4 && p.y <= 10.0 + 1e-4, "{p:?}");
        }
    }
}

#[test]
fn test_right_then_left_restores_heading() {
    for start in [0.0f32, 45.0, -30.0, 12.5, 0.1, 10.3, 45.7, 123.4] {
        for angle in [0.5f32, 1.0, 33.0, 90.0, 271.25, 0.1, 17.3] {
            let mut t = turtle(100.0, 100.0);
            t.set_heading(start).unwrap();
            t.right(angle).unwrap();
            t.left(angle).unwrap();
            assert_eq!(t.heading(), f64::from(start), "{start} / {angle}");
        }
    }
}

#[test]
fn test_pen_up_moves_without_drawing() {
    let mut drawn = turtle(20.0, 20.0);
    let mut silent = turtle(20.0, 20.0);
    silent.pen_up();

    for t in [&mut drawn, &mut silent] {
        t.right(60.0).unwrap();
        t.forward(5.0).unwrap();
        t.forward(25.0).unwrap();
    }

    assert_eq!(drawn.position(), silent.position());
    assert!(!drawn.image().stroked_segments().is_empty());
    assert!(silent.image().stroked_segments().is_empty());
}

#[test]
fn test_position_stays_in_half_open_bounds() {
    let mut t = turtle(30.0, 20.0);
    let bounds = t.bounds();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..300 {
        t.set_heading(rng.random_range(0.0..360.0)).unwrap();
        t.forward(rng.random_range(0.0..500.0)).unwrap();
        assert!(bounds.contains(t.position()), "{:?}", t.position());
    }

    // axis-aligned moves that land exactly on the max edges
    t.goto(0.0, 0.0).unwrap();
    t.set_heading(90.0).unwrap();
    t.forward(15.0).unwrap();
    assert_eq!(t.position(), Vec2::new(-15.0, 0.0));
    t.set_heading(0.0).unwrap();
    t.forward(10.0).unwrap();
    assert_eq!(t.position(), Vec2::new(-15.0, -10.0));
}

#[test]
fn test_circle_closes_and_restores_state() {
    let mut t = turtle(400.0, 400.0);
    t.set_heading(30.0).unwrap();

    t.circle(0.0, 0.0, 50.0).unwrap();

    assert_eq!(t.heading(), 30.0);
    assert!(t.state().redraw_on_move);

    let segments = t.image().stroked_segments();
    assert_eq!(segments.len(), 360);
    assert_eq!(segments[0].from, Vec2::new(-50.0, 0.0));

    let step = 50.0 / canvas_turtle::CIRCLE_STEP_DIVISOR;
    let first = segments[0].from;
    let last = segments[segments.len() - 1].to;
    assert!(first.distance(last) <= step);
}

#[test]
fn test_circle_keeps_redraw_disabled() {
    let mut t = turtle(400.0, 400.0);
    t.redraw_on_move(false);
    t.circle(10.0, -20.0, 30.0).unwrap();
    assert!(!t.state().redraw_on_move);
    assert_eq!(t.heading(), 0.0);
}
