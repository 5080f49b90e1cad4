use std::time::Duration;

use ascii_turtle::{
    clock::FrameLatch,
    surface::{RecordingSurface, Segment, SurfaceCall, SurfaceError},
    turtle::Turtle,
    types::Point,
};

type TestTurtle = Turtle<RecordingSurface, FrameLatch>;

const SPEED: Duration = Duration::from_millis(100);

fn turtle_at(x: f64, y: f64) -> TestTurtle {
    Turtle::with_position(RecordingSurface::new(), FrameLatch::new(), x, y)
}

fn assert_close(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

/// Drive the frame loop by hand until the turtle has nothing left to do.
fn settle(t: &mut TestTurtle) {
    for _ in 0..10_000 {
        if t.clock_mut().take() {
            t.tick().unwrap();
        } else if let Some(handle) = t.in_flight() {
            t.animation_finished(handle);
        } else {
            assert!(t.is_idle());
            return;
        }
    }
    panic!("drain did not settle");
}

/// Strokes and final endpoints of every `draw_line`, in call order.
fn drawn(t: &TestTurtle) -> Vec<(Point, String)> {
    t.surface()
        .calls()
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::DrawLine { from, stroke, .. } => Some((*from, stroke.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn forward_from_centre_heading_up() {
    let mut t = turtle_at(400.0, 400.0);
    t.forward(100.0).unwrap();

    assert_close(t.position(), Point::new(400.0, 300.0));
    let segments = t.surface().segments();
    assert_eq!(segments.len(), 1);
    assert_close(segments[0].from, Point::new(400.0, 400.0));
    assert_close(segments[0].to, Point::new(400.0, 300.0));
}

#[test]
fn right_then_forward_moves_down() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_heading(0.0);
    t.right(90.0).unwrap().forward(50.0).unwrap();

    assert_eq!(t.heading(), -90.0);
    assert_close(t.position(), Point::new(0.0, 50.0));
}

#[test]
fn turn_composition() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_heading(10.0);
    t.right(25.0).unwrap().right(40.0).unwrap();
    assert_eq!(t.heading(), 10.0 - 65.0);

    t.left(73.5).unwrap().right(73.5).unwrap();
    assert_eq!(t.heading(), -55.0);
}

#[test]
fn back_matches_turn_around_forward_turn_back() {
    for heading in [0.0, 45.0, 90.0, 200.0, -30.0] {
        let mut t = turtle_at(100.0, 100.0);
        t.set_heading(heading);
        t.back(25.0).unwrap();

        let mut u = turtle_at(100.0, 100.0);
        u.set_heading(heading);
        u.right(180.0).unwrap().forward(25.0).unwrap().left(180.0).unwrap();

        assert_eq!(t.heading(), heading);
        assert_close(t.position(), u.position());
        let (a, b) = (&t.surface().segments()[0], &u.surface().segments()[0]);
        assert_close(a.from, b.from);
        assert_close(a.to, b.to);
    }
}

#[test]
fn immediate_mode_renders_every_call_before_the_next() {
    let mut t = turtle_at(0.0, 0.0);
    for i in 1..=5 {
        t.forward(10.0).unwrap();
        assert_eq!(t.surface().lines_drawn(), i);
        t.right(72.0).unwrap();
        assert_eq!(t.surface().calls().len(), i);
    }
    assert!(t.is_idle());
    assert_eq!(t.clock().requests(), 0);
}

#[test]
fn queued_lines_drain_in_order_one_completion_at_a_time() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_heading(0.0);
    t.set_animation(true, SPEED);
    t.forward(1.0).unwrap().forward(2.0).unwrap().forward(3.0).unwrap();
    assert!(t.surface().calls().is_empty());

    let mut started = Vec::new();
    for _ in 0..100 {
        if t.clock_mut().take() {
            t.tick().unwrap();
            if let Some(handle) = t.in_flight() {
                if started.last() != Some(&handle) {
                    // nothing else may start while this line animates
                    let before = t.surface().calls().len();
                    t.tick().unwrap();
                    assert_eq!(t.surface().calls().len(), before);
                    started.push(handle);
                }
            }
        } else if let Some(handle) = t.in_flight() {
            t.animation_finished(handle);
        } else {
            break;
        }
    }

    assert_eq!(started.len(), 3);
    let targets: Vec<f64> = t
        .surface()
        .calls()
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::AnimateLineEndpoint { to, .. } => Some(to.x),
            _ => None,
        })
        .collect();
    assert_eq!(targets, vec![1.0, 3.0, 6.0]);
    assert!(t.is_idle());
}

#[test]
fn queued_line_keeps_the_pen_color_it_was_issued_with() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_animation(true, SPEED);
    t.pen_color("red").forward(10.0).unwrap();
    t.pen_color("blue");
    settle(&mut t);

    assert_eq!(drawn(&t)[0].1, "red");
    assert_eq!(t.color(), "blue");
}

#[test]
fn geometry_runs_ahead_of_rendering() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_heading(0.0);
    t.set_animation(true, SPEED);
    t.forward(10.0).unwrap().left(90.0).unwrap().forward(10.0).unwrap();

    assert_close(t.position(), Point::new(10.0, -10.0));
    assert_eq!(t.heading(), 90.0);
    assert!(t.surface().calls().is_empty());
    assert_eq!(t.queued().count(), 4);
}

#[test]
fn switching_animation_off_flushes_backlog_without_animating() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_animation(true, SPEED);
    t.forward(1.0).unwrap();
    t.set_animation(false, SPEED);
    // still queued: the drain has not reached the marker yet
    t.forward(2.0).unwrap().forward(3.0).unwrap();
    assert!(t.surface().calls().is_empty());

    settle(&mut t);
    let animated = t
        .surface()
        .calls()
        .iter()
        .filter(|c| matches!(c, SurfaceCall::AnimateLineEndpoint { .. }))
        .count();
    assert_eq!(t.surface().lines_drawn(), 3);
    assert_eq!(animated, 1);

    // queue empty and animation off: straight to the surface
    t.forward(4.0).unwrap();
    assert_eq!(t.surface().lines_drawn(), 4);
}

#[test]
fn animation_resumes_after_a_later_switch_back_on() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_animation(true, SPEED);
    t.forward(1.0).unwrap();
    t.set_animation(false, SPEED);
    t.forward(2.0).unwrap();
    t.set_animation(true, SPEED);
    t.forward(3.0).unwrap();
    settle(&mut t);

    let kinds: Vec<&str> = t
        .surface()
        .calls()
        .iter()
        .map(|c| match c {
            SurfaceCall::DrawLine { from, to, .. } if from == to => "start",
            SurfaceCall::DrawLine { .. } => "line",
            SurfaceCall::AnimateLineEndpoint { .. } => "grow",
            SurfaceCall::ClearAll => "clear",
        })
        .collect();
    assert_eq!(kinds, vec!["start", "grow", "line", "start", "grow"]);
}

#[test]
fn clear_wipes_drawing_but_not_state() {
    let mut t = turtle_at(20.0, 20.0);
    t.forward(5.0).unwrap().right(90.0).unwrap().forward(5.0).unwrap();
    let (position, heading) = (t.position(), t.heading());

    t.clear().unwrap();

    assert_eq!(t.surface().segments(), Vec::<Segment>::new());
    assert_eq!(t.surface().calls().last(), Some(&SurfaceCall::ClearAll));
    assert_eq!(t.position(), position);
    assert_eq!(t.heading(), heading);
}

#[test]
fn clear_is_not_queued() {
    let mut t = turtle_at(0.0, 0.0);
    t.set_animation(true, SPEED);
    t.forward(5.0).unwrap();
    t.clear().unwrap();
    assert_eq!(t.surface().calls(), &[SurfaceCall::ClearAll]);

    settle(&mut t);
    assert_eq!(t.surface().segments().len(), 1);
}

#[test]
fn nan_flows_into_the_surface_unchanged() {
    let mut t = turtle_at(0.0, 0.0);
    t.forward(f64::NAN).unwrap();
    assert!(t.position().x.is_nan() && t.position().y.is_nan());

    let segment = &t.surface().segments()[0];
    assert_eq!(segment.from, Point::new(0.0, 0.0));
    assert!(segment.to.x.is_nan() && segment.to.y.is_nan());

    t.right(f64::INFINITY).unwrap();
    assert!(t.heading().is_nan());
}

#[test]
fn surface_errors_reach_the_caller() {
    let mut t = Turtle::with_position(RecordingSurface::rejecting("nope"), FrameLatch::new(), 0.0, 0.0);
    t.pen_color("nope");
    let err = t.forward(1.0).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SurfaceError>(),
        Some(&SurfaceError::InvalidColor("nope".into()))
    );

    // deferred lines fail when the drain reaches them
    t.set_animation(true, SPEED);
    t.forward(1.0).unwrap();
    assert!(t.clock_mut().take());
    t.tick().unwrap();
    assert!(t.clock_mut().take());
    assert!(t.tick().is_err());
}
