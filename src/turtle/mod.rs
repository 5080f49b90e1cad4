//! Turtle: position, heading and pen, plus the queue that paces drawing.
//!
//! Geometry is updated synchronously by every call. Drawing either reaches
//! the surface right away or waits in the queue (see `queue.rs`) until the
//! frame clock lets it through, so the state can run ahead of what is on
//! screen.

mod queue;

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;

use crate::clock::FrameClock;
use crate::surface::{LineHandle, Surface};
use crate::types::Point;

pub use queue::QueuedOp;

/// Heading of a fresh turtle: straight up.
pub const DEFAULT_HEADING: f64 = 90.0;
pub const DEFAULT_PEN_COLOR: &str = "#000";
pub const DEFAULT_ANIMATION_SPEED: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct Turtle<S, C> {
    surface: S,
    clock: C,
    position: Point,
    /// Degrees counter-clockwise from +x. Turns keep the sign of the
    /// truncated remainder, so this may be negative.
    heading: f64,
    pen_color: String,
    animating: bool,
    speed: Duration,
    queue: VecDeque<QueuedOp>,
    /// A tick has been requested or a line animation is in flight.
    draining: bool,
    in_flight: Option<LineHandle>,
}

impl<S: Surface, C: FrameClock> Turtle<S, C> {
    pub fn new(surface: S, clock: C) -> Self {
        Self::with_position(surface, clock, 0.0, 0.0)
    }

    pub fn with_position(surface: S, clock: C, x: f64, y: f64) -> Self {
        Turtle {
            surface,
            clock,
            position: Point::new(x, y),
            heading: DEFAULT_HEADING,
            pen_color: DEFAULT_PEN_COLOR.to_string(),
            animating: false,
            speed: DEFAULT_ANIMATION_SPEED,
            queue: VecDeque::new(),
            draining: false,
            in_flight: None,
        }
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    pub fn forward(&mut self, length: f64) -> Result<&mut Self> {
        self.draw_and_move(length)?;
        Ok(self)
    }

    /// Draw a segment behind the turtle without changing its heading.
    ///
    /// Queues the same half-turns as turning around, moving and turning back,
    /// but draws exactly what `forward(-length)` would.
    pub fn back(&mut self, length: f64) -> Result<&mut Self> {
        self.emit(QueuedOp::Turn { angle: -180.0 })?;
        self.draw_and_move(-length)?;
        self.emit(QueuedOp::Turn { angle: 180.0 })?;
        Ok(self)
    }

    pub fn right(&mut self, angle: f64) -> Result<&mut Self> {
        self.emit(QueuedOp::Turn { angle: -angle })?;
        self.heading = (self.heading - angle) % 360.0;
        Ok(self)
    }

    pub fn left(&mut self, angle: f64) -> Result<&mut Self> {
        self.emit(QueuedOp::Turn { angle })?;
        self.heading = (self.heading + angle) % 360.0;
        Ok(self)
    }

    /// Set the stroke for lines issued from now on. Lines already queued
    /// keep the color they were issued with.
    pub fn pen_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.pen_color = color.into();
        self
    }

    /// Jump to `(x, y)` without drawing.
    pub fn go_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn set_heading(&mut self, angle: f64) -> &mut Self {
        self.heading = angle;
        self
    }

    /// Wipe the surface right away. Position, heading, pen and any queued
    /// drawing are left alone.
    pub fn clear(&mut self) -> Result<&mut Self> {
        self.surface.clear_all()?;
        Ok(self)
    }

    fn draw_and_move(&mut self, length: f64) -> Result<()> {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let to = Point::new(
            self.position.x + length * cos,
            self.position.y - length * sin,
        );
        self.emit(QueuedOp::Line {
            from: self.position,
            to,
            pen_color: self.pen_color.clone(),
            speed: self.speed,
        })?;
        self.position = to;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn color(&self) -> &str {
        &self.pen_color
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn animation_speed(&self) -> Duration {
        self.speed
    }

    pub fn queued(&self) -> impl Iterator<Item = &QueuedOp> {
        self.queue.iter()
    }

    /// The line whose endpoint tween the drain is waiting on.
    pub fn in_flight(&self) -> Option<LineHandle> {
        self.in_flight
    }

    /// Nothing queued, nothing in flight and no tick outstanding.
    pub fn is_idle(&self) -> bool {
        !self.draining && self.queue.is_empty() && self.in_flight.is_none()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
