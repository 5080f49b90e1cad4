//! Surface: the drawing capability the turtle renders through.
//!
//! A surface only knows about line objects: it can create one, tween its
//! endpoint over time, and drop everything it has drawn. It knows nothing
//! about headings, queues or pen state.

pub mod canvas;
pub mod recording;

use std::time::Duration;

use anyhow::Result;

use crate::types::Point;

pub use canvas::{Canvas, Viewport};
pub use recording::{RecordingSurface, Segment, SurfaceCall};

/// Identifies a line object created by [`Surface::draw_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineHandle(u64);

impl LineHandle {
    pub(crate) fn new(id: u64) -> Self {
        LineHandle(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Invalid stroke color: {0:?}")]
    InvalidColor(String),

    #[error("Unknown line handle: {0:?}")]
    UnknownLine(LineHandle),
}

pub trait Surface {
    /// Draw a straight segment stroked with `stroke`.
    fn draw_line(&mut self, from: Point, to: Point, stroke: &str) -> Result<LineHandle>;

    /// Start moving the endpoint of `handle` to `to` over `duration`.
    ///
    /// The surface does not call back into the turtle; whoever drives the
    /// surface reports completion through `Turtle::animation_finished`.
    fn animate_line_endpoint(&mut self, handle: LineHandle, to: Point, duration: Duration)
        -> Result<()>;

    /// Remove every element drawn so far.
    fn clear_all(&mut self) -> Result<()>;
}
