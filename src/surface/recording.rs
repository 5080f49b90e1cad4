use std::time::Duration;

use anyhow::Result;

use crate::types::Point;

use super::{LineHandle, Surface, SurfaceError};

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    DrawLine {
        handle: LineHandle,
        from: Point,
        to: Point,
        stroke: String,
    },
    AnimateLineEndpoint {
        handle: LineHandle,
        to: Point,
        duration: Duration,
    },
    ClearAll,
}

/// A segment currently visible on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub stroke: String,
}

/// Surface that keeps a log of every call instead of drawing.
///
/// Endpoint tweens are treated as finished the moment they are requested,
/// so [`RecordingSurface::segments`] always shows final geometry.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    segments: Vec<(LineHandle, Segment)>,
    next_id: u64,
    rejected_stroke: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that fails every `draw_line` stroked with `stroke`.
    pub fn rejecting(stroke: impl Into<String>) -> Self {
        RecordingSurface {
            rejected_stroke: Some(stroke.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.segments.iter().map(|(_, s)| s.clone()).collect()
    }

    /// Number of `draw_line` calls seen so far, cleared or not.
    pub fn lines_drawn(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::DrawLine { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn draw_line(&mut self, from: Point, to: Point, stroke: &str) -> Result<LineHandle> {
        if self.rejected_stroke.as_deref() == Some(stroke) {
            return Err(SurfaceError::InvalidColor(stroke.to_string()).into());
        }
        self.next_id += 1;
        let handle = LineHandle::new(self.next_id);
        self.calls.push(SurfaceCall::DrawLine {
            handle,
            from,
            to,
            stroke: stroke.to_string(),
        });
        self.segments.push((
            handle,
            Segment {
                from,
                to,
                stroke: stroke.to_string(),
            },
        ));
        Ok(handle)
    }

    fn animate_line_endpoint(
        &mut self,
        handle: LineHandle,
        to: Point,
        duration: Duration,
    ) -> Result<()> {
        if handle.id() == 0 || handle.id() > self.next_id {
            return Err(SurfaceError::UnknownLine(handle).into());
        }
        self.calls.push(SurfaceCall::AnimateLineEndpoint {
            handle,
            to,
            duration,
        });
        if let Some((_, segment)) = self.segments.iter_mut().find(|(h, _)| *h == handle) {
            segment.to = to;
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.calls.push(SurfaceCall::ClearAll);
        self.segments.clear();
        Ok(())
    }
}
