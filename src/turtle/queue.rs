//! Animation sequencer.
//!
//! With animation off and nothing pending, operations render straight into
//! the surface. Otherwise they are appended to a FIFO that is drained one
//! entry per clock tick. An animated line holds the drain until its tween
//! is reported finished. Mode switches travel through the same FIFO as
//! markers, so work issued under the old mode still drains under it.

use std::time::Duration;

use anyhow::Result;

use crate::clock::FrameClock;
use crate::surface::{LineHandle, Surface};
use crate::types::Point;

use super::Turtle;

#[derive(Debug, Clone, PartialEq)]
pub enum QueuedOp {
    /// A segment, with the pen color and animation speed in effect when it
    /// was issued.
    Line {
        from: Point,
        to: Point,
        pen_color: String,
        speed: Duration,
    },
    /// A heading change. Has no visual; only holds its place in the order.
    Turn { angle: f64 },
    AnimationOn,
    AnimationOff,
}

impl<S: Surface, C: FrameClock> Turtle<S, C> {
    /// Switch animation on or off for operations issued from now on.
    ///
    /// The switch is also queued as a marker, so the drain only changes
    /// behaviour once it reaches the point where the switch was made.
    pub fn set_animation(&mut self, enabled: bool, speed: Duration) {
        let marker = match (self.animating, enabled) {
            (true, false) => Some(QueuedOp::AnimationOff),
            (false, true) => Some(QueuedOp::AnimationOn),
            _ => None,
        };
        if let Some(marker) = marker {
            log::trace!("queueing {marker:?}");
            self.queue.push_back(marker);
            self.schedule_drain();
        }
        self.animating = enabled;
        self.speed = speed;
    }

    /// Drain one queue entry. Call once per frame when the clock fired.
    ///
    /// A failing render ends the current drain and is returned; whatever
    /// is still queued starts a fresh drain with the next operation.
    pub fn tick(&mut self) -> Result<()> {
        if let Some(handle) = self.in_flight {
            log::trace!("tick while {handle:?} is animating, ignored");
            return Ok(());
        }
        let result = self.drain_one();
        if result.is_err() {
            self.draining = false;
        }
        result
    }

    /// Report that the endpoint tween for `handle` has finished.
    pub fn animation_finished(&mut self, handle: LineHandle) {
        if self.in_flight != Some(handle) {
            log::warn!("completion for {handle:?} does not match the line in flight, ignored");
            return;
        }
        self.in_flight = None;
        self.request_next_tick();
    }

    /// Route an operation: render now when idle, otherwise queue it.
    pub(super) fn emit(&mut self, op: QueuedOp) -> Result<()> {
        if !self.animating && self.queue.is_empty() {
            return self.render_immediate(op);
        }
        self.queue.push_back(op);
        self.schedule_drain();
        Ok(())
    }

    fn drain_one(&mut self) -> Result<()> {
        let Some(op) = self.queue.pop_front() else {
            log::trace!("queue drained");
            self.draining = false;
            return Ok(());
        };

        match op {
            QueuedOp::AnimationOff => {
                // Flush the backlog without animating, up to the next switch back on.
                while self
                    .queue
                    .front()
                    .is_some_and(|next| *next != QueuedOp::AnimationOn)
                {
                    if let Some(op) = self.queue.pop_front() {
                        if let Err(err) = self.render_immediate(op) {
                            self.resume_flush_later();
                            return Err(err);
                        }
                    }
                }
                self.continue_drain();
            }
            QueuedOp::AnimationOn | QueuedOp::Turn { .. } => self.continue_drain(),
            QueuedOp::Line {
                from,
                to,
                pen_color,
                speed,
            } => {
                log::debug!("starting: line {from:?} -> {to:?} {pen_color} over {speed:?}");
                let handle = self.surface.draw_line(from, from, &pen_color)?;
                self.surface.animate_line_endpoint(handle, to, speed)?;
                self.in_flight = Some(handle);
            }
        }
        Ok(())
    }

    fn render_immediate(&mut self, op: QueuedOp) -> Result<()> {
        if let QueuedOp::Line {
            from, to, pen_color, ..
        } = op
        {
            log::debug!("immediate: line {from:?} -> {to:?} {pen_color}");
            self.surface.draw_line(from, to, &pen_color)?;
        }
        Ok(())
    }

    /// Put the off marker back in front of whatever the failed flush left,
    /// so the next drain keeps rendering it without animation.
    fn resume_flush_later(&mut self) {
        if self
            .queue
            .front()
            .is_some_and(|next| *next != QueuedOp::AnimationOn)
        {
            self.queue.push_front(QueuedOp::AnimationOff);
        }
    }

    /// Ask for the next tick, or end the drain when nothing is left.
    fn continue_drain(&mut self) {
        if self.queue.is_empty() {
            log::trace!("queue drained");
            self.draining = false;
        } else {
            self.request_next_tick();
        }
    }

    /// Start a drain unless one is already running.
    fn schedule_drain(&mut self) {
        if !self.draining {
            self.request_next_tick();
        }
    }

    fn request_next_tick(&mut self) {
        self.draining = true;
        self.clock.request_tick();
    }
}
