//! Frame clock capability.
//!
//! The turtle never waits on a display itself. It asks its clock for a tick
//! and whoever owns the display loop calls `Turtle::tick` when the next
//! frame comes around.

pub trait FrameClock {
    /// Ask for one call to `Turtle::tick` on the next display refresh.
    fn request_tick(&mut self);
}

/// Remembers a pending tick request until the frame loop consumes it.
///
/// Several requests before the next frame collapse into one tick.
#[derive(Debug, Default)]
pub struct FrameLatch {
    pending: bool,
    requests: usize,
}

impl FrameLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, returning whether there was one.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// How many times a tick has been requested over the latch's lifetime.
    pub fn requests(&self) -> usize {
        self.requests
    }
}

impl FrameClock for FrameLatch {
    fn request_tick(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}
