/// What a frame callback wants after running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Run again on the next frame.
    Continue,
    /// Done; drop the callback.
    Finished,
}

/// Work that runs once per host animation frame.
pub trait FrameCallback {
    /// Called with the host's frame timestamp in milliseconds.
    fn on_frame(&mut self, timestamp_ms: f64) -> FrameStatus;
}

impl<F> FrameCallback for F
where
    F: FnMut(f64) -> FrameStatus,
{
    fn on_frame(&mut self, timestamp_ms: f64) -> FrameStatus {
        self(timestamp_ms)
    }
}

/// Host-driven animation frame queue.
///
/// Everything runs on the thread calling [`FrameScheduler::tick`]; a callback yields between
/// frames by returning. Callbacks run in registration order, so the most recently started one
/// draws last within a frame.
#[derive(Default)]
pub struct FrameScheduler {
    pending: Vec<Box<dyn FrameCallback>>,
    frames: u64,
}

impl FrameScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for the next frame and every frame after until it finishes.
    pub fn request(&mut self, callback: impl FrameCallback + 'static) {
        self.pending.push(Box::new(callback));
    }

    /// Run one frame at `timestamp_ms`. Returns the number of callbacks that ran.
    pub fn tick(&mut self, timestamp_ms: f64) -> usize {
        let ran = self.pending.len();
        self.pending
            .retain_mut(|cb| cb.on_frame(timestamp_ms) == FrameStatus::Continue);
        self.frames += 1;
        tracing::trace!(timestamp_ms, ran, remaining = self.pending.len(), "frame");
        ran
    }

    /// Tick at a fixed interval until idle or `max_frames` have run.
    ///
    /// Returns the timestamp of the last frame run, or `start_ms` if nothing was pending.
    pub fn run_until_idle(&mut self, start_ms: f64, interval_ms: f64, max_frames: u64) -> f64 {
        let mut ts = start_ms;
        let mut n = 0;
        while !self.is_idle() && n < max_frames {
            self.tick(ts);
            n += 1;
            if !self.is_idle() {
                ts += interval_ms;
            }
        }
        ts
    }

    /// Callbacks waiting for a frame.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is waiting for a frame.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Frames ticked so far.
    pub fn frames_ticked(&self) -> u64 {
        self.frames
    }

    /// Drop every pending callback, e.g. when the host tears down its surface.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending.len())
            .field("frames", &self.frames)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
