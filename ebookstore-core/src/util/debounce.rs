//!  src/util/debounce.rs
//!  ===================================================================
//!  Debounce / throttle helpers for UI input.
//!
//!  • Debouncing itself is carried by the keyed [`Scheduler`]: re-scheduling
//!    under the same key drops the earlier task, so only the last input of a
//!    burst survives the quiet period, configured as
//!    `Timings::search_debounce`.
//!  • [`FrameThrottle`] coalesces high-frequency events (scroll) so their
//!    work runs at most once per animation frame.
//!
//!  [`Scheduler`]: crate::util::scheduler::Scheduler

use tracing::trace;

/* ========================== FrameThrottle =========================== */

/// `requestAnimationFrame`-style coalescing: the first event of a frame
/// requests a frame, later ones are absorbed until the frame runs.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    ticking: bool,
    absorbed: u64,
}

impl FrameThrottle {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticking: false,
            absorbed: 0,
        }
    }

    /// Record an event. Returns true when this event requested a frame.
    pub fn request(&mut self) -> bool {
        if self.ticking {
            self.absorbed += 1;
            false
        } else {
            self.ticking = true;
            true
        }
    }

    /// Frame callback. Returns true when a frame was pending, i.e. when the
    /// throttled work should run now.
    pub fn on_frame(&mut self) -> bool {
        if !self.ticking {
            return false;
        }
        trace!(absorbed = self.absorbed, "frame flush");
        self.ticking = false;
        self.absorbed = 0;
        true
    }

    pub const fn is_pending(&self) -> bool {
        self.ticking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_events_one_frame() {
        let mut throttle = FrameThrottle::new();

        assert!(throttle.request());
        assert!(!throttle.request());
        assert!(!throttle.request());
        assert!(throttle.is_pending());

        assert!(throttle.on_frame());
        assert!(!throttle.on_frame());
        assert!(throttle.request());
    }
}
