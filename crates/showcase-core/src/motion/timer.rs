//! Timer and animation-frame boundary

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

/// Repeating timers and one-shot frame callbacks
///
/// Firing is reported back by the host through `on_timer` / `on_frame` on the
/// coordinator. Clearing or cancelling an unknown handle is a no-op.
pub trait TimerHost {
    fn set_interval(&mut self, period: Duration) -> TimerHandle;
    fn clear_interval(&mut self, handle: TimerHandle);
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Holds at most one pending frame request
#[derive(Debug, Default)]
pub struct FrameSlot {
    pending: Option<FrameHandle>,
}

impl FrameSlot {
    /// Request a frame, cancelling the pending one first
    pub fn schedule<H: TimerHost + ?Sized>(&mut self, host: &mut H) -> FrameHandle {
        self.cancel(host);
        let handle = host.request_frame();
        self.pending = Some(handle);
        handle
    }

    pub fn cancel<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
    }

    /// Consume the slot if `handle` is the pending request
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHost {
        next: u64,
        live_frames: Vec<FrameHandle>,
    }

    impl TimerHost for CountingHost {
        fn set_interval(&mut self, _period: Duration) -> TimerHandle {
            self.next += 1;
            TimerHandle(self.next)
        }

        fn clear_interval(&mut self, _handle: TimerHandle) {}

        fn request_frame(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            self.live_frames.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.live_frames.retain(|h| *h != handle);
        }
    }

    #[test]
    fn test_schedule_cancels_previous() {
        let mut host = CountingHost::default();
        let mut slot = FrameSlot::default();

        let first = slot.schedule(&mut host);
        let second = slot.schedule(&mut host);

        assert_ne!(first, second);
        assert_eq!(host.live_frames, vec![second]);
        assert!(!slot.fire(first));
        assert!(slot.fire(second));
        assert!(!slot.is_pending());
    }
}
