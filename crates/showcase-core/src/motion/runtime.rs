//! Real-time timer host on tokio
//!
//! Each interval or frame request is a spawned task that reports back over
//! an unbounded channel; clearing a handle aborts its task. Must be used
//! from within a tokio runtime.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::timer::{FrameHandle, TimerHandle, TimerHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Interval(TimerHandle),
    Frame(FrameHandle),
}

pub struct TokioTimers {
    tx: mpsc::UnboundedSender<TimerEvent>,
    tasks: HashMap<u64, JoinHandle<()>>,
    next_id: u64,
    frame_period: Duration,
}

impl TokioTimers {
    /// Create a host; frame requests fire after `frame_period`
    pub fn new(frame_period: Duration) -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timers = Self {
            tx,
            tasks: HashMap::new(),
            next_id: 0,
            frame_period,
        };
        (timers, rx)
    }

    fn next_id(&mut self) -> u64 {
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        self.next_id
    }

    fn abort(&mut self, id: u64) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }

    /// Number of timers or frame requests still scheduled
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl TimerHost for TokioTimers {
    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let id = self.next_id();
        let handle = TimerHandle(id);
        let period = period.max(Duration::from_millis(1));
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if tx.send(TimerEvent::Interval(handle)).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(id, task);
        debug!(timer = id, period_ms = period.as_millis() as u64, "Interval scheduled");
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.abort(handle.0);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let id = self.next_id();
        let handle = FrameHandle(id);
        let delay = self.frame_period;
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(TimerEvent::Frame(handle));
        });
        self.tasks.insert(id, task);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.abort(handle.0);
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Rotator;

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticks_until_cleared() {
        let (mut timers, mut rx) = TokioTimers::new(Duration::from_millis(16));
        let handle = timers.set_interval(Duration::from_millis(5200));

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(TimerEvent::Interval(handle)));
        }

        timers.clear_interval(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(timers.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_frame_never_fires() {
        let (mut timers, mut rx) = TokioTimers::new(Duration::from_millis(16));
        let first = timers.request_frame();
        timers.cancel_frame(first);
        let second = timers.request_frame();

        assert_eq!(rx.recv().await, Some(TimerEvent::Frame(second)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotator_on_tokio_timers() {
        let (mut timers, mut rx) = TokioTimers::new(Duration::from_millis(16));
        let items = vec!["reading".to_string(), "building".to_string(), "hiking".to_string()];
        let mut rotator = Rotator::new(items, Duration::from_millis(5200));
        assert!(rotator.start(&mut timers, true));

        let mut seen = Vec::new();
        while seen.len() < 4 {
            if let Some(TimerEvent::Interval(handle)) = rx.recv().await {
                if let Some(index) = rotator.on_tick(handle, &mut timers, true) {
                    seen.push(index);
                }
            }
        }
        assert_eq!(seen, vec![1, 2, 0, 1]);

        rotator.stop(&mut timers);
        assert_eq!(timers.active(), 0);
    }
}
