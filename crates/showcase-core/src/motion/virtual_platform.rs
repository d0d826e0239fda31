//! Deterministic in-memory platform
//!
//! Lays out targets as rectangles on a page, tracks a scroll position and a
//! virtual clock, and behaves like a browser `IntersectionObserver`: an entry
//! is produced when a subscription starts, whenever the target crosses its
//! threshold in either direction, and whenever it starts or stops
//! intersecting the root.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::{Duration, Instant};

use super::geometry::{intersection_ratio, Rect};
use super::observer::{IntersectionEntry, IntersectionSource, ObserverOptions, SubscriptionId, Target};
use super::timer::{FrameHandle, TimerHandle, TimerHost};
use super::MotionQuery;

/// An interval firing at virtual time `at` (since the platform was created)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub at: Duration,
    pub handle: TimerHandle,
}

#[derive(Debug)]
struct Observation {
    target: Target,
    options: ObserverOptions,
    /// `(is_intersecting, at_threshold)` last reported, `None` before the
    /// initial entry
    last_state: Option<(bool, bool)>,
}

#[derive(Debug)]
struct Interval {
    period: Duration,
    next_due: Duration,
}

#[derive(Debug)]
pub struct VirtualPlatform {
    viewport_width: f64,
    viewport_height: f64,
    scroll_y: f64,
    motion_allowed: bool,
    layout: HashMap<Target, Rect>,
    subscriptions: BTreeMap<SubscriptionId, Observation>,
    observe_calls: HashMap<Target, usize>,
    unobserve_calls: HashMap<Target, usize>,
    intervals: BTreeMap<TimerHandle, Interval>,
    frames: BTreeSet<FrameHandle>,
    next_id: u64,
    origin: Instant,
    elapsed: Duration,
}

impl VirtualPlatform {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            scroll_y: 0.0,
            motion_allowed: true,
            layout: HashMap::new(),
            subscriptions: BTreeMap::new(),
            observe_calls: HashMap::new(),
            unobserve_calls: HashMap::new(),
            intervals: BTreeMap::new(),
            frames: BTreeSet::new(),
            next_id: 0,
            origin: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Position a target on the page
    pub fn place(&mut self, target: Target, rect: Rect) {
        self.layout.insert(target, rect);
    }

    pub fn set_scroll(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn set_motion_allowed(&mut self, allowed: bool) {
        self.motion_allowed = allowed;
    }

    /// Visible page area at the current scroll position
    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.viewport_width, self.viewport_height)
    }

    /// Current virtual time as an `Instant`
    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Entries for every subscription whose intersection or threshold state changed
    pub fn take_intersections(&mut self) -> Vec<IntersectionEntry> {
        let viewport = self.viewport();
        let mut entries = Vec::new();

        for (id, observation) in self.subscriptions.iter_mut() {
            let Some(rect) = self.layout.get(&observation.target) else {
                continue;
            };
            let (ratio, is_intersecting) =
                intersection_ratio(rect, &viewport, &observation.options.root_margin);
            let at_threshold = is_intersecting && ratio >= observation.options.threshold;
            let state = (is_intersecting, at_threshold);

            if observation.last_state != Some(state) {
                observation.last_state = Some(state);
                entries.push(IntersectionEntry {
                    subscription: *id,
                    target: observation.target,
                    ratio,
                    is_intersecting,
                });
            }
        }

        entries
    }

    /// Move the clock forward, returning interval ticks in firing order
    pub fn advance(&mut self, by: Duration) -> Vec<TimerTick> {
        let until = self.elapsed + by;
        let mut ticks = Vec::new();

        loop {
            let due = self
                .intervals
                .iter()
                .filter(|(_, interval)| interval.next_due <= until)
                .min_by_key(|(handle, interval)| (interval.next_due, **handle))
                .map(|(handle, _)| *handle);
            let Some(handle) = due else {
                break;
            };
            if let Some(interval) = self.intervals.get_mut(&handle) {
                ticks.push(TimerTick {
                    at: interval.next_due,
                    handle,
                });
                interval.next_due += interval.period;
            }
        }

        self.elapsed = until;
        ticks
    }

    /// Drain pending frame requests (the next paint)
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    pub fn subscription_for(&self, target: Target) -> Option<SubscriptionId> {
        self.subscriptions
            .iter()
            .find(|(_, observation)| observation.target == target)
            .map(|(id, _)| *id)
    }

    pub fn is_observed(&self, target: Target) -> bool {
        self.subscription_for(target).is_some()
    }

    pub fn observe_calls(&self, target: Target) -> usize {
        self.observe_calls.get(&target).copied().unwrap_or(0)
    }

    pub fn unobserve_calls(&self, target: Target) -> usize {
        self.unobserve_calls.get(&target).copied().unwrap_or(0)
    }

    pub fn live_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn live_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }
}

impl IntersectionSource for VirtualPlatform {
    fn observe(&mut self, target: Target, options: ObserverOptions) -> SubscriptionId {
        let id = SubscriptionId(self.next_id());
        self.subscriptions.insert(
            id,
            Observation {
                target,
                options,
                last_state: None,
            },
        );
        *self.observe_calls.entry(target).or_default() += 1;
        id
    }

    fn unobserve(&mut self, subscription: SubscriptionId) {
        if let Some(observation) = self.subscriptions.remove(&subscription) {
            *self.unobserve_calls.entry(observation.target).or_default() += 1;
        }
    }
}

impl TimerHost for VirtualPlatform {
    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        // Zero periods would never let the clock advance
        let period = period.max(Duration::from_millis(1));
        self.intervals.insert(
            handle,
            Interval {
                period,
                next_due: self.elapsed + period,
            },
        );
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.intervals.remove(&handle);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.remove(&handle);
    }
}

impl MotionQuery for VirtualPlatform {
    fn motion_allowed(&self) -> bool {
        self.motion_allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::geometry::RootMargin;
    use crate::motion::observer::ElementId;

    #[test]
    fn test_entries_on_initial_and_state_changes_only() {
        let mut platform = VirtualPlatform::new(1000.0, 1000.0);
        let target = Target::Reveal(ElementId(0));
        platform.place(target, Rect::new(0.0, 1500.0, 1000.0, 200.0));
        platform.observe(target, ObserverOptions::new(0.18, RootMargin::vertical(0.0, 0.10)));

        // Initial entry: not visible
        let initial = platform.take_intersections();
        assert_eq!(initial.len(), 1);
        assert!(!initial[0].is_intersecting);

        // Still outside the trimmed viewport: no entry
        platform.set_scroll(550.0);
        assert!(platform.take_intersections().is_empty());

        // Starts intersecting below the threshold: 20/200 visible
        platform.set_scroll(620.0);
        let touching = platform.take_intersections();
        assert_eq!(touching.len(), 1);
        assert!(touching[0].is_intersecting);
        assert!(!touching[0].crosses(0.18));
        assert!(platform.take_intersections().is_empty());

        // Visible band is 700..1600 at scroll 700: 100/200 visible
        platform.set_scroll(700.0);
        let crossed = platform.take_intersections();
        assert_eq!(crossed.len(), 1);
        assert!(crossed[0].crosses(0.18));
        assert!((crossed[0].ratio - 0.5).abs() < 1e-9);

        assert!(platform.take_intersections().is_empty());

        // Dropping back below the threshold while still intersecting
        platform.set_scroll(620.0);
        let receded = platform.take_intersections();
        assert_eq!(receded.len(), 1);
        assert!(receded[0].is_intersecting);
        assert!(!receded[0].crosses(0.18));
    }

    #[test]
    fn test_intervals_fire_in_order_and_clear() {
        let mut platform = VirtualPlatform::new(800.0, 600.0);
        let slow = platform.set_interval(Duration::from_millis(300));
        let fast = platform.set_interval(Duration::from_millis(200));

        let ticks = platform.advance(Duration::from_millis(600));
        let order: Vec<(u64, TimerHandle)> = ticks
            .iter()
            .map(|t| (t.at.as_millis() as u64, t.handle))
            .collect();
        assert_eq!(
            order,
            vec![(200, fast), (300, slow), (400, fast), (600, slow), (600, fast)]
        );

        platform.clear_interval(fast);
        let ticks = platform.advance(Duration::from_millis(300));
        assert_eq!(ticks, vec![TimerTick { at: Duration::from_millis(900), handle: slow }]);
        assert_eq!(platform.now(), platform.origin + Duration::from_millis(900));
    }

    #[test]
    fn test_unobserve_counts_once() {
        let mut platform = VirtualPlatform::new(800.0, 600.0);
        let target = Target::Reveal(ElementId(3));
        let id = platform.observe(target, ObserverOptions::new(0.5, RootMargin::NONE));
        platform.unobserve(id);
        platform.unobserve(id);
        assert_eq!(platform.unobserve_calls(target), 1);
        assert_eq!(platform.live_subscriptions(), 0);
    }

    #[test]
    fn test_frames_drain() {
        let mut platform = VirtualPlatform::new(800.0, 600.0);
        let a = platform.request_frame();
        let b = platform.request_frame();
        platform.cancel_frame(a);
        assert_eq!(platform.take_frames(), vec![b]);
        assert_eq!(platform.pending_frames(), 0);
    }
}
