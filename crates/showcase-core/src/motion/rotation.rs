//! Rotating "now" widget

use std::time::Duration;

use tracing::debug;

use super::timer::{TimerHandle, TimerHost};

#[derive(Debug, Clone)]
pub struct Rotator {
    items: Vec<String>,
    index: usize,
    interval: Duration,
    timer: Option<TimerHandle>,
}

impl Rotator {
    pub fn new(items: Vec<String>, interval: Duration) -> Self {
        Self {
            items,
            index: 0,
            interval,
            timer: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.index).map(String::as_str)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Start the rotation timer
    ///
    /// Any running timer is cleared first. Nothing is scheduled for fewer
    /// than two items or while motion is denied. Returns whether a timer is
    /// now running.
    pub fn start<H: TimerHost + ?Sized>(&mut self, host: &mut H, motion_allowed: bool) -> bool {
        self.stop(host);
        if self.items.len() < 2 || !motion_allowed {
            return false;
        }
        self.timer = Some(host.set_interval(self.interval));
        debug!(items = self.items.len(), interval_ms = self.interval.as_millis() as u64, "Rotation started");
        true
    }

    /// Returns whether a timer was running
    pub fn stop<H: TimerHost + ?Sized>(&mut self, host: &mut H) -> bool {
        match self.timer.take() {
            Some(handle) => {
                host.clear_interval(handle);
                true
            }
            None => false,
        }
    }

    /// Handle a timer tick, returning the new index
    ///
    /// Stale handles are ignored. A tick that arrives while motion is denied
    /// stops the rotation instead of advancing.
    pub fn on_tick<H: TimerHost + ?Sized>(
        &mut self,
        handle: TimerHandle,
        host: &mut H,
        motion_allowed: bool,
    ) -> Option<usize> {
        if self.timer != Some(handle) {
            return None;
        }
        if !motion_allowed {
            self.stop(host);
            return None;
        }
        if self.items.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.items.len();
        Some(self.index)
    }
}
