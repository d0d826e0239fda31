//! Scroll animation controller
//!
//! Combines easing and timing to interpolate the window scroll position
//! between an anchor click and the target section.

use std::time::{Duration, Instant};

use super::config::ScrollConfig;
use super::easing::EasingType;
use super::timing::{is_complete, lerp, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Scroll animation controller
///
/// Call `scroll_to()` to begin an animation, then `update()` on every frame
/// to get the current interpolated scroll position.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: f64,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current_scroll: 0.0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[inline]
    pub fn current_scroll(&self) -> f64 {
        self.current_scroll
    }

    /// Set scroll position immediately (user scrolled, no animation)
    pub fn set_scroll(&mut self, scroll: f64) {
        self.animation = None;
        self.current_scroll = scroll;
    }

    /// Start a scroll animation to `target`
    ///
    /// Jumps immediately when smoothing is disabled. A running animation is
    /// replaced and the new one starts from the current visible position.
    pub fn scroll_to(&mut self, target: f64, max_scroll: f64, now: Instant) {
        let target = target.clamp(0.0, max_scroll.max(0.0));

        if !self.config.is_smooth() {
            self.current_scroll = target;
            self.animation = None;
            return;
        }

        let from = self.current_scroll;
        if (from - target).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    /// Advance the animation and return the current scroll position
    pub fn update(&mut self, now: Instant) -> f64 {
        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, now, anim.duration) {
                self.current_scroll = anim.to;
                self.animation = None;
            } else {
                let t = progress(anim.start, now, anim.duration);
                let eased_t = anim.easing.apply(t);
                self.current_scroll = lerp(anim.from, anim.to, eased_t);
            }
        }

        self.current_scroll
    }

    /// Skip to the end of the running animation
    pub fn finish(&mut self) -> f64 {
        if let Some(anim) = self.animation.take() {
            self.current_scroll = anim.to;
        }
        self.current_scroll
    }

    /// Cancel any active animation and stop at the current position
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}
