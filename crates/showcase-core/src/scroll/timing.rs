//! Time calculation utilities for scroll animations
//!
//! The clock is passed in rather than read, so animations can be driven by
//! frame timestamps or a virtual clock.

use std::time::{Duration, Instant};

/// Animation progress (0.0 to 1.0) at `now`
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Instant, now: Instant, duration: Duration) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(200.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_progress() {
        let start = Instant::now();
        let duration = Duration::from_millis(400);
        assert!((progress(start, start + Duration::from_millis(100), duration) - 0.25).abs() < 1e-9);
        assert_eq!(progress(start, start + Duration::from_secs(5), duration), 1.0);
        assert!(is_complete(start, start + duration, duration));
        assert!(!is_complete(start, start + Duration::from_millis(399), duration));
    }

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert!((progress(start, start, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clock_before_start() {
        let now = Instant::now();
        let start = now + Duration::from_millis(50);
        assert_eq!(progress(start, now, Duration::from_millis(100)), 0.0);
    }
}
