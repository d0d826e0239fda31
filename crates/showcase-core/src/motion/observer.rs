//! Intersection observation boundary
//!
//! The platform owns the actual visibility computation (a browser
//! `IntersectionObserver`, or [`VirtualPlatform`](super::VirtualPlatform));
//! the coordinator only subscribes, unsubscribes and consumes entries.

use serde::{Deserialize, Serialize};

use super::geometry::RootMargin;

/// Stable index of a registered reveal element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// Index into the ordered section list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// What an observation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    Reveal(ElementId),
    Section(SectionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Visible fraction at which the observer fires
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    pub fn new(threshold: f64, root_margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
        }
    }
}

/// One visibility notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub subscription: SubscriptionId,
    pub target: Target,
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Whether this entry reports the target at or past `threshold`
    #[inline]
    pub fn crosses(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// Source of visibility notifications
///
/// Entries are not returned from here; the host delivers them in batches to
/// [`MotionCoordinator::on_intersections`](super::MotionCoordinator::on_intersections).
pub trait IntersectionSource {
    fn observe(&mut self, target: Target, options: ObserverOptions) -> SubscriptionId;

    /// Stop delivering entries for `subscription`. Unknown ids are ignored.
    fn unobserve(&mut self, subscription: SubscriptionId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crosses_requires_intersection() {
        let entry = IntersectionEntry {
            subscription: SubscriptionId(1),
            target: Target::Reveal(ElementId(0)),
            ratio: 0.5,
            is_intersecting: false,
        };
        assert!(!entry.crosses(0.18));
        assert!(IntersectionEntry { is_intersecting: true, ..entry }.crosses(0.18));
        assert!(!IntersectionEntry { ratio: 0.1, is_intersecting: true, ..entry }.crosses(0.18));
    }

    #[test]
    fn test_options_clamp_threshold() {
        assert_eq!(ObserverOptions::new(1.5, RootMargin::NONE).threshold, 1.0);
    }
}
