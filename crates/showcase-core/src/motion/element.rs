use serde::{Deserialize, Serialize};

use super::observer::{ElementId, SubscriptionId};

/// Element handed to [`MotionCoordinator::register`](super::MotionCoordinator::register)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTarget {
    pub name: String,
    /// Explicit `data-delay` override in milliseconds
    #[serde(default)]
    pub delay_ms: Option<u32>,
}

impl RevealTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delay_ms: None,
        }
    }

    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}

/// Per-element reveal state
#[derive(Debug)]
pub struct AnimatableElement {
    id: ElementId,
    name: String,
    revealed: bool,
    delay_ms: u32,
    pub(super) subscription: Option<SubscriptionId>,
}

impl AnimatableElement {
    pub(super) fn new(id: ElementId, name: String, delay_ms: u32) -> Self {
        Self {
            id,
            name,
            revealed: false,
            delay_ms,
            subscription: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn is_observed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Flip to revealed. Returns the subscription to cancel, if any.
    ///
    /// Returns `None` and changes nothing when already revealed.
    pub(super) fn mark_revealed(&mut self) -> Option<Option<SubscriptionId>> {
        if self.revealed {
            return None;
        }
        self.revealed = true;
        Some(self.subscription.take())
    }

    pub(super) fn clear_delay(&mut self) {
        self.delay_ms = 0;
    }
}

/// Staggered entrance delay for the element at `ordinal`
#[inline]
pub fn stagger_delay(ordinal: usize, step_ms: u32, max_ms: u32) -> u32 {
    let delay = (ordinal as u64).saturating_mul(step_ms as u64);
    delay.min(max_ms as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stagger_delay_caps() {
        let delays: Vec<u32> = (0..9).map(|i| stagger_delay(i, 80, 480)).collect();
        assert_eq!(delays, vec![0, 80, 160, 240, 320, 400, 480, 480, 480]);
    }

    #[test]
    fn test_stagger_delay_huge_ordinal() {
        assert_eq!(stagger_delay(usize::MAX, 80, 480), 480);
    }

    #[test]
    fn test_mark_revealed_once() {
        let mut element = AnimatableElement::new(ElementId(0), "hero".into(), 80);
        element.subscription = Some(SubscriptionId(7));

        assert_eq!(element.mark_revealed(), Some(Some(SubscriptionId(7))));
        assert!(element.is_revealed());
        assert!(!element.is_observed());
        assert_eq!(element.mark_revealed(), None);
        assert!(element.is_revealed());
    }
}
