use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::scroll::{anchor_id, anchor_target, ScrollAnimator};

use super::active_section::ActiveSectionTracker;
use super::effects::{GlowPoint, ParallaxLayer};
use super::element::{stagger_delay, AnimatableElement, RevealTarget};
use super::geometry::{Rect, RootMargin};
use super::observer::{ElementId, IntersectionEntry, ObserverOptions, SectionId, SubscriptionId, Target};
use super::rotation::Rotator;
use super::timer::{FrameHandle, FrameSlot, TimerHandle};
use super::Platform;

/// State changes the host mirrors onto the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotionEvent {
    /// Add `in-view`; `delay_ms` is the transition delay to apply
    Revealed {
        element: ElementId,
        delay_ms: u32,
        animated: bool,
    },
    /// Move `is-active` to this section's nav link
    ActiveSectionChanged { section: SectionId },
    RotationStarted,
    Rotated { index: usize },
    RotationStopped,
    ParallaxUpdated { layer: usize, offset: f64 },
    GlowMoved { card: usize, point: GlowPoint },
    GlowCleared { card: usize },
    HeaderScrolled { scrolled: bool },
    /// Programmatic scroll position (smooth anchor navigation)
    Scrolled { y: f64 },
    MotionPreferenceChanged { allowed: bool },
}

/// Single-threaded coordinator for reveal animations and motion effects
///
/// Every entry point is a reaction to one platform callback. Nothing here
/// blocks or panics on missing targets; unknown ids are ignored.
pub struct MotionCoordinator<P: Platform> {
    platform: P,
    reveal_options: ObserverOptions,
    section_options: ObserverOptions,
    stagger_step_ms: u32,
    max_delay_ms: u32,
    elements: Vec<AnimatableElement>,
    /// `observe()` was called; later registrations subscribe immediately
    observing: bool,
    sections: ActiveSectionTracker,
    section_subscriptions: Vec<SubscriptionId>,
    rotation_interval: Duration,
    rotator: Option<Rotator>,
    parallax: Vec<ParallaxLayer>,
    parallax_offsets: Vec<f64>,
    glowing: BTreeSet<usize>,
    scroll: ScrollAnimator,
    scroll_y: f64,
    header_offset: f64,
    scrolled_offset: f64,
    header_scrolled: bool,
    frame: FrameSlot,
    event_tx: Option<mpsc::UnboundedSender<MotionEvent>>,
}

impl<P: Platform> MotionCoordinator<P> {
    pub fn new(platform: P, config: &AppConfig) -> Self {
        let reveal_options = ObserverOptions::new(
            config.reveal.threshold,
            RootMargin::vertical(0.0, config.reveal.bottom_margin),
        );
        let section_options = ObserverOptions::new(
            config.sections.threshold,
            RootMargin::vertical(config.sections.top_margin, config.sections.bottom_margin),
        );

        Self {
            platform,
            reveal_options,
            section_options,
            stagger_step_ms: config.reveal.stagger_step_ms,
            max_delay_ms: config.reveal.max_delay_ms,
            elements: Vec::new(),
            observing: false,
            sections: ActiveSectionTracker::new(Vec::new()),
            section_subscriptions: Vec::new(),
            rotation_interval: Duration::from_millis(config.rotation.interval_ms),
            rotator: None,
            parallax: Vec::new(),
            parallax_offsets: Vec::new(),
            glowing: BTreeSet::new(),
            scroll: ScrollAnimator::new(config.scroll.clone()),
            scroll_y: 0.0,
            header_offset: config.header.anchor_offset,
            scrolled_offset: config.header.scrolled_offset,
            header_scrolled: false,
            frame: FrameSlot::default(),
            event_tx: None,
        }
    }

    /// Set the channel the host reads [`MotionEvent`]s from
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<MotionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn with_parallax(mut self, layers: Vec<ParallaxLayer>) -> Self {
        self.parallax_offsets = vec![0.0; layers.len()];
        self.parallax = layers;
        self
    }

    fn send_event(&self, event: MotionEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send motion event: receiver dropped");
            }
        }
    }

    #[inline]
    fn motion_allowed(&self) -> bool {
        self.platform.motion_allowed()
    }

    // ---- reveal -----------------------------------------------------------

    /// Register reveal elements and assign their entrance delays
    ///
    /// Elements without an explicit delay get `min(ordinal * step, max)`,
    /// where the ordinal is the registration position. With motion denied
    /// every element is revealed on the spot with no delay and is never
    /// observed.
    pub fn register<I>(&mut self, targets: I) -> Vec<ElementId>
    where
        I: IntoIterator<Item = RevealTarget>,
    {
        let mut ids = Vec::new();

        for target in targets {
            let id = ElementId(self.elements.len());
            let delay_ms = target
                .delay_ms
                .unwrap_or_else(|| stagger_delay(id.0, self.stagger_step_ms, self.max_delay_ms));
            self.elements.push(AnimatableElement::new(id, target.name, delay_ms));

            if !self.motion_allowed() {
                self.reveal(id, false);
            } else if self.observing {
                self.subscribe(id);
            }
            ids.push(id);
        }

        debug!(count = ids.len(), total = self.elements.len(), "Registered reveal elements");
        ids
    }

    /// Start watching every unrevealed element
    ///
    /// With motion denied nothing is watched and everything is revealed.
    pub fn observe(&mut self) {
        self.observing = true;

        if !self.motion_allowed() {
            let revealed = self.reveal_all();
            info!(revealed, "Reduced motion: revealing all elements without animation");
            return;
        }

        for index in 0..self.elements.len() {
            self.subscribe(ElementId(index));
        }
    }

    fn subscribe(&mut self, id: ElementId) {
        let options = self.reveal_options;
        let Some(element) = self.elements.get_mut(id.0) else {
            return;
        };
        if element.is_revealed() || element.is_observed() {
            return;
        }
        element.subscription = Some(self.platform.observe(Target::Reveal(id), options));
    }

    fn reveal(&mut self, id: ElementId, animated: bool) {
        let Some(element) = self.elements.get_mut(id.0) else {
            return;
        };
        let Some(subscription) = element.mark_revealed() else {
            return;
        };
        if !animated {
            element.clear_delay();
        }
        let delay_ms = element.delay_ms();

        if let Some(subscription) = subscription {
            self.platform.unobserve(subscription);
        }
        self.send_event(MotionEvent::Revealed {
            element: id,
            delay_ms,
            animated,
        });
    }

    /// Reveal every remaining element without animation
    fn reveal_all(&mut self) -> usize {
        let mut revealed = 0;
        for index in 0..self.elements.len() {
            if !self.elements[index].is_revealed() {
                self.reveal(ElementId(index), false);
                revealed += 1;
            }
        }
        revealed
    }

    /// Process a batch of visibility notifications in delivery order
    pub fn on_intersections(&mut self, entries: &[IntersectionEntry]) {
        for entry in entries {
            match entry.target {
                Target::Reveal(id) => {
                    if entry.crosses(self.reveal_options.threshold) {
                        let animated = self.motion_allowed();
                        self.reveal(id, animated);
                    }
                }
                Target::Section(id) => {
                    if let Some(active) = self.sections.on_entry(id, entry.is_intersecting) {
                        debug!(section = ?self.sections.name(active), "Active section changed");
                        self.send_event(MotionEvent::ActiveSectionChanged { section: active });
                    }
                }
            }
        }
    }

    // ---- active section ---------------------------------------------------

    /// Track the ordered nav sections; the first one starts active
    pub fn track_sections(&mut self, sections: Vec<String>) {
        for subscription in self.section_subscriptions.drain(..) {
            self.platform.unobserve(subscription);
        }

        self.sections = ActiveSectionTracker::new(sections);
        let ids: Vec<SectionId> = self.sections.ids().collect();
        for id in ids {
            let subscription = self.platform.observe(Target::Section(id), self.section_options);
            self.section_subscriptions.push(subscription);
        }

        if let Some(active) = self.sections.active() {
            self.send_event(MotionEvent::ActiveSectionChanged { section: active });
        }
    }

    // ---- rotation ---------------------------------------------------------

    /// Install the "now" widget items and start rotating them
    ///
    /// Replaces (and stops) any previous rotation. Returns whether a timer
    /// is running.
    pub fn start_rotation(&mut self, items: Vec<String>) -> bool {
        self.stop_rotation();

        let mut rotator = Rotator::new(items, self.rotation_interval);
        let allowed = self.motion_allowed();
        let running = rotator.start(&mut self.platform, allowed);
        self.rotator = Some(rotator);

        if running {
            self.send_event(MotionEvent::RotationStarted);
        }
        running
    }

    pub fn stop_rotation(&mut self) {
        let stopped = self
            .rotator
            .as_mut()
            .map(|rotator| rotator.stop(&mut self.platform))
            .unwrap_or(false);
        if stopped {
            self.send_event(MotionEvent::RotationStopped);
        }
    }

    pub fn on_timer(&mut self, handle: TimerHandle) {
        let allowed = self.motion_allowed();
        let Some(rotator) = self.rotator.as_mut() else {
            return;
        };

        let was_running = rotator.is_running();
        let advanced = rotator.on_tick(handle, &mut self.platform, allowed);
        let stopped = was_running && !rotator.is_running();

        if let Some(index) = advanced {
            self.send_event(MotionEvent::Rotated { index });
        }
        if stopped {
            self.send_event(MotionEvent::RotationStopped);
        }
    }

    // ---- scroll, frames, pointer ------------------------------------------

    /// User scrolled the page
    ///
    /// Cancels a running smooth scroll, updates the header state and asks
    /// for one frame to recompute parallax.
    pub fn on_scroll(&mut self, y: f64) {
        self.scroll.set_scroll(y);
        self.scroll_y = y;
        self.update_header();

        if self.motion_allowed() && !self.parallax.is_empty() {
            self.frame.schedule(&mut self.platform);
        } else {
            self.frame.cancel(&mut self.platform);
        }
    }

    /// Smooth-scroll to an in-page anchor
    ///
    /// `resolve` maps a fragment id to the section's top. Returns `false`
    /// (nothing happens) for non-anchor links and missing targets, so the
    /// host can let the default navigation proceed.
    pub fn scroll_to_anchor<F>(&mut self, href: &str, resolve: F, max_scroll: f64, now: Instant) -> bool
    where
        F: FnOnce(&str) -> Option<f64>,
    {
        let Some(id) = anchor_id(href) else {
            return false;
        };
        let Some(section_top) = resolve(id) else {
            debug!(anchor = id, "Anchor target missing");
            return false;
        };

        let target = anchor_target(section_top, self.header_offset, max_scroll);
        if self.motion_allowed() {
            self.scroll.scroll_to(target, max_scroll, now);
        } else {
            self.scroll.set_scroll(target);
        }

        if self.scroll.is_animating() {
            self.frame.schedule(&mut self.platform);
        } else {
            self.apply_scroll_position(self.scroll.current_scroll());
            if self.motion_allowed() {
                self.update_parallax();
            }
        }
        true
    }

    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) {
        if !self.frame.fire(handle) {
            return;
        }

        if self.scroll.is_animating() {
            let y = self.scroll.update(now);
            self.apply_scroll_position(y);
        }
        if self.motion_allowed() {
            self.update_parallax();
        }
        if self.scroll.is_animating() {
            self.frame.schedule(&mut self.platform);
        }
    }

    fn apply_scroll_position(&mut self, y: f64) {
        if (y - self.scroll_y).abs() > f64::EPSILON {
            self.scroll_y = y;
            self.send_event(MotionEvent::Scrolled { y });
            self.update_header();
        }
    }

    fn update_header(&mut self) {
        let scrolled = self.scroll_y > self.scrolled_offset;
        if scrolled != self.header_scrolled {
            self.header_scrolled = scrolled;
            self.send_event(MotionEvent::HeaderScrolled { scrolled });
        }
    }

    fn update_parallax(&mut self) {
        for layer in 0..self.parallax.len() {
            let offset = self.parallax[layer].offset(self.scroll_y);
            if (offset - self.parallax_offsets[layer]).abs() > f64::EPSILON {
                self.parallax_offsets[layer] = offset;
                self.send_event(MotionEvent::ParallaxUpdated { layer, offset });
            }
        }
    }

    /// Pointer moved over a card; `None` while motion is denied
    pub fn on_pointer_move(&mut self, card: usize, rect: &Rect, x: f64, y: f64) -> Option<GlowPoint> {
        if !self.motion_allowed() {
            return None;
        }
        let point = GlowPoint::from_pointer(rect, x, y);
        self.glowing.insert(card);
        self.send_event(MotionEvent::GlowMoved { card, point });
        Some(point)
    }

    pub fn on_pointer_leave(&mut self, card: usize) {
        if self.glowing.remove(&card) {
            self.send_event(MotionEvent::GlowCleared { card });
        }
    }

    // ---- preference & lifecycle -------------------------------------------

    /// React to a change of the reduced-motion signal
    ///
    /// Denying motion reveals everything still hidden and cancels rotation,
    /// parallax, glow and smooth scrolling in the same call. Allowing it
    /// again restarts rotation only; revealed elements stay revealed.
    pub fn on_motion_preference_changed(&mut self, motion_allowed: bool) {
        info!(motion_allowed, "Motion preference changed");
        self.send_event(MotionEvent::MotionPreferenceChanged {
            allowed: motion_allowed,
        });

        if motion_allowed {
            let restarted = match self.rotator.as_mut() {
                Some(rotator) if !rotator.is_running() => rotator.start(&mut self.platform, true),
                _ => false,
            };
            if restarted {
                self.send_event(MotionEvent::RotationStarted);
            }
            return;
        }

        let revealed = self.reveal_all();
        if revealed > 0 {
            debug!(revealed, "Force-revealed elements after motion was disabled");
        }

        self.stop_rotation();
        self.frame.cancel(&mut self.platform);

        if self.scroll.is_animating() {
            let y = self.scroll.finish();
            self.apply_scroll_position(y);
        }

        for layer in 0..self.parallax_offsets.len() {
            if self.parallax_offsets[layer] != 0.0 {
                self.parallax_offsets[layer] = 0.0;
                self.send_event(MotionEvent::ParallaxUpdated { layer, offset: 0.0 });
            }
        }

        for card in std::mem::take(&mut self.glowing) {
            self.send_event(MotionEvent::GlowCleared { card });
        }
    }

    /// Release every subscription, timer and frame request
    pub fn teardown(&mut self) {
        for element in &mut self.elements {
            if let Some(subscription) = element.subscription.take() {
                self.platform.unobserve(subscription);
            }
        }
        for subscription in self.section_subscriptions.drain(..) {
            self.platform.unobserve(subscription);
        }
        self.stop_rotation();
        self.frame.cancel(&mut self.platform);
        self.scroll.cancel();
        self.observing = false;
        debug!("Motion coordinator torn down");
    }

    // ---- queries ----------------------------------------------------------

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn elements(&self) -> &[AnimatableElement] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&AnimatableElement> {
        self.elements.get(id.0)
    }

    pub fn is_revealed(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(AnimatableElement::is_revealed)
    }

    pub fn delay_ms(&self, id: ElementId) -> Option<u32> {
        self.element(id).map(AnimatableElement::delay_ms)
    }

    pub fn revealed_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_revealed()).count()
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn sections(&self) -> &ActiveSectionTracker {
        &self.sections
    }

    pub fn active_section(&self) -> Option<SectionId> {
        self.sections.active()
    }

    pub fn rotation_index(&self) -> Option<usize> {
        self.rotator.as_ref().map(Rotator::index)
    }

    pub fn rotation_item(&self) -> Option<&str> {
        self.rotator.as_ref().and_then(Rotator::current)
    }

    pub fn is_rotating(&self) -> bool {
        self.rotator.as_ref().is_some_and(Rotator::is_running)
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_y
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_animating()
    }

    pub fn header_scrolled(&self) -> bool {
        self.header_scrolled
    }

    pub fn parallax_offset(&self, layer: usize) -> Option<f64> {
        self.parallax_offsets.get(layer).copied()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }
}
