//! Scripted page sessions for the virtual platform
//!
//! A scenario describes a page layout (reveal elements, nav sections,
//! parallax layers, glow cards) and a list of timed user actions. Running it
//! drives a [`MotionCoordinator`] over a [`VirtualPlatform`] and records every
//! [`MotionEvent`] against the virtual clock.
//!
//! ```json
//! {
//!   "viewport": { "width": 1280, "height": 800 },
//!   "page_height": 4000,
//!   "reveal": [{ "name": "hero", "top": 100, "height": 300 }],
//!   "sections": [{ "id": "about", "top": 0, "height": 900 }],
//!   "rotation": ["reading", "building"],
//!   "steps": [{ "at_ms": 500, "action": "scroll", "y": 1200 }],
//!   "duration_ms": 6000
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::motion::{
    ElementId, MotionCoordinator, MotionEvent, ParallaxLayer, Rect, RevealTarget, SectionId,
    Target, VirtualPlatform,
};
use crate::site::{Disclosure, ModalSet, NavMenu};
use crate::{Error, Result};

/// Longest simulated session accepted (10 minutes)
pub const MAX_DURATION_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub viewport: Viewport,
    pub page_height: f64,
    #[serde(default = "default_true")]
    pub motion_allowed: bool,
    #[serde(default)]
    pub reveal: Vec<RevealSpec>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub rotation: Vec<String>,
    /// Overrides `rotation.interval_ms` from the config
    #[serde(default)]
    pub rotation_interval_ms: Option<u64>,
    #[serde(default)]
    pub parallax: Vec<ParallaxLayer>,
    #[serde(default)]
    pub cards: Vec<CardSpec>,
    /// Page has the mobile menu toggle
    #[serde(default = "default_true")]
    pub nav: bool,
    /// Project modal ids
    #[serde(default)]
    pub modals: Vec<String>,
    /// Collapsible testimonial names
    #[serde(default)]
    pub disclosures: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Total simulated time; the last step's time when shorter. At most
    /// [`MAX_DURATION_MS`].
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealSpec {
    pub name: String,
    pub top: f64,
    pub height: f64,
    #[serde(default)]
    pub delay_ms: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSpec {
    pub name: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// User scrolls to `y`
    Scroll { y: f64 },
    /// Reduced-motion preference flips
    SetMotion { allowed: bool },
    /// Click on an in-page link in the menu
    Anchor { href: String },
    Pointer { card: String, x: f64, y: f64 },
    PointerLeave { card: String },
    /// Click on the mobile menu toggle
    NavToggle,
    /// Click on the dimmed area behind the open menu
    NavBackdrop,
    Key { key: String },
    /// Window resized to `width`
    Resize { width: f64 },
    OpenModal { id: String },
    CloseModal { id: String },
    ModalBackdrop,
    ToggleDisclosure { name: String },
}

fn default_true() -> bool {
    true
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let scenario = Self::from_json(&content)?;
        debug!(path = %path.display(), steps = scenario.steps.len(), "Loaded scenario");
        Ok(scenario)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(Error::Scenario("viewport must have a positive size".into()));
        }
        if self.page_height <= 0.0 {
            return Err(Error::Scenario("page_height must be positive".into()));
        }
        if let Some(spec) = self.reveal.iter().find(|r| r.height <= 0.0) {
            return Err(Error::Scenario(format!(
                "reveal element '{}' has no height",
                spec.name
            )));
        }
        if self.duration_ms > MAX_DURATION_MS {
            return Err(Error::Scenario(format!(
                "duration_ms {} exceeds the {}ms limit",
                self.duration_ms, MAX_DURATION_MS
            )));
        }
        if let Some(step) = self.steps.iter().find(|s| s.at_ms > MAX_DURATION_MS) {
            return Err(Error::Scenario(format!(
                "step at {}ms exceeds the {}ms limit",
                step.at_ms, MAX_DURATION_MS
            )));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|s| s.id == section.id) {
                return Err(Error::Scenario(format!("duplicate section '{}'", section.id)));
            }
        }
        for step in &self.steps {
            match &step.action {
                Action::Pointer { card, .. } | Action::PointerLeave { card } => {
                    if self.card_index(card).is_none() {
                        return Err(Error::Scenario(format!(
                            "step at {}ms refers to unknown card '{}'",
                            step.at_ms, card
                        )));
                    }
                }
                Action::ToggleDisclosure { name } => {
                    if self.disclosure_index(name).is_none() {
                        return Err(Error::Scenario(format!(
                            "step at {}ms refers to unknown disclosure '{}'",
                            step.at_ms, name
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn card_index(&self, name: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.name == name)
    }

    fn disclosure_index(&self, name: &str) -> Option<usize> {
        self.disclosures.iter().position(|d| d == name)
    }

    fn max_scroll(&self) -> f64 {
        (self.page_height - self.viewport.height).max(0.0)
    }

    fn end_ms(&self) -> u64 {
        let last_step = self.steps.iter().map(|s| s.at_ms).max().unwrap_or(0);
        self.duration_ms.max(last_step)
    }

    fn platform(&self) -> VirtualPlatform {
        let mut platform = VirtualPlatform::new(self.viewport.width, self.viewport.height);
        platform.set_motion_allowed(self.motion_allowed);
        for (i, spec) in self.reveal.iter().enumerate() {
            platform.place(
                Target::Reveal(ElementId(i)),
                Rect::new(0.0, spec.top, self.viewport.width, spec.height),
            );
        }
        for (i, spec) in self.sections.iter().enumerate() {
            platform.place(
                Target::Section(SectionId(i)),
                Rect::new(0.0, spec.top, self.viewport.width, spec.height),
            );
        }
        platform
    }

    /// Play the scenario against a fresh coordinator
    pub fn run(&self, config: &AppConfig) -> Result<SimulationReport> {
        self.validate()?;

        let mut config = config.clone();
        if let Some(interval_ms) = self.rotation_interval_ms {
            config.rotation.interval_ms = interval_ms;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = MotionCoordinator::new(self.platform(), &config)
            .with_event_sender(tx)
            .with_parallax(self.parallax.clone());
        let nav = if self.nav {
            NavMenu::new(&config.header)
        } else {
            NavMenu::without_controls(&config.header)
        };
        let mut run = Run {
            scenario: self,
            coordinator,
            rx,
            timeline: Vec::new(),
            nav,
            modals: ModalSet::new(self.modals.iter().cloned()),
            disclosures: vec![Disclosure::new(); self.disclosures.len()],
            page_events: Vec::new(),
        };

        run.coordinator.register(
            self.reveal
                .iter()
                .map(|spec| RevealTarget {
                    name: spec.name.clone(),
                    delay_ms: spec.delay_ms,
                }),
        );
        if !self.sections.is_empty() {
            run.coordinator
                .track_sections(self.sections.iter().map(|s| s.id.clone()).collect());
        }
        run.coordinator.observe();
        if !self.rotation.is_empty() {
            run.coordinator.start_rotation(self.rotation.clone());
        }

        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.at_ms);
        let mut pending = steps.into_iter().peekable();

        let frame_period = config.scroll.animation_tick_duration().max(Duration::from_millis(1));
        let end = self.end_ms();
        let mut now_ms = 0u64;

        loop {
            while let Some(step) = pending.next_if(|s| s.at_ms <= now_ms) {
                run.apply(step.at_ms, &step.action);
            }
            run.settle(now_ms);

            if now_ms >= end {
                break;
            }

            let mut next_ms = now_ms
                .saturating_add(frame_period.as_millis() as u64)
                .min(end);
            if let Some(step) = pending.peek() {
                next_ms = next_ms.min(step.at_ms);
            }
            let ticks = run
                .coordinator
                .platform_mut()
                .advance(Duration::from_millis(next_ms - now_ms));
            for tick in ticks {
                run.coordinator.on_timer(tick.handle);
                run.record(tick.at.as_millis() as u64);
            }
            now_ms = next_ms;
        }

        run.coordinator.teardown();
        run.record(now_ms);

        let report = run.report(now_ms);
        info!(
            revealed = report.final_state.revealed,
            total = report.final_state.total,
            events = report.timeline.len(),
            "Scenario finished"
        );
        Ok(report)
    }
}

struct Run<'a> {
    scenario: &'a Scenario,
    coordinator: MotionCoordinator<VirtualPlatform>,
    rx: mpsc::UnboundedReceiver<MotionEvent>,
    timeline: Vec<TimelineEntry>,
    nav: NavMenu,
    modals: ModalSet,
    disclosures: Vec<Disclosure>,
    page_events: Vec<PageEntry>,
}

impl Run<'_> {
    fn apply(&mut self, at_ms: u64, action: &Action) {
        let max_scroll = self.scenario.max_scroll();
        let menu_was_open = self.nav.is_open();
        let modal_was_open = self.modals.open_id().map(str::to_string);

        match action {
            Action::Scroll { y } => {
                let y = y.clamp(0.0, max_scroll);
                self.coordinator.platform_mut().set_scroll(y);
                self.coordinator.on_scroll(y);
            }
            Action::SetMotion { allowed } => {
                self.coordinator.platform_mut().set_motion_allowed(*allowed);
                self.coordinator.on_motion_preference_changed(*allowed);
            }
            Action::Anchor { href } => {
                self.nav.on_link_click();
                let sections = &self.scenario.sections;
                let now = self.coordinator.platform().now();
                let resolve = |id: &str| sections.iter().find(|s| s.id == id).map(|s| s.top);
                if !self.coordinator.scroll_to_anchor(href, resolve, max_scroll, now) {
                    debug!(href = %href, "Anchor click left to default navigation");
                }
            }
            Action::Pointer { card, x, y } => match self.scenario.card_index(card) {
                Some(index) => {
                    let rect = self.scenario.cards[index].rect;
                    self.coordinator.on_pointer_move(index, &rect, *x, *y);
                }
                None => warn!(card = %card, "Pointer over unknown card"),
            },
            Action::PointerLeave { card } => {
                if let Some(index) = self.scenario.card_index(card) {
                    self.coordinator.on_pointer_leave(index);
                }
            }
            Action::NavToggle => {
                self.nav.toggle();
            }
            Action::NavBackdrop => self.nav.on_backdrop_click(),
            Action::Key { key } => {
                self.nav.on_key(key);
                self.modals.on_key(key);
            }
            Action::Resize { width } => self.nav.on_resize(*width),
            Action::OpenModal { id } => {
                if !self.modals.open(id) {
                    debug!(modal = %id, "No such modal");
                }
            }
            Action::CloseModal { id } => self.modals.close(id),
            Action::ModalBackdrop => self.modals.on_backdrop_click(),
            Action::ToggleDisclosure { name } => {
                if let Some(index) = self.scenario.disclosure_index(name) {
                    let expanded = self.disclosures[index].toggle();
                    self.page_events.push(PageEntry {
                        at_ms,
                        event: PageEvent::DisclosureToggled {
                            name: name.clone(),
                            expanded,
                        },
                    });
                }
            }
        }

        let menu_open = self.nav.is_open();
        if menu_open != menu_was_open {
            let event = if menu_open {
                PageEvent::MenuOpened
            } else {
                PageEvent::MenuClosed
            };
            self.page_events.push(PageEntry { at_ms, event });
        }

        let modal_open = self.modals.open_id();
        if modal_open != modal_was_open.as_deref() {
            let mut events = Vec::new();
            if let Some(id) = modal_was_open {
                events.push(PageEvent::ModalClosed { id });
            }
            if let Some(id) = modal_open {
                events.push(PageEvent::ModalOpened { id: id.to_string() });
            }
            self.page_events
                .extend(events.into_iter().map(|event| PageEntry { at_ms, event }));
        }
    }

    /// Paint pending frames, then let visibility catch up with the scroll position
    fn settle(&mut self, now_ms: u64) {
        let now = self.coordinator.platform().now();
        for frame in self.coordinator.platform_mut().take_frames() {
            self.coordinator.on_frame(frame, now);
        }

        let y = self.coordinator.scroll_position();
        let platform = self.coordinator.platform_mut();
        if (platform.scroll_y() - y).abs() > f64::EPSILON {
            platform.set_scroll(y);
        }

        let entries = self.coordinator.platform_mut().take_intersections();
        if !entries.is_empty() {
            self.coordinator.on_intersections(&entries);
        }
        self.record(now_ms);
    }

    fn record(&mut self, at_ms: u64) {
        while let Ok(event) = self.rx.try_recv() {
            self.timeline.push(TimelineEntry { at_ms, event });
        }
    }

    fn report(self, end_ms: u64) -> SimulationReport {
        let c = &self.coordinator;
        let platform = c.platform();

        SimulationReport {
            elements: c
                .elements()
                .iter()
                .map(|e| ElementSummary {
                    name: e.name().to_string(),
                    delay_ms: e.delay_ms(),
                    revealed: e.is_revealed(),
                })
                .collect(),
            sections: self.scenario.sections.iter().map(|s| s.id.clone()).collect(),
            rotation: self.scenario.rotation.clone(),
            cards: self.scenario.cards.iter().map(|s| s.name.clone()).collect(),
            parallax: self.scenario.parallax.iter().map(|l| l.name.clone()).collect(),
            timeline: self.timeline,
            page_events: self.page_events,
            final_state: FinalState {
                at_ms: end_ms,
                revealed: c.revealed_count(),
                total: c.elements().len(),
                active_section: c.sections().active_name().map(str::to_string),
                rotation_index: c.rotation_index(),
                scroll_y: c.scroll_position(),
                header_scrolled: c.header_scrolled(),
                live_subscriptions: platform.live_subscriptions(),
                live_intervals: platform.live_intervals(),
                pending_frames: platform.pending_frames(),
                menu_open: self.nav.is_open(),
                open_modal: self.modals.open_id().map(str::to_string),
                expanded: self
                    .scenario
                    .disclosures
                    .iter()
                    .zip(&self.disclosures)
                    .filter(|(_, d)| d.is_expanded())
                    .map(|(name, _)| name.clone())
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    pub event: MotionEvent,
}

/// Menu, modal and disclosure changes caused by user actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    MenuOpened,
    MenuClosed,
    ModalOpened { id: String },
    ModalClosed { id: String },
    DisclosureToggled { name: String, expanded: bool },
}

impl PageEvent {
    pub fn describe(&self) -> String {
        match self {
            PageEvent::MenuOpened => "menu opened".to_string(),
            PageEvent::MenuClosed => "menu closed".to_string(),
            PageEvent::ModalOpened { id } => format!("modal {} opened", id),
            PageEvent::ModalClosed { id } => format!("modal {} closed", id),
            PageEvent::DisclosureToggled { name, expanded } => {
                let state = if *expanded { "expanded" } else { "collapsed" };
                format!("{} {}", name, state)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    pub at_ms: u64,
    pub event: PageEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSummary {
    pub name: String,
    pub delay_ms: u32,
    pub revealed: bool,
}

/// State after teardown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalState {
    pub at_ms: u64,
    pub revealed: usize,
    pub total: usize,
    pub active_section: Option<String>,
    pub rotation_index: Option<usize>,
    pub scroll_y: f64,
    pub header_scrolled: bool,
    pub live_subscriptions: usize,
    pub live_intervals: usize,
    pub pending_frames: usize,
    pub menu_open: bool,
    pub open_modal: Option<String>,
    /// Disclosures left expanded
    pub expanded: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub elements: Vec<ElementSummary>,
    pub sections: Vec<String>,
    pub rotation: Vec<String>,
    pub cards: Vec<String>,
    pub parallax: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub page_events: Vec<PageEntry>,
    pub final_state: FinalState,
}

impl SimulationReport {
    /// Events of one kind, in order
    pub fn events<'a, F>(&'a self, mut filter: F) -> impl Iterator<Item = &'a TimelineEntry> + 'a
    where
        F: FnMut(&MotionEvent) -> bool + 'a,
    {
        self.timeline.iter().filter(move |entry| filter(&entry.event))
    }

    /// One-line human description of an event, using element and section names
    pub fn describe(&self, event: &MotionEvent) -> String {
        let name = |names: &[String], index: usize| {
            names
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("#{}", index))
        };

        match event {
            MotionEvent::Revealed {
                element,
                delay_ms,
                animated,
            } => {
                let element = self
                    .elements
                    .get(element.0)
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| format!("#{}", element.0));
                if *animated {
                    format!("reveal {} (delay {}ms)", element, delay_ms)
                } else {
                    format!("reveal {} (no animation)", element)
                }
            }
            MotionEvent::ActiveSectionChanged { section } => {
                format!("active section -> {}", name(&self.sections, section.0))
            }
            MotionEvent::RotationStarted => "rotation started".to_string(),
            MotionEvent::Rotated { index } => {
                format!("now -> {}", name(&self.rotation, *index))
            }
            MotionEvent::RotationStopped => "rotation stopped".to_string(),
            MotionEvent::ParallaxUpdated { layer, offset } => {
                format!("parallax {} -> {:.1}px", name(&self.parallax, *layer), offset)
            }
            MotionEvent::GlowMoved { card, point } => format!(
                "glow {} at {:.0}% {:.0}%",
                name(&self.cards, *card),
                point.x,
                point.y
            ),
            MotionEvent::GlowCleared { card } => {
                format!("glow {} cleared", name(&self.cards, *card))
            }
            MotionEvent::HeaderScrolled { scrolled } => {
                if *scrolled {
                    "header scrolled".to_string()
                } else {
                    "header at top".to_string()
                }
            }
            MotionEvent::Scrolled { y } => format!("scroll -> {:.0}", y),
            MotionEvent::MotionPreferenceChanged { allowed } => {
                if *allowed {
                    "motion allowed".to_string()
                } else {
                    "reduced motion".to_string()
                }
            }
        }
    }
}
