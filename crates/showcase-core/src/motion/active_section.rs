//! Navigation highlight: which page section is "in view"
//!
//! Any notification reporting a section as intersecting makes it active, so
//! the most recent crossing wins. Observers report on threshold crossings in
//! either direction and on entering or leaving the root, and visibility is
//! not compared across sections: a section dropping back below the threshold
//! while still intersecting takes the highlight from a more visible one.

use super::observer::SectionId;

#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    sections: Vec<String>,
    active: Option<SectionId>,
}

impl ActiveSectionTracker {
    /// The first section starts active, mirroring the highlighted first nav link.
    pub fn new(sections: Vec<String>) -> Self {
        let active = if sections.is_empty() {
            None
        } else {
            Some(SectionId(0))
        };
        Self { sections, active }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SectionId> {
        (0..self.sections.len()).map(SectionId)
    }

    pub fn name(&self, id: SectionId) -> Option<&str> {
        self.sections.get(id.0).map(String::as_str)
    }

    pub fn active(&self) -> Option<SectionId> {
        self.active
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.and_then(|id| self.name(id))
    }

    pub fn is_active(&self, id: SectionId) -> bool {
        self.active == Some(id)
    }

    /// Apply one intersection notification
    ///
    /// Returns the newly active section when it changed.
    pub fn on_entry(&mut self, id: SectionId, is_intersecting: bool) -> Option<SectionId> {
        if id.0 >= self.sections.len() || !is_intersecting {
            return None;
        }
        if self.active == Some(id) {
            return None;
        }
        self.active = Some(id);
        Some(id)
    }
}
