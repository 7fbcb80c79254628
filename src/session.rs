//! Authoring session: one product's tabs between read and save.
//!
//! The session migrates once on open, applies edits in order, and hands back
//! the write patch on save. It assumes a single writer; reconciling
//! concurrent saves is left to whatever stores the document.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tracing::debug;

use crate::compat::{LegacyPatch, write_patch};
use crate::config::TabLabels;
use crate::editor::{EditOp, apply_op};
use crate::migrate::migrate_tabs_with;
use crate::model::{ProductRecord, TechnicalInfoTab};

#[derive(Debug, Clone, Default)]
pub struct AuthoringSession {
    tabs: Vec<TechnicalInfoTab>,
    dirty: bool,
}

impl AuthoringSession {
    /// Open a session over `record` with the default tab names.
    #[must_use]
    pub fn open(record: &ProductRecord) -> Self {
        Self::open_with(record, &TabLabels::default())
    }

    #[must_use]
    pub fn open_with(record: &ProductRecord, labels: &TabLabels) -> Self {
        Self::from_tabs(migrate_tabs_with(record, labels))
    }

    /// Open a session over tabs that are already canonical.
    #[must_use]
    pub fn from_tabs(tabs: Vec<TechnicalInfoTab>) -> Self {
        Self { tabs, dirty: false }
    }

    #[must_use]
    pub fn tabs(&self) -> &[TechnicalInfoTab] {
        &self.tabs
    }

    /// Direct access to the tab list. Marks the session dirty.
    pub fn tabs_mut(&mut self) -> &mut Vec<TechnicalInfoTab> {
        self.dirty = true;
        &mut self.tabs
    }

    /// `true` when an edit has changed the tabs since open or the last save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn apply(&mut self, op: &EditOp) -> bool {
        let changed = apply_op(&mut self.tabs, op);
        self.dirty |= changed;
        changed
    }

    /// Apply edits in order and return how many changed something.
    pub fn apply_all(&mut self, ops: &[EditOp]) -> usize {
        let changed = ops.iter().filter(|op| self.apply(op)).count();
        debug!(total = ops.len(), changed, "authoring session: applied edits");
        changed
    }

    /// Produce the write patch and clear the dirty flag.
    pub fn save(&mut self) -> LegacyPatch {
        self.dirty = false;
        write_patch(&self.tabs)
    }

    #[must_use]
    pub fn into_tabs(self) -> Vec<TechnicalInfoTab> {
        self.tabs
    }
}
