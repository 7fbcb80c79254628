//! Authoring edits.
//!
//! Three layers, all total: every operation returns whether anything changed
//! and ignores out-of-range indices, stale column keys, and edits that would
//! break a table invariant.
//!
//! - [`PanelTable`] methods edit the header/row matrix. Rows always hold
//!   exactly the header key set, and the last header cannot be removed.
//! - Tab wrappers (`add_header(tab)` and friends) apply table edits to a
//!   panel-variations tab and section edits to a specifications tab; on any
//!   other kind they are no-ops.
//! - Collection functions add, remove, rename, and reorder tabs.
//!
//! [`EditOp`] names each operation so an edit script can travel as JSON.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::legacy::fallback_section_heading;
use crate::model::{PanelHeader, PanelTable, SpecSection, TabContent, TabKind, TechnicalInfoTab};

/// Label given to a column created with [`PanelTable::add_header`].
pub const NEW_COLUMN_LABEL: &str = "New Column";

impl PanelTable {
    /// Append a `column<N+1>` / "New Column" header and an empty cell for it
    /// in every row. N is the current header count, bumped until the key is free.
    pub fn add_header(&mut self) -> bool {
        let mut n = self.headers.len() + 1;
        let key = loop {
            let candidate = format!("column{n}");
            if !self.has_header(&candidate) {
                break candidate;
            }
            n += 1;
        };
        for row in &mut self.rows {
            row.insert(key.clone(), String::new());
        }
        self.headers.push(PanelHeader::new(key, NEW_COLUMN_LABEL));
        true
    }

    /// Remove the header at `index` and its cell from every row. Refused when
    /// it is the last header.
    pub fn remove_header(&mut self, index: usize) -> bool {
        if index >= self.headers.len() {
            return false;
        }
        if self.headers.len() == 1 {
            debug!(index, "panel table: refusing to remove the last header");
            return false;
        }
        let removed = self.headers.remove(index);
        for row in &mut self.rows {
            row.remove(&removed.key);
        }
        true
    }

    /// Change a header's display label. Labels need not be unique.
    pub fn rename_header_label(&mut self, index: usize, label: &str) -> bool {
        let Some(header) = self.headers.get_mut(index) else {
            return false;
        };
        if header.label == label {
            return false;
        }
        label.clone_into(&mut header.label);
        true
    }

    /// Append a row with an empty cell per header.
    pub fn add_row(&mut self) -> bool {
        let row = self
            .headers
            .iter()
            .map(|h| (h.key.clone(), String::new()))
            .collect();
        self.rows.push(row);
        true
    }

    pub fn remove_row(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Set one cell. Ignored when `key` is not a current header key, which
    /// covers edits aimed at a column that has since been removed.
    pub fn set_cell(&mut self, row_index: usize, key: &str, value: &str) -> bool {
        if !self.has_header(key) {
            debug!(row_index, key, "panel table: ignoring cell edit for unknown column");
            return false;
        }
        let Some(cell) = self.rows.get_mut(row_index).and_then(|row| row.get_mut(key)) else {
            return false;
        };
        if *cell == value {
            return false;
        }
        value.clone_into(cell);
        true
    }

    /// Move the row at `from` so it ends up at `to`.
    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.rows, from, to)
    }
}

pub fn add_header(tab: &mut TechnicalInfoTab) -> bool {
    tab.panel_table_mut().is_some_and(PanelTable::add_header)
}

pub fn remove_header(tab: &mut TechnicalInfoTab, index: usize) -> bool {
    tab.panel_table_mut()
        .is_some_and(|table| table.remove_header(index))
}

pub fn rename_header_label(tab: &mut TechnicalInfoTab, index: usize, label: &str) -> bool {
    tab.panel_table_mut()
        .is_some_and(|table| table.rename_header_label(index, label))
}

pub fn add_row(tab: &mut TechnicalInfoTab) -> bool {
    tab.panel_table_mut().is_some_and(PanelTable::add_row)
}

pub fn remove_row(tab: &mut TechnicalInfoTab, index: usize) -> bool {
    tab.panel_table_mut()
        .is_some_and(|table| table.remove_row(index))
}

pub fn set_cell(tab: &mut TechnicalInfoTab, row_index: usize, key: &str, value: &str) -> bool {
    tab.panel_table_mut()
        .is_some_and(|table| table.set_cell(row_index, key, value))
}

pub fn move_row(tab: &mut TechnicalInfoTab, from: usize, to: usize) -> bool {
    tab.panel_table_mut()
        .is_some_and(|table| table.move_row(from, to))
}

/// Append a section headed "Specification Section N" to a specifications tab.
pub fn add_section(tab: &mut TechnicalInfoTab) -> bool {
    let Some(sections) = tab.sections_mut() else {
        return false;
    };
    let heading = fallback_section_heading(sections.len() + 1);
    sections.push(SpecSection::new(heading, ""));
    true
}

pub fn remove_section(tab: &mut TechnicalInfoTab, index: usize) -> bool {
    let Some(sections) = tab.sections_mut() else {
        return false;
    };
    if index >= sections.len() {
        return false;
    }
    sections.remove(index);
    true
}

/// Replace the heading and/or description of one section. `None` leaves a
/// field as it is.
pub fn update_section(
    tab: &mut TechnicalInfoTab,
    index: usize,
    heading: Option<&str>,
    description: Option<&str>,
) -> bool {
    let Some(section) = tab.sections_mut().and_then(|s| s.get_mut(index)) else {
        return false;
    };
    let mut changed = false;
    if let Some(heading) = heading.filter(|h| *h != section.heading) {
        heading.clone_into(&mut section.heading);
        changed = true;
    }
    if let Some(description) = description.filter(|d| *d != section.description) {
        description.clone_into(&mut section.description);
        changed = true;
    }
    changed
}

/// Replace the text of a BIM objects or custom tab.
pub fn set_text(tab: &mut TechnicalInfoTab, text: &str) -> bool {
    let Some(current) = tab.text_mut() else {
        return false;
    };
    if *current == text {
        return false;
    }
    text.clone_into(current);
    true
}

#[must_use]
pub fn find_tab<'a>(tabs: &'a [TechnicalInfoTab], id: &str) -> Option<&'a TechnicalInfoTab> {
    tabs.iter().find(|tab| tab.id == id)
}

pub fn find_tab_mut<'a>(tabs: &'a mut [TechnicalInfoTab], id: &str) -> Option<&'a mut TechnicalInfoTab> {
    tabs.iter_mut().find(|tab| tab.id == id)
}

/// Append an empty tab of `kind` and return its id.
///
/// The kind's deterministic id is used while it is free; custom tabs and
/// repeats get a `<kind-id>-<uuid>` id.
pub fn add_tab(tabs: &mut Vec<TechnicalInfoTab>, kind: TabKind, name: &str) -> String {
    let base = kind.default_id();
    let id = if kind != TabKind::Custom && find_tab(tabs, base).is_none() {
        base.to_owned()
    } else {
        format!("{base}-{}", Uuid::new_v4())
    };
    tabs.push(TechnicalInfoTab::new(id.clone(), name, TabContent::empty(kind)));
    id
}

/// Append an empty custom tab and return its id.
pub fn add_custom_tab(tabs: &mut Vec<TechnicalInfoTab>, name: &str) -> String {
    add_tab(tabs, TabKind::Custom, name)
}

pub fn remove_tab(tabs: &mut Vec<TechnicalInfoTab>, id: &str) -> bool {
    let before = tabs.len();
    tabs.retain(|tab| tab.id != id);
    tabs.len() != before
}

pub fn rename_tab(tabs: &mut [TechnicalInfoTab], id: &str, name: &str) -> bool {
    let Some(tab) = find_tab_mut(tabs, id) else {
        return false;
    };
    if tab.name == name {
        return false;
    }
    name.clone_into(&mut tab.name);
    true
}

/// Move the tab at `from` so it ends up at `to`.
pub fn move_tab(tabs: &mut Vec<TechnicalInfoTab>, from: usize, to: usize) -> bool {
    move_item(tabs, from, to)
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// One authoring edit against a product's tab list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditOp {
    AddHeader { tab_id: String },
    RemoveHeader { tab_id: String, index: usize },
    RenameHeaderLabel { tab_id: String, index: usize, label: String },
    AddRow { tab_id: String },
    RemoveRow { tab_id: String, index: usize },
    MoveRow { tab_id: String, from: usize, to: usize },
    SetCell { tab_id: String, row_index: usize, key: String, value: String },
    AddSection { tab_id: String },
    RemoveSection { tab_id: String, index: usize },
    UpdateSection {
        tab_id: String,
        index: usize,
        #[serde(default)]
        heading: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    SetText { tab_id: String, text: String },
    AddTab { kind: TabKind, name: String },
    RemoveTab { tab_id: String },
    RenameTab { tab_id: String, name: String },
    MoveTab { from: usize, to: usize },
}

/// Apply one edit. Returns whether the tab list changed; edits naming a
/// missing tab are ignored.
pub fn apply_op(tabs: &mut Vec<TechnicalInfoTab>, op: &EditOp) -> bool {
    let changed = match op {
        EditOp::AddTab { kind, name } => {
            add_tab(tabs, *kind, name);
            true
        }
        EditOp::RemoveTab { tab_id } => remove_tab(tabs, tab_id),
        EditOp::RenameTab { tab_id, name } => rename_tab(tabs, tab_id, name),
        EditOp::MoveTab { from, to } => move_tab(tabs, *from, *to),
        EditOp::AddHeader { tab_id } => with_tab(tabs, tab_id, add_header),
        EditOp::RemoveHeader { tab_id, index } => {
            with_tab(tabs, tab_id, |tab| remove_header(tab, *index))
        }
        EditOp::RenameHeaderLabel { tab_id, index, label } => {
            with_tab(tabs, tab_id, |tab| rename_header_label(tab, *index, label))
        }
        EditOp::AddRow { tab_id } => with_tab(tabs, tab_id, add_row),
        EditOp::RemoveRow { tab_id, index } => with_tab(tabs, tab_id, |tab| remove_row(tab, *index)),
        EditOp::MoveRow { tab_id, from, to } => {
            with_tab(tabs, tab_id, |tab| move_row(tab, *from, *to))
        }
        EditOp::SetCell { tab_id, row_index, key, value } => {
            with_tab(tabs, tab_id, |tab| set_cell(tab, *row_index, key, value))
        }
        EditOp::AddSection { tab_id } => with_tab(tabs, tab_id, add_section),
        EditOp::RemoveSection { tab_id, index } => {
            with_tab(tabs, tab_id, |tab| remove_section(tab, *index))
        }
        EditOp::UpdateSection { tab_id, index, heading, description } => with_tab(tabs, tab_id, |tab| {
            update_section(tab, *index, heading.as_deref(), description.as_deref())
        }),
        EditOp::SetText { tab_id, text } => with_tab(tabs, tab_id, |tab| set_text(tab, text)),
    };
    if !changed {
        debug!(?op, "edit had no effect");
    }
    changed
}

fn with_tab<F>(tabs: &mut [TechnicalInfoTab], id: &str, edit: F) -> bool
where
    F: FnOnce(&mut TechnicalInfoTab) -> bool,
{
    find_tab_mut(tabs, id).is_some_and(edit)
}
