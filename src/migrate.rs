//! Tab migration.
//!
//! A product's tabs are recomputed on every read. A stored, non-empty
//! `technicalInfoTabs` array wins and is returned as authored; otherwise the
//! legacy fields are resolved and turned into up to three tabs in fixed
//! order. Synthesized ids are deterministic, so migrating the same record
//! twice yields identical output.

#[cfg(test)]
#[path = "migrate_test.rs"]
mod migrate_test;

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::TabLabels;
use crate::legacy::LegacyFields;
use crate::model::{ProductRecord, TabContent, TabKind, TechnicalInfoTab};

/// Migrate a product's technical information with the default tab names.
#[must_use]
pub fn migrate_tabs(record: &ProductRecord) -> Vec<TechnicalInfoTab> {
    migrate_tabs_with(record, &TabLabels::default())
}

/// Migrate a product's technical information.
///
/// Returns an empty list when neither canonical tabs nor any qualifying
/// legacy content exist; callers show a placeholder.
#[must_use]
pub fn migrate_tabs_with(record: &ProductRecord, labels: &TabLabels) -> Vec<TechnicalInfoTab> {
    let canonical = decode_canonical_tabs(&record.technical_info_tabs);
    if !canonical.is_empty() {
        return canonical;
    }
    tabs_from_legacy(LegacyFields::resolve(record), labels)
}

/// Build tabs from resolved legacy fields: specifications, panel variations,
/// BIM objects, each only when it has content.
#[must_use]
pub fn tabs_from_legacy(fields: LegacyFields, labels: &TabLabels) -> Vec<TechnicalInfoTab> {
    let mut tabs = Vec::with_capacity(3);

    if !fields.specifications.is_empty() {
        tabs.push(TechnicalInfoTab::new(
            TabKind::Specifications.default_id(),
            labels.specifications.clone(),
            TabContent::Specifications(fields.specifications),
        ));
    }

    if !fields.panel_variations.is_empty() || fields.panel_variations_present {
        tabs.push(TechnicalInfoTab::new(
            TabKind::PanelVariations.default_id(),
            labels.panel_variations.clone(),
            TabContent::PanelVariations(fields.panel_variations),
        ));
    }

    if !fields.bim_objects.is_empty() {
        tabs.push(TechnicalInfoTab::new(
            TabKind::BimObjects.default_id(),
            labels.bim_objects.clone(),
            TabContent::BimObjects(fields.bim_objects),
        ));
    }

    tabs
}

/// Decode a stored `technicalInfoTabs` value.
///
/// Entries that are not tabs (unknown `type`, not an object) are skipped.
/// Blank or repeated ids are replaced so ids stay unique.
#[must_use]
pub fn decode_canonical_tabs(raw: &Value) -> Vec<TechnicalInfoTab> {
    let items = match raw {
        Value::Array(items) => items,
        Value::String(text) if !text.trim().is_empty() => {
            return match serde_json::from_str::<Value>(text) {
                Ok(value @ Value::Array(_)) => decode_canonical_tabs(&value),
                Ok(_) => Vec::new(),
                Err(error) => {
                    debug!(%error, "technicalInfoTabs: stored text is not JSON; ignoring");
                    Vec::new()
                }
            };
        }
        _ => return Vec::new(),
    };

    let mut tabs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<TechnicalInfoTab>(item.clone()) {
            Ok(tab) => tabs.push(tab),
            Err(error) => warn!(index, %error, "technicalInfoTabs: skipping undecodable tab"),
        }
    }
    ensure_unique_ids(&mut tabs);
    tabs
}

fn ensure_unique_ids(tabs: &mut [TechnicalInfoTab]) {
    let mut seen = HashSet::<String>::with_capacity(tabs.len());
    for (index, tab) in tabs.iter_mut().enumerate() {
        let base = if tab.id.trim().is_empty() {
            format!("tab-{}", index + 1)
        } else {
            tab.id.clone()
        };
        let mut candidate = base.clone();
        let mut suffix = 2usize;
        while seen.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        if candidate != tab.id {
            debug!(old = %tab.id, new = %candidate, "technicalInfoTabs: reassigned tab id");
            tab.id.clone_from(&candidate);
        }
        seen.insert(candidate);
    }
}
