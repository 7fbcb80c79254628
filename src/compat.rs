//! Legacy mirrors for write-back.
//!
//! Consumers that predate the tab model still read `specifications`,
//! `panelVariations`, and `bimObjects`. On save those fields are rewritten
//! from the canonical tabs alone, so authored edits stay authoritative and
//! pre-migration values are never resurrected.

#[cfg(test)]
#[path = "compat_test.rs"]
mod compat_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::model::{TabContent, TechnicalInfoTab};

/// The write patch: canonical tabs plus the three legacy mirrors. All four
/// keys are always present, with `[]` / `""` when not applicable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPatch {
    pub technical_info_tabs: Vec<TechnicalInfoTab>,
    pub specifications: String,
    pub panel_variations: String,
    pub bim_objects: String,
}

impl LegacyPatch {
    /// Patch as a JSON object, ready to merge into the stored product.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|error| {
            warn!(%error, "write patch: serialization failed");
            Value::Object(serde_json::Map::new())
        })
    }
}

/// Build the write patch for `tabs`.
#[must_use]
pub fn write_patch(tabs: &[TechnicalInfoTab]) -> LegacyPatch {
    LegacyPatch {
        technical_info_tabs: tabs.to_vec(),
        specifications: specifications_mirror(tabs),
        panel_variations: panel_variations_mirror(tabs),
        bim_objects: bim_objects_mirror(tabs),
    }
}

/// JSON of the first specifications tab's sections, or `""` when it has none.
#[must_use]
pub fn specifications_mirror(tabs: &[TechnicalInfoTab]) -> String {
    tabs.iter()
        .find_map(TechnicalInfoTab::sections)
        .filter(|sections| !sections.is_empty())
        .map(|sections| to_json_or_empty(sections, "specifications"))
        .unwrap_or_default()
}

/// JSON of the first panel-variations table, or `""` when it has no rows.
#[must_use]
pub fn panel_variations_mirror(tabs: &[TechnicalInfoTab]) -> String {
    tabs.iter()
        .find_map(TechnicalInfoTab::panel_table)
        .filter(|table| !table.is_empty())
        .map(|table| to_json_or_empty(table, "panelVariations"))
        .unwrap_or_default()
}

/// Text of the first BIM objects tab, or `""`.
#[must_use]
pub fn bim_objects_mirror(tabs: &[TechnicalInfoTab]) -> String {
    tabs.iter()
        .find_map(|tab| match &tab.content {
            TabContent::BimObjects(text) => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn to_json_or_empty<T: Serialize + ?Sized>(value: &T, field: &'static str) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(error) => {
            warn!(field, %error, "legacy mirror: serialization failed; writing empty");
            String::new()
        }
    }
}
