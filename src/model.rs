//! Tab model: typed tabs, their content, the panel-variation table, and the
//! partial product record the model is read from.
//!
//! Tab content is a discriminated union keyed by the serialized `type` field.
//! Decoding goes through a loose wire shape (`RawTab`) so that stored tabs
//! with unexpected content shapes are normalized by the same rules as the
//! legacy fields instead of failing.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::Error;
use crate::legacy;

/// One panel-variation row: header key to cell text.
pub type PanelRow = BTreeMap<String, String>;

/// Headers synthesized for legacy record arrays and for new tables, as
/// `(key, label)` pairs in display order.
pub const DEFAULT_PANEL_HEADERS: [(&str, &str); 4] = [
    ("panelType", "Panel Type"),
    ("coating", "Coating"),
    ("description", "Description"),
    ("environmentalSuitability", "Environmental Suitability"),
];

/// Rendered in place of an empty panel-variation cell.
pub const MISSING_CELL: &str = "N/A";

/// The kind of a tab, serialized as its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TabKind {
    /// Ordered heading/description sections.
    Specifications,
    /// Dynamic-column panel configuration table.
    PanelVariations,
    /// Free-text BIM notes.
    BimObjects,
    /// Author-defined free-text tab.
    Custom,
}

impl TabKind {
    /// Wire name of the kind, as used in the `type` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Specifications => "specifications",
            Self::PanelVariations => "panelVariations",
            Self::BimObjects => "bimObjects",
            Self::Custom => "custom",
        }
    }

    /// Deterministic id given to a tab of this kind synthesized from legacy fields.
    #[must_use]
    pub fn default_id(self) -> &'static str {
        match self {
            Self::Specifications => "specifications",
            Self::PanelVariations => "panel-variations",
            Self::BimObjects => "bim-objects",
            Self::Custom => "custom",
        }
    }
}

/// A heading with free-text body inside a specifications tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecSection {
    pub heading: String,
    pub description: String,
}

impl SpecSection {
    #[must_use]
    pub fn new(heading: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            description: description.into(),
        }
    }
}

/// A panel-variation column. `key` is unique within a table; `label` is free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelHeader {
    pub key: String,
    pub label: String,
}

impl PanelHeader {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Header list for new and legacy-synthesized tables.
#[must_use]
pub fn default_headers() -> Vec<PanelHeader> {
    DEFAULT_PANEL_HEADERS
        .iter()
        .map(|(key, label)| PanelHeader::new(*key, *label))
        .collect()
}

/// Panel-variation table.
///
/// Always has at least one header, header keys are unique, and every row
/// holds exactly the current header key set. Fields are crate-private so the
/// only way to change the shape is through the editing methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct PanelTable {
    pub(crate) headers: Vec<PanelHeader>,
    pub(crate) rows: Vec<PanelRow>,
    /// Free text recovered from a legacy field that was not JSON. Display only.
    #[serde(skip)]
    pub(crate) note: Option<String>,
}

impl PanelTable {
    /// Build a table, dropping blank or duplicate header keys and rectifying
    /// every row to the surviving key set. Keys are kept verbatim so stored
    /// cells still match them. Falls back to the default headers when no
    /// usable header remains.
    #[must_use]
    pub fn new(headers: Vec<PanelHeader>, rows: Vec<PanelRow>) -> Self {
        let mut seen = HashSet::new();
        let mut headers = headers
            .into_iter()
            .filter_map(|PanelHeader { key, label }| {
                if key.trim().is_empty() || !seen.insert(key.clone()) {
                    return None;
                }
                let label = if label.trim().is_empty() { key.clone() } else { label };
                Some(PanelHeader { key, label })
            })
            .collect::<Vec<_>>();
        if headers.is_empty() {
            headers = default_headers();
        }

        let rows = rows
            .into_iter()
            .map(|mut row| {
                headers
                    .iter()
                    .map(|header| {
                        let cell = row.remove(&header.key).unwrap_or_default();
                        (header.key.clone(), cell)
                    })
                    .collect::<PanelRow>()
            })
            .collect();

        Self {
            headers,
            rows,
            note: None,
        }
    }

    /// Zero-row table with the default headers carrying a display note.
    #[must_use]
    pub fn with_note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn headers(&self) -> &[PanelHeader] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Legacy free text carried for display when the stored field was not JSON.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Header keys in column order.
    pub fn header_keys(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(|h| h.key.as_str())
    }

    #[must_use]
    pub fn has_header(&self, key: &str) -> bool {
        self.headers.iter().any(|h| h.key == key)
    }

    /// Raw cell text, `None` when the row or column does not exist.
    #[must_use]
    pub fn cell(&self, row_index: usize, key: &str) -> Option<&str> {
        self.rows
            .get(row_index)
            .and_then(|row| row.get(key))
            .map(String::as_str)
    }

    /// Cell text for display: [`MISSING_CELL`] when empty or absent.
    #[must_use]
    pub fn display_cell(&self, row_index: usize, key: &str) -> &str {
        match self.cell(row_index, key) {
            Some(text) if !text.trim().is_empty() => text,
            _ => MISSING_CELL,
        }
    }

    /// `true` when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for PanelTable {
    fn default() -> Self {
        Self {
            headers: default_headers(),
            rows: Vec::new(),
            note: None,
        }
    }
}

impl From<Value> for PanelTable {
    fn from(value: Value) -> Self {
        legacy::parse_panel_variations(&value)
    }
}

/// Tab content, one variant per [`TabKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabContent {
    Specifications(Vec<SpecSection>),
    PanelVariations(PanelTable),
    BimObjects(String),
    Custom(String),
}

impl TabContent {
    /// Empty content of the given kind.
    #[must_use]
    pub fn empty(kind: TabKind) -> Self {
        match kind {
            TabKind::Specifications => Self::Specifications(Vec::new()),
            TabKind::PanelVariations => Self::PanelVariations(PanelTable::default()),
            TabKind::BimObjects => Self::BimObjects(String::new()),
            TabKind::Custom => Self::Custom(String::new()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> TabKind {
        match self {
            Self::Specifications(_) => TabKind::Specifications,
            Self::PanelVariations(_) => TabKind::PanelVariations,
            Self::BimObjects(_) => TabKind::BimObjects,
            Self::Custom(_) => TabKind::Custom,
        }
    }

    /// Whether a renderer should show its "no data" placeholder instead.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Specifications(sections) => sections.is_empty(),
            Self::PanelVariations(table) => table.is_empty(),
            Self::BimObjects(text) | Self::Custom(text) => text.trim().is_empty(),
        }
    }
}

/// A named, typed content block under a product's technical information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTab", into = "RawTab")]
pub struct TechnicalInfoTab {
    pub id: String,
    pub name: String,
    pub content: TabContent,
}

impl TechnicalInfoTab {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: TabContent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TabKind {
        self.content.kind()
    }

    #[must_use]
    pub fn sections(&self) -> Option<&[SpecSection]> {
        match &self.content {
            TabContent::Specifications(sections) => Some(sections),
            _ => None,
        }
    }

    pub fn sections_mut(&mut self) -> Option<&mut Vec<SpecSection>> {
        match &mut self.content {
            TabContent::Specifications(sections) => Some(sections),
            _ => None,
        }
    }

    #[must_use]
    pub fn panel_table(&self) -> Option<&PanelTable> {
        match &self.content {
            TabContent::PanelVariations(table) => Some(table),
            _ => None,
        }
    }

    pub fn panel_table_mut(&mut self) -> Option<&mut PanelTable> {
        match &mut self.content {
            TabContent::PanelVariations(table) => Some(table),
            _ => None,
        }
    }

    /// Text of a BIM objects or custom tab.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            TabContent::BimObjects(text) | TabContent::Custom(text) => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match &mut self.content {
            TabContent::BimObjects(text) | TabContent::Custom(text) => Some(text),
            _ => None,
        }
    }
}

/// Loose wire shape of a stored tab.
#[derive(Serialize, Deserialize)]
struct RawTab {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: TabKind,
    #[serde(default)]
    content: Value,
}

impl From<RawTab> for TechnicalInfoTab {
    fn from(raw: RawTab) -> Self {
        let content = match raw.kind {
            TabKind::Specifications => {
                TabContent::Specifications(legacy::parse_specifications(&raw.content))
            }
            TabKind::PanelVariations => {
                TabContent::PanelVariations(legacy::parse_panel_variations(&raw.content))
            }
            TabKind::BimObjects => TabContent::BimObjects(text_content(&raw.content)),
            TabKind::Custom => TabContent::Custom(text_content(&raw.content)),
        };
        Self {
            id: raw.id,
            name: raw.name,
            content,
        }
    }
}

impl From<TechnicalInfoTab> for RawTab {
    fn from(tab: TechnicalInfoTab) -> Self {
        let kind = tab.kind();
        let content = match tab.content {
            TabContent::Specifications(sections) => json!(sections),
            TabContent::PanelVariations(table) => json!(table),
            TabContent::BimObjects(text) | TabContent::Custom(text) => Value::String(text),
        };
        Self {
            id: tab.id,
            name: tab.name,
            kind,
            content,
        }
    }
}

fn text_content(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Partial view of a product document: the fields this crate reads.
///
/// Each field holds whatever JSON the document stored, `Null` when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecord {
    #[serde(skip_serializing_if = "Value::is_null")]
    pub specifications: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub panel_variations: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub bim_objects: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub technical_info_tabs: Value,
}

impl ProductRecord {
    /// Pick the technical-information fields out of a product document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnObject`] when `value` is not a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let Some(map) = value.as_object() else {
            return Err(Error::NotAnObject(json_type_name(value)));
        };
        Ok(Self::from_map(map))
    }

    /// Parse a product document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for invalid JSON and [`Error::NotAnObject`]
    /// when the document is not an object.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        let value = serde_json::from_str::<Value>(text)?;
        Self::from_value(&value)
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let field = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            specifications: field("specifications"),
            panel_variations: field("panelVariations"),
            bim_objects: field("bimObjects"),
            technical_info_tabs: field("technicalInfoTabs"),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
