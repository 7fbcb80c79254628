//! Legacy field parsing.
//!
//! Before the tab model, products stored technical information in three
//! fields whose shapes drifted over time:
//!
//! - `specifications`: an object of known fence keys, an array of
//!   heading/description sections, or either of those encoded as a JSON
//!   string.
//! - `panelVariations`: a `{headers, rows}` table, an array of flat records,
//!   or either of those as a JSON string. Older products hold plain prose.
//! - `bimObjects`: free text.
//!
//! Every parser here is total. Malformed input is recovered to an empty or
//! fallback value and logged at debug level; nothing is surfaced as an error.
//! [`LegacyFields::resolve`] is the one place that inspects raw shapes.

#[cfg(test)]
#[path = "legacy_test.rs"]
mod legacy_test;

use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{
    DEFAULT_PANEL_HEADERS, PanelHeader, PanelRow, PanelTable, ProductRecord, SpecSection, default_headers,
};

/// Heading of the single section synthesized from a legacy specifications object.
pub const LEGACY_SPECIFICATIONS_HEADING: &str = "Technical Specifications";

/// A known key of the legacy specifications object.
struct SpecField {
    key: &'static str,
    /// Secondary key consulted when `key` is empty.
    alias: Option<&'static str>,
    label: &'static str,
}

/// Known legacy specification keys in output order.
const SPEC_FIELDS: [SpecField; 7] = [
    SpecField { key: "nominalHeight", alias: None, label: "Nominal Fence Height (mm)" },
    SpecField { key: "panelDimensions", alias: None, label: "Panel Dimensions (mm)" },
    SpecField { key: "reinforcements", alias: None, label: "Reinforcements" },
    SpecField { key: "postLength", alias: None, label: "Post Length (mm)" },
    SpecField { key: "fixators", alias: None, label: "Fixators / Post" },
    SpecField { key: "bolts", alias: None, label: "Bolts, Washers & Shear-off Nuts / Post" },
    SpecField { key: "wireDiameter", alias: Some("wireDiameterInfo"), label: "Wire Diameter (mm)" },
];

/// Fallback heading for the section at 1-based `position`.
#[must_use]
pub fn fallback_section_heading(position: usize) -> String {
    format!("Specification Section {position}")
}

/// Parse the legacy `specifications` field into ordered sections.
///
/// Returns an empty list for null, blank, unparseable, or unrecognized input.
#[must_use]
pub fn parse_specifications(raw: &Value) -> Vec<SpecSection> {
    match raw {
        Value::String(text) => parse_specifications_text(text),
        Value::Array(items) => sections_from_array(items),
        Value::Object(map) => sections_from_object(map),
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

fn parse_specifications_text(text: &str) -> Vec<SpecSection> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(trimmed) {
        // Double-encoded strings unwrap one level per pass.
        Ok(Value::String(inner)) => parse_specifications_text(&inner),
        Ok(value) => parse_specifications(&value),
        Err(error) => {
            debug!(%error, len = trimmed.len(), "specifications: legacy text is not JSON; ignoring");
            Vec::new()
        }
    }
}

fn sections_from_array(items: &[Value]) -> Vec<SpecSection> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(map) => Some(section_from_map(map, index + 1)),
            Value::String(text) if !text.trim().is_empty() => {
                Some(SpecSection::new(fallback_section_heading(index + 1), text.clone()))
            }
            _ => {
                debug!(index, "specifications: skipping non-section array item");
                None
            }
        })
        .collect()
}

fn section_from_map(map: &Map<String, Value>, position: usize) -> SpecSection {
    let heading = map.get("heading").map(scalar_text).unwrap_or_default();
    let heading = if heading.trim().is_empty() {
        fallback_section_heading(position)
    } else {
        heading
    };
    let description = map.get("description").map(scalar_text).unwrap_or_default();
    SpecSection { heading, description }
}

fn sections_from_object(map: &Map<String, Value>) -> Vec<SpecSection> {
    let is_legacy_object = SPEC_FIELDS
        .iter()
        .any(|field| map.contains_key(field.key) || field.alias.is_some_and(|a| map.contains_key(a)));

    if is_legacy_object {
        let lines = SPEC_FIELDS
            .iter()
            .filter_map(|field| {
                let value = spec_field_value(map, field);
                (!value.is_empty()).then(|| format!("{}: {value}", field.label))
            })
            .collect::<Vec<_>>();
        if lines.is_empty() {
            return Vec::new();
        }
        return vec![SpecSection::new(LEGACY_SPECIFICATIONS_HEADING, lines.join("\n"))];
    }

    if map.contains_key("heading") || map.contains_key("description") {
        return vec![section_from_map(map, 1)];
    }

    debug!(keys = map.len(), "specifications: object has no recognized keys");
    Vec::new()
}

fn spec_field_value(map: &Map<String, Value>, field: &SpecField) -> String {
    let primary = trimmed_field(map, field.key);
    let secondary = field.alias.map(|alias| trimmed_field(map, alias)).unwrap_or_default();
    match (primary.is_empty(), secondary.is_empty()) {
        (true, _) => secondary,
        (false, true) => primary,
        (false, false) if primary == secondary => primary,
        (false, false) => format!("{primary} ({secondary})"),
    }
}

fn trimmed_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .map(scalar_text)
        .map(|text| text.trim().to_owned())
        .unwrap_or_default()
}

/// Text of a scalar JSON value; empty for null, arrays, and objects.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Parse the legacy `panelVariations` field into a rectangular table.
///
/// Text that is not JSON becomes a zero-row table carrying the text as its
/// display note.
#[must_use]
pub fn parse_panel_variations(raw: &Value) -> PanelTable {
    match raw {
        Value::String(text) => parse_panel_text(text),
        Value::Array(records) => table_from_records(records),
        Value::Object(map) if map.contains_key("headers") || map.contains_key("rows") => {
            table_from_structured(map)
        }
        Value::Object(map) if !map.is_empty() => table_from_records(std::slice::from_ref(raw)),
        Value::Object(_) | Value::Null | Value::Bool(_) | Value::Number(_) => PanelTable::default(),
    }
}

fn parse_panel_text(text: &str) -> PanelTable {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return PanelTable::default();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(inner)) => parse_panel_text(&inner),
        Ok(value @ (Value::Array(_) | Value::Object(_))) => parse_panel_variations(&value),
        Ok(Value::Null) => PanelTable::default(),
        Ok(_) => PanelTable::with_note(trimmed),
        Err(error) => {
            debug!(%error, len = trimmed.len(), "panelVariations: legacy text is not JSON; keeping as note");
            PanelTable::with_note(trimmed)
        }
    }
}

fn table_from_records(records: &[Value]) -> PanelTable {
    let rows = records
        .iter()
        .filter_map(Value::as_object)
        .map(row_from_map)
        .collect::<Vec<_>>();
    if rows.len() < records.len() {
        debug!(skipped = records.len() - rows.len(), "panelVariations: skipping non-object records");
    }
    let dropped = rows
        .iter()
        .flat_map(PanelRow::keys)
        .filter(|key| !DEFAULT_PANEL_HEADERS.iter().any(|(default, _)| default == key))
        .count();
    if dropped > 0 {
        debug!(dropped, "panelVariations: dropping record fields outside the default headers");
    }
    PanelTable::new(default_headers(), rows)
}

fn table_from_structured(map: &Map<String, Value>) -> PanelTable {
    let rows = map
        .get("rows")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(Value::as_object).map(row_from_map).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut headers = map
        .get("headers")
        .and_then(Value::as_array)
        .map(|headers| headers.iter().filter_map(header_from_value).collect::<Vec<_>>())
        .unwrap_or_default();

    if headers.is_empty() {
        headers = headers_from_rows(&rows);
    }
    PanelTable::new(headers, rows)
}

fn header_from_value(value: &Value) -> Option<PanelHeader> {
    match value {
        Value::String(key) => Some(PanelHeader::new(key.clone(), key.clone())),
        Value::Object(map) => {
            let key = map.get("key").map(scalar_text).unwrap_or_default();
            let label = map.get("label").map(scalar_text).unwrap_or_default();
            Some(PanelHeader { key, label })
        }
        _ => None,
    }
}

/// Column keys in first-seen order, for tables stored without headers.
fn headers_from_rows(rows: &[PanelRow]) -> Vec<PanelHeader> {
    let mut headers = Vec::<PanelHeader>::new();
    for row in rows {
        for key in row.keys() {
            if !headers.iter().any(|h| &h.key == key) {
                headers.push(PanelHeader::new(key.clone(), key.clone()));
            }
        }
    }
    headers
}

fn row_from_map(map: &Map<String, Value>) -> PanelRow {
    map.iter()
        .map(|(key, value)| (key.clone(), scalar_text(value)))
        .collect()
}

/// Parse the legacy `bimObjects` field: trimmed text, or empty.
#[must_use]
pub fn parse_bim_objects(raw: &Value) -> String {
    raw.as_str().map(str::trim).unwrap_or_default().to_owned()
}

/// The three legacy fields of one product, each resolved once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyFields {
    pub specifications: Vec<SpecSection>,
    pub panel_variations: PanelTable,
    /// The stored `panelVariations` field held something beyond empty JSON,
    /// even if no rows came of it.
    pub panel_variations_present: bool,
    pub bim_objects: String,
}

impl LegacyFields {
    #[must_use]
    pub fn resolve(record: &ProductRecord) -> Self {
        Self {
            specifications: parse_specifications(&record.specifications),
            panel_variations: parse_panel_variations(&record.panel_variations),
            panel_variations_present: is_present(&record.panel_variations),
            bim_objects: parse_bim_objects(&record.bim_objects),
        }
    }
}

/// Whether a stored field holds content. JSON-encoded text is judged by the
/// value it decodes to; text that is not JSON counts as prose.
fn is_present(value: &Value) -> bool {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return false;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(decoded @ (Value::Null | Value::String(_) | Value::Array(_) | Value::Object(_))) => {
                    is_present(&decoded)
                }
                // Scalars and non-JSON text are kept as a display note.
                Ok(Value::Bool(_) | Value::Number(_)) | Err(_) => true,
            }
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}
