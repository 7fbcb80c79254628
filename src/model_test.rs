use serde_json::json;

use super::*;
use crate::error::Error;

fn row(cells: &[(&str, &str)]) -> PanelRow {
    cells
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[test]
fn tab_kind_wire_names_are_camel_case() {
    assert_eq!(serde_json::to_value(TabKind::PanelVariations).unwrap(), json!("panelVariations"));
    assert_eq!(serde_json::to_value(TabKind::BimObjects).unwrap(), json!("bimObjects"));
    assert_eq!(TabKind::Specifications.as_str(), "specifications");
    assert_eq!(TabKind::Custom.as_str(), "custom");
}

#[test]
fn default_ids_match_migration_ids() {
    assert_eq!(TabKind::Specifications.default_id(), "specifications");
    assert_eq!(TabKind::PanelVariations.default_id(), "panel-variations");
    assert_eq!(TabKind::BimObjects.default_id(), "bim-objects");
}

#[test]
fn panel_table_new_rectifies_rows_to_headers() {
    let table = PanelTable::new(
        vec![PanelHeader::new("a", "A"), PanelHeader::new("b", "B")],
        vec![row(&[("a", "1"), ("orphan", "x")]), row(&[])],
    );

    let keys = table.header_keys().collect::<Vec<_>>();
    assert_eq!(keys, vec!["a", "b"]);
    for r in table.rows() {
        assert_eq!(r.keys().map(String::as_str).collect::<Vec<_>>(), keys);
    }
    assert_eq!(table.cell(0, "a"), Some("1"));
    assert_eq!(table.cell(0, "b"), Some(""));
    assert_eq!(table.cell(0, "orphan"), None);
}

#[test]
fn panel_table_new_drops_blank_and_duplicate_keys() {
    let table = PanelTable::new(
        vec![
            PanelHeader::new("a", "First"),
            PanelHeader::new("  ", "Blank"),
            PanelHeader::new("a", "Second"),
            PanelHeader::new("b", ""),
        ],
        Vec::new(),
    );

    assert_eq!(table.headers().len(), 2);
    assert_eq!(table.headers()[0].label, "First");
    assert_eq!(table.headers()[1].label, "b");
}

#[test]
fn panel_table_new_keeps_padded_keys_verbatim() {
    let table = PanelTable::new(
        vec![PanelHeader::new("size ", "Size")],
        vec![row(&[("size ", "1200")])],
    );

    assert_eq!(table.header_keys().collect::<Vec<_>>(), vec!["size "]);
    assert_eq!(table.cell(0, "size "), Some("1200"));
}

#[test]
fn panel_table_new_without_headers_uses_defaults() {
    let table = PanelTable::new(Vec::new(), vec![row(&[("panelType", "A")])]);
    assert_eq!(table.headers().len(), DEFAULT_PANEL_HEADERS.len());
    assert_eq!(table.cell(0, "panelType"), Some("A"));
    assert_eq!(table.cell(0, "coating"), Some(""));
}

#[test]
fn display_cell_renders_missing_as_na() {
    let table = PanelTable::new(default_headers(), vec![row(&[("panelType", "A")])]);
    assert_eq!(table.display_cell(0, "panelType"), "A");
    assert_eq!(table.display_cell(0, "coating"), MISSING_CELL);
    assert_eq!(table.display_cell(5, "panelType"), MISSING_CELL);
}

#[test]
fn note_is_not_serialized() {
    let table = PanelTable::with_note("legacy prose");
    assert_eq!(table.note(), Some("legacy prose"));

    let value = serde_json::to_value(&table).unwrap();
    assert!(value.get("note").is_none());
    assert_eq!(value["rows"], json!([]));
    assert_eq!(value["headers"].as_array().map(Vec::len), Some(4));
}

#[test]
fn tab_serializes_with_type_and_content() {
    let tab = TechnicalInfoTab::new(
        "specifications",
        "Specifications",
        TabContent::Specifications(vec![SpecSection::new("H", "D")]),
    );

    let value = serde_json::to_value(&tab).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "specifications",
            "name": "Specifications",
            "type": "specifications",
            "content": [{ "heading": "H", "description": "D" }]
        })
    );
}

#[test]
fn tab_round_trips_through_json() {
    let table = PanelTable::new(default_headers(), vec![row(&[("panelType", "A"), ("coating", "Zinc")])]);
    let tab = TechnicalInfoTab::new("pv", "Panels", TabContent::PanelVariations(table));

    let json = serde_json::to_string(&tab).unwrap();
    let decoded: TechnicalInfoTab = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, tab);
}

#[test]
fn tab_decodes_loose_content_shapes() {
    let decoded: TechnicalInfoTab = serde_json::from_value(json!({
        "id": "pv",
        "name": "Panels",
        "type": "panelVariations",
        "content": [{ "panelType": "B" }]
    }))
    .unwrap();
    let table = decoded.panel_table().unwrap();
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.cell(0, "panelType"), Some("B"));

    let custom: TechnicalInfoTab =
        serde_json::from_value(json!({ "id": "c", "name": "Notes", "type": "custom" })).unwrap();
    assert_eq!(custom.text(), Some(""));
}

#[test]
fn tab_with_unknown_type_fails_to_decode() {
    let result = serde_json::from_value::<TechnicalInfoTab>(json!({
        "id": "x",
        "name": "X",
        "type": "gallery",
        "content": ""
    }));
    assert!(result.is_err());
}

#[test]
fn content_is_empty_per_kind() {
    assert!(TabContent::empty(TabKind::Specifications).is_empty());
    assert!(TabContent::empty(TabKind::PanelVariations).is_empty());
    assert!(TabContent::BimObjects("   ".to_owned()).is_empty());
    assert!(!TabContent::Custom("notes".to_owned()).is_empty());
}

#[test]
fn accessors_match_content_kind() {
    let mut tab = TechnicalInfoTab::new("b", "BIM", TabContent::BimObjects("ifc".to_owned()));
    assert_eq!(tab.kind(), TabKind::BimObjects);
    assert_eq!(tab.text(), Some("ifc"));
    assert!(tab.sections().is_none());
    assert!(tab.panel_table_mut().is_none());
}

#[test]
fn product_record_picks_known_fields() {
    let record = ProductRecord::from_value(&json!({
        "name": "Fence 3D",
        "specifications": { "nominalHeight": "1800mm" },
        "bimObjects": "ifc download"
    }))
    .unwrap();

    assert_eq!(record.specifications, json!({ "nominalHeight": "1800mm" }));
    assert_eq!(record.bim_objects, json!("ifc download"));
    assert!(record.panel_variations.is_null());
    assert!(record.technical_info_tabs.is_null());
}

#[test]
fn product_record_rejects_non_objects() {
    let err = ProductRecord::from_value(&json!([1, 2])).unwrap_err();
    assert!(matches!(err, Error::NotAnObject("an array")));

    let err = ProductRecord::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn product_record_serialization_skips_absent_fields() {
    let record = ProductRecord {
        bim_objects: json!("x"),
        ..ProductRecord::default()
    };
    assert_eq!(serde_json::to_value(&record).unwrap(), json!({ "bimObjects": "x" }));
}
