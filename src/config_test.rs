use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
    let map = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect::<HashMap<_, _>>();
    move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
}

#[test]
fn defaults_when_unset() {
    let labels = TabLabels::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(labels, TabLabels::default());
    assert_eq!(labels.specifications, DEFAULT_SPECIFICATIONS_TAB_NAME);
    assert_eq!(labels.panel_variations, DEFAULT_PANEL_VARIATIONS_TAB_NAME);
    assert_eq!(labels.bim_objects, DEFAULT_BIM_OBJECTS_TAB_NAME);
}

#[test]
fn overrides_are_trimmed() {
    let labels = TabLabels::from_lookup(lookup_from(&[
        (SPECIFICATIONS_TAB_NAME_VAR, "  Technische Daten "),
        (BIM_OBJECTS_TAB_NAME_VAR, "BIM"),
    ]))
    .unwrap();
    assert_eq!(labels.specifications, "Technische Daten");
    assert_eq!(labels.panel_variations, DEFAULT_PANEL_VARIATIONS_TAB_NAME);
    assert_eq!(labels.bim_objects, "BIM");
}

#[test]
fn blank_override_errors() {
    let err = TabLabels::from_lookup(lookup_from(&[(PANEL_VARIATIONS_TAB_NAME_VAR, "   ")])).unwrap_err();
    assert!(matches!(err, Error::BlankConfig { ref var } if var == PANEL_VARIATIONS_TAB_NAME_VAR));
    assert!(err.to_string().contains("TECHINFO_PANEL_VARIATIONS_TAB_NAME"));
}

#[test]
fn non_unicode_override_errors() {
    let lookup = |key: &str| -> Result<String, VarError> {
        if key == SPECIFICATIONS_TAB_NAME_VAR {
            Err(VarError::NotUnicode(std::ffi::OsString::from("x")))
        } else {
            Err(VarError::NotPresent)
        }
    };
    let err = TabLabels::from_lookup(lookup).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}
