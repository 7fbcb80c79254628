//! Display names for tabs synthesized from legacy fields.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;

use crate::error::Error;

pub const SPECIFICATIONS_TAB_NAME_VAR: &str = "TECHINFO_SPECIFICATIONS_TAB_NAME";
pub const PANEL_VARIATIONS_TAB_NAME_VAR: &str = "TECHINFO_PANEL_VARIATIONS_TAB_NAME";
pub const BIM_OBJECTS_TAB_NAME_VAR: &str = "TECHINFO_BIM_OBJECTS_TAB_NAME";

pub const DEFAULT_SPECIFICATIONS_TAB_NAME: &str = "Specifications";
pub const DEFAULT_PANEL_VARIATIONS_TAB_NAME: &str = "Panel Variations";
pub const DEFAULT_BIM_OBJECTS_TAB_NAME: &str = "BIM Objects";

/// Names given to migrated tabs. Stored canonical tabs keep their own names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabels {
    pub specifications: String,
    pub panel_variations: String,
    pub bim_objects: String,
}

impl Default for TabLabels {
    fn default() -> Self {
        Self {
            specifications: DEFAULT_SPECIFICATIONS_TAB_NAME.to_owned(),
            panel_variations: DEFAULT_PANEL_VARIATIONS_TAB_NAME.to_owned(),
            bim_objects: DEFAULT_BIM_OBJECTS_TAB_NAME.to_owned(),
        }
    }
}

impl TabLabels {
    /// Build labels from environment variables.
    ///
    /// Optional:
    /// - `TECHINFO_SPECIFICATIONS_TAB_NAME`: default `Specifications`
    /// - `TECHINFO_PANEL_VARIATIONS_TAB_NAME`: default `Panel Variations`
    /// - `TECHINFO_BIM_OBJECTS_TAB_NAME`: default `BIM Objects`
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankConfig`] for a variable set to whitespace and
    /// [`Error::InvalidConfig`] for one that is not unicode.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Same as [`TabLabels::from_env`] with a caller-supplied lookup.
    ///
    /// # Errors
    ///
    /// See [`TabLabels::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        Ok(Self {
            specifications: label(&lookup, SPECIFICATIONS_TAB_NAME_VAR, DEFAULT_SPECIFICATIONS_TAB_NAME)?,
            panel_variations: label(&lookup, PANEL_VARIATIONS_TAB_NAME_VAR, DEFAULT_PANEL_VARIATIONS_TAB_NAME)?,
            bim_objects: label(&lookup, BIM_OBJECTS_TAB_NAME_VAR, DEFAULT_BIM_OBJECTS_TAB_NAME)?,
        })
    }
}

fn label<F>(lookup: &F, var: &str, default: &str) -> Result<String, Error>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(var) {
        Ok(value) if value.trim().is_empty() => Err(Error::BlankConfig { var: var.to_owned() }),
        Ok(value) => Ok(value.trim().to_owned()),
        Err(VarError::NotPresent) => Ok(default.to_owned()),
        Err(VarError::NotUnicode(_)) => Err(Error::InvalidConfig { var: var.to_owned() }),
    }
}
