//! Product technical-information model.
//!
//! Products carry their technical information in one of two encodings: the
//! canonical `technicalInfoTabs` array, or up to three legacy fields
//! (`specifications`, `panelVariations`, `bimObjects`) written by older
//! tooling in several historical shapes. This crate reconciles both into a
//! single typed tab collection, edits that collection during authoring, and
//! derives the legacy mirrors written back alongside it on save.
//!
//! Everything here is pure and in-memory. Reading and writing the product
//! document is the caller's job.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Tab, content, table, and product record types |
//! | [`legacy`] | Tolerant parsers for the three legacy fields |
//! | [`migrate`] | Canonical-or-legacy resolution into ordered tabs |
//! | [`editor`] | Table, section, and tab-collection edits plus [`editor::EditOp`] |
//! | [`compat`] | Legacy mirror derivation and the four-key write patch |
//! | [`session`] | One product's tabs for the length of an authoring session |
//! | [`config`] | Display names for synthesized tabs |
//! | [`error`] | Errors raised at the document boundary |

pub mod compat;
pub mod config;
pub mod editor;
pub mod error;
pub mod legacy;
pub mod migrate;
pub mod model;
pub mod session;

pub use compat::{LegacyPatch, write_patch};
pub use config::TabLabels;
pub use editor::{EditOp, apply_op};
pub use error::Error;
pub use legacy::{LegacyFields, parse_bim_objects, parse_panel_variations, parse_specifications};
pub use migrate::{decode_canonical_tabs, migrate_tabs, migrate_tabs_with};
pub use model::{
    PanelHeader, PanelRow, PanelTable, ProductRecord, SpecSection, TabContent, TabKind,
    TechnicalInfoTab,
};
pub use session::AuthoringSession;
