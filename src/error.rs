//! Errors raised at the document boundary.
//!
//! Parsing legacy fields and editing tabs never fail; malformed input there
//! is recovered in place. The only errors are a product document that is not
//! a JSON object and invalid configuration.

/// Error returned by [`crate::ProductRecord::from_value`],
/// [`crate::ProductRecord::from_json_str`] and [`crate::TabLabels::from_env`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The product document decoded to something other than a JSON object.
    #[error("product record must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    /// The product document is not valid JSON.
    #[error("invalid product record JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration variable is set but holds only whitespace.
    #[error("{var} is set but blank")]
    BlankConfig { var: String },
    /// A configuration variable holds bytes that are not valid unicode.
    #[error("{var} is not valid unicode")]
    InvalidConfig { var: String },
}
