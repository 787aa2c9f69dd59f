//! Engine errors

use thiserror::Error;

use crate::parse_util::ParseError;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The markup could not be parsed into a node tree. Fatal for the template.
    #[error("template parse error in {url}: {}", summarize(.errors))]
    TemplateParse { url: String, errors: Vec<ParseError> },

    /// The raw markup already contains the internal indexed-marker form.
    #[error("template {url} contains the reserved marker `{marker}`")]
    ReservedMarker { url: String, marker: String },

    /// A recorded structural path did not resolve against a clone.
    #[error("binding for `{property}` could not be resolved at {path}")]
    BindingResolution { property: String, path: String },

    /// An iteration property was assigned something other than a sequence.
    #[error("iteration property `{property}` expects a sequence, got {found}")]
    InvalidSequence { property: String, found: &'static str },

    #[error("unknown component class `{0}`")]
    UnknownComponentClass(String),
}

fn summarize(errors: &[ParseError]) -> String {
    match errors {
        [] => "no diagnostics".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}
