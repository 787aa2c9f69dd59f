//! Reconstruction expressions
//!
//! Attribute values mixing literal text with placeholders are compiled once
//! into an ordered list of fragments and re-evaluated on every assignment,
//! without going back to the placeholder syntax.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::scanner::{split_markers, Segment};
use crate::value::to_text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Fragment {
    Literal(String),
    Property(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "fragments", rename_all = "camelCase")]
pub enum ReconstructionExpression {
    /// The bound text node's whole content is the property value.
    ReplaceText,
    /// Concatenation of literal and property fragments.
    Concat(Vec<Fragment>),
}

impl ReconstructionExpression {
    /// Compile an attribute value holding indexed markers. `name_of` maps a
    /// marker index to the property name it stands for.
    pub fn from_markers(value: &str, name_of: impl Fn(usize) -> Option<String>) -> Self {
        let fragments = split_markers(value)
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Fragment::Literal(text.to_string()),
                Segment::Marker(index) => match name_of(index) {
                    Some(name) => Fragment::Property(name),
                    None => Fragment::Literal(String::new()),
                },
            })
            .collect();
        ReconstructionExpression::Concat(fragments)
    }

    /// Property names the expression reads, in order of appearance.
    pub fn properties(&self) -> Vec<&str> {
        match self {
            ReconstructionExpression::ReplaceText => Vec::new(),
            ReconstructionExpression::Concat(fragments) => fragments
                .iter()
                .filter_map(|f| match f {
                    Fragment::Property(name) => Some(name.as_str()),
                    Fragment::Literal(_) => None,
                })
                .collect(),
        }
    }

    /// Evaluate against the current backing values. `bound` is the property
    /// the location was recorded under; unset properties read as empty text.
    pub fn evaluate(&self, bound: &str, values: &IndexMap<String, Value>) -> String {
        let read = |name: &str| values.get(name).map(to_text).unwrap_or_default();
        match self {
            ReconstructionExpression::ReplaceText => read(bound),
            ReconstructionExpression::Concat(fragments) => fragments
                .iter()
                .map(|fragment| match fragment {
                    Fragment::Literal(text) => text.clone(),
                    Fragment::Property(name) => read(name),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(index: usize) -> Option<String> {
        ["first", "second"].get(index).map(|s| s.to_string())
    }

    #[test]
    fn test_concat_evaluation() {
        let expr = ReconstructionExpression::from_markers("a-${*0*}-${*1*}", names);
        assert_eq!(expr.properties(), vec!["first", "second"]);

        let mut values = IndexMap::new();
        values.insert("first".to_string(), json!("L"));
        assert_eq!(expr.evaluate("first", &values), "a-L-");
        values.insert("second".to_string(), json!(7));
        assert_eq!(expr.evaluate("second", &values), "a-L-7");
    }

    #[test]
    fn test_replace_text() {
        let mut values = IndexMap::new();
        values.insert("n".to_string(), json!(true));
        assert_eq!(ReconstructionExpression::ReplaceText.evaluate("n", &values), "true");
        assert_eq!(ReconstructionExpression::ReplaceText.evaluate("m", &values), "");
    }
}
