//! Plain string interpolation, without any node tree.

use regex::Captures;
use serde_json::Value;

use super::scanner::PLACEHOLDER_PATTERN;
use crate::value::{resolve_path, to_text};

/// Text substituted for a placeholder whose path does not resolve.
pub const UNRESOLVED: &str = "undefined";

/// Replace every placeholder in `text` by the value its (dotted) name
/// resolves to in `values`. `${@}` stands for `values` itself.
pub fn apply(text: &str, values: &Value) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(text, |caps: &Captures| match resolve_path(values, &caps[1]) {
            Some(value) => to_text(value),
            None => UNRESOLVED.to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply() {
        let data = json!({"name": "Doe", "user": {"age": 40}});
        assert_eq!(apply("hello ${name}", &data), "hello Doe");
        assert_eq!(apply("${ user.age }/${user.height}", &data), "40/undefined");
        assert_eq!(apply("<i>${missing}</i>", &json!({})), "<i>undefined</i>");
    }

    #[test]
    fn test_apply_self_reference() {
        assert_eq!(apply("[${@}]", &json!("x")), "[x]");
    }
}
