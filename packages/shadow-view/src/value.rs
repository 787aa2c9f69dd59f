//! Property value helpers

use serde_json::Value;

/// Coerce a property value to the text written into a node.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Follow a dotted path (`user.address.city`) into a value. Numeric segments
/// index into arrays. An empty path or `@` yields the value itself.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() || path == "@" {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(&json!(null)), "");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&json!(3)), "3");
        assert_eq!(to_text(&json!(2.5)), "2.5");
        assert_eq!(to_text(&json!("hi")), "hi");
        assert_eq!(to_text(&json!([1, "a", null])), "1,a,");
        assert_eq!(to_text(&json!({"k": 1})), "{\"k\":1}");
    }

    #[test]
    fn test_resolve_path() {
        let data = json!({"user": {"name": "Doe", "tags": ["a", "b"]}});
        assert_eq!(resolve_path(&data, "user.name"), Some(&json!("Doe")));
        assert_eq!(resolve_path(&data, "user.tags.1"), Some(&json!("b")));
        assert_eq!(resolve_path(&data, "user.missing"), None);
        assert_eq!(resolve_path(&data, "@"), Some(&data));
    }
}
