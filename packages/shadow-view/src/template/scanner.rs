//! Placeholder scanning
//!
//! Placeholders are written `${name}`, `${name.sub.path}` or `${@}`. Before a
//! template is parsed every placeholder is rewritten to the indexed marker
//! `${*N*}`, where `N` is the position of its name in the property list, so
//! the tree walk never deals with the original tag syntax again.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Name of the self-reference placeholder `${@}`.
pub const SELF_REFERENCE: &str = "@";

pub static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{\s*(@|[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)\s*\}").unwrap()
});

pub static INDEXED_MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{\*(\d+)\*\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub rewritten: String,
    pub properties: Vec<String>,
}

pub fn marker(index: usize) -> String {
    format!("${{*{}*}}", index)
}

/// Rewrite every placeholder in `text` to its indexed marker, collecting the
/// distinct names in first-occurrence order.
pub fn scan(text: &str) -> ScanResult {
    let mut properties = Vec::new();
    let rewritten = scan_into(text, &mut properties);
    ScanResult {
        rewritten,
        properties,
    }
}

/// Like [`scan`], appending newly seen names to an existing property list.
pub fn scan_into(text: &str, properties: &mut Vec<String>) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let index = match properties.iter().position(|p| p == name) {
                Some(index) => index,
                None => {
                    properties.push(name.to_string());
                    properties.len() - 1
                }
            };
            marker(index)
        })
        .into_owned()
}

/// First indexed marker already present in raw text, if any.
pub fn find_indexed_marker(text: &str) -> Option<&str> {
    INDEXED_MARKER_PATTERN.find(text).map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Marker(usize),
}

/// Split rewritten text into literal runs and markers, in order. Empty
/// literal runs are omitted.
pub fn split_markers(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in INDEXED_MARKER_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(&text[last..whole.start()]));
        }
        match caps[1].parse::<usize>() {
            Ok(index) => segments.push(Segment::Marker(index)),
            Err(_) => segments.push(Segment::Literal(whole.as_str())),
        }
        last = whole.end();
    }
    if last < text.len() {
        segments.push(Segment::Literal(&text[last..]));
    }
    segments
}

pub fn has_markers(text: &str) -> bool {
    INDEXED_MARKER_PATTERN.is_match(text)
}

/// Distinct marker indices referenced by `text`, in first-occurrence order.
pub fn marker_indices(text: &str) -> Vec<usize> {
    let mut indices = Vec::new();
    for segment in split_markers(text) {
        if let Segment::Marker(index) = segment {
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
    }
    indices
}
