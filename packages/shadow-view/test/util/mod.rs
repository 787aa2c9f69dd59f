//! Helpers shared by the integration tests

#![allow(dead_code)]

use shadow_view::dom::{Document, NodeId, NodeKind};
use shadow_view::markup::{parse, ParseOptions};
use shadow_view::{ShadowView, ShadowViewCompiler, TemplateConfig};

/// Flatten a subtree into `[kind, name or text, depth]` rows, pre-order.
pub fn humanize(doc: &Document, root: NodeId) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    humanize_into(doc, root, 0, &mut rows);
    rows
}

fn humanize_into(doc: &Document, id: NodeId, depth: usize, rows: &mut Vec<Vec<String>>) {
    let row = match doc.kind(id) {
        Some(NodeKind::Element) => vec!["Element".to_string(), doc.name(id).unwrap_or("").to_string()],
        Some(NodeKind::Text) => vec!["Text".to_string(), doc.text(id).unwrap_or("").to_string()],
        Some(NodeKind::Comment) => vec!["Comment".to_string(), doc.text(id).unwrap_or("").to_string()],
        None => return,
    };
    rows.push([row, vec![depth.to_string()]].concat());
    for child in doc.children(id) {
        humanize_into(doc, *child, depth + 1, rows);
    }
}

/// Parse markup that must have exactly one top-level node and no errors.
pub fn parse_fragment(source: &str) -> (Document, NodeId) {
    let result = parse(source, "test.html", &ParseOptions::default());
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    assert_eq!(result.root_nodes.len(), 1, "expected a single root");
    (result.document, result.root_nodes[0])
}

pub fn compile(source: &str) -> ShadowView {
    compile_with(source, TemplateConfig::default())
}

pub fn compile_with(source: &str, config: TemplateConfig) -> ShadowView {
    ShadowViewCompiler::new(&config)
        .compile(source, None)
        .expect("template should compile")
}

pub fn row(kind: &str, value: &str, depth: usize) -> Vec<String> {
    vec![kind.to_string(), value.to_string(), depth.to_string()]
}
