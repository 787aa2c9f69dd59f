//! Serializes a node subtree back to markup

use super::document::Document;
use super::node::{NodeId, NodeKind};
use crate::markup::tags::{get_tag_definition, TagContentType};

pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open { id, raw: false }];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open { id, raw } => write_open(doc, id, raw, &mut out, &mut stack),
            Step::Close(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
    out
}

/// Pending serialisation work. Closing tags are queued beneath an element's
/// children so nesting depth never grows the call stack.
enum Step<'a> {
    Open { id: NodeId, raw: bool },
    Close(&'a str),
}

fn write_open<'a>(doc: &'a Document, id: NodeId, raw: bool, out: &mut String, stack: &mut Vec<Step<'a>>) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match node.kind {
        NodeKind::Text if raw => out.push_str(&node.value),
        NodeKind::Text => out.push_str(&escape_text(&node.value)),
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.value);
            out.push_str("-->");
        }
        NodeKind::Element => {
            out.push('<');
            out.push_str(&node.name);
            for attr in &node.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(&attr.value));
                out.push('"');
            }
            out.push('>');

            let tag = get_tag_definition(&node.name);
            if tag.is_void {
                return;
            }
            let raw_children = tag.content_type == TagContentType::RawText;
            stack.push(Step::Close(&node.name));
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|child| Step::Open { id: *child, raw: raw_children }),
            );
        }
    }
}

pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
