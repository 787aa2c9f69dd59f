//! Shadow View compiler
//!
//! Compilation runs in two phases. The walk first reshapes the parsed tree
//! (splitting marker-bearing text nodes, excising iteration regions, clearing
//! bound attribute values) while remembering each bound location by arena
//! handle. Only once the skeleton has its final shape are those handles
//! encoded to structural paths, so no recorded ordinal is invalidated by a
//! later edit.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, error, warn};

use super::expression::ReconstructionExpression;
use super::path::encode;
use super::scanner::{find_indexed_marker, has_markers, marker_indices, scan, split_markers, Segment};
use super::shadow_view::{BindingRecord, IterationRegion, ShadowView};
use crate::config::TemplateConfig;
use crate::dom::{Document, NodeId, NodeKind, NodeRef};
use crate::error::{Error, Result};
use crate::markup::{parse, ParseOptions};

pub struct ShadowViewCompiler<'a> {
    config: &'a TemplateConfig,
}

impl<'a> ShadowViewCompiler<'a> {
    pub fn new(config: &'a TemplateConfig) -> Self {
        ShadowViewCompiler { config }
    }

    /// Compile template text into a Shadow View whose instances are built as
    /// `target_class`, or the configured default class.
    pub fn compile(&self, text: &str, target_class: Option<&str>) -> Result<ShadowView> {
        let url = &self.config.source_url;

        if let Some(marker) = find_indexed_marker(text) {
            let err = Error::ReservedMarker {
                url: url.clone(),
                marker: marker.to_string(),
            };
            error!(url = %url, "{}", err);
            return Err(err);
        }

        let scanned = scan(text);
        let options = ParseOptions {
            preserve_whitespace: self.config.preserve_whitespace,
        };
        let parsed = parse(&scanned.rewritten, url, &options);
        if !parsed.errors.is_empty() {
            for parse_error in &parsed.errors {
                error!(url = %url, "{}", parse_error.contextual_message());
            }
            error!(url = %url, source = %text, "template markup could not be parsed");
            return Err(Error::TemplateParse {
                url: url.clone(),
                errors: parsed.errors,
            });
        }

        let mut document = parsed.document;
        let root = skeleton_root(&mut document, &parsed.root_nodes);
        let class = target_class.unwrap_or(&self.config.default_class);
        let table = PropertyTable {
            names: scanned.properties.clone(),
        };
        let view = self.compile_tree(document, root, &scanned.properties, table, class);

        debug!(
            url = %url,
            properties = view.property_names.len(),
            regions = view.iteration_regions.len(),
            "compiled shadow view"
        );
        Ok(view)
    }

    /// Compile an already-parsed tree whose text carries indexed markers
    /// referring into `names`.
    fn compile_tree(
        &self,
        mut doc: Document,
        root: NodeId,
        names: &[String],
        table: PropertyTable,
        class: &str,
    ) -> ShadowView {
        let mut walker = TreeWalker {
            compiler: self,
            doc: &mut doc,
            root,
            names,
            table,
            pending: Vec::new(),
            regions: IndexMap::new(),
            replace_text: Arc::new(ReconstructionExpression::ReplaceText),
        };
        walker.walk();
        let TreeWalker {
            table,
            pending,
            regions,
            ..
        } = walker;

        let mut bound_locations = vec![Vec::new(); table.names.len()];
        for binding in pending {
            match encode(&doc, root, binding.target) {
                Some(path) => bound_locations[binding.index].push(BindingRecord {
                    path,
                    expression: binding.expression,
                }),
                None => warn!(
                    property = %table.names[binding.index],
                    "bound location left the skeleton during compilation"
                ),
            }
        }

        let iteration_regions = regions
            .into_iter()
            .filter_map(|(name, (anchor, view))| {
                let anchor = encode(&doc, root, NodeRef::Node(anchor))?;
                Some((name, IterationRegion { anchor, view }))
            })
            .collect();

        ShadowView {
            skeleton: doc,
            root,
            property_names: table.names,
            bound_locations,
            iteration_regions,
            target_class: class.to_string(),
        }
    }
}

/// The single top-level element, or a `div` wrapping all top-level nodes.
fn skeleton_root(doc: &mut Document, roots: &[NodeId]) -> NodeId {
    if let [only] = roots {
        if doc.kind(*only) == Some(NodeKind::Element) {
            return *only;
        }
    }
    let wrapper = doc.create_element("div");
    for node in roots {
        doc.append_child(wrapper, *node);
    }
    wrapper
}

/// Property names of the view being compiled, index = binding id.
#[derive(Default)]
struct PropertyTable {
    names: Vec<String>,
}

impl PropertyTable {
    fn index(&mut self, name: &str) -> usize {
        match self.names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        }
    }
}

struct PendingBinding {
    index: usize,
    target: NodeRef,
    expression: Arc<ReconstructionExpression>,
}

struct TreeWalker<'c, 'd> {
    compiler: &'c ShadowViewCompiler<'c>,
    doc: &'d mut Document,
    root: NodeId,
    names: &'d [String],
    table: PropertyTable,
    pending: Vec<PendingBinding>,
    regions: IndexMap<String, (NodeId, Arc<ShadowView>)>,
    replace_text: Arc<ReconstructionExpression>,
}

/// Pending step of the depth-first walk.
enum Visit {
    Element(NodeId),
    Text { parent: NodeId, node: NodeId },
    Comment(NodeId),
}

impl TreeWalker<'_, '_> {
    /// Depth-first over the skeleton with an explicit stack. Children are
    /// pushed in reverse so they are visited in document order.
    fn walk(&mut self) {
        let mut stack = vec![Visit::Element(self.root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Element(id) => {
                    if !self.visit_element(id) {
                        continue;
                    }
                    for child in self.doc.children(id).iter().rev() {
                        match self.doc.kind(*child) {
                            Some(NodeKind::Element) => stack.push(Visit::Element(*child)),
                            Some(NodeKind::Text) => stack.push(Visit::Text {
                                parent: id,
                                node: *child,
                            }),
                            Some(NodeKind::Comment) => stack.push(Visit::Comment(*child)),
                            None => {}
                        }
                    }
                }
                Visit::Text { parent, node } => self.split_text(parent, node),
                Visit::Comment(node) => self.restore_comment(node),
            }
        }
    }

    /// Handle one element's own markers. Returns false when the element was
    /// excised as an iteration region and must not be descended into.
    fn visit_element(&mut self, id: NodeId) -> bool {
        // The region marker is checked first so the region root's own
        // attributes compile into the sub-view.
        let compiler = self.compiler;
        let marker_attr = &compiler.config.iteration_attribute;
        if let Some(value) = self.doc.remove_attribute(id, marker_attr) {
            if id == self.root {
                warn!(attribute = %marker_attr, "iteration marker on the template root is ignored");
            } else {
                match self.region_property(&value) {
                    Some(name) => {
                        self.excise_region(id, name);
                        return false;
                    }
                    None => warn!(value = %value, "iteration marker does not name a property"),
                }
            }
        }

        self.restore_attribute_names(id);
        self.bind_attributes(id);
        true
    }

    /// Property named by an iteration marker value: a plain name or a single
    /// placeholder.
    fn region_property(&self, value: &str) -> Option<String> {
        let value = value.trim();
        match split_markers(value).as_slice() {
            [Segment::Marker(index)] => self.names.get(*index).cloned(),
            _ if value.is_empty() || has_markers(value) => None,
            _ => Some(value.to_string()),
        }
    }

    fn excise_region(&mut self, id: NodeId, name: String) {
        let Some(anchor) = self.doc.parent(id) else {
            return;
        };
        if self.regions.contains_key(&name) {
            warn!(property = %name, "duplicate iteration region ignored");
            self.doc.remove(id);
            return;
        }

        let mut sub_doc = Document::new();
        let Some(sub_root) = sub_doc.import(&*self.doc, id) else {
            return;
        };
        self.doc.remove(id);

        let view = self.compiler.compile_tree(
            sub_doc,
            sub_root,
            self.names,
            PropertyTable::default(),
            &self.compiler.config.default_class,
        );
        debug!(
            property = %name,
            properties = view.property_names.len(),
            "compiled iteration region"
        );
        self.regions.insert(name, (anchor, Arc::new(view)));
    }

    fn bind_attributes(&mut self, id: NodeId) {
        let bound: Vec<(usize, String)> = self
            .doc
            .attributes(id)
            .iter()
            .enumerate()
            .filter(|(_, attr)| has_markers(&attr.value))
            .map(|(index, attr)| (index, attr.value.clone()))
            .collect();

        for (index, value) in bound {
            let names = self.names;
            let expression = Arc::new(ReconstructionExpression::from_markers(&value, |k| {
                names.get(k).cloned()
            }));
            for marker in marker_indices(&value) {
                let Some(name) = names.get(marker) else {
                    continue;
                };
                let property = self.table.index(name);
                self.pending.push(PendingBinding {
                    index: property,
                    target: NodeRef::Attribute { owner: id, index },
                    expression: expression.clone(),
                });
            }
            self.doc.set_attribute_at(id, index, "");
        }
    }

    /// Split a marker-bearing text node into one node per literal run and one
    /// empty node per marker.
    fn split_text(&mut self, parent: NodeId, node: NodeId) {
        let Some(text) = self.doc.text(node).map(str::to_string) else {
            return;
        };
        if !has_markers(&text) {
            return;
        }

        let names = self.names;
        for segment in split_markers(&text) {
            match segment {
                Segment::Literal(literal) => {
                    let run = self.doc.create_text(literal);
                    self.doc.insert_before(parent, run, Some(node));
                }
                Segment::Marker(marker) => {
                    let Some(name) = names.get(marker) else {
                        continue;
                    };
                    let property = self.table.index(name);
                    let slot = self.doc.create_text("");
                    self.doc.insert_before(parent, slot, Some(node));
                    self.pending.push(PendingBinding {
                        index: property,
                        target: NodeRef::Node(slot),
                        expression: self.replace_text.clone(),
                    });
                }
            }
        }
        self.doc.remove(node);
    }

    /// Comments are never bound; put the original placeholders back.
    fn restore_comment(&mut self, node: NodeId) {
        let Some(text) = self.doc.text(node).map(str::to_string) else {
            return;
        };
        if !has_markers(&text) {
            return;
        }
        let restored = self.restore_placeholders(&text);
        self.doc.set_text(node, &restored);
    }

    /// A placeholder standing where an attribute name belongs cannot be
    /// bound. The attribute keeps its original `${name}` spelling.
    fn restore_attribute_names(&mut self, id: NodeId) {
        let misplaced: Vec<(usize, String)> = self
            .doc
            .attributes(id)
            .iter()
            .enumerate()
            .filter(|(_, attr)| has_markers(&attr.name))
            .map(|(index, attr)| (index, self.restore_placeholders(&attr.name)))
            .collect();
        for (index, name) in misplaced {
            warn!(attribute = %name, "placeholder in attribute name position is not bound");
            self.doc.set_attribute_name_at(id, index, &name);
        }
    }

    fn restore_placeholders(&self, text: &str) -> String {
        split_markers(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(literal) => literal.to_string(),
                Segment::Marker(marker) => self
                    .names
                    .get(marker)
                    .map(|name| format!("${{{}}}", name))
                    .unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(text: &str) -> ShadowView {
        let config = TemplateConfig::default();
        ShadowViewCompiler::new(&config).compile(text, None).unwrap()
    }

    #[test]
    fn test_text_nodes_are_split_per_marker() {
        let view = compile("<p>Hello ${first} ${last}!</p>");
        assert_eq!(view.property_names(), ["first", "last"]);
        assert_eq!(view.skeleton_html(), "<p>Hello  !</p>");
        let root = view.root();
        assert_eq!(view.skeleton().children(root).len(), 5);
        assert_eq!(view.locations_of("first")[0].path.to_string(), "/#text[1]");
        assert_eq!(view.locations_of("last")[0].path.to_string(), "/#text[3]");
    }

    #[test]
    fn test_attribute_values_are_cleared() {
        let view = compile(r#"<a href="/u/${id}" title="${name}">x</a>"#);
        assert_eq!(view.skeleton_html(), r#"<a href="" title="">x</a>"#);
        assert_eq!(view.locations_of("id")[0].path.to_string(), "/@href");
    }

    #[test]
    fn test_multiple_roots_are_wrapped() {
        let view = compile("<b>${a}</b><i>${b}</i>");
        assert_eq!(view.skeleton().name(view.root()), Some("div"));
        assert_eq!(view.locations_of("b")[0].path.to_string(), "/i[0]/#text[0]");
    }

    #[test]
    fn test_region_is_excised() {
        let view = compile(r#"<ul><li data-repeat="items">${label}</li><li>static</li></ul>"#);
        assert_eq!(view.skeleton_html(), "<ul><li>static</li></ul>");
        let region = view.iteration_region("items").unwrap();
        assert!(region.anchor.is_empty());
        assert_eq!(region.view.property_names(), ["label"]);
        assert!(view.locations_of("label").is_empty());
    }

    #[test]
    fn test_reserved_marker_is_rejected() {
        let config = TemplateConfig::default();
        let err = ShadowViewCompiler::new(&config)
            .compile("<p>${*0*}</p>", None)
            .unwrap_err();
        assert!(matches!(err, Error::ReservedMarker { .. }));
    }

    #[test]
    fn test_attribute_name_placeholders_are_restored() {
        let view = compile(r#"<div ${flag} title="${t}">x</div>"#);
        assert_eq!(view.skeleton_html(), r#"<div ${flag}="" title="">x</div>"#);
        assert!(view.locations_of("flag").is_empty());
        assert_eq!(view.locations_of("t")[0].path.to_string(), "/@title");
    }

    #[test]
    fn test_comment_placeholders_are_restored() {
        let view = compile("<div><!-- ${note} --><span>${note}</span></div>");
        assert_eq!(view.skeleton_html(), "<div><!-- ${note} --><span></span></div>");
        assert_eq!(view.locations_of("note").len(), 1);
    }
}
