//! Markup parser - builds a detached node tree from tokens

use super::lexer::tokenize;
use super::tags::{get_tag_definition, TagContentType};
use super::tokens::{Token, TokenType};
use crate::chars;
use crate::dom::{Document, NodeId, NodeKind};
use crate::parse_util::{ParseError, ParseSourceSpan};

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub preserve_whitespace: bool,
}

/// Parse tree result. `root_nodes` are the top-level nodes, all detached
/// inside `document`.
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub document: Document,
    pub root_nodes: Vec<NodeId>,
    pub errors: Vec<ParseError>,
}

pub fn parse(source: &str, url: &str, options: &ParseOptions) -> ParseTreeResult {
    let tokenize_result = tokenize(source, url);
    let mut builder = TreeBuilder::new(options.preserve_whitespace);
    builder.build(tokenize_result.tokens);

    let mut errors = tokenize_result.errors;
    errors.extend(builder.errors);

    ParseTreeResult {
        document: builder.document,
        root_nodes: builder.root_nodes,
        errors,
    }
}

struct OpenElement {
    id: NodeId,
    name: String,
    span: ParseSourceSpan,
}

struct TreeBuilder {
    document: Document,
    root_nodes: Vec<NodeId>,
    stack: Vec<OpenElement>,
    errors: Vec<ParseError>,
    preserve_whitespace: bool,
    /// Element whose start tag is still receiving attributes.
    pending: Option<OpenElement>,
    pending_attr: Option<String>,
}

impl TreeBuilder {
    fn new(preserve_whitespace: bool) -> Self {
        TreeBuilder {
            document: Document::new(),
            root_nodes: Vec::new(),
            stack: Vec::new(),
            errors: Vec::new(),
            preserve_whitespace,
            pending: None,
            pending_attr: None,
        }
    }

    fn build(&mut self, tokens: Vec<Token>) {
        for token in tokens {
            match token.token_type {
                TokenType::TagOpenStart => self.consume_start_tag(token),
                TokenType::AttrName => self.consume_attr_name(token),
                TokenType::AttrValue => self.consume_attr_value(token),
                TokenType::TagOpenEnd => self.finish_start_tag(false),
                TokenType::TagOpenEndVoid => self.finish_start_tag(true),
                TokenType::TagClose => self.consume_end_tag(token),
                TokenType::Text | TokenType::Cdata => self.consume_text(token),
                TokenType::Comment => {
                    let id = self.document.create_comment(token.value());
                    self.add_to_parent(id);
                }
                TokenType::DocType => {}
                TokenType::Eof => self.finish(),
            }
        }
    }

    fn add_to_parent(&mut self, id: NodeId) {
        match self.stack.last() {
            Some(parent) => self.document.append_child(parent.id, id),
            None => self.root_nodes.push(id),
        }
    }

    fn consume_start_tag(&mut self, token: Token) {
        // A start tag cut short by an error never received its end token.
        self.finish_start_tag(false);
        let name = token.value().to_string();
        let id = self.document.create_element(&name);
        self.pending = Some(OpenElement {
            id,
            name,
            span: token.source_span,
        });
    }

    fn consume_attr_name(&mut self, token: Token) {
        self.flush_pending_attr();
        self.pending_attr = Some(token.value().to_string());
    }

    fn consume_attr_value(&mut self, token: Token) {
        if let (Some(element), Some(name)) = (&self.pending, self.pending_attr.take()) {
            self.document.set_attribute(element.id, &name, token.value());
        }
    }

    fn flush_pending_attr(&mut self) {
        if let (Some(element), Some(name)) = (&self.pending, self.pending_attr.take()) {
            self.document.set_attribute(element.id, &name, "");
        }
    }

    fn finish_start_tag(&mut self, self_closing: bool) {
        self.flush_pending_attr();
        let Some(element) = self.pending.take() else {
            return;
        };
        self.add_to_parent(element.id);
        if !self_closing && !get_tag_definition(&element.name).is_void {
            self.stack.push(element);
        }
    }

    fn consume_end_tag(&mut self, token: Token) {
        self.finish_start_tag(false);
        let name = token.value();

        let Some(position) = self
            .stack
            .iter()
            .rposition(|open| open.name.eq_ignore_ascii_case(name))
        else {
            let msg = if get_tag_definition(name).is_void {
                format!("Void elements do not have end tags \"{}\"", name)
            } else {
                format!("Unexpected closing tag \"{}\"", name)
            };
            self.errors.push(ParseError::new(token.source_span, msg));
            return;
        };

        for unclosed in self.stack.drain(position + 1..) {
            self.errors.push(ParseError::new(
                unclosed.span,
                format!("Unclosed element \"{}\"", unclosed.name),
            ));
        }
        self.stack.pop();
    }

    fn consume_text(&mut self, token: Token) {
        self.finish_start_tag(false);
        let value = token.value();
        if value.is_empty() {
            return;
        }
        if !self.preserve_whitespace && value.chars().all(chars::is_whitespace) && !self.in_verbatim_element() {
            return;
        }

        let previous = match self.stack.last() {
            Some(parent) => self.document.children(parent.id).last().copied(),
            None => self.root_nodes.last().copied(),
        };
        if let Some(previous) = previous.filter(|p| self.document.kind(*p) == Some(NodeKind::Text)) {
            let merged = format!("{}{}", self.document.text(previous).unwrap_or(""), value);
            self.document.set_text(previous, &merged);
            return;
        }

        let id = self.document.create_text(value);
        self.add_to_parent(id);
    }

    fn in_verbatim_element(&self) -> bool {
        self.stack.last().is_some_and(|open| {
            open.name.eq_ignore_ascii_case("pre")
                || get_tag_definition(&open.name).content_type != TagContentType::ParsableData
        })
    }

    fn finish(&mut self) {
        self.finish_start_tag(false);
        for unclosed in self.stack.drain(..) {
            self.errors.push(ParseError::new(
                unclosed.span,
                format!("Unclosed element \"{}\"", unclosed.name),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> ParseTreeResult {
        let result = parse(source, "test.html", &ParseOptions::default());
        assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
        result
    }

    #[test]
    fn test_nested_elements() {
        let result = parse_ok("<div class=\"a\"><span>x</span><br><i/></div>");
        assert_eq!(result.root_nodes.len(), 1);
        let div = result.root_nodes[0];
        let doc = &result.document;
        assert_eq!(doc.children(div).len(), 3);
        assert_eq!(doc.to_html(div), "<div class=\"a\"><span>x</span><br><i></i></div>");
    }

    #[test]
    fn test_whitespace_dropped_by_default() {
        let result = parse_ok("<ul>\n  <li>a</li>\n</ul>");
        let ul = result.root_nodes[0];
        assert_eq!(result.document.children(ul).len(), 1);
    }

    #[test]
    fn test_whitespace_preserved_on_request() {
        let options = ParseOptions {
            preserve_whitespace: true,
        };
        let result = parse("<ul>\n  <li>a</li>\n</ul>", "test.html", &options);
        let ul = result.root_nodes[0];
        assert_eq!(result.document.children(ul).len(), 3);
    }

    #[test]
    fn test_valueless_attribute() {
        let result = parse_ok("<input disabled>");
        let input = result.root_nodes[0];
        assert_eq!(result.document.attribute(input, "disabled"), Some(""));
    }

    #[test]
    fn test_unexpected_closing_tag() {
        let result = parse("<div></span></div>", "test.html", &ParseOptions::default());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].msg, "Unexpected closing tag \"span\"");
        assert_eq!(result.errors[0].span.start.col, 5);
    }

    #[test]
    fn test_unclosed_element() {
        let result = parse("<div><p>text</div>", "test.html", &ParseOptions::default());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].msg, "Unclosed element \"p\"");
    }

    #[test]
    fn test_unclosed_at_end_of_input() {
        let result = parse("<section>", "test.html", &ParseOptions::default());
        assert_eq!(result.errors[0].msg, "Unclosed element \"section\"");
    }
}
