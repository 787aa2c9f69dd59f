//! Markup tokens

use serde::Serialize;

use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    /// parts: `[name]`
    TagOpenStart,
    /// parts: `[name]`
    AttrName,
    /// parts: `[decoded value]`
    AttrValue,
    TagOpenEnd,
    /// `/>`
    TagOpenEndVoid,
    /// parts: `[name]`
    TagClose,
    /// parts: `[decoded text]`
    Text,
    /// parts: `[comment body]`
    Comment,
    /// parts: `[character data]`
    Cdata,
    /// parts: `[doctype body]`
    DocType,
    Eof,
}

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub parts: Vec<String>,
    pub source_span: ParseSourceSpan,
}

impl Token {
    pub fn new(token_type: TokenType, parts: Vec<String>, source_span: ParseSourceSpan) -> Self {
        Token {
            token_type,
            parts,
            source_span,
        }
    }

    /// First part, or the empty string for part-less tokens.
    pub fn value(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or("")
    }
}
