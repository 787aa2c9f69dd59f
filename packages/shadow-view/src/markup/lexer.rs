//! Markup tokenizer - converts source text into tokens

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::tags::{get_tag_definition, TagContentType};
use super::tokens::{Token, TokenType};
use crate::chars;
use crate::parse_util::{ParseError, ParseLocation, ParseSourceFile, ParseSourceSpan};

static CR_OR_CRLF_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
];

#[derive(Debug, Clone)]
pub struct TokenizeResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<ParseError>,
}

/// Tokenize markup. Line endings are normalised to `\n` before scanning, so
/// spans point into the normalised text.
pub fn tokenize(source: &str, url: &str) -> TokenizeResult {
    let content = CR_OR_CRLF_REGEXP.replace_all(source, "\n").into_owned();
    let file = Arc::new(ParseSourceFile::new(content, url.to_string()));
    let mut tokenizer = Tokenizer::new(file);
    tokenizer.tokenize();

    TokenizeResult {
        tokens: tokenizer.tokens,
        errors: tokenizer.errors,
    }
}

#[derive(Debug, Clone)]
struct Cursor {
    file: Arc<ParseSourceFile>,
    offset: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    fn new(file: Arc<ParseSourceFile>) -> Self {
        Cursor {
            file,
            offset: 0,
            line: 0,
            column: 0,
        }
    }

    fn peek(&self) -> char {
        self.file.content[self.offset..].chars().next().unwrap_or(chars::EOF)
    }

    fn peek_at(&self, n: usize) -> char {
        self.file.content[self.offset..].chars().nth(n).unwrap_or(chars::EOF)
    }

    fn advance(&mut self) {
        let ch = self.peek();
        if self.at_end() {
            return;
        }
        self.offset += ch.len_utf8();
        if ch == chars::NEWLINE {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// End of input. `peek` also yields `EOF` for a literal NUL, which is
    /// content, so loops test this instead.
    fn at_end(&self) -> bool {
        self.offset >= self.file.content.len()
    }

    fn location(&self) -> ParseLocation {
        ParseLocation::new(self.file.clone(), self.offset, self.line, self.column)
    }

    fn span_from(&self, start: &Cursor) -> ParseSourceSpan {
        ParseSourceSpan::new(start.location(), self.location())
    }

    fn rest(&self) -> &str {
        &self.file.content[self.offset..]
    }
}

struct Tokenizer {
    cursor: Cursor,
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
}

impl Tokenizer {
    fn new(file: Arc<ParseSourceFile>) -> Self {
        Tokenizer {
            cursor: Cursor::new(file),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn tokenize(&mut self) {
        while !self.cursor.at_end() {
            let start = self.cursor.clone();
            if self.cursor.peek() == chars::LT && self.is_markup_start() {
                self.cursor.advance();
                if self.attempt_char(chars::BANG) {
                    if self.attempt_str("[CDATA[") {
                        self.consume_cdata(start);
                    } else if self.attempt_str("--") {
                        self.consume_comment(start);
                    } else {
                        self.consume_doc_type(start);
                    }
                } else if self.attempt_char(chars::SLASH) {
                    self.consume_tag_close(start);
                } else {
                    self.consume_tag_open(start);
                }
            } else {
                self.consume_text();
            }
        }

        let eof = self.cursor.clone();
        self.emit(TokenType::Eof, vec![], &eof);
    }

    /// `<` followed by something that opens a tag, comment, or close tag.
    /// Anything else (`a < b`) is plain text.
    fn is_markup_start(&self) -> bool {
        let next = self.cursor.peek_at(1);
        chars::is_ascii_letter(next) || next == chars::SLASH || next == chars::BANG
    }

    fn emit(&mut self, token_type: TokenType, parts: Vec<String>, start: &Cursor) {
        let span = self.cursor.span_from(start);
        self.tokens.push(Token::new(token_type, parts, span));
    }

    fn error(&mut self, msg: String, start: &Cursor) {
        let span = self.cursor.span_from(start);
        self.errors.push(ParseError::new(span, msg));
    }

    fn attempt_char(&mut self, ch: char) -> bool {
        if self.cursor.peek() == ch {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    fn attempt_str(&mut self, s: &str) -> bool {
        if self.cursor.rest().starts_with(s) {
            for _ in s.chars() {
                self.cursor.advance();
            }
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while chars::is_whitespace(self.cursor.peek()) {
            self.cursor.advance();
        }
    }

    fn consume_text(&mut self) {
        let start = self.cursor.clone();
        let mut value = String::new();
        // A leading `<` reaching here is literal text.
        if self.cursor.peek() == chars::LT {
            value.push(chars::LT);
            self.cursor.advance();
        }
        loop {
            let ch = self.cursor.peek();
            if self.cursor.at_end() || (ch == chars::LT && self.is_markup_start()) {
                break;
            }
            if ch == chars::AMPERSAND {
                value.push_str(&self.consume_entity());
            } else {
                value.push(ch);
                self.cursor.advance();
            }
        }
        self.emit(TokenType::Text, vec![value], &start);
    }

    /// Decode a character reference at the cursor. Unknown or malformed
    /// references are returned literally.
    fn consume_entity(&mut self) -> String {
        let rest = self.cursor.rest();
        let Some(end) = rest.find(chars::SEMICOLON).filter(|end| *end <= 32) else {
            self.cursor.advance();
            return chars::AMPERSAND.to_string();
        };
        let body = &rest[1..end];
        let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
            u32::from_str_radix(hex, 16)
                .ok()
                .filter(|_| !hex.is_empty() && hex.chars().all(chars::is_ascii_hex_digit))
                .and_then(char::from_u32)
                .map(String::from)
        } else if let Some(dec) = body.strip_prefix(chars::HASH) {
            dec.parse::<u32>()
                .ok()
                .filter(|_| dec.chars().all(chars::is_digit))
                .and_then(char::from_u32)
                .map(String::from)
        } else {
            NAMED_ENTITIES
                .iter()
                .find(|(name, _)| *name == body)
                .map(|(_, value)| value.to_string())
        };

        match decoded {
            Some(value) => {
                let consumed = rest[..=end].chars().count();
                for _ in 0..consumed {
                    self.cursor.advance();
                }
                value
            }
            None => {
                self.cursor.advance();
                chars::AMPERSAND.to_string()
            }
        }
    }

    fn consume_cdata(&mut self, start: Cursor) {
        let content_start = self.cursor.offset;
        match self.cursor.rest().find("]]>") {
            Some(len) => {
                let value = self.cursor.file.content[content_start..content_start + len].to_string();
                self.attempt_str(&format!("{}]]>", value));
                self.emit(TokenType::Cdata, vec![value], &start);
            }
            None => {
                while !self.cursor.at_end() {
                    self.cursor.advance();
                }
                self.error("Unterminated CDATA section".to_string(), &start);
            }
        }
    }

    fn consume_comment(&mut self, start: Cursor) {
        let content_start = self.cursor.offset;
        match self.cursor.rest().find("-->") {
            Some(len) => {
                let value = self.cursor.file.content[content_start..content_start + len].to_string();
                self.attempt_str(&format!("{}-->", value));
                self.emit(TokenType::Comment, vec![value], &start);
            }
            None => {
                while !self.cursor.at_end() {
                    self.cursor.advance();
                }
                self.error("Unterminated comment".to_string(), &start);
            }
        }
    }

    fn consume_doc_type(&mut self, start: Cursor) {
        let mut value = String::new();
        while !self.cursor.at_end() && self.cursor.peek() != chars::GT {
            value.push(self.cursor.peek());
            self.cursor.advance();
        }
        if !self.attempt_char(chars::GT) {
            self.error("Unterminated doctype".to_string(), &start);
            return;
        }
        self.emit(TokenType::DocType, vec![value], &start);
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while !self.cursor.at_end() && !chars::is_name_end(self.cursor.peek()) {
            name.push(self.cursor.peek());
            self.cursor.advance();
        }
        name
    }

    fn consume_tag_open(&mut self, start: Cursor) {
        let name = self.consume_name();
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == chars::MINUS || c == ':' || c == '_' || c == '.') {
            self.error(format!("Invalid tag name \"{}\"", name), &start);
        }
        self.emit(TokenType::TagOpenStart, vec![name.clone()], &start);

        loop {
            self.skip_whitespace();
            let ch = self.cursor.peek();
            if ch == chars::GT || self.cursor.at_end() || self.cursor.rest().starts_with("/>") {
                break;
            }
            if chars::is_name_end(ch) {
                let stray = self.cursor.clone();
                self.cursor.advance();
                self.error(format!("Unexpected character \"{}\" in tag", ch), &stray);
                continue;
            }
            self.consume_attribute();
        }

        let end_start = self.cursor.clone();
        if self.attempt_str("/>") {
            self.emit(TokenType::TagOpenEndVoid, vec![], &end_start);
            return;
        }
        if !self.attempt_char(chars::GT) {
            self.error(format!("Unexpected end of input in tag \"{}\"", name), &start);
            return;
        }
        self.emit(TokenType::TagOpenEnd, vec![], &end_start);

        match get_tag_definition(&name).content_type {
            TagContentType::RawText => self.consume_raw_text(&name, false),
            TagContentType::EscapableRawText => self.consume_raw_text(&name, true),
            TagContentType::ParsableData => {}
        }
    }

    fn consume_attribute(&mut self) {
        let name_start = self.cursor.clone();
        let name = self.consume_name();
        self.emit(TokenType::AttrName, vec![name], &name_start);

        self.skip_whitespace();
        if !self.attempt_char(chars::EQ) {
            return;
        }
        self.skip_whitespace();

        let value_start = self.cursor.clone();
        let quote = self.cursor.peek();
        let mut value = String::new();
        if quote == chars::SQ || quote == chars::DQ {
            self.cursor.advance();
            loop {
                let ch = self.cursor.peek();
                if self.cursor.at_end() {
                    self.error("Unterminated attribute value".to_string(), &value_start);
                    return;
                }
                if ch == quote {
                    self.cursor.advance();
                    break;
                }
                if ch == chars::AMPERSAND {
                    value.push_str(&self.consume_entity());
                } else {
                    value.push(ch);
                    self.cursor.advance();
                }
            }
        } else {
            loop {
                let ch = self.cursor.peek();
                if self.cursor.at_end()
                    || chars::is_whitespace(ch)
                    || ch == chars::GT
                    || self.cursor.rest().starts_with("/>")
                {
                    break;
                }
                if ch == chars::AMPERSAND {
                    value.push_str(&self.consume_entity());
                } else {
                    value.push(ch);
                    self.cursor.advance();
                }
            }
        }
        self.emit(TokenType::AttrValue, vec![value], &value_start);
    }

    /// Consume everything up to the matching close tag as a single text token.
    fn consume_raw_text(&mut self, tag_name: &str, decode_entities: bool) {
        let start = self.cursor.clone();
        let closing = format!("</{}", tag_name.to_ascii_lowercase());
        let mut value = String::new();
        loop {
            let ch = self.cursor.peek();
            let at_close = self
                .cursor
                .rest()
                .get(..closing.len())
                .is_some_and(|s| s.eq_ignore_ascii_case(&closing));
            if self.cursor.at_end() || at_close {
                break;
            }
            if decode_entities && ch == chars::AMPERSAND {
                value.push_str(&self.consume_entity());
            } else {
                value.push(ch);
                self.cursor.advance();
            }
        }
        if !value.is_empty() {
            self.emit(TokenType::Text, vec![value], &start);
        }
    }

    fn consume_tag_close(&mut self, start: Cursor) {
        self.skip_whitespace();
        let name = self.consume_name();
        self.skip_whitespace();
        if !self.attempt_char(chars::GT) {
            self.error(format!("Unexpected end of input in closing tag \"{}\"", name), &start);
            return;
        }
        self.emit(TokenType::TagClose, vec![name], &start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn humanize(source: &str) -> Vec<(TokenType, String)> {
        tokenize(source, "test.html")
            .tokens
            .into_iter()
            .map(|t| (t.token_type, t.value().to_string()))
            .collect()
    }

    #[test]
    fn test_tag_with_attributes() {
        assert_eq!(
            humanize("<a href=\"x\" disabled b=c>hi</a>"),
            vec![
                (TokenType::TagOpenStart, "a".to_string()),
                (TokenType::AttrName, "href".to_string()),
                (TokenType::AttrValue, "x".to_string()),
                (TokenType::AttrName, "disabled".to_string()),
                (TokenType::AttrName, "b".to_string()),
                (TokenType::AttrValue, "c".to_string()),
                (TokenType::TagOpenEnd, String::new()),
                (TokenType::Text, "hi".to_string()),
                (TokenType::TagClose, "a".to_string()),
                (TokenType::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_entities() {
        let tokens = humanize("a &amp; b &#65;&#x42; &unknown; &");
        assert_eq!(tokens[0], (TokenType::Text, "a & b AB &unknown; &".to_string()));
    }

    #[test]
    fn test_less_than_in_text() {
        let tokens = humanize("1 < 2");
        assert_eq!(tokens[0], (TokenType::Text, "1 < 2".to_string()));
    }

    #[test]
    fn test_placeholder_markers_survive() {
        let tokens = humanize("<b title=\"${*0*}-x\">${*1*}</b>");
        assert_eq!(tokens[2], (TokenType::AttrValue, "${*0*}-x".to_string()));
        assert_eq!(tokens[4], (TokenType::Text, "${*1*}".to_string()));
    }

    #[test]
    fn test_nul_is_content() {
        let tokens = humanize("a\u{0}<b>x\u{0}y</b>");
        assert_eq!(tokens[0], (TokenType::Text, "a\u{0}".to_string()));
        assert_eq!(tokens[1], (TokenType::TagOpenStart, "b".to_string()));
        assert_eq!(tokens[3], (TokenType::Text, "x\u{0}y".to_string()));
        assert_eq!(tokens[4], (TokenType::TagClose, "b".to_string()));
        assert!(tokenize("<p title=\"\u{0}\">\u{0}</p>", "test.html").errors.is_empty());
    }

    #[test]
    fn test_raw_text() {
        let tokens = humanize("<script>if (a<b) {}</script>");
        assert_eq!(tokens[2], (TokenType::Text, "if (a<b) {}".to_string()));
        assert_eq!(tokens[3], (TokenType::TagClose, "script".to_string()));
    }

    #[test]
    fn test_crlf_normalized() {
        let tokens = humanize("a\r\nb\rc");
        assert_eq!(tokens[0], (TokenType::Text, "a\nb\nc".to_string()));
    }

    #[test]
    fn test_unterminated_comment() {
        let result = tokenize("<!-- open", "test.html");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].msg, "Unterminated comment");
    }

    #[test]
    fn test_unterminated_attribute() {
        let result = tokenize("<a href=\"x>", "test.html");
        assert_eq!(result.errors[0].msg, "Unterminated attribute value");
    }
}
