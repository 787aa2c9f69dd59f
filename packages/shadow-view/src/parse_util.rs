//! Source locations and parse diagnostics

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParseSourceFile {
    pub content: String,
    pub url: String,
}

impl ParseSourceFile {
    pub fn new(content: String, url: String) -> Self {
        ParseSourceFile { content, url }
    }
}

/// A position inside a source file. `offset` is a byte offset, `line` and `col`
/// are zero-based.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParseLocation {
    #[serde(skip)]
    pub file: Arc<ParseSourceFile>,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(file: Arc<ParseSourceFile>, offset: usize, line: usize, col: usize) -> Self {
        ParseLocation { file, offset, line, col }
    }

    /// Return the source around the location, up to `max_chars` or `max_lines`
    /// on each side.
    pub fn get_context(&self, max_chars: usize, max_lines: usize) -> (String, String) {
        let content = &self.file.content;
        let offset = self.offset.min(content.len());

        let mut before: Vec<char> = Vec::new();
        let mut lines = 0;
        for ch in content[..offset].chars().rev() {
            if before.len() >= max_chars {
                break;
            }
            if ch == '\n' {
                lines += 1;
                if lines >= max_lines {
                    break;
                }
            }
            before.push(ch);
        }
        before.reverse();

        let mut after = String::new();
        let mut taken = 0;
        lines = 0;
        for ch in content[offset..].chars() {
            if taken >= max_chars {
                break;
            }
            if ch == '\n' {
                lines += 1;
                if lines >= max_lines {
                    break;
                }
            }
            after.push(ch);
            taken += 1;
        }

        (before.into_iter().collect(), after)
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.file.url, self.line, self.col)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan { start, end }
    }

    /// The source text covered by this span.
    pub fn text(&self) -> &str {
        let content = &self.start.file.content;
        let end = self.end.offset.min(content.len());
        &content[self.start.offset.min(end)..end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParseError {
    pub span: ParseSourceSpan,
    pub msg: String,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(span: ParseSourceSpan, msg: String) -> Self {
        ParseError {
            span,
            msg,
            level: ParseErrorLevel::Error,
        }
    }

    pub fn contextual_message(&self) -> String {
        let (before, after) = self.span.start.get_context(100, 3);
        let level = match self.level {
            ParseErrorLevel::Warning => "WARNING",
            ParseErrorLevel::Error => "ERROR",
        };
        format!("{} (\"{}[{} ->]{}\")", self.msg, before, level, after)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.contextual_message(), self.span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(content: &str, offset: usize, line: usize, col: usize) -> ParseLocation {
        let file = Arc::new(ParseSourceFile::new(content.to_string(), "test.html".to_string()));
        ParseLocation::new(file, offset, line, col)
    }

    #[test]
    fn test_location_display() {
        let loc = location("<div>\n</span>", 6, 1, 0);
        assert_eq!(loc.to_string(), "test.html@1:0");
    }

    #[test]
    fn test_contextual_message() {
        let start = location("<div></span>", 5, 0, 5);
        let end = location("<div></span>", 12, 0, 12);
        let err = ParseError::new(ParseSourceSpan::new(start, end), "Unexpected closing tag \"span\"".to_string());
        assert_eq!(
            err.contextual_message(),
            "Unexpected closing tag \"span\" (\"<div>[ERROR ->]</span>\")"
        );
        assert_eq!(err.span.text(), "</span>");
    }
}
