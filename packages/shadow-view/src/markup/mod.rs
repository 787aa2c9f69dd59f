//! Markup parsing
//!
//! A small HTML-like tokenizer and tree builder producing a detached
//! [`Document`](crate::dom::Document).

pub mod lexer;
pub mod parser;
pub mod tags;
pub mod tokens;

pub use lexer::{tokenize, TokenizeResult};
pub use parser::{parse, ParseOptions, ParseTreeResult};
pub use tags::{get_tag_definition, TagContentType, TagDefinition};
pub use tokens::{Token, TokenType};
