//! Tag definitions

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    /// Content is consumed verbatim up to the closing tag.
    RawText,
    /// Like raw text, but entities are decoded.
    EscapableRawText,
    ParsableData,
}

#[derive(Debug, Clone, Copy)]
pub struct TagDefinition {
    pub is_void: bool,
    pub content_type: TagContentType,
}

impl TagDefinition {
    const fn new() -> Self {
        TagDefinition {
            is_void: false,
            content_type: TagContentType::ParsableData,
        }
    }

    const fn void() -> Self {
        TagDefinition {
            is_void: true,
            content_type: TagContentType::ParsableData,
        }
    }

    const fn with_content_type(content_type: TagContentType) -> Self {
        TagDefinition {
            is_void: false,
            content_type,
        }
    }
}

static DEFAULT_TAG_DEFINITION: TagDefinition = TagDefinition::new();

static TAG_DEFINITIONS: Lazy<HashMap<&'static str, TagDefinition>> = Lazy::new(|| {
    let mut defs = HashMap::new();

    for name in [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ] {
        defs.insert(name, TagDefinition::void());
    }

    defs.insert("script", TagDefinition::with_content_type(TagContentType::RawText));
    defs.insert("style", TagDefinition::with_content_type(TagContentType::RawText));
    defs.insert(
        "textarea",
        TagDefinition::with_content_type(TagContentType::EscapableRawText),
    );
    defs.insert(
        "title",
        TagDefinition::with_content_type(TagContentType::EscapableRawText),
    );

    defs
});

pub fn get_tag_definition(name: &str) -> &'static TagDefinition {
    TAG_DEFINITIONS
        .get(name.to_ascii_lowercase().as_str())
        .unwrap_or(&DEFAULT_TAG_DEFINITION)
}
