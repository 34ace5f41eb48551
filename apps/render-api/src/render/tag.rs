//! Tag scanner — finds the next `{{...}}` marker and classifies it.

pub const OPEN_DELIM: &str = "{{";
pub const CLOSE_DELIM: &str = "}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `{{path}}`
    Substitution,
    /// `{{#name}}`
    SectionOpen,
    /// `{{/name}}`
    SectionClose,
    /// `{{^name}}`
    InvertedOpen,
    /// `{{}}` or `{{ }}`
    Empty,
}

/// One scanned tag. Offsets index into the template the tag was found in:
/// `start` is the first `{` and `end` is one past the final `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'t> {
    pub kind: TagKind,
    pub name: &'t str,
    pub start: usize,
    pub end: usize,
}

impl Tag<'_> {
    /// True for `{{#name}}` and `{{^name}}`.
    pub fn opens_section(&self) -> bool {
        matches!(self.kind, TagKind::SectionOpen | TagKind::InvertedOpen)
    }
}

/// Returns the next complete tag at or after `from`.
///
/// `None` means there is no further `{{`, or the last `{{` is never closed;
/// either way the remainder of the template is literal text.
pub fn next_tag(template: &str, from: usize) -> Option<Tag<'_>> {
    let start = from + template.get(from..)?.find(OPEN_DELIM)?;
    let inner_start = start + OPEN_DELIM.len();
    let inner_end = inner_start + template[inner_start..].find(CLOSE_DELIM)?;
    let (kind, name) = classify(template[inner_start..inner_end].trim());

    Some(Tag {
        kind,
        name,
        start,
        end: inner_end + CLOSE_DELIM.len(),
    })
}

fn classify(content: &str) -> (TagKind, &str) {
    let mut chars = content.chars();
    match chars.next() {
        None => (TagKind::Empty, ""),
        Some('#') => (TagKind::SectionOpen, chars.as_str().trim()),
        Some('^') => (TagKind::InvertedOpen, chars.as_str().trim()),
        Some('/') => (TagKind::SectionClose, chars.as_str().trim()),
        Some(_) => (TagKind::Substitution, content),
    }
}
