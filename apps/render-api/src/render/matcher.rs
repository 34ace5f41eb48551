//! Section Matcher — locates the close tag that balances a section opener.
//!
//! Depth is tracked only for the section's own name. Tags with other names
//! are stepped over untouched; whether *they* balance is decided later when
//! the body is rendered recursively.

use crate::render::limits::{RenderError, ScanBudget};
use crate::render::tag::{next_tag, TagKind};

/// Byte offsets of a matched section within the scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    /// First byte of the section body (just after the opening tag).
    pub body_start: usize,
    /// One past the last body byte (the `{` of the closing tag).
    pub body_end: usize,
    /// One past the closing tag; scanning resumes here.
    pub after_close: usize,
}

/// Finds the end of the section named `name` whose opening tag ends at
/// `from`. Returns `Ok(None)` when the section is never closed.
pub(crate) fn find_section_end(
    template: &str,
    from: usize,
    name: &str,
    budget: &mut ScanBudget,
) -> Result<Option<SectionBounds>, RenderError> {
    let mut depth: usize = 1;
    let mut cursor = from;

    while let Some(tag) = next_tag(template, cursor) {
        budget.charge()?;
        cursor = tag.end;

        if tag.name != name {
            continue;
        }
        if tag.opens_section() {
            depth += 1;
        } else if tag.kind == TagKind::SectionClose {
            depth -= 1;
            if depth == 0 {
                return Ok(Some(SectionBounds {
                    body_start: from,
                    body_end: tag.start,
                    after_close: tag.end,
                }));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(template: &str, name: &str) -> Option<SectionBounds> {
        let open = next_tag(template, 0).unwrap();
        let mut budget = ScanBudget::new(1_000);
        find_section_end(template, open.end, name, &mut budget).unwrap()
    }

    #[test]
    fn test_simple_section() {
        let t = "{{#a}}body{{/a}}tail";
        let b = find(t, "a").unwrap();
        assert_eq!(&t[b.body_start..b.body_end], "body");
        assert_eq!(&t[b.after_close..], "tail");
    }

    #[test]
    fn test_nested_same_name_is_balanced() {
        let t = "{{#a}}x{{#a}}inner{{/a}}y{{/a}}z";
        let b = find(t, "a").unwrap();
        assert_eq!(&t[b.body_start..b.body_end], "x{{#a}}inner{{/a}}y");
        assert_eq!(&t[b.after_close..], "z");
    }

    #[test]
    fn test_inverted_opener_counts_toward_depth() {
        let t = "{{#a}}{{^a}}none{{/a}}{{/a}}!";
        let b = find(t, "a").unwrap();
        assert_eq!(&t[b.body_start..b.body_end], "{{^a}}none{{/a}}");
    }

    #[test]
    fn test_other_names_do_not_affect_depth() {
        let t = "{{#a}}{{/b}}{{#c}}{{/a}}rest";
        let b = find(t, "a").unwrap();
        assert_eq!(&t[b.body_start..b.body_end], "{{/b}}{{#c}}");
        assert_eq!(&t[b.after_close..], "rest");
    }

    #[test]
    fn test_unterminated_section() {
        assert!(find("{{#a}}never closed", "a").is_none());
        assert!(find("{{#a}}{{#a}}{{/a}}", "a").is_none());
    }

    #[test]
    fn test_scans_are_charged() {
        let t = "{{#a}}{{x}}{{y}}{{/a}}";
        let mut budget = ScanBudget::new(2);
        let result = find_section_end(t, 6, "a", &mut budget);
        assert_eq!(result, Err(RenderError::LimitExceeded { limit: 2 }));
    }
}
