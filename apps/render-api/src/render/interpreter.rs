//! Template Interpreter — single left-to-right scan per template slice,
//! recursing into section bodies with an extended context stack.
//!
//! Malformed input never fails a render: unterminated sections drop their
//! opening tag, stray close tags vanish, unknown paths print nothing, and a
//! trailing `{{` without `}}` is copied as literal text. The only errors are
//! the resource limits in [`RenderLimits`].

use serde_json::Value;
use tracing::debug;

use crate::render::format::{as_safe_html, format_value, is_truthy};
use crate::render::limits::{RenderError, RenderLimits, ScanBudget};
use crate::render::matcher::find_section_end;
use crate::render::resolver::{resolve, ContextStack, Frame};
use crate::render::tag::{next_tag, TagKind};

pub(crate) struct Interpreter {
    budget: ScanBudget,
    max_depth: usize,
}

impl Interpreter {
    pub(crate) fn new(limits: RenderLimits) -> Self {
        Self {
            budget: ScanBudget::new(limits.max_tag_scans),
            max_depth: limits.max_depth,
        }
    }

    pub(crate) fn render_with_stack<'d>(
        &mut self,
        template: &str,
        stack: &mut ContextStack<'d>,
    ) -> Result<String, RenderError> {
        let mut out = String::with_capacity(template.len());
        self.render_into(template, stack, 0, &mut out)?;
        Ok(out)
    }

    pub(crate) fn tags_scanned(&self) -> usize {
        self.budget.used()
    }

    fn render_into<'d>(
        &mut self,
        template: &str,
        stack: &mut ContextStack<'d>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), RenderError> {
        if depth > self.max_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let mut cursor = 0;
        while cursor < template.len() {
            let Some(tag) = next_tag(template, cursor) else {
                out.push_str(&template[cursor..]);
                break;
            };
            self.budget.charge()?;
            out.push_str(&template[cursor..tag.start]);
            cursor = tag.end;

            match tag.kind {
                TagKind::Empty | TagKind::SectionClose => {}
                TagKind::Substitution => {
                    out.push_str(&format_value(resolve(tag.name, stack), tag.name));
                }
                TagKind::SectionOpen | TagKind::InvertedOpen => {
                    let Some(section) =
                        find_section_end(template, tag.end, tag.name, &mut self.budget)?
                    else {
                        debug!(section = tag.name, "Unterminated section; dropping opening tag");
                        continue;
                    };
                    cursor = section.after_close;

                    let body = &template[section.body_start..section.body_end];
                    let value = resolve(tag.name, stack);

                    if tag.kind == TagKind::InvertedOpen {
                        if !is_truthy(value) {
                            self.render_into(body, stack, depth + 1, out)?;
                        }
                    } else {
                        self.render_section(body, value, stack, depth, out)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn render_section<'d>(
        &mut self,
        body: &str,
        value: Option<&'d Value>,
        stack: &mut ContextStack<'d>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), RenderError> {
        match value {
            Some(Value::Array(items)) => {
                for item in items {
                    let frame = if item.is_object() || item.is_array() {
                        Frame::Record(item)
                    } else {
                        Frame::Wrapped(item)
                    };
                    self.render_pushed(body, frame, stack, depth, out)?;
                }
                Ok(())
            }
            Some(value) if is_truthy(Some(value)) => {
                if value.is_object() && as_safe_html(value).is_none() {
                    self.render_pushed(body, Frame::Record(value), stack, depth, out)
                } else {
                    self.render_into(body, stack, depth + 1, out)
                }
            }
            _ => Ok(()),
        }
    }

    fn render_pushed<'d>(
        &mut self,
        body: &str,
        frame: Frame<'d>,
        stack: &mut ContextStack<'d>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), RenderError> {
        stack.push(frame);
        let result = self.render_into(body, stack, depth + 1, out);
        stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: &Value) -> String {
        let mut interpreter = Interpreter::new(RenderLimits::default());
        interpreter
            .render_with_stack(template, &mut vec![Frame::Record(data)])
            .unwrap()
    }

    #[test]
    fn test_literal_text_passes_through() {
        let html = "<p class=\"x\">a & b</p>";
        assert_eq!(render(html, &json!({})), html);
    }

    #[test]
    fn test_substitution_and_missing_path() {
        let data = json!({"profile": {"name": "Ada"}});
        assert_eq!(render("{{profile.name}}", &data), "Ada");
        assert_eq!(render("[{{profile.email}}]", &data), "[]");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(render("{{x}}", &json!({"x": "<b>&"})), "&lt;b&gt;&amp;");
    }

    #[test]
    fn test_section_over_primitive_array() {
        let data = json!({"items": ["a", "b"]});
        assert_eq!(render("{{#items}}{{.}},{{/items}}", &data), "a,b,");
    }

    #[test]
    fn test_section_over_object_array() {
        let data = json!({"jobs": [{"title": "A"}, {"title": "B"}]});
        assert_eq!(render("{{#jobs}}<{{title}}>{{/jobs}}", &data), "<A><B>");
    }

    #[test]
    fn test_empty_array_suppresses_body() {
        assert_eq!(render("{{#items}}X{{/items}}", &json!({"items": []})), "");
    }

    #[test]
    fn test_inverted_section() {
        let t = "{{^items}}none{{/items}}";
        assert_eq!(render(t, &json!({"items": []})), "none");
        assert_eq!(render(t, &json!({"items": ["a"]})), "");
        assert_eq!(render(t, &json!({})), "none");
        assert_eq!(render(t, &json!({"items": "  "})), "none");
    }

    #[test]
    fn test_nested_same_name_sections() {
        let data = json!({"a": {"a": true}});
        assert_eq!(render("{{#a}}{{#a}}inner{{/a}}{{/a}}", &data), "inner");
        assert_eq!(render("{{#a}}{{#a}}inner{{/a}}{{/a}}|after", &data), "inner|after");
    }

    #[test]
    fn test_truthy_object_pushes_frame() {
        let data = json!({"name": "outer", "contact": {"email": "e@x.io"}});
        assert_eq!(
            render("{{#contact}}{{email}} {{name}}{{/contact}}", &data),
            "e@x.io outer"
        );
    }

    #[test]
    fn test_context_shadowing() {
        let data = json!({"name": "Outer", "title": "Lead", "items": [{"name": "Inner"}]});
        assert_eq!(
            render("{{#items}}{{name}}/{{title}}{{/items}}|{{name}}", &data),
            "Inner/Lead|Outer"
        );
    }

    #[test]
    fn test_truthy_primitive_renders_against_unchanged_stack() {
        let data = json!({"flag": "yes", "name": "Ada"});
        assert_eq!(render("{{#flag}}{{name}}{{/flag}}", &data), "Ada");
        assert_eq!(render("{{#flag}}[{{.}}]{{/flag}}", &data), "[]");
    }

    #[test]
    fn test_falsy_values_skip_section() {
        for data in [
            json!({"v": false}),
            json!({"v": 0}),
            json!({"v": ""}),
            json!({"v": null}),
            json!({}),
        ] {
            assert_eq!(render("{{#v}}X{{/v}}", &data), "");
        }
    }

    #[test]
    fn test_safe_html_section_and_substitution() {
        let data = json!({"frag": {"__html": "<li>x</li>"}, "empty": {"__html": ""}});
        assert_eq!(render("{{#frag}}{{frag}}{{/frag}}", &data), "<li>x</li>");
        assert_eq!(render("{{#empty}}X{{/empty}}{{^empty}}none{{/empty}}", &data), "none");
    }

    #[test]
    fn test_unterminated_section_drops_only_the_opener() {
        let data = json!({"x": "v"});
        assert_eq!(render("a{{#missing}}b{{x}}c", &data), "abvc");
    }

    #[test]
    fn test_orphan_close_and_empty_tags() {
        assert_eq!(render("a{{/x}}b{{}}c{{ }}d", &json!({})), "abcd");
    }

    #[test]
    fn test_malformed_trailing_tag_is_literal() {
        let data = json!({"x": "v"});
        assert_eq!(render("{{x}} then {{ broken", &data), "v then {{ broken");
    }

    #[test]
    fn test_mismatched_other_name_inside_section() {
        // `{{/b}}` does not close `a`; the body renders it as an orphan close.
        let data = json!({"a": true});
        assert_eq!(render("{{#a}}1{{/b}}2{{/a}}3", &data), "123");
    }

    #[test]
    fn test_idempotent() {
        let data = json!({"items": ["x", "y"], "n": 1});
        let t = "{{#items}}{{.}}{{n}}{{/items}}";
        assert_eq!(render(t, &data), render(t, &data));
    }

    #[test]
    fn test_scan_limit_fails_closed() {
        let template = "{{x}}".repeat(50);
        let mut interpreter = Interpreter::new(RenderLimits {
            max_tag_scans: 10,
            max_depth: 8,
        });
        let data = json!({});
        let result = interpreter.render_with_stack(&template, &mut vec![Frame::Record(&data)]);
        assert_eq!(result, Err(RenderError::LimitExceeded { limit: 10 }));
    }

    #[test]
    fn test_unclosed_openers_are_bounded() {
        // Every opener rescans the rest of the template; the budget stops it.
        let template = "{{#a}}".repeat(2_000);
        let mut interpreter = Interpreter::new(RenderLimits {
            max_tag_scans: 5_000,
            max_depth: 8,
        });
        let data = json!({});
        let result = interpreter.render_with_stack(&template, &mut vec![Frame::Record(&data)]);
        assert_eq!(result, Err(RenderError::LimitExceeded { limit: 5_000 }));
        assert!(interpreter.tags_scanned() > 5_000);
    }

    #[test]
    fn test_depth_limit() {
        let data = json!({"a": {"a": {"a": {"a": true}}}});
        let template = "{{#a}}{{#a}}{{#a}}{{#a}}x{{/a}}{{/a}}{{/a}}{{/a}}";
        let mut interpreter = Interpreter::new(RenderLimits {
            max_tag_scans: 1_000,
            max_depth: 2,
        });
        let result = interpreter.render_with_stack(template, &mut vec![Frame::Record(&data)]);
        assert_eq!(result, Err(RenderError::DepthExceeded { limit: 2 }));
    }
}
