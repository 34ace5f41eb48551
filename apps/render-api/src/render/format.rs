//! Field Formatter — turns a resolved value into an HTML-ready string.
//!
//! Every leaf string that comes from résumé data is escaped. The only
//! unescaped output is the inner string of a SafeHtml marker
//! (`{ "__html": "..." }`) and the fragments built here for work history
//! and education, whose own leaf text is escaped while they are built.

use serde_json::{Map, Number, Value};

/// Key of the SafeHtml marker object.
pub const SAFE_HTML_KEY: &str = "__html";

const WORK_EXPERIENCE_PATHS: &[&str] = &["work_experience", "workExperience"];
const EDUCATION_PATH: &str = "education";

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

// ────────────────────────────────────────────────────────────────────────────
// SafeHtml
// ────────────────────────────────────────────────────────────────────────────

/// Wraps already-rendered HTML so substitution passes it through verbatim.
pub fn safe_html(html: impl Into<String>) -> Value {
    let mut map = Map::new();
    map.insert(SAFE_HTML_KEY.to_string(), Value::String(html.into()));
    Value::Object(map)
}

/// Returns the inner HTML when `value` carries the SafeHtml marker.
pub fn as_safe_html(value: &Value) -> Option<&str> {
    value.as_object()?.get(SAFE_HTML_KEY)?.as_str()
}

// ────────────────────────────────────────────────────────────────────────────
// Truthiness and formatting
// ────────────────────────────────────────────────────────────────────────────

/// Section truthiness. `None` is an undefined path.
pub fn is_truthy(value: Option<&Value>) -> bool {
    let Some(value) = value else {
        return false;
    };
    if let Some(html) = as_safe_html(value) {
        return !html.is_empty();
    }
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Formats `value` found at `path` for insertion into the output.
pub fn format_value(value: Option<&Value>, path: &str) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if let Some(html) = as_safe_html(value) {
        return html.to_string();
    }

    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => escape_html(&number_text(n)),
        Value::String(s) => escape_html(s),
        Value::Array(items) if WORK_EXPERIENCE_PATHS.contains(&path) => {
            work_experience_html(items)
        }
        Value::Array(items) if path == EDUCATION_PATH => education_html(items),
        Value::Array(items) => join_list(items),
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(Value::as_str) {
                escape_html(text)
            } else if let Some(Value::Array(raw)) = map.get("raw") {
                join_list(raw)
            } else {
                String::new()
            }
        }
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Prints a number the way a JS string conversion would: integral floats
/// lose their `.0`.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64_INT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Comma-joins the trimmed, non-empty scalar entries of a list.
fn join_list(items: &[Value]) -> String {
    let parts: Vec<String> = items
        .iter()
        .filter_map(scalar_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    escape_html(&parts.join(", "))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collection fragments
// ────────────────────────────────────────────────────────────────────────────

/// Builds the work history fragment from canonical work-experience items.
pub fn work_experience_html(items: &[Value]) -> String {
    let mut html = String::new();
    for item in items.iter().filter_map(Value::as_object) {
        let heading = join_present(&[field(item, "roleTitle"), field(item, "companyTitle")], " - ");
        let dates = join_present(&[field(item, "startDate"), field(item, "endDate")], " – ");
        let place = join_present(
            &[field(item, "location"), field(item, "employmentType")],
            " | ",
        );

        html.push_str("<div class=\"resume-item work-item\">");
        push_heading(&mut html, &heading);
        push_meta(&mut html, &dates);
        push_meta(&mut html, &place);

        let bullets = list_field(item, "bullets");
        if !bullets.is_empty() {
            html.push_str("<ul>");
            for bullet in &bullets {
                html.push_str(&format!("<li>{}</li>", escape_html(bullet)));
            }
            html.push_str("</ul>");
        }
        html.push_str("</div>");
    }
    html
}

/// Builds the education fragment from canonical education items.
pub fn education_html(items: &[Value]) -> String {
    let mut html = String::new();
    for item in items.iter().filter_map(Value::as_object) {
        let subject = join_present(&[field(item, "degree"), field(item, "field")], " - ");
        let heading = join_present(&[field(item, "institution"), subject.as_str()], " | ");

        html.push_str("<div class=\"resume-item education-item\">");
        push_heading(&mut html, &heading);
        push_meta(&mut html, field(item, "date"));

        let coursework = list_field(item, "coursework");
        if !coursework.is_empty() {
            push_meta(&mut html, &format!("Coursework: {}", coursework.join(", ")));
        }
        html.push_str("</div>");
    }
    html
}

fn push_heading(html: &mut String, text: &str) {
    if !text.is_empty() {
        html.push_str(&format!("<div><strong>{}</strong></div>", escape_html(text)));
    }
}

fn push_meta(html: &mut String, text: &str) {
    if !text.is_empty() {
        html.push_str(&format!("<div class=\"meta\">{}</div>", escape_html(text)));
    }
}

fn field<'a>(item: &'a Map<String, Value>, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

fn list_field(item: &Map<String, Value>, key: &str) -> Vec<String> {
    match item.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(scalar_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn join_present(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_all_special_chars() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(format_value(None, "x"), "");
        assert_eq!(format_value(Some(&Value::Null), "x"), "");
        assert_eq!(format_value(Some(&json!(true)), "x"), "true");
        assert_eq!(format_value(Some(&json!(false)), "x"), "");
        assert_eq!(format_value(Some(&json!(0)), "x"), "0");
        assert_eq!(format_value(Some(&json!(3.5)), "x"), "3.5");
        assert_eq!(format_value(Some(&json!(3.0)), "x"), "3");
        assert_eq!(format_value(Some(&json!(-0.0)), "x"), "0");
        assert_eq!(format_value(Some(&json!("<script>")), "x"), "&lt;script&gt;");
    }

    #[test]
    fn test_safe_html_passthrough() {
        let value = safe_html("<ul><li>a</li></ul>");
        assert_eq!(format_value(Some(&value), "x"), "<ul><li>a</li></ul>");
    }

    #[test]
    fn test_plain_list_join() {
        let value = json!([" Rust ", "", "Go", 3, null, {"k": "v"}, "C&C"]);
        assert_eq!(format_value(Some(&value), "skills.raw"), "Rust, Go, 3, C&amp;C");
    }

    #[test]
    fn test_text_and_raw_wrappers() {
        assert_eq!(format_value(Some(&json!({"text": "a < b"})), "summary"), "a &lt; b");
        assert_eq!(format_value(Some(&json!({"raw": ["x", "y"]})), "skills"), "x, y");
        assert_eq!(format_value(Some(&json!({"other": 1})), "obj"), "");
    }

    #[test]
    fn test_work_experience_fragment() {
        let items = json!([{
            "companyTitle": "Acme",
            "roleTitle": "Engineer",
            "employmentType": "Full-time",
            "location": "Remote",
            "startDate": "2020",
            "endDate": "2023",
            "bullets": ["Shipped <v2>", " "]
        }]);
        let html = format_value(Some(&items), "work_experience");
        assert!(html.contains("<strong>Engineer - Acme</strong>"));
        assert!(html.contains("<div class=\"meta\">2020 – 2023</div>"));
        assert!(html.contains("<div class=\"meta\">Remote | Full-time</div>"));
        assert!(html.contains("<ul><li>Shipped &lt;v2&gt;</li></ul>"));
        assert_eq!(html.matches("<li>").count(), 1);
    }

    #[test]
    fn test_work_experience_camel_path_and_optional_lines() {
        let items = json!([{"companyTitle": "Acme", "roleTitle": "", "bullets": []}]);
        let html = format_value(Some(&items), "workExperience");
        assert_eq!(
            html,
            "<div class=\"resume-item work-item\"><div><strong>Acme</strong></div></div>"
        );
    }

    #[test]
    fn test_education_fragment() {
        let items = json!([{
            "institution": "MIT",
            "degree": "BSc",
            "field": "CS",
            "date": "2019",
            "coursework": ["Compilers", "OS"]
        }]);
        let html = format_value(Some(&items), "education");
        assert!(html.contains("<strong>MIT | BSc - CS</strong>"));
        assert!(html.contains("<div class=\"meta\">2019</div>"));
        assert!(html.contains("<div class=\"meta\">Coursework: Compilers, OS</div>"));
    }

    #[test]
    fn test_integral_floats_in_lists() {
        let value = json!([2.0, 2.5, 7]);
        assert_eq!(format_value(Some(&value), "years"), "2, 2.5, 7");
    }

    #[test]
    fn test_items_without_heading_skip_the_heading_line() {
        let education = json!([{"date": "2020"}]);
        assert_eq!(
            format_value(Some(&education), "education"),
            "<div class=\"resume-item education-item\"><div class=\"meta\">2020</div></div>"
        );

        let work = json!([{"startDate": "2019", "bullets": ["Led"]}]);
        let html = format_value(Some(&work), "work_experience");
        assert!(!html.contains("<strong>"));
        assert!(html.contains("<div class=\"meta\">2019</div><ul><li>Led</li></ul>"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(Some(&json!("   "))));
        assert!(is_truthy(Some(&json!("x"))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(is_truthy(Some(&json!(-1))));
        assert!(!is_truthy(Some(&json!([]))));
        assert!(is_truthy(Some(&json!([0]))));
        assert!(is_truthy(Some(&json!({}))));
        assert!(!is_truthy(Some(&safe_html(""))));
        assert!(is_truthy(Some(&safe_html("<p>"))));
    }
}
