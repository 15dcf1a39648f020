//! Static HTML export of a landing page.
//!
//! Each section's `config` JSON is read for a small set of well-known keys
//! (`heading`, `subheading`, `body`, `items`, `cta_label`, `cta_url`); any
//! other keys are ignored. All text is HTML-escaped.

use serde_json::Value;

/// A section as seen by the exporter.
#[derive(Debug, Clone, Copy)]
pub struct ExportSection<'a> {
    pub section_type: &'a str,
    pub config: &'a Value,
    pub image_url: Option<&'a str>,
}

/// Render a complete HTML document for a page.
///
/// Sections must already be in display order.
pub fn render_page_html(
    title: &str,
    description: Option<&str>,
    sections: &[ExportSection<'_>],
) -> String {
    let mut html = String::with_capacity(1024 + sections.len() * 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    if let Some(desc) = description {
        html.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(desc)
        ));
    }
    html.push_str("</head>\n<body>\n<main>\n");

    for section in sections {
        render_section(&mut html, section);
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_section(out: &mut String, section: &ExportSection<'_>) {
    out.push_str(&format!(
        "<section class=\"lp-section lp-{}\">\n",
        escape_html(section.section_type)
    ));

    if let Some(heading) = str_field(section.config, "heading") {
        out.push_str(&format!("<h2>{}</h2>\n", escape_html(heading)));
    }
    if let Some(sub) = str_field(section.config, "subheading") {
        out.push_str(&format!(
            "<p class=\"lp-subheading\">{}</p>\n",
            escape_html(sub)
        ));
    }
    if let Some(url) = section.image_url.filter(|u| is_safe_url(u)) {
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"\" loading=\"lazy\">\n",
            escape_html(url)
        ));
    }
    if let Some(body) = str_field(section.config, "body") {
        for paragraph in body.split("\n\n").filter(|p| !p.trim().is_empty()) {
            out.push_str(&format!("<p>{}</p>\n", escape_html(paragraph.trim())));
        }
    }
    if let Some(items) = section.config.get("items").and_then(Value::as_array) {
        out.push_str("<ul>\n");
        for item in items {
            render_item(out, item);
        }
        out.push_str("</ul>\n");
    }
    if let (Some(label), Some(url)) = (
        str_field(section.config, "cta_label"),
        str_field(section.config, "cta_url"),
    ) {
        if is_safe_url(url) {
            out.push_str(&format!(
                "<a class=\"lp-cta\" href=\"{}\">{}</a>\n",
                escape_html(url),
                escape_html(label)
            ));
        }
    }

    out.push_str("</section>\n");
}

fn render_item(out: &mut String, item: &Value) {
    match item {
        Value::String(text) => out.push_str(&format!("<li>{}</li>\n", escape_html(text))),
        Value::Object(_) => {
            out.push_str("<li>");
            if let Some(title) = str_field(item, "title") {
                out.push_str(&format!("<strong>{}</strong>", escape_html(title)));
            }
            if let Some(desc) = str_field(item, "description") {
                out.push_str(&format!(" {}", escape_html(desc)));
            }
            out.push_str("</li>\n");
        }
        _ => {}
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Only http(s), root-relative, and fragment links survive export.
fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with('/')
        || lower.starts_with('#')
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
