//! String-buffer output and rich-text handling.

use std::sync::LazyLock;

use questionnaire_types::Output;
use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)<(script|style|iframe|object|embed)\b[^>]*>",
        r".*?</\s*(script|style|iframe|object|embed)\s*>"
    ))
    .expect("regex")
});
static DANGLING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?\s*(script|style|iframe|object|embed)\b[^>]*>").expect("regex")
});
static EVENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("regex")
});
static SCRIPT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("regex"));
static WRAPPER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?\s*(p|br|div|span)\b[^>]*>").expect("regex"));

/// Escape text for use in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip scripting from stored rich text, keeping ordinary markup.
///
/// Passes repeat until the text stops changing, so a tag split around a
/// removed one cannot reassemble.
pub fn sanitize_html(content: &str) -> String {
    let mut current = sanitize_pass(content);
    loop {
        // Every pass only removes text, so this terminates.
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(content: &str) -> String {
    let content = SCRIPT_BLOCK.replace_all(content, "");
    let content = DANGLING_TAG.replace_all(&content, "");
    let content = EVENT_ATTR.replace_all(&content, "");
    SCRIPT_URL.replace_all(&content, "").into_owned()
}

/// Whether rich text shows nothing once wrapper tags and whitespace are removed.
///
/// Editors submit an empty paragraph (`<p>  </p>` and the like) for an
/// untouched field.
pub fn is_blank_html(content: &str) -> bool {
    WRAPPER_TAG
        .replace_all(content, "")
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .trim()
        .is_empty()
}

/// Hands out element ids that are unique within one rendered form.
#[derive(Debug, Clone, Default)]
pub struct FormIdCounter {
    next: u32,
}

impl FormIdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next id with the given prefix: `prefix_1`, `prefix_2`, ...
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}_{}", self.next)
    }
}

/// An [`Output`] that appends markup to a string.
#[derive(Debug, Clone, Default)]
pub struct HtmlOutput {
    html: String,
    ids: FormIdCounter,
}

impl HtmlOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    fn push_attrs(&mut self, attrs: &[(&str, &str)]) {
        for (name, value) in attrs {
            self.html.push(' ');
            self.html.push_str(name);
            self.html.push_str("=\"");
            self.html.push_str(&escape_html(value));
            self.html.push('"');
        }
    }
}

impl Output for HtmlOutput {
    fn start_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.html.push('<');
        self.html.push_str(tag);
        self.push_attrs(attrs);
        self.html.push('>');
    }

    fn end_tag(&mut self, tag: &str) {
        self.html.push_str("</");
        self.html.push_str(tag);
        self.html.push('>');
    }

    fn empty_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.html.push('<');
        self.html.push_str(tag);
        self.push_attrs(attrs);
        self.html.push_str(" />");
    }

    fn text(&mut self, text: &str) {
        self.html.push_str(&escape_html(text));
    }

    fn raw(&mut self, markup: &str) {
        self.html.push_str(markup);
    }

    fn format_text(&self, content: &str) -> String {
        sanitize_html(content)
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.ids.next_id(prefix)
    }
}
