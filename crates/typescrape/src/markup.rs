//! HTML to Markdown for description prose.
//!
//! Only the inline vocabulary that shows up in reference paragraphs is
//! handled: text, `code`, links, emphasis and line breaks. Anything else is
//! rendered as its children.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;
use url::Url;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Render the contents of `element` as a single Markdown paragraph.
///
/// Relative link targets are resolved against `base`.
pub fn to_markdown(element: ElementRef<'_>, base: &Url) -> String {
    let mut out = String::new();
    render_children(element, base, &mut out);
    out.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Whitespace-collapsed plain text of `element`.
pub fn plain_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    collapse(&text).trim().to_string()
}

fn collapse(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

fn render_children(element: ElementRef<'_>, base: &Url, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            push_text(out, &collapse(text));
        } else if let Some(el) = ElementRef::wrap(child) {
            render_element(el, base, out);
        }
    }
}

fn render_element(el: ElementRef<'_>, base: &Url, out: &mut String) {
    match el.value().name() {
        "br" => out.push('\n'),
        "code" => {
            let code = plain_text(el);
            if !code.is_empty() {
                push_text(out, &format!("`{code}`"));
            }
        }
        "strong" | "b" => wrap(el, base, out, "**"),
        "em" | "i" => wrap(el, base, out, "_"),
        "a" => {
            let mut inner = String::new();
            render_children(el, base, &mut inner);
            let inner = inner.trim();
            match el.value().attr("href") {
                Some(href) if !inner.is_empty() => {
                    let target = base
                        .join(href)
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| href.to_string());
                    push_text(out, &format!("[{inner}]({target})"));
                }
                _ => push_text(out, inner),
            }
        }
        "script" | "style" => {}
        _ => render_children(el, base, out),
    }
}

fn wrap(el: ElementRef<'_>, base: &Url, out: &mut String, marker: &str) {
    let mut inner = String::new();
    render_children(el, base, &mut inner);
    let inner = inner.trim();
    if !inner.is_empty() {
        push_text(out, &format!("{marker}{inner}{marker}"));
    }
}

/// Append `text`, never producing a double space or a space after a newline.
fn push_text(out: &mut String, text: &str) {
    let text = if out.is_empty() || out.ends_with(' ') || out.ends_with('\n') {
        text.trim_start()
    } else {
        text
    };
    out.push_str(text);
}
