//! Read one reference page into plain data.
//!
//! All knowledge of the page layout lives here: the `h1` title, the header
//! container and its prose paragraphs, the `Properties` heading and its
//! definition list. The output holds no `scraper` types, so the document is
//! dropped before any further page is fetched.

use crate::error::ScrapeError;
use crate::markup;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static HEADER_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".awsdocs-page-header-container, awsdocs-page-header, header, .page-header")
        .unwrap()
});
static SECTION_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static LIST_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dl").unwrap());
static CODE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("code").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[id]").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

const PROPERTIES_HEADING: &str = "Properties";
const REQUIRED_PREFIX: &str = "Required: Yes";
const TYPE_PREFIX: &str = "Type: ";

/// Everything the scraper needs from one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutline {
    /// Final whitespace-delimited token of the title.
    pub name: String,
    /// Markdown paragraphs between the header container and the next heading.
    pub paragraphs: Vec<String>,
    /// `None` when the page has no `Properties` section.
    pub properties: Option<Vec<PropertyOutline>>,
}

/// One `dt`/`dd` pair of the properties list.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyOutline {
    pub key: String,
    pub anchor: Option<String>,
    /// Markdown of every paragraph in the `dd`, signal lines included.
    pub paragraphs: Vec<String>,
    pub required: bool,
    pub type_line: Option<TypeLine>,
}

/// The text after `Type: ` and the first link in that paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeLine {
    pub text: String,
    pub href: Option<String>,
}

/// Parse `html` and read its title, description and property list.
pub fn outline_page(html: &str, url: &Url) -> Result<PageOutline, ScrapeError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SEL)
        .next()
        .ok_or_else(|| ScrapeError::MissingTitle {
            url: url.to_string(),
        })?;
    let name = markup::plain_text(title)
        .split_whitespace()
        .last()
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::MissingTitle {
            url: url.to_string(),
        })?;

    let paragraphs = following_elements(header_container(title))
        .take_while(|el| !is_heading(el))
        .filter(|el| el.value().name() == "p")
        .map(|p| markup::to_markdown(p, url))
        .filter(|md| !md.is_empty())
        .collect();

    let properties = properties_list(&document).map(|dl| {
        dl.children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "dt")
            .map(|dt| outline_property(dt, url))
            .collect()
    });

    Ok(PageOutline {
        name,
        paragraphs,
        properties,
    })
}

/// The header container after the title, or the title itself when there is
/// none. Only siblings before the next heading are considered, so site
/// chrome elsewhere on the page never qualifies.
fn header_container(title: ElementRef<'_>) -> ElementRef<'_> {
    following_elements(title)
        .take_while(|el| !is_heading(el))
        .find(|el| HEADER_SEL.matches(el) || el.select(&HEADER_SEL).next().is_some())
        .unwrap_or(title)
}

/// The definition list under the `Properties` heading, if there is one.
fn properties_list(document: &Html) -> Option<ElementRef<'_>> {
    let heading = document
        .select(&SECTION_SEL)
        .find(|h| markup::plain_text(*h) == PROPERTIES_HEADING)?;

    following_elements(heading)
        .take_while(|el| el.value().name() != "h2")
        .find_map(|el| {
            if el.value().name() == "dl" {
                Some(el)
            } else {
                el.select(&LIST_SEL).next()
            }
        })
}

fn outline_property(dt: ElementRef<'_>, url: &Url) -> PropertyOutline {
    let key = dt
        .select(&CODE_SEL)
        .next()
        .map(markup::plain_text)
        .unwrap_or_else(|| markup::plain_text(dt));

    let anchor = dt
        .value()
        .attr("id")
        .or_else(|| dt.select(&ANCHOR_SEL).next().and_then(|el| el.value().attr("id")))
        .map(str::to_string);

    let mut paragraphs = Vec::new();
    let mut required = false;
    let mut type_line = None;

    let dd = following_elements(dt)
        .next()
        .filter(|el| el.value().name() == "dd");
    for p in dd
        .into_iter()
        .flat_map(|dd| dd.children().filter_map(ElementRef::wrap))
        .filter(|el| el.value().name() == "p")
    {
        let text = markup::plain_text(p);
        if text.starts_with(REQUIRED_PREFIX) {
            required = true;
        }
        if type_line.is_none() {
            if let Some(rest) = text.strip_prefix(TYPE_PREFIX) {
                type_line = Some(TypeLine {
                    text: rest.trim().to_string(),
                    href: p
                        .select(&LINK_SEL)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .map(str::to_string),
                });
            }
        }
        let md = markup::to_markdown(p, url);
        if !md.is_empty() {
            paragraphs.push(md);
        }
    }

    PropertyOutline {
        key,
        anchor,
        paragraphs,
        required,
        type_line,
    }
}

/// Element siblings after `el`, skipping text and comments.
fn following_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

fn is_heading(el: &ElementRef<'_>) -> bool {
    matches!(el.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}
