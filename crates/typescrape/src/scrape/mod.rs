//! Page and property scraping.
//!
//! [`scrape_page`] fetches one page, reads it with [`dom::outline_page`] and
//! then resolves every property type through the classifier, which may
//! recurse back into [`scrape_page`] for nested type pages.

pub mod dom;

use crate::classify::classify;
use crate::error::ScrapeError;
use crate::fetch::PageSource;
use crate::schema::{MapSchema, Property, ScalarKind, TypeDescriptor};
use crate::session::Session;
use dom::PropertyOutline;
use tracing::{debug, warn};
use url::Url;

/// Scrape the page at `url` into a schema, resolving nested types into
/// `session`.
pub async fn scrape_page(
    session: &mut Session,
    source: &dyn PageSource,
    url: &Url,
) -> Result<MapSchema, ScrapeError> {
    let html = source.fetch(url).await?;
    let outline = dom::outline_page(&html, url)?;
    drop(html);

    let outlines = match outline.properties {
        Some(props) => props,
        None => {
            warn!(%url, name = outline.name.as_str(), "page has no Properties section");
            Vec::new()
        }
    };

    let mut properties = Vec::with_capacity(outlines.len());
    for prop in &outlines {
        properties.push(scrape_property(session, source, url, prop).await?);
    }

    debug!(%url, name = outline.name.as_str(), properties = properties.len(), "scraped page");
    Ok(MapSchema {
        name: outline.name,
        description: with_backlink(&outline.paragraphs, url.as_str()),
        link: url.to_string(),
        properties,
    })
}

/// Turn one property outline into a [`Property`], classifying its type.
pub async fn scrape_property(
    session: &mut Session,
    source: &dyn PageSource,
    url: &Url,
    prop: &PropertyOutline,
) -> Result<Property, ScrapeError> {
    let link = match &prop.anchor {
        Some(anchor) => format!("{url}#{anchor}"),
        None => url.to_string(),
    };

    let ty = match &prop.type_line {
        Some(line) => classify(session, source, url, line).await?,
        None => {
            warn!(%url, field = prop.key.as_str(), "property has no Type line, using Json");
            TypeDescriptor::Scalar(ScalarKind::Json)
        }
    };

    Ok(Property {
        key: prop.key.clone(),
        description: with_backlink(&prop.paragraphs, &link),
        link,
        required: prop.required,
        ty,
    })
}

/// Join paragraphs with blank lines and finish with an `@see` line.
fn with_backlink(paragraphs: &[String], link: &str) -> String {
    let mut text = paragraphs.join("\n\n");
    if !text.is_empty() {
        text.push_str("\n\n");
    }
    text.push_str("@see ");
    text.push_str(link);
    text
}
