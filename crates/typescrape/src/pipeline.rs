// Copyright 2026 typescrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scrape-resolve-emit, for one page or a batch of pages.
//!
//! Every top-level page gets its own [`Session`]. A batch runs sessions
//! concurrently on the current task; a failing page is reported in its
//! [`PageOutcome`] and never affects its siblings.

use crate::emit::{emit, identifier, EmitOptions};
use crate::error::{GenerateError, ScrapeError};
use crate::fetch::PageSource;
use crate::schema::Resource;
use crate::scrape::scrape_page;
use crate::session::Session;
use futures::stream::{self, StreamExt};
use tracing::{error, info};
use url::Url;

/// Declarations generated for one top-level page.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Root schema name, e.g. `AWS::S3::Bucket`.
    pub name: String,
    /// Identifier of the root declaration, used as the file stem.
    pub identifier: String,
    /// Number of nested declarations.
    pub nested: usize,
    pub text: String,
}

/// Result of one page in a batch.
#[derive(Debug)]
pub struct PageOutcome {
    pub url: Url,
    pub result: Result<Generated, GenerateError>,
}

/// Scrape `url` and everything it references in a fresh session.
pub async fn scrape_resource(source: &dyn PageSource, url: &Url) -> Result<Resource, ScrapeError> {
    let mut session = Session::new(url.clone());
    let schema = scrape_page(&mut session, source, url).await?;
    Ok(session.into_resource(schema))
}

/// Scrape `url` and emit its declarations.
pub async fn generate(
    source: &dyn PageSource,
    url: &Url,
    options: &EmitOptions,
) -> Result<Generated, GenerateError> {
    let resource = scrape_resource(source, url).await?;
    let text = emit(&resource, options)?;
    Ok(Generated {
        name: resource.schema.name.clone(),
        identifier: identifier(&resource.schema.name),
        nested: resource.types.len(),
        text,
    })
}

/// Generate every page in `urls`, at most `concurrency` sessions at a time.
///
/// Outcomes come back in input order.
pub async fn generate_many(
    source: &dyn PageSource,
    urls: &[Url],
    options: &EmitOptions,
    concurrency: usize,
) -> Vec<PageOutcome> {
    stream::iter(urls)
        .map(|url| async move {
            let result = generate(source, url, options).await;
            match &result {
                Ok(generated) => info!(
                    %url,
                    name = generated.name.as_str(),
                    nested = generated.nested,
                    "generated"
                ),
                Err(e) => error!(%url, error = %e, "page failed"),
            }
            PageOutcome {
                url: url.clone(),
                result,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemorySource;

    const BASE: &str = "https://docs.example.com/reference/";

    fn page(name: &str, props: &str) -> String {
        format!("<h1>{name}</h1><p>About {name}.</p><h2>Properties</h2><dl>{props}</dl>")
    }

    fn string_prop(key: &str) -> String {
        format!("<dt id=\"{key}\"><code>{key}</code></dt><dd><p>Required: Yes</p><p>Type: String</p></dd>")
    }

    #[tokio::test]
    async fn test_generate_many_isolates_failures() {
        let source = MemorySource::new()
            .with_page(&format!("{BASE}good.html"), page("AWS::Demo::Good", &string_prop("Name")))
            .with_page(&format!("{BASE}bad.html"), "<p>no title</p>");
        let urls = vec![
            Url::parse(&format!("{BASE}bad.html")).unwrap(),
            Url::parse(&format!("{BASE}good.html")).unwrap(),
            Url::parse(&format!("{BASE}absent.html")).unwrap(),
        ];

        let outcomes = generate_many(&source, &urls, &EmitOptions::default(), 2).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].url, urls[0]);
        assert!(matches!(
            outcomes[0].result,
            Err(GenerateError::Scrape(ScrapeError::MissingTitle { .. }))
        ));
        let good = outcomes[1].result.as_ref().unwrap();
        assert_eq!(good.identifier, "AWS_Demo_Good");
        assert!(good.text.contains("Name: string | IntrinsicFunction;"));
        assert!(matches!(
            outcomes[2].result,
            Err(GenerateError::Scrape(ScrapeError::Fetch(_)))
        ));
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_resolutions() {
        let tag_prop = "<dt><code>Tag</code></dt><dd><p>Type: <a href=\"tag.html\">Tag</a></p></dd>";
        let source = MemorySource::new()
            .with_page(&format!("{BASE}one.html"), page("AWS::Demo::One", tag_prop))
            .with_page(&format!("{BASE}two.html"), page("AWS::Demo::Two", tag_prop))
            .with_page(&format!("{BASE}tag.html"), page("Tag", &string_prop("Key")));
        let urls = vec![
            Url::parse(&format!("{BASE}one.html")).unwrap(),
            Url::parse(&format!("{BASE}two.html")).unwrap(),
        ];

        let outcomes = generate_many(&source, &urls, &EmitOptions::default(), 2).await;
        for outcome in &outcomes {
            let generated = outcome.result.as_ref().unwrap();
            assert_eq!(generated.nested, 1);
            assert!(generated.text.contains("export interface Tag {"));
        }
        // Each session resolves the shared type on its own.
        assert_eq!(source.fetches_of(&format!("{BASE}tag.html")), 2);
    }
}
