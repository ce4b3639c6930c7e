//! CLI handler for `typescrape inspect <url>`.

use crate::fetch::PageSource;
use crate::pipeline;
use anyhow::{Context, Result};
use url::Url;

/// Scrape one page and print its resolved schema graph as JSON.
pub async fn run(source: &dyn PageSource, url: &str) -> Result<()> {
    let url = Url::parse(url).with_context(|| format!("invalid URL '{url}'"))?;
    let resource = pipeline::scrape_resource(source, &url).await?;

    let dangling = resource.dangling_refs();
    if !dangling.is_empty() {
        eprintln!("  Warning: unresolved types: {}", dangling.join(", "));
    }

    println!("{}", serde_json::to_string_pretty(&resource)?);
    Ok(())
}
