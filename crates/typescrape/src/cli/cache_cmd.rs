//! CLI handler for `typescrape cache clear`.

use crate::cli::output;
use crate::config::Config;
use crate::fetch::cache;
use anyhow::Result;

/// Remove every cached page.
pub fn run_clear(config: &Config) -> Result<()> {
    let dir = config.cache_dir();
    let removed = cache::clear(&dir)?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "cache_dir": dir.display().to_string(),
            "removed": removed,
        }));
    } else if !output::is_quiet() {
        println!("  Removed {removed} cached page(s) from {}", dir.display());
    }
    Ok(())
}
