//! CLI handler for `typescrape generate <url>...`.

use crate::cli::output;
use crate::emit::EmitOptions;
use crate::fetch::PageSource;
use crate::pipeline::{self, PageOutcome};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Run the generate command.
pub async fn run(
    source: &dyn PageSource,
    options: &EmitOptions,
    urls: &[String],
    index: Option<&Path>,
    out_dir: Option<&Path>,
    concurrency: usize,
) -> Result<()> {
    let mut targets = Vec::new();
    for raw in urls {
        targets.push(Url::parse(raw).with_context(|| format!("invalid URL '{raw}'"))?);
    }
    if let Some(path) = index {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read index file {}", path.display()))?;
        for raw in index_entries(&text) {
            targets.push(
                Url::parse(raw)
                    .with_context(|| format!("invalid URL '{raw}' in {}", path.display()))?,
            );
        }
    }
    if targets.is_empty() {
        bail!("no pages to generate. Pass URLs or --index <FILE>.");
    }

    if !output::is_quiet() && !output::is_json() {
        eprintln!("  Generating {} page(s)...\n", targets.len());
    }

    let outcomes = pipeline::generate_many(source, &targets, options, concurrency).await;

    let mut written = Vec::new();
    let mut failed = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(generated) => match out_dir {
                Some(dir) => {
                    let path = write_declarations(dir, &generated.identifier, &generated.text)?;
                    if !output::is_quiet() && !output::is_json() {
                        eprintln!(
                            "    {:<40} {:>3} nested   {}",
                            generated.name,
                            generated.nested,
                            path.display()
                        );
                    }
                    written.push(path);
                }
                None => print!("{}", generated.text),
            },
            Err(e) => {
                failed += 1;
                if !output::is_quiet() && !output::is_json() {
                    eprintln!("    {:<40} failed: {e}", outcome.url.as_str());
                }
            }
        }
    }

    let ok = outcomes.len() - failed;
    if output::is_json() {
        output::print_json(&summary_json(&outcomes, &written));
    } else if !output::is_quiet() {
        eprintln!("\n  {ok} ok, {failed} failed");
    }

    if failed > 0 {
        bail!("{failed} of {} page(s) failed", outcomes.len());
    }
    Ok(())
}

/// URLs listed in an index file: one per line, blank lines and `#`
/// comments skipped.
pub fn index_entries(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Write `<dir>/<identifier>.ts`, creating `dir` if needed.
pub fn write_declarations(dir: &Path, identifier: &str, text: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{identifier}.ts"));
    std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn summary_json(outcomes: &[PageOutcome], written: &[PathBuf]) -> serde_json::Value {
    let pages: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(generated) => serde_json::json!({
                "url": outcome.url.as_str(),
                "name": generated.name,
                "identifier": generated.identifier,
                "nested": generated.nested,
            }),
            Err(e) => serde_json::json!({
                "url": outcome.url.as_str(),
                "error": e.to_string(),
            }),
        })
        .collect();
    serde_json::json!({
        "pages": pages,
        "files": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_index_entries() {
        let text = "# resources\nhttps://a.example/one.html\n\n  https://a.example/two.html  \n#https://a.example/skipped.html\n";
        assert_eq!(
            index_entries(text),
            vec!["https://a.example/one.html", "https://a.example/two.html"]
        );
    }

    #[test]
    fn test_write_declarations_creates_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("types");
        let path = write_declarations(&out, "AWS_S3_Bucket", "export interface X {}\n").unwrap();
        assert_eq!(path, out.join("AWS_S3_Bucket.ts"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "export interface X {}\n"
        );
    }
}
