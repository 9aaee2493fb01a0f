use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::markup;
use crate::parser::{self, ParseOptions, Record};
use crate::reduce::Domain;

pub fn slurp(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// File → `<pre>` content → records.
pub fn load_table(path: &Path, opts: &ParseOptions) -> Result<Vec<Record>> {
    info!("Loading table from {}", path.display());
    let document = slurp(path)?;
    let text = markup::extract_pre(&document)
        .with_context(|| format!("No table found in {}", path.display()))?;
    let records = parser::parse_fixed_width(&text, opts)
        .with_context(|| format!("Failed to parse table in {}", path.display()))?;
    info!("Parsed {} records", records.len());
    Ok(records)
}

pub fn answer(domain: Domain, path: &Path) -> Result<String> {
    let records = load_table(path, &domain.parse_options())?;
    domain
        .reduce(&records)
        .with_context(|| format!("Cannot answer {} question for {}", domain, path.display()))
}
