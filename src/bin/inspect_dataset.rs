//! Utility to inspect the configured dataset and print its structure.

use fiscal_search_api::config::Config;
use fiscal_search_api::csv_provider::{normalize_tico_codigo, CsvDataProvider, TICO_CODIGO};
use fiscal_search_api::models::RECORD_FIELDS;
use std::collections::BTreeMap;

/// Main entry point for the dataset inspection utility.
///
/// Loads the data file named by `DATA_FILE` (or the default path), then lists
/// its columns, flags record fields it lacks, and counts rows per status code.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let provider = CsvDataProvider::new(config.data_file.clone())?;
    let dataset = provider.load_dataset()?;

    println!("Dataset: {}", provider.data_file().display());
    println!("Rows: {}", dataset.rows.len());
    println!("Columns:");
    for column in &dataset.columns {
        let marker = if RECORD_FIELDS.contains(&column.as_str()) {
            ""
        } else {
            " (not exposed)"
        };
        println!("- {}{}", column, marker);
    }

    let missing: Vec<_> = RECORD_FIELDS
        .iter()
        .filter(|field| dataset.column_index(field).is_none())
        .collect();
    if !missing.is_empty() {
        println!("Missing record fields: {:?}", missing);
    }

    if let Some(idx) = dataset.column_index(TICO_CODIGO) {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for row in &dataset.rows {
            let code = row.get(idx).map(|c| normalize_tico_codigo(c)).unwrap_or_default();
            *counts.entry(code).or_default() += 1;
        }
        println!("Rows per {}:", TICO_CODIGO);
        for (code, count) in &counts {
            let label = if code.is_empty() { "(blank)" } else { code.as_str() };
            println!("  {}: {}", label, count);
        }
    }

    Ok(())
}
