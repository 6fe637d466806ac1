//! Read-only access to the registration dataset.
//!
//! The dataset is a single CSV file that is re-read on every query. There is
//! no cache: edits to the file show up on the next request.

use crate::errors::AppError;
use crate::models::RawRecord;
use crate::query_normalizer::Filters;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Column compared ignoring leading zeros.
pub const TICO_CODIGO: &str = "TICO_CODIGO";

/// Columns whose empty cells are returned as absent.
pub const NULLABLE_FIELDS: [&str; 4] = [
    "TICO_CODIGO",
    "FLAGS",
    "ENTE_FEDERATIVO",
    "INSCR_SUFRAMA",
];

/// Keys that may appear in a request but are never dataset columns.
const RESERVED_KEYS: [&str; 1] = ["Quantity"];

/// Source of dataset rows.
pub trait DataProvider: Send + Sync {
    /// Returns the rows matching every filter, in dataset order, truncated to `limit`.
    ///
    /// # Errors
    ///
    /// * `AppError::DataSourceNotFound` - the dataset cannot be read.
    /// * `AppError::MalformedDataSource` - the dataset is empty or not valid CSV.
    /// * `AppError::UnknownColumn` - a filter key is not a dataset column.
    fn find_rows(
        &self,
        filters: &Filters,
        limit: Option<usize>,
    ) -> Result<Vec<RawRecord>, AppError>;
}

/// Fully loaded dataset: trimmed column names and string cells.
///
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Normalizes a registration status code: trimmed, leading zeros stripped.
///
/// An all-zero code becomes `"0"`; a blank code stays empty.
pub fn normalize_tico_codigo(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.trim_start_matches('0') {
        "" => "0".to_string(),
        stripped => stripped.to_string(),
    }
}

/// String form of a filter value as compared against a cell.
///
/// Booleans render as `True`/`False`.
fn filter_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

/// Renames repeated column names to `NAME.1`, `NAME.2`, ... so every column
/// is addressable and the first occurrence keeps its name.
fn dedupe_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut result = Vec::with_capacity(columns.len());

    for column in columns {
        let mut name = column.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", column, suffix);
            suffix += 1;
        }
        if name != column {
            tracing::warn!("Duplicate dataset column {} renamed to {}", column, name);
        }
        seen.insert(name.clone());
        result.push(name);
    }

    result
}

pub struct CsvDataProvider {
    data_file: PathBuf,
}

impl CsvDataProvider {
    /// Creates a provider for the CSV at `data_file`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataSourceNotFound` if the file does not exist.
    pub fn new(data_file: impl Into<PathBuf>) -> Result<Self, AppError> {
        let data_file = data_file.into();
        if !data_file.exists() {
            return Err(AppError::DataSourceNotFound(missing_file_message(&data_file)));
        }
        Ok(Self { data_file })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Reads and parses the whole dataset.
    ///
    /// All cells are kept as strings; short rows are padded with empty cells.
    pub fn load_dataset(&self) -> Result<Dataset, AppError> {
        let bytes = std::fs::read(&self.data_file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::DataSourceNotFound(missing_file_message(&self.data_file))
            } else {
                e.into()
            }
        })?;
        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();
        if columns.is_empty() {
            return Err(AppError::MalformedDataSource(format!(
                "No columns to parse from {}",
                self.data_file.display()
            )));
        }
        let columns = dedupe_columns(columns);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row = (0..columns.len())
                .map(|i| record.get(i).unwrap_or_default().to_string())
                .collect();
            rows.push(row);
        }

        tracing::debug!(
            "Loaded dataset {}: {} column(s), {} row(s)",
            self.data_file.display(),
            columns.len(),
            rows.len()
        );

        Ok(Dataset { columns, rows })
    }
}

impl DataProvider for CsvDataProvider {
    fn find_rows(
        &self,
        filters: &Filters,
        limit: Option<usize>,
    ) -> Result<Vec<RawRecord>, AppError> {
        let mut dataset = self.load_dataset()?;
        let mut rows = std::mem::take(&mut dataset.rows);

        if let Some(idx) = dataset.column_index(TICO_CODIGO) {
            for row in rows.iter_mut() {
                if let Some(cell) = row.get_mut(idx) {
                    *cell = normalize_tico_codigo(cell);
                }
            }
        }

        for (key, value) in filters {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let idx = dataset
                .column_index(key)
                .ok_or_else(|| AppError::UnknownColumn(key.clone()))?;

            let expected = if key == TICO_CODIGO {
                normalize_tico_codigo(&filter_value_to_string(value))
            } else {
                filter_value_to_string(value)
            };

            rows.retain(|row| row.get(idx).is_some_and(|cell| *cell == expected));
        }

        if let Some(limit) = limit {
            rows.truncate(limit);
        }

        tracing::info!(
            "Dataset query matched {} row(s) with {} filter(s)",
            rows.len(),
            filters.len()
        );

        let records = rows
            .into_iter()
            .map(|row| {
                dataset
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| {
                        let value = if cell.is_empty() && NULLABLE_FIELDS.contains(&column.as_str())
                        {
                            None
                        } else {
                            Some(cell)
                        };
                        (column.clone(), value)
                    })
                    .collect::<RawRecord>()
            })
            .collect();

        Ok(records)
    }
}

fn missing_file_message(data_file: &Path) -> String {
    format!(
        "CSV not found: {}. Put your file at {} or set DATA_FILE env var.",
        data_file.display(),
        crate::config::DEFAULT_DATA_FILE
    )
}
