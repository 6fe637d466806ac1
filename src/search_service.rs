use crate::csv_provider::DataProvider;
use crate::errors::AppError;
use crate::models::{Record, SearchRequest};
use crate::query_normalizer::{normalize_search_query, NormalizedQuery};
use std::sync::Arc;

/// Runs search requests against a data provider.
#[derive(Clone)]
pub struct SearchService {
    data_provider: Arc<dyn DataProvider>,
}

impl SearchService {
    pub fn new(data_provider: Arc<dyn DataProvider>) -> Self {
        Self { data_provider }
    }

    /// Normalizes the request, queries the provider and shapes the rows into records.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `DataSourceNotFound`, `MalformedDataSource`
    /// and `UnknownColumn` errors.
    pub fn search_records(&self, request: &SearchRequest) -> Result<Vec<Record>, AppError> {
        let NormalizedQuery { filters, limit } = normalize_search_query(request);

        let raw_records = self.data_provider.find_rows(&filters, limit)?;

        Ok(raw_records.iter().map(Record::from_raw).collect())
    }
}
