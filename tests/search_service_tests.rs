/// Search service tests with an in-memory provider
/// Verifies what the service hands to the provider and how rows are shaped
use fiscal_search_api::csv_provider::DataProvider;
use fiscal_search_api::errors::AppError;
use fiscal_search_api::models::{RawRecord, Record, SearchRequest};
use fiscal_search_api::query_normalizer::Filters;
use fiscal_search_api::search_service::SearchService;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Provider that returns canned rows and remembers the last call.
struct RecordingProvider {
    records: Vec<RawRecord>,
    last_call: Mutex<Option<(Filters, Option<usize>)>>,
}

impl RecordingProvider {
    fn new(rows: &[&[(&str, &str)]]) -> Arc<Self> {
        let records = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                    .collect()
            })
            .collect();
        Arc::new(Self {
            records,
            last_call: Mutex::new(None),
        })
    }

    fn last_call(&self) -> (Filters, Option<usize>) {
        self.last_call
            .lock()
            .unwrap()
            .clone()
            .expect("provider was not called")
    }
}

impl DataProvider for RecordingProvider {
    fn find_rows(
        &self,
        filters: &Filters,
        limit: Option<usize>,
    ) -> Result<Vec<RawRecord>, AppError> {
        *self.last_call.lock().unwrap() = Some((filters.clone(), limit));
        Ok(self.records.clone())
    }
}

/// Provider that always fails with the given error.
struct FailingProvider(AppError);

impl DataProvider for FailingProvider {
    fn find_rows(&self, _: &Filters, _: Option<usize>) -> Result<Vec<RawRecord>, AppError> {
        Err(self.0.clone())
    }
}

fn filters(pairs: &[(&str, &str)]) -> Filters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

#[test]
fn test_search_service_returns_records() {
    let provider = RecordingProvider::new(&[
        &[("UF", "SP"), ("CNPJ", "123"), ("TICO_CODIGO", "3")],
        &[("UF", "SP"), ("CNPJ", "456"), ("TICO_CODIGO", "3")],
    ]);
    let service = SearchService::new(provider.clone());

    let records = service
        .search_records(&SearchRequest::new().with_field("UF", "SP").with_quantity(2))
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].cnpj.as_deref(), Some("456"));
    assert_eq!(records[1].cep, None);
    assert_eq!(provider.last_call(), (filters(&[("UF", "SP")]), Some(2)));
}

#[test]
fn test_search_service_respects_contribuinte_mapping() {
    let provider = RecordingProvider::new(&[&[("UF", "RJ"), ("TICO_CODIGO", "6")]]);
    let service = SearchService::new(provider.clone());

    let records = service
        .search_records(
            &SearchRequest::new()
                .with_field("UF", "RJ")
                .with_contribuinte(false),
        )
        .unwrap();

    assert_eq!(records[0].uf.as_deref(), Some("RJ"));
    assert_eq!(
        provider.last_call(),
        (filters(&[("UF", "RJ"), ("TICO_CODIGO", "6")]), None)
    );
}

#[test]
fn test_search_service_ignores_placeholder_values() {
    let provider = RecordingProvider::new(&[&[("UF", "SP"), ("TICO_CODIGO", "3")]]);
    let service = SearchService::new(provider.clone());

    let with_placeholders = service
        .search_records(
            &SearchRequest::new()
                .with_field("UF", "string")
                .with_field("CNPJ", "   ")
                .with_field("TICO_CODIGO", "String")
                .with_contribuinte(true),
        )
        .unwrap();
    let call_with_placeholders = provider.last_call();

    let without_placeholders = service
        .search_records(&SearchRequest::new().with_contribuinte(true))
        .unwrap();
    let call_without_placeholders = provider.last_call();

    assert_eq!(
        call_with_placeholders,
        (filters(&[("TICO_CODIGO", "3")]), None)
    );
    assert_eq!(call_with_placeholders, call_without_placeholders);
    assert_eq!(with_placeholders, without_placeholders);
}

#[test]
fn test_record_shaping_keeps_declared_fields_only() {
    let provider = RecordingProvider::new(&[&[("UF", "MG"), ("OUTRA_COLUNA", "x")]]);
    let service = SearchService::new(provider);

    let records = service.search_records(&SearchRequest::new()).unwrap();

    assert_eq!(
        records,
        vec![Record {
            uf: Some("MG".to_string()),
            ..Default::default()
        }]
    );
}

#[test]
fn test_provider_errors_propagate() {
    let service = SearchService::new(Arc::new(FailingProvider(AppError::UnknownColumn(
        "X".to_string(),
    ))));
    assert_eq!(
        service.search_records(&SearchRequest::new()),
        Err(AppError::UnknownColumn("X".to_string()))
    );

    let service = SearchService::new(Arc::new(FailingProvider(
        AppError::DataSourceNotFound("gone".to_string()),
    )));
    assert!(matches!(
        service.search_records(&SearchRequest::new()),
        Err(AppError::DataSourceNotFound(_))
    ));
}
