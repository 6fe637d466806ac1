//! Query normalization for the search form.
//!
//! Turns a loosely-typed [`SearchRequest`] into the canonical filter set the
//! data provider understands:
//! 1. Keep only known record fields that carry a real value
//! 2. Drop placeholder values the front-end sends as form defaults
//! 3. Derive `TICO_CODIGO` from `Contribuinte` when no code was given
//! 4. Clamp `Quantity` into a row limit of at least 1
//!
//! Normalization never fails: anything it does not understand is dropped.

use crate::models::SearchRequest;
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields that may be used as filters.
pub const ALLOWED_FILTER_FIELDS: [&str; 10] = [
    "UF",
    "CNPJ",
    "CEP",
    "IE",
    "FLAGS",
    "IND_ORGAO_GOVERNAMENTAL",
    "COD_NATUREZA_JURIDICA",
    "TICO_CODIGO",
    "ENTE_FEDERATIVO",
    "INSCR_SUFRAMA",
];

/// Values a client form sends only to fill a field; compared trimmed and lowercased.
pub const PLACEHOLDER_STRINGS: [&str; 5] = ["", "string", " ", "null", "none"];

/// Code filter derived for taxpayers.
pub const TICO_CONTRIBUINTE: &str = "3";
/// Code filter derived for non-taxpayers.
pub const TICO_NAO_CONTRIBUINTE: &str = "6";

/// Canonical filter map: allowed field name to a non-placeholder value.
pub type Filters = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    pub filters: Filters,
    /// Row limit, at least 1 when present.
    pub limit: Option<usize>,
}

/// Whether `value` is a form placeholder rather than a real filter value.
///
/// Only strings can be placeholders.
pub fn is_placeholder_value(value: &Value) -> bool {
    match value {
        Value::String(s) => {
            let normalized = s.trim().to_lowercase();
            PLACEHOLDER_STRINGS.contains(&normalized.as_str())
        }
        _ => false,
    }
}

pub fn normalize_search_query(request: &SearchRequest) -> NormalizedQuery {
    let mut filters: Filters = request
        .fields
        .iter()
        .filter(|(key, value)| {
            ALLOWED_FILTER_FIELDS.contains(&key.as_str())
                && !value.is_null()
                && !is_placeholder_value(value)
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    // An explicit, usable code always wins over the derived one
    if let Some(contribuinte) = request.contribuinte {
        filters.entry("TICO_CODIGO".to_string()).or_insert_with(|| {
            let derived = if contribuinte {
                TICO_CONTRIBUINTE
            } else {
                TICO_NAO_CONTRIBUINTE
            };
            Value::String(derived.to_string())
        });
    }

    let limit = request
        .quantity
        .map(|quantity| usize::try_from(quantity.max(1)).unwrap_or(usize::MAX));

    tracing::debug!(
        "Normalized search query: {} filter(s), limit {:?}",
        filters.len(),
        limit
    );

    NormalizedQuery { filters, limit }
}
