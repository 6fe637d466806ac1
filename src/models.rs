use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============ Dataset Rows ============

/// Record fields in their canonical (export) order.
pub const RECORD_FIELDS: [&str; 10] = [
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

/// A dataset row as returned by a data provider: column name to cell value.
///
/// `None` marks a cell that was deliberately blanked (see
/// [`crate::csv_provider::NULLABLE_FIELDS`]); every other cell is kept verbatim,
/// including empty strings.
pub type RawRecord = BTreeMap<String, Option<String>>;

/// A registration record exposed by the API.
///
/// Every field is a string or absent, never numeric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// State code.
    #[serde(rename = "UF", default)]
    pub uf: Option<String>,
    /// Taxpayer ID (company).
    #[serde(rename = "CNPJ", default)]
    pub cnpj: Option<String>,
    /// Postal code.
    #[serde(rename = "CEP", default)]
    pub cep: Option<String>,
    /// State registration.
    #[serde(rename = "IE", default)]
    pub ie: Option<String>,
    #[serde(rename = "FLAGS", default)]
    pub flags: Option<String>,
    #[serde(rename = "IND_ORGAO_GOVERNAMENTAL", default)]
    pub ind_orgao_governamental: Option<String>,
    /// Legal-nature code.
    #[serde(rename = "COD_NATUREZA_JURIDICA", default)]
    pub cod_natureza_juridica: Option<String>,
    /// Registration status code, compared ignoring leading zeros.
    #[serde(rename = "TICO_CODIGO", default)]
    pub tico_codigo: Option<String>,
    #[serde(rename = "ENTE_FEDERATIVO", default)]
    pub ente_federativo: Option<String>,
    #[serde(rename = "INSCR_SUFRAMA", default)]
    pub inscr_suframa: Option<String>,
}

impl Record {
    /// Shapes a raw provider row into a record.
    ///
    /// Declared fields missing from the row become `None`; extra columns are dropped.
    pub fn from_raw(raw: &RawRecord) -> Self {
        let take = |name: &str| raw.get(name).cloned().flatten();
        Self {
            uf: take("UF"),
            cnpj: take("CNPJ"),
            cep: take("CEP"),
            ie: take("IE"),
            flags: take("FLAGS"),
            ind_orgao_governamental: take("IND_ORGAO_GOVERNAMENTAL"),
            cod_natureza_juridica: take("COD_NATUREZA_JURIDICA"),
            tico_codigo: take("TICO_CODIGO"),
            ente_federativo: take("ENTE_FEDERATIVO"),
            inscr_suframa: take("INSCR_SUFRAMA"),
        }
    }

    /// Looks up a field by its column name.
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "UF" => &self.uf,
            "CNPJ" => &self.cnpj,
            "CEP" => &self.cep,
            "IE" => &self.ie,
            "FLAGS" => &self.flags,
            "IND_ORGAO_GOVERNAMENTAL" => &self.ind_orgao_governamental,
            "COD_NATUREZA_JURIDICA" => &self.cod_natureza_juridica,
            "TICO_CODIGO" => &self.tico_codigo,
            "ENTE_FEDERATIVO" => &self.ente_federativo,
            "INSCR_SUFRAMA" => &self.inscr_suframa,
            _ => return None,
        };
        value.as_deref()
    }
}

// ============ API Request/Response Models ============

/// Search form payload.
///
/// Any field name is accepted; only the known record fields end up as filters.
/// `Contribuinte` and `Quantity` are reserved and never used as filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Taxpayer flag; derives `TICO_CODIGO` when no usable code is supplied.
    #[serde(
        rename = "Contribuinte",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contribuinte: Option<bool>,
    /// Maximum number of rows to return.
    #[serde(rename = "Quantity", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// Every other field the caller set, verbatim.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_contribuinte(mut self, contribuinte: bool) -> Self {
        self.contribuinte = Some(contribuinte);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: usize,
    pub results: Vec<Record>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub data: Vec<Record>,
    /// `csv` or `xlsx`; anything else is rejected by the export service.
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

/// Encoded export payload ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub content: Vec<u8>,
    pub media_type: &'static str,
    pub filename: &'static str,
}

/// Field names the search form may send, with their value types.
pub const SCHEMA_FIELDS: [(&str, &str); 12] = [
    ("UF", "string"),
    ("CNPJ", "string"),
    ("CEP", "string"),
    ("IE", "string"),
    ("FLAGS", "string"),
    ("IND_ORGAO_GOVERNAMENTAL", "string"),
    ("COD_NATUREZA_JURIDICA", "string"),
    ("TICO_CODIGO", "string"),
    ("ENTE_FEDERATIVO", "string"),
    ("INSCR_SUFRAMA", "string"),
    ("Contribuinte", "boolean"),
    ("Quantity", "int"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub fields: BTreeMap<String, String>,
}

impl Default for SchemaResponse {
    fn default() -> Self {
        Self {
            fields: SCHEMA_FIELDS
                .iter()
                .map(|(name, kind)| (name.to_string(), kind.to_string()))
                .collect(),
        }
    }
}
