use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The backing dataset is missing or unreadable.
    DataSourceNotFound(String),
    /// The dataset exists but could not be parsed as CSV.
    MalformedDataSource(String),
    /// A filter key that is not a column of the dataset.
    UnknownColumn(String),
    /// Export requested in a format other than csv or xlsx.
    UnsupportedFormat(String),
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DataSourceNotFound(msg) => write!(f, "Data source not found: {}", msg),
            AppError::MalformedDataSource(msg) => write!(f, "Malformed data source: {}", msg),
            AppError::UnknownColumn(column) => write!(f, "Unknown column: {}", column),
            AppError::UnsupportedFormat(format) => {
                write!(f, "Unsupported export format: {}", format)
            }
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Unknown columns and unsupported formats are the caller's fault (400).
    /// A missing or unparsable dataset is an infrastructure fault (500).
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::DataSourceNotFound(msg) => {
                tracing::error!("Data source not found: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::MalformedDataSource(msg) => {
                tracing::error!("Malformed data source: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read data source".to_string(),
                )
            }
            AppError::UnknownColumn(_) | AppError::UnsupportedFormat(_) => {
                tracing::warn!("Rejected request: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::DataSourceNotFound(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::MalformedDataSource(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::InternalError(format!("Failed to build spreadsheet: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_unknown_column_is_client_fault() {
        let response = AppError::UnknownColumn("FOO".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unsupported_format_is_client_fault() {
        let err = AppError::UnsupportedFormat("pdf".to_string());
        assert_eq!(err.to_string(), "Unsupported export format: pdf");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_data_source_is_server_fault() {
        let err = AppError::DataSourceNotFound("CSV not found: data/base.csv".to_string());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_io_error_maps_to_data_source_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            AppError::from(io),
            AppError::DataSourceNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_malformed_data_source_hides_parse_details() {
        let response =
            AppError::MalformedDataSource("CSV parse error: invalid utf-8".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "Failed to read data source"}));
    }

    #[test]
    fn test_csv_error_maps_to_malformed_data_source() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"S\xffP,1\n"[..]);
        let err = reader.records().next().unwrap().unwrap_err();
        assert!(matches!(
            AppError::from(err),
            AppError::MalformedDataSource(_)
        ));
    }
}
