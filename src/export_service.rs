use crate::errors::AppError;
use crate::models::{ExportRequest, ExportedFile, Record, RECORD_FIELDS};
use rust_xlsxwriter::{Format, Workbook};
use std::str::FromStr;

pub const CSV_MEDIA_TYPE: &str = "text/csv";
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Field separator used in CSV exports.
const CSV_DELIMITER: u8 = b'|';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Encodes records as downloadable files.
///
/// Columns always follow [`RECORD_FIELDS`], and absent values are written as
/// empty cells.
#[derive(Debug, Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Exports the request's records in the requested format.
    ///
    /// # Errors
    ///
    /// * `AppError::UnsupportedFormat` - format is neither `csv` nor `xlsx`.
    /// * `AppError::InternalError` - encoding failed.
    pub fn export_records(&self, request: &ExportRequest) -> Result<ExportedFile, AppError> {
        let format: ExportFormat = request.format.parse()?;

        tracing::info!(
            "Exporting {} record(s) as {:?}",
            request.data.len(),
            format
        );

        match format {
            ExportFormat::Csv => Ok(ExportedFile {
                content: self.to_csv(&request.data)?,
                media_type: CSV_MEDIA_TYPE,
                filename: "export.csv",
            }),
            ExportFormat::Xlsx => Ok(ExportedFile {
                content: self.to_xlsx(&request.data)?,
                media_type: XLSX_MEDIA_TYPE,
                filename: "export.xlsx",
            }),
        }
    }

    fn to_csv(&self, records: &[Record]) -> Result<Vec<u8>, AppError> {
        let csv_error = |e: csv::Error| AppError::InternalError(format!("CSV export failed: {}", e));

        let mut writer = csv::WriterBuilder::new()
            .delimiter(CSV_DELIMITER)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(RECORD_FIELDS).map_err(csv_error)?;
        for record in records {
            writer
                .write_record(RECORD_FIELDS.iter().map(|field| record.get(field).unwrap_or("")))
                .map_err(csv_error)?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::InternalError(format!("CSV export failed: {}", e.error())))
    }

    fn to_xlsx(&self, records: &[Record]) -> Result<Vec<u8>, AppError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();

        for (col, field) in (0u16..).zip(RECORD_FIELDS) {
            worksheet.write_string_with_format(0, col, field, &header_format)?;
        }

        for (row, record) in (1u32..).zip(records) {
            for (col, field) in (0u16..).zip(RECORD_FIELDS) {
                match record.get(field) {
                    Some(value) if !value.is_empty() => {
                        worksheet.write_string(row, col, value)?;
                    }
                    _ => {}
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<Record> {
        vec![
            Record {
                uf: Some("SP".to_string()),
                cnpj: Some("123".to_string()),
                tico_codigo: Some("3".to_string()),
                ..Default::default()
            },
            Record {
                uf: Some("RJ".to_string()),
                cnpj: Some("456".to_string()),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_csv_export_uses_fixed_columns_and_pipe_delimiter() {
        let request = ExportRequest {
            data: sample_records(),
            format: "csv".to_string(),
        };

        let file = ExportService::new().export_records(&request).unwrap();
        let text = String::from_utf8(file.content).unwrap();

        assert_eq!(file.media_type, CSV_MEDIA_TYPE);
        assert_eq!(file.filename, "export.csv");
        assert_eq!(
            text,
            "UF|CNPJ|CEP|IE|FLAGS|IND_ORGAO_GOVERNAMENTAL|COD_NATUREZA_JURIDICA|TICO_CODIGO|ENTE_FEDERATIVO|INSCR_SUFRAMA\n\
             SP|123||||||3||\n\
             RJ|456||||||||\n"
        );
    }

    #[test]
    fn test_absent_values_are_empty_not_null_markers() {
        let request = ExportRequest {
            data: vec![Record::default()],
            format: "csv".to_string(),
        };

        let file = ExportService::new().export_records(&request).unwrap();
        let text = String::from_utf8(file.content).unwrap();

        assert!(!text.contains("None"));
        assert!(!text.to_lowercase().contains("null"));
        assert!(!text.contains("NaN"));
        assert_eq!(text.lines().nth(1), Some("|||||||||"));
    }

    #[test]
    fn test_xlsx_export_produces_workbook() {
        let request = ExportRequest {
            data: sample_records(),
            format: "xlsx".to_string(),
        };

        let file = ExportService::new().export_records(&request).unwrap();

        assert_eq!(file.media_type, XLSX_MEDIA_TYPE);
        assert_eq!(file.filename, "export.xlsx");
        // xlsx is a zip container
        assert!(file.content.starts_with(b"PK"));
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let request = ExportRequest {
            data: sample_records(),
            format: "pdf".to_string(),
        };

        let result = ExportService::new().export_records(&request);
        assert_eq!(result, Err(AppError::UnsupportedFormat("pdf".to_string())));
    }

    #[test]
    fn test_format_is_case_sensitive() {
        assert!("CSV".parse::<ExportFormat>().is_err());
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
    }
}
