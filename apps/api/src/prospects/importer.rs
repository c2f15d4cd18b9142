//! CSV import: decodes an upload, maps its columns, validates each row, and
//! builds the import report.
//!
//! File-level problems (wrong extension, bad encoding, unreadable header,
//! unmapped required columns) abort the import. Row-level problems are
//! collected as `ImportError`s and never stop the batch.

use std::sync::LazyLock;

use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::prospects::column_map::{map_columns, ColumnMapping, MissingColumns, ProspectField};
use crate::prospects::models::{
    ImportError, ImportReport, ProspectRecord, ProspectStatus, RowErrorReason,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.+-]+@[\w-]+\.[\w.-]+$").expect("valid email regex"));

/// Errors that reject the whole upload.
#[derive(Debug, Error)]
pub enum ImportFailure {
    #[error("Only CSV files are allowed")]
    NotCsv,

    #[error("File must be UTF-8 encoded text")]
    NotUtf8,

    #[error("Could not read CSV header: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

impl From<MissingColumns> for ImportFailure {
    fn from(err: MissingColumns) -> Self {
        ImportFailure::MissingColumns(err.missing.iter().map(|c| c.to_string()).collect())
    }
}

/// A row that could not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowRejection {
    reason: RowErrorReason,
    message: String,
}

impl RowRejection {
    fn new(reason: RowErrorReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks the upload's file name and decodes it as UTF-8, dropping a leading BOM.
pub fn decode_upload<'a>(filename: &str, bytes: &'a [u8]) -> Result<&'a str, ImportFailure> {
    if !filename.ends_with(".csv") {
        return Err(ImportFailure::NotCsv);
    }
    let text = std::str::from_utf8(bytes).map_err(|_| ImportFailure::NotUtf8)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Parses `content` and returns every accepted record plus every row error.
pub fn import_csv(content: &str, owner_id: &str, now_ms: i64) -> Result<ImportReport, ImportFailure> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mapping = map_columns(&headers)?;
    debug!("CSV columns resolved: {:?}", mapping.resolved_headers(&headers));

    let mut total = 0;
    let mut errors = Vec::new();
    let mut prospects = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        total += 1;
        // +2: 1-based, and the header occupies row 1
        let row = idx + 2;

        let outcome = match &result {
            Ok(record) => check_width(record, headers.len())
                .and_then(|()| build_record(record, &mapping, owner_id, now_ms)),
            Err(e) => Err(RowRejection::new(RowErrorReason::Other, e.to_string())),
        };

        match outcome {
            Ok(prospect) => prospects.push(prospect),
            Err(rejection) => {
                debug!("Row {row} rejected: {}", rejection.message);
                let data = result
                    .as_ref()
                    .map(|record| row_data(&headers, record))
                    .unwrap_or_default();
                errors.push(ImportError {
                    row,
                    reason: rejection.reason,
                    error: rejection.message,
                    data,
                });
            }
        }
    }

    info!(
        "CSV import for user {owner_id}: total={total}, imported={}, errors={}",
        prospects.len(),
        errors.len()
    );

    Ok(ImportReport {
        total,
        imported: prospects.len(),
        errors,
        prospects,
    })
}

fn check_width(record: &StringRecord, header_len: usize) -> Result<(), RowRejection> {
    if record.len() > header_len {
        return Err(RowRejection::new(
            RowErrorReason::Other,
            format!(
                "Expected at most {header_len} fields, found {}",
                record.len()
            ),
        ));
    }
    Ok(())
}

/// Non-blank cell for `field`, if the column was mapped and the row reaches it.
/// Whitespace-only cells count as missing.
fn cell<'r>(record: &'r StringRecord, mapping: &ColumnMapping, field: ProspectField) -> Option<&'r str> {
    mapping
        .index_of(field)
        .and_then(|idx| record.get(idx))
        .filter(|value| !value.trim().is_empty())
}

fn build_record(
    record: &StringRecord,
    mapping: &ColumnMapping,
    owner_id: &str,
    now_ms: i64,
) -> Result<ProspectRecord, RowRejection> {
    let [first_name, last_name, email, company, position] =
        match ProspectField::REQUIRED.map(|field| cell(record, mapping, field)) {
            [Some(first), Some(last), Some(email), Some(company), Some(position)] => {
                [first, last, email, company, position]
            }
            _ => {
                return Err(RowRejection::new(
                    RowErrorReason::MissingRequiredField,
                    "Missing required fields",
                ))
            }
        };

    if !is_valid_email(email) {
        return Err(RowRejection::new(
            RowErrorReason::InvalidEmailFormat,
            "Invalid email format",
        ));
    }

    let optional = |field| cell(record, mapping, field).map(String::from);

    Ok(ProspectRecord {
        id: Uuid::new_v4(),
        user_id: owner_id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        company: company.to_string(),
        position: position.to_string(),
        location: optional(ProspectField::Location),
        linked_in_url: optional(ProspectField::LinkedInUrl),
        notes: optional(ProspectField::Notes),
        tags: cell(record, mapping, ProspectField::Tags)
            .map(parse_tags)
            .unwrap_or_default(),
        status: ProspectStatus::New,
        created_at: now_ms,
        updated_at: now_ms,
    })
}

/// Splits a comma-separated tag cell. Blank and repeated tags are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Raw row keyed by original header, for diagnostics. Cells past the end of a
/// short row are `null`.
fn row_data(headers: &[String], record: &StringRecord) -> Map<String, Value> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let value = record
                .get(idx)
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null);
            (header.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_718_000_000_000;
    const HEADER: &str = "firstName,lastName,email,company,position";

    fn import(content: &str) -> ImportReport {
        import_csv(content, "user-1", NOW).unwrap()
    }

    #[test]
    fn test_valid_rows_become_records() {
        let csv = format!(
            "{HEADER}\nJane,Doe,jane@acme.com,Acme,CTO\nJohn,Roe,john.roe@globex.io,Globex,VP Sales\n"
        );
        let report = import(&csv);
        assert_eq!(report.total, 2);
        assert_eq!(report.imported, 2);
        assert!(report.errors.is_empty());

        let jane = &report.prospects[0];
        assert_eq!(jane.first_name, "Jane");
        assert_eq!(jane.user_id, "user-1");
        assert_eq!(jane.status, ProspectStatus::New);
        assert_eq!(jane.created_at, NOW);
        assert_eq!(jane.created_at, jane.updated_at);
        assert!(jane.tags.is_empty());
        assert!(jane.location.is_none());
        assert_ne!(report.prospects[0].id, report.prospects[1].id);
    }

    #[test]
    fn test_invalid_email_rejected_but_counted() {
        let csv = format!("{HEADER}\nJane,Doe,not-an-email,Acme,CTO\nJohn,Roe,john@globex.io,Globex,VP\n");
        let report = import(&csv);
        assert_eq!(report.total, 2);
        assert_eq!(report.imported, 1);
        assert_eq!(report.errors.len(), 1);
        let err = &report.errors[0];
        assert_eq!(err.row, 2);
        assert_eq!(err.reason, RowErrorReason::InvalidEmailFormat);
        assert_eq!(err.error, "Invalid email format");
        assert_eq!(err.data["email"], "not-an-email");
        assert!(report.prospects.iter().all(|p| p.email != "not-an-email"));
    }

    #[test]
    fn test_missing_required_field_reported_with_header_offset() {
        let csv = format!(
            "{HEADER}\nJane,Doe,jane@acme.com,Acme,CTO\nJohn,,john@globex.io,Globex,VP\n"
        );
        let report = import(&csv);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 3);
        assert_eq!(report.errors[0].reason, RowErrorReason::MissingRequiredField);
        assert_eq!(report.errors[0].error, "Missing required fields");
    }

    #[test]
    fn test_missing_field_checked_before_email() {
        let csv = format!("{HEADER}\n,Doe,bad-email,Acme,CTO\n");
        let report = import(&csv);
        assert_eq!(report.errors[0].reason, RowErrorReason::MissingRequiredField);
    }

    #[test]
    fn test_whitespace_only_cell_counts_as_missing() {
        let csv = format!("{HEADER}\nJane,Doe,jane@acme.com,   ,CTO\n");
        let report = import(&csv);
        assert_eq!(report.imported, 0);
        assert_eq!(report.errors[0].reason, RowErrorReason::MissingRequiredField);
    }

    #[test]
    fn test_short_row_is_missing_fields_with_null_data() {
        let csv = format!("{HEADER}\nJane,Doe,jane@acme.com\n");
        let report = import(&csv);
        let err = &report.errors[0];
        assert_eq!(err.reason, RowErrorReason::MissingRequiredField);
        assert_eq!(err.data["company"], Value::Null);
        assert_eq!(err.data["firstName"], "Jane");
    }

    #[test]
    fn test_wide_row_is_other_error() {
        let csv = format!("{HEADER}\nJane,Doe,jane@acme.com,Acme,CTO,extra\n");
        let report = import(&csv);
        assert_eq!(report.total, 1);
        assert_eq!(report.errors[0].reason, RowErrorReason::Other);
        assert!(report.errors[0].error.contains("found 6"));
    }

    #[test]
    fn test_missing_columns_fail_fast() {
        let csv = "firstName,lastName,company\nJane,Doe,Acme\n";
        match import_csv(csv, "user-1", NOW) {
            Err(ImportFailure::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["email".to_string(), "position".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_synonym_headers_and_optional_fields() {
        let csv = "First Name,Last Name,Email Address,Company Name,Job Title,City,LinkedIn,Notes,Tags\n\
                   Jane,Doe,jane@acme.com,Acme,CTO,Boston,https://linkedin.com/in/jane,Met at expo,\" vip , saas,,vip \"\n";
        let report = import(csv);
        assert_eq!(report.imported, 1);
        let jane = &report.prospects[0];
        assert_eq!(jane.position, "CTO");
        assert_eq!(jane.location.as_deref(), Some("Boston"));
        assert_eq!(
            jane.linked_in_url.as_deref(),
            Some("https://linkedin.com/in/jane")
        );
        assert_eq!(jane.notes.as_deref(), Some("Met at expo"));
        assert_eq!(jane.tags, vec!["vip", "saas"]);
    }

    #[test]
    fn test_blank_optional_cell_left_absent() {
        let csv = format!("{HEADER},location\nJane,Doe,jane@acme.com,Acme,CTO,\n");
        let report = import(&csv);
        assert!(report.prospects[0].location.is_none());
    }

    #[test]
    fn test_required_values_copied_verbatim() {
        let csv = format!("{HEADER}\nJane ,Doe,jane@acme.com,Acme Inc.,Head of Ops\n");
        let report = import(&csv);
        assert_eq!(report.prospects[0].first_name, "Jane ");
    }

    #[test]
    fn test_header_only_file_is_empty_report() {
        let report = import(HEADER);
        assert_eq!(report.total, 0);
        assert_eq!(report.imported, 0);
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("jane.doe+sales@acme-corp.co.uk"));
        assert!(is_valid_email("j_d@x.io"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("jane@acme"));
        assert!(!is_valid_email("jane doe@acme.com"));
        assert!(!is_valid_email("@acme.com"));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags(" , "), Vec::<String>::new());
    }

    #[test]
    fn test_decode_upload_checks_extension() {
        assert!(matches!(
            decode_upload("prospects.xlsx", b"a,b"),
            Err(ImportFailure::NotCsv)
        ));
        assert!(matches!(
            decode_upload("prospects.csv", &[0xff, 0xfe, 0x00]),
            Err(ImportFailure::NotUtf8)
        ));
    }

    #[test]
    fn test_decode_upload_strips_bom() {
        let bytes = "\u{feff}firstName,lastName".as_bytes();
        assert_eq!(
            decode_upload("list.csv", bytes).unwrap(),
            "firstName,lastName"
        );
    }
}
