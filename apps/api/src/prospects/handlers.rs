//! Axum route handlers for the Prospects API.

use axum::{extract::Multipart, Json};
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::prospects::importer::{decode_upload, import_csv};
use crate::prospects::models::{ImportError, ImportReport, ProspectRecord};
use crate::prospects::sample_data::generate_sample_prospects;

/// Accepted records returned by a validate-csv preview.
const PREVIEW_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Serialize)]
pub struct UploadCsvResponse {
    pub success: bool,
    pub total: usize,
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCsvResponse {
    pub success: bool,
    pub total: usize,
    pub importable: usize,
    pub errors: Vec<ImportError>,
    pub sample_prospects: Vec<ProspectRecord>,
}

#[derive(Debug, Serialize)]
pub struct SampleDataResponse {
    pub success: bool,
    pub count: usize,
    pub prospects: Vec<ProspectRecord>,
}

/// POST /api/v1/prospects/upload-csv
pub async fn handle_upload_csv(
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<UploadCsvResponse>, AppError> {
    let report = read_and_import(&user, multipart).await?;
    Ok(Json(UploadCsvResponse {
        success: true,
        total: report.total,
        imported: report.imported,
        errors: report.errors,
    }))
}

/// POST /api/v1/prospects/validate-csv
///
/// Same parsing as upload-csv, but returns a small sample of the accepted
/// records so the client can preview before committing.
pub async fn handle_validate_csv(
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ValidateCsvResponse>, AppError> {
    let mut report = read_and_import(&user, multipart).await?;
    report.prospects.truncate(PREVIEW_SAMPLE_SIZE);
    Ok(Json(ValidateCsvResponse {
        success: true,
        total: report.total,
        importable: report.imported,
        errors: report.errors,
        sample_prospects: report.prospects,
    }))
}

/// POST /api/v1/prospects/generate-sample-data
pub async fn handle_generate_sample_data(user: AuthUser) -> Json<SampleDataResponse> {
    let mut rng = StdRng::from_entropy();
    let prospects =
        generate_sample_prospects(&mut rng, &user.user_id, chrono::Utc::now().timestamp_millis());
    info!(
        "Generated {} sample prospects for user {}",
        prospects.len(),
        user.user_id
    );
    Json(SampleDataResponse {
        success: true,
        count: prospects.len(),
        prospects,
    })
}

async fn read_and_import(user: &AuthUser, multipart: Multipart) -> Result<ImportReport, AppError> {
    let (filename, bytes) = read_file_field(multipart).await?;
    let content = decode_upload(&filename, &bytes)?;
    let report = import_csv(content, &user.user_id, chrono::Utc::now().timestamp_millis())?;
    Ok(report)
}

/// Pulls the `file` field out of a multipart body.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        return Ok((filename, bytes));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}
