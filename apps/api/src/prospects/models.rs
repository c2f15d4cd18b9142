use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectStatus {
    #[default]
    New,
    Contacted,
    Responded,
    Qualified,
}

impl ProspectStatus {
    pub const ALL: [ProspectStatus; 4] = [
        ProspectStatus::New,
        ProspectStatus::Contacted,
        ProspectStatus::Responded,
        ProspectStatus::Qualified,
    ];
}

/// A fully validated prospect. Rows that fail validation never become one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectRecord {
    pub id: Uuid,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, alias = "linkedin", skip_serializing_if = "Option::is_none")]
    pub linked_in_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ProspectStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Why a CSV row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorReason {
    MissingRequiredField,
    InvalidEmailFormat,
    Other,
}

/// One rejected row. `row` is 1-based with the header counted, so the first
/// data row is row 2.
#[derive(Debug, Clone, Serialize)]
pub struct ImportError {
    pub row: usize,
    pub reason: RowErrorReason,
    pub error: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
    pub errors: Vec<ImportError>,
    pub prospects: Vec<ProspectRecord>,
}
