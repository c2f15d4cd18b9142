// Prospect ingestion: CSV column mapping, row validation, import reports,
// and synthetic sample data.

pub mod column_map;
pub mod handlers;
pub mod importer;
pub mod models;
pub mod sample_data;
