use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Listing projection of a stored file. The payload is deliberately excluded;
/// listings stay cheap no matter how large the blobs get.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub extension: String,
}

/// Full record as fetched for download.
#[derive(FromRow, Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub extension: String,
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}
