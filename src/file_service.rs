use crate::db::Db;
use crate::errors::ApiError;
use crate::models::file::{FileEntry, StoredFile};
use crate::models::user::User;
use sanitize_filename::sanitize;
use sqlx::Row;

/// One uploaded file, already read off the wire.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Split a filename into (base name, extension). The extension starts at the
/// last dot and keeps it, matching how the records are stored; a dotless name
/// (or a bare leading-dot name like ".profile") has an empty extension.
pub fn split_filename(filename: &str) -> (String, String) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => (filename[..idx].to_string(), filename[idx..].to_string()),
        _ => (filename.to_string(), String::new()),
    }
}

async fn resolve_owner(db: &Db, owner_email: &str) -> Result<User, ApiError> {
    if owner_email.is_empty() {
        return Err(ApiError::BadRequest("owner email is required".into()));
    }
    sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(owner_email)
    .fetch_optional(&db.0)
    .await?
    .ok_or_else(|| ApiError::BadRequest("unknown user".into()))
}

/// Persist a single upload for the given owner. Returns the new record id.
pub async fn store_file(db: &Db, file: &UploadedFile, owner_email: &str) -> Result<String, ApiError> {
    let owner = resolve_owner(db, owner_email).await?;
    let (name, extension) = split_filename(&sanitize(&file.filename));

    let existing = sqlx::query(
        "SELECT 1 FROM files WHERE user_id = ? AND name = ? AND extension = ?",
    )
    .bind(&owner.id)
    .bind(&name)
    .bind(&extension)
    .fetch_optional(&db.0)
    .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "file with this name and extension already exists".into(),
        ));
    }

    if file.data.is_empty() {
        return Err(ApiError::BadRequest("file is empty".into()));
    }

    let mime = infer::get(&file.data).map(|t| t.mime_type().to_string());
    let id = uuid::Uuid::new_v4().to_string();
    let res = sqlx::query(
        "INSERT INTO files(id, user_id, name, extension, mime_type, size_bytes, data, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&owner.id)
    .bind(&name)
    .bind(&extension)
    .bind(&mime)
    .bind(file.data.len() as i64)
    .bind(&file.data)
    .bind(chrono::Utc::now())
    .execute(&db.0)
    .await;

    // The unique index catches a concurrent duplicate that slipped past the
    // read above.
    if let Err(e) = res {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.message().contains("UNIQUE") {
                return Err(ApiError::Conflict(
                    "file with this name and extension already exists".into(),
                ));
            }
        }
        return Err(e.into());
    }

    Ok(id)
}

/// Persist a batch of uploads. Zero-length files are skipped; the first
/// conflict or validation error ends the batch. A batch that stores nothing is
/// a caller error, not a success.
pub async fn store_many(
    db: &Db,
    files: &[UploadedFile],
    owner_email: &str,
) -> Result<Vec<String>, ApiError> {
    if owner_email.is_empty() {
        return Err(ApiError::BadRequest("owner email is required".into()));
    }
    if files.is_empty() {
        return Err(ApiError::BadRequest("no files were uploaded".into()));
    }

    let mut stored = Vec::new();
    for file in files {
        if file.data.is_empty() {
            continue;
        }
        stored.push(store_file(db, file, owner_email).await?);
    }
    if stored.is_empty() {
        return Err(ApiError::BadRequest("all uploaded files were empty".into()));
    }
    Ok(stored)
}

/// All records belonging to the owner, payload excluded.
pub async fn list_files(db: &Db, owner_email: &str) -> Result<Vec<FileEntry>, ApiError> {
    let owner = resolve_owner(db, owner_email).await?;
    let entries = sqlx::query_as::<_, FileEntry>(
        "SELECT id, name, extension FROM files WHERE user_id = ? ORDER BY created_at ASC",
    )
    .bind(&owner.id)
    .fetch_all(&db.0)
    .await?;
    Ok(entries)
}

/// Fetch a record with its payload for download. Same ownership rules as
/// delete: unknown ids are a caller error, foreign files a conflict.
pub async fn fetch_file(db: &Db, file_id: &str, owner_email: &str) -> Result<StoredFile, ApiError> {
    let owner = resolve_owner(db, owner_email).await?;
    let row = sqlx::query_as::<_, StoredFile>(
        "SELECT name, extension, mime_type, data FROM files WHERE id = ? AND user_id = ?",
    )
    .bind(file_id)
    .bind(&owner.id)
    .fetch_optional(&db.0)
    .await?;
    match row {
        Some(f) => Ok(f),
        None => {
            owned_by_other(db, file_id).await?;
            Err(ApiError::BadRequest("file not found".into()))
        }
    }
}

/// Remove a record, owner only.
pub async fn delete_file(db: &Db, file_id: &str, owner_email: &str) -> Result<(), ApiError> {
    let owner = resolve_owner(db, owner_email).await?;
    let row = sqlx::query("SELECT user_id FROM files WHERE id = ?")
        .bind(file_id)
        .fetch_optional(&db.0)
        .await?;
    let row = row.ok_or_else(|| ApiError::BadRequest("file not found".into()))?;
    let file_owner: String = row.get("user_id");
    if file_owner != owner.id {
        return Err(ApiError::Conflict("cannot delete files of other users".into()));
    }

    sqlx::query("DELETE FROM files WHERE id = ?")
        .bind(file_id)
        .execute(&db.0)
        .await?;
    Ok(())
}

async fn owned_by_other(db: &Db, file_id: &str) -> Result<(), ApiError> {
    let row = sqlx::query("SELECT 1 FROM files WHERE id = ?")
        .bind(file_id)
        .fetch_optional(&db.0)
        .await?;
    if row.is_some() {
        return Err(ApiError::Conflict("cannot access files of other users".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::split_filename;

    #[test]
    fn splits_on_last_dot() {
        assert_eq!(split_filename("report.pdf"), ("report".into(), ".pdf".into()));
        assert_eq!(
            split_filename("archive.tar.gz"),
            ("archive.tar".into(), ".gz".into())
        );
    }

    #[test]
    fn dotless_names_have_empty_extension() {
        assert_eq!(split_filename("README"), ("README".into(), String::new()));
        assert_eq!(split_filename(".profile"), (".profile".into(), String::new()));
    }
}
