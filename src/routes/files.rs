use crate::{
    auth::AuthUser,
    config::Config,
    db::Db,
    errors::ApiError,
    file_service::{self, UploadedFile},
};
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt as _;

#[derive(serde::Serialize)]
pub struct UploadResp {
    pub file_id: String,
}

#[derive(serde::Serialize)]
pub struct UploadManyResp {
    pub file_ids: Vec<String>,
}

/// Drain the multipart stream into memory, one entry per file part. Form
/// fields without a filename are ignored.
async fn read_multipart_files(
    cfg: &Config,
    payload: &mut Multipart,
) -> Result<Vec<UploadedFile>, ApiError> {
    let mut files = Vec::new();
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart".into()))?
    {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|s| s.to_string()));
        let Some(filename) = filename else { continue };

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|_| ApiError::BadRequest("upload read error".into()))?
        {
            data.extend_from_slice(&chunk);
            if data.len() > cfg.max_upload_size {
                return Err(ApiError::BadRequest("file too large".into()));
            }
        }
        files.push(UploadedFile { filename, data });
    }
    Ok(files)
}

pub async fn upload_file(
    cfg: web::Data<Config>,
    db: web::Data<Db>,
    user: AuthUser,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let files = read_multipart_files(&cfg, &mut payload).await?;
    let file = files
        .first()
        .ok_or_else(|| ApiError::BadRequest("no file part".into()))?;
    let file_id = file_service::store_file(&db, file, &user.email).await?;
    Ok(HttpResponse::Created().json(UploadResp { file_id }))
}

pub async fn upload_multiple(
    cfg: web::Data<Config>,
    db: web::Data<Db>,
    user: AuthUser,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let files = read_multipart_files(&cfg, &mut payload).await?;
    let file_ids = file_service::store_many(&db, &files, &user.email).await?;
    Ok(HttpResponse::Created().json(UploadManyResp { file_ids }))
}

pub async fn list_files(db: web::Data<Db>, user: AuthUser) -> Result<HttpResponse, ApiError> {
    let entries = file_service::list_files(&db, &user.email).await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub async fn download_file(
    db: web::Data<Db>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let file_id = path.into_inner();
    let stored = file_service::fetch_file(&db, &file_id, &user.email).await?;

    let filename = format!("{}{}", stored.name, stored.extension);
    let mut resp = HttpResponse::Ok();
    resp.insert_header(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(filename)],
    });
    resp.content_type(
        stored
            .mime_type
            .as_deref()
            .unwrap_or("application/octet-stream"),
    );
    Ok(resp.body(stored.data))
}

pub async fn delete_file(
    db: web::Data<Db>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let file_id = path.into_inner();
    file_service::delete_file(&db, &file_id, &user.email).await?;
    Ok(HttpResponse::Ok().finish())
}
