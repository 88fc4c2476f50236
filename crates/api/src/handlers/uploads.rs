//! Product image uploads.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crave_core::naming::{file_extension, upload_file_name};

use crate::error::{AppError, AppResult};
use crate::middleware::admin::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::UploadedImage;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Public prefix under which `UPLOAD_DIR` is served.
const UPLOAD_URL_PREFIX: &str = "/static/uploads";

/// POST /admin/uploads
///
/// Accepts a multipart form with a required `file` field. The stored name
/// is `<unix-ts>_<sanitized original name>`; the returned URL is what a
/// product's `image_url` should be set to.
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedImage>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let ext = file_extension(&filename).unwrap_or_default();
    if !SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image format '.{ext}'. Supported: .jpg, .jpeg, .png, .webp, .gif"
        )));
    }

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let stored = upload_file_name(chrono::Utc::now().timestamp(), &filename);
    tokio::fs::write(upload_dir.join(&stored), &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(file = %stored, size_bytes = data.len(), "Image uploaded");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadedImage {
                url: format!("{UPLOAD_URL_PREFIX}/{stored}"),
                size_bytes: data.len(),
            },
        }),
    ))
}
