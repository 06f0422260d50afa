use axum::extract::{FromRequest, Multipart, Request, multipart::MultipartError};
use axum::http::StatusCode;

use crate::controllers::media::MediaUpload;
use crate::error::AppError;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// The `file` part of a multipart body, read fully into memory. Other parts
/// are ignored.
pub struct UploadedFile(pub MediaUpload);

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File exceeds the upload size limit".into())
    } else {
        AppError::Validation(format!("Multipart error: {}", e.body_text()))
    }
}

impl<S> FromRequest<S> for UploadedFile
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::Validation("Please choose a file".into()))?;
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;

            if file_name.trim().is_empty() && data.is_empty() {
                return Err(AppError::Validation("Please choose a file".into()));
            }

            return Ok(UploadedFile(MediaUpload {
                file_name,
                content_type,
                data: data.to_vec(),
            }));
        }

        Err(AppError::Validation("Please choose a file".into()))
    }
}
