use axum::extract::Multipart;

use crate::{errors::AppError, models::page::UploadResponse, state::AppState, uploads::UploadKind};

/// Pulls the file field for `kind` out of the form and stores it. Nothing is
/// written when the upload is rejected.
pub async fn store_upload(
    state: &AppState,
    kind: UploadKind,
    mut multipart: Multipart,
) -> Result<UploadResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read uploaded file: {e}")))?;

        let stored_name = state.uploads.save(kind, &file_name, &bytes).await?;
        return Ok(UploadResponse {
            url: format!("/uploads/{}/{}", kind.dir_name(), stored_name),
            file_name: stored_name,
        });
    }

    Err(AppError::BadRequest(format!(
        "Missing file field '{}'",
        kind.field_name()
    )))
}
