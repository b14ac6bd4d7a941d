use crate::api::error::AppError;
use crate::api::handlers::types::UploadResponse;
use crate::utils::validation;
use axum::{
    Json,
    extract::{Multipart, State},
};

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Multipart, description = "Image upload, file part named `image`"),
    responses(
        (status = 200, description = "Image staged successfully", body = UploadResponse),
        (status = 400, description = "No file part present"),
        (status = 415, description = "Declared MIME type is not an accepted image type")
    )
)]
pub async fn upload_image(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original_filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        tracing::info!("Received file type: {}", content_type);

        // MIME gate runs before any bytes are read or persisted
        let extension = validation::allowed_upload_extension(&content_type).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!("Invalid file type: {}", content_type))
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if data.len() > state.config.max_upload_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File size {} bytes exceeds maximum allowed {} bytes",
                data.len(),
                state.config.max_upload_size
            )));
        }

        // The client filename never reaches the storage path; it is echoed
        // back as display metadata only.
        let identity = state.store.mint_identity(extension);
        state.store.create(&identity, &data).await?;
        tracing::info!("File uploaded: {} ({} bytes)", identity, data.len());

        return Ok(Json(UploadResponse {
            file_path: format!("/uploads/{}", identity),
            filename: validation::sanitize_display_filename(&original_filename),
        }));
    }

    tracing::error!("No file uploaded");
    Err(AppError::NoFilePresent)
}
