use crate::api::error::AppError;
use crate::api::handlers::types::{ProcessRequest, ProcessResponse};
use crate::services::processor::{self, OutputFormat, TransformOptions, quarter_turns};
use axum::{
    Json,
    extract::State,
};

#[utoipa::path(
    post,
    path = "/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Image processed and staged", body = ProcessResponse),
        (status = 400, description = "Missing file path or invalid transform parameters"),
        (status = 404, description = "Staged file not found"),
        (status = 500, description = "Decode or encode failure")
    )
)]
pub async fn process_image(
    State(state): State<crate::AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, AppError> {
    let reference = req
        .file_path
        .as_deref()
        .ok_or_else(|| AppError::MissingInput("File path is required.".to_string()))?;

    // Client references look like "/uploads/<identity>"; the stripped value
    // still goes through the store's resolve guard, never used verbatim.
    let identity = reference
        .strip_prefix("/uploads/")
        .unwrap_or(reference)
        .to_string();
    state.store.resolve(&identity)?;

    if !state.store.exists(&identity).await {
        tracing::error!("File not found: {}", identity);
        return Err(AppError::NotFound("File not found.".to_string()));
    }

    let format = match req.format.as_deref() {
        Some(s) => OutputFormat::parse(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported output format: {}", s)))?,
        None => OutputFormat::default(),
    };
    let rotation_quarters = quarter_turns(req.rotation.unwrap_or(0)).ok_or_else(|| {
        AppError::BadRequest("Rotation must be a multiple of 90 degrees".to_string())
    })?;

    // Absent fields fall back to neutral values; explicit values are kept
    // even when they equal zero.
    let opts = TransformOptions {
        brightness: req.brightness.unwrap_or(1.0),
        contrast: req.contrast.unwrap_or(1.0),
        saturation: req.saturation.unwrap_or(1.0),
        rotation_quarters,
        format,
    };

    let input = state.store.read(&identity).await?;
    let output = tokio::task::spawn_blocking(move || processor::transform_image(&input, &opts))
        .await
        .map_err(|e| AppError::Internal(format!("transform task failed: {}", e)))?
        .map_err(|e| AppError::ProcessingFailed(e.to_string()))?;

    let output_identity = state.store.mint_identity(format.extension());
    state.store.create(&output_identity, &output).await?;
    tracing::info!("Processed {} -> {}", identity, output_identity);

    Ok(Json(ProcessResponse {
        message: "Image processed successfully.".to_string(),
        file_path: format!("/uploads/{}", output_identity),
    }))
}
