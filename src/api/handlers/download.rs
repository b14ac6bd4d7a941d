use crate::api::error::AppError;
use crate::api::handlers::types::DownloadRequest;
use crate::services::processor::OutputFormat;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use std::path::Path;
use tokio_util::io::ReaderStream;

#[utoipa::path(
    post,
    path = "/download",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Binary image stream"),
        (status = 400, description = "Missing file path or unsupported format"),
        (status = 404, description = "Staged file not found")
    )
)]
pub async fn download_image(
    State(state): State<crate::AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<Response, AppError> {
    let reference = req
        .file_path
        .as_deref()
        .ok_or_else(|| AppError::MissingInput("File path is required.".to_string()))?;

    // Stricter than /process: any directory segments the client supplied
    // are discarded and only the final component is resolved.
    let identity = Path::new(reference)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            AppError::InvalidIdentity("File path has no filename component".to_string())
        })?;

    let format = match req.format.as_deref() {
        Some(s) => OutputFormat::parse(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported output format: {}", s)))?,
        None => OutputFormat::default(),
    };

    let file = state.store.open_for_read(identity).await?;
    tracing::info!("Streaming {} as {}", identity, format.mime_type());

    // Content metadata derives from the requested format alone; the bytes
    // are streamed untouched. A read failure after this point aborts the
    // connection without writing a second response.
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.mime_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=processed.{}", format.extension()),
        )
        .body(body)
        .map_err(|e| AppError::StreamFailure(format!("failed to begin stream: {}", e)))
}
