pub mod api;
pub mod config;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::staging::StagingStore;
use axum::{Router, routing::post};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_image,
        api::handlers::process::process_image,
        api::handlers::download::download_image,
    ),
    components(
        schemas(
            api::handlers::types::UploadResponse,
            api::handlers::types::ProcessRequest,
            api::handlers::types::ProcessResponse,
            api::handlers::types::DownloadRequest,
        )
    ),
    tags(
        (name = "images", description = "Image staging and processing endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StagingStore>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/upload", post(api::handlers::upload::upload_image))
        .route("/process", post(api::handlers::process::process_image))
        .route("/download", post(api::handlers::download::download_image))
        .with_state(state)
}
