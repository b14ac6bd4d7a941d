use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use rust_image_backend::config::AppConfig;
use rust_image_backend::services::staging::StagingStore;
use rust_image_backend::{AppState, create_app};
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "---------------------------123456789012345678901234567";

async fn test_state() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StagingStore::open(dir.path()).await.unwrap());
    let state = AppState {
        store,
        config: AppConfig::default(),
    };
    (dir, state)
}

fn sample_image(format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_fn(4, 3, |x, y| Rgba([(x * 40) as u8, (y * 60) as u8, 120, 255]));
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img),
    };
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format).unwrap();
    out
}

fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n\
            Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_png_is_staged() {
    let (dir, state) = test_state().await;
    let app = create_app(state);

    let png = sample_image(ImageFormat::Png);
    let response = app
        .oneshot(upload_request(multipart_body("photo.png", "image/png", &png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();

    let file_path = json["filePath"].as_str().unwrap();
    assert!(file_path.starts_with("/uploads/"));
    assert_eq!(json["filename"], "photo.png");

    // Identity must exist in the store the moment it is returned
    let identity = file_path.strip_prefix("/uploads/").unwrap();
    let staged = tokio::fs::read(dir.path().join(identity)).await.unwrap();
    assert_eq!(staged, png);
}

#[tokio::test]
async fn test_upload_jpeg_is_accepted() {
    let (_dir, state) = test_state().await;
    let app = create_app(state);

    let jpeg = sample_image(ImageFormat::Jpeg);
    let response = app
        .oneshot(upload_request(multipart_body(
            "photo.jpg",
            "image/jpeg",
            &jpeg,
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["filePath"].as_str().unwrap().ends_with(".jpeg"));
}

#[tokio::test]
async fn test_upload_gif_is_rejected() {
    let (dir, state) = test_state().await;
    let app = create_app(state);

    let response = app
        .oneshot(upload_request(multipart_body(
            "anim.gif",
            "image/gif",
            b"GIF89a fake",
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // Rejection happens before anything is persisted
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    assert!(entries.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_upload_over_size_limit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StagingStore::open(dir.path()).await.unwrap());
    let state = AppState {
        store,
        config: AppConfig {
            max_upload_size: 16,
            ..AppConfig::default()
        },
    };
    let app = create_app(state);

    let png = sample_image(ImageFormat::Png);
    let response = app
        .oneshot(upload_request(multipart_body("big.png", "image/png", &png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_without_image_part_is_bad_request() {
    let (_dir, state) = test_state().await;
    let app = create_app(state);

    let body = format!(
        "--{BOUNDARY}\r\n\
        Content-Disposition: form-data; name=\"comment\"\r\n\r\n\
        not a file\r\n\
        --{BOUNDARY}--\r\n"
    );

    let response = app
        .oneshot(upload_request(body.into_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
