use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Handle for subsequent /process and /download calls
    pub file_path: String,
    /// Sanitized original filename, display metadata only
    pub filename: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub file_path: Option<String>,
    /// Multiplier, 1.0 is neutral. 0.0 is fully dark and is honored as-is.
    pub brightness: Option<f32>,
    /// Multiplier around mid-gray, 1.0 is neutral
    pub contrast: Option<f32>,
    /// Multiplier, 1.0 is neutral, 0.0 is grayscale
    pub saturation: Option<f32>,
    /// Degrees, must be a multiple of 90
    pub rotation: Option<i32>,
    /// jpeg (default), png, webp, or gif
    pub format: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub message: String,
    pub file_path: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub file_path: Option<String>,
    /// Declared format of the download, defaults to jpeg
    pub format: Option<String>,
}
