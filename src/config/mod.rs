use std::env;
use std::path::PathBuf;

/// Server configuration, loaded from environment variables with defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding all staged files (default: ./uploads)
    pub staging_dir: PathBuf,

    /// Maximum upload body size in bytes (default: 25 MB)
    pub max_upload_size: usize,

    /// Listen port (default: 3002)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("./uploads"),
            max_upload_size: 25 * 1024 * 1024, // 25 MB
            port: 3002,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.staging_dir, PathBuf::from("./uploads"));
        assert_eq!(config.max_upload_size, 25 * 1024 * 1024);
        assert_eq!(config.port, 3002);
    }
}
