//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (notify user, continue) =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    // ===== Recoverable (internal recovery attempt) =====
    #[error("GPU device lost")]
    GpuLost,

    // ===== Fatal Errors (application termination) =====
    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),

    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    #[error("Catalog has no items")]
    EmptyCatalog,

    #[error("Duplicate item id in catalog: {0}")]
    DuplicateId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Io(_)
                | AppError::AssetNotFound(_)
                | AppError::UnsupportedFormat(_)
                | AppError::ImageDecode(_)
                | AppError::UnknownCommand(_)
                | AppError::GpuLost
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::AssetNotFound(path) => format!("Image not found: {}", path),
            AppError::UnsupportedFormat(ext) => format!("Unsupported image format: {}", ext),
            AppError::ImageDecode(msg) => format!("Cannot load image: {}", msg),
            AppError::GpuLost => "Display device reset. Reloading...".to_string(),
            AppError::EmptyCatalog => "The exhibition has no items to show".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::CatalogParse(e.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::ImageDecode(e.to_string())
    }
}
