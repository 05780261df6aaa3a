use thiserror::Error;

/// Errors that can occur while producing or delivering an exported image
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot export an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },

    #[error("Browser download failed: {0}")]
    Browser(String),
}

/// Errors that can occur while loading a config override file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
