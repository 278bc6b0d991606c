use std::path::PathBuf;

/// Everything that can go wrong while editing, loading or exporting a skin.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("invalid brush: {0}")]
    InvalidBrush(String),
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("material index {index} out of range ({count} materials)")]
    MaterialOutOfRange { index: usize, count: usize },
    #[error("unknown catalog item {0:?}")]
    UnknownItem(String),
}
