use crate::error::EditorError;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    PNG,
    JPEG,
    TIFF,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::PNG => "PNG",
            ExportFormat::JPEG => "JPEG",
            ExportFormat::TIFF => "TIFF",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PNG => "png",
            ExportFormat::JPEG => "jpg",
            ExportFormat::TIFF => "tiff",
        }
    }

    /// Pick a format from a file extension, if it is one we write.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ExportFormat::PNG),
            "jpg" | "jpeg" => Some(ExportFormat::JPEG),
            "tif" | "tiff" => Some(ExportFormat::TIFF),
            _ => None,
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::PNG => ImageFormat::Png,
            ExportFormat::JPEG => ImageFormat::Jpeg,
            ExportFormat::TIFF => ImageFormat::Tiff,
        }
    }
}

/// Encode a flattened RGBA image into the bytes of the chosen file format.
pub fn encode_image(img: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>, EditorError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        // JPEG has no alpha channel.
        ExportFormat::JPEG => DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .write_to(&mut out, format.image_format()),
        _ => img.write_to(&mut out, format.image_format()),
    }
    .map_err(EditorError::Encode)?;
    Ok(out.into_inner())
}

/// Write already-encoded image bytes to disk.
pub fn save_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<(), EditorError> {
    let path = path.into();
    std::fs::write(&path, bytes).map_err(|source| EditorError::Io { path, source })
}

/// Swap the extension for `ext` unless it already matches (`jpeg` counts as `jpg`).
pub fn ensure_extension(mut path: PathBuf, ext: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(current) if current.eq_ignore_ascii_case(ext) => path,
        Some(current) if ext == "jpg" && current.eq_ignore_ascii_case("jpeg") => path,
        _ => {
            path.set_extension(ext);
            path
        }
    }
}
