use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use image::RgbaImage;

use crate::error::EditorError;

/// Where a texture comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum TextureSource {
    Path(PathBuf),
    /// Already-encoded image bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
}

impl TextureSource {
    /// Short human-readable description for logs.
    pub fn label(&self) -> String {
        match self {
            TextureSource::Path(path) => path.display().to_string(),
            TextureSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for TextureSource {
    /// Accepts plain paths as well as `file://` URLs.
    fn from(value: &str) -> Self {
        let path = value.strip_prefix("file://").unwrap_or(value);
        TextureSource::Path(PathBuf::from(path))
    }
}

impl From<&Path> for TextureSource {
    fn from(value: &Path) -> Self {
        TextureSource::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for TextureSource {
    fn from(value: PathBuf) -> Self {
        TextureSource::Path(value)
    }
}

impl From<Vec<u8>> for TextureSource {
    fn from(value: Vec<u8>) -> Self {
        TextureSource::Bytes(value)
    }
}

/// Read and decode a texture into RGBA8.
pub fn decode(source: &TextureSource) -> Result<RgbaImage, EditorError> {
    let img = match source {
        TextureSource::Path(path) => {
            let bytes = std::fs::read(path).map_err(|source| EditorError::Io {
                path: path.clone(),
                source,
            })?;
            image::load_from_memory(&bytes).map_err(EditorError::Decode)?
        }
        TextureSource::Bytes(bytes) => {
            image::load_from_memory(bytes).map_err(EditorError::Decode)?
        }
    };
    Ok(img.to_rgba8())
}

/// Outcome of one background load, tagged with the request generation.
#[derive(Debug)]
pub struct LoadResult {
    pub generation: u64,
    pub label: String,
    pub image: Result<RgbaImage, EditorError>,
}

/// Decodes textures off the UI thread. Every request gets a strictly
/// increasing generation; results come back in completion order, which may
/// differ from request order.
pub struct TextureLoader {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
    next_generation: u64,
    in_flight: usize,
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLoader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            next_generation: 1,
            in_flight: 0,
        }
    }

    pub(crate) fn allocate_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Start decoding `source` on a worker thread.
    pub fn request(&mut self, source: TextureSource) -> u64 {
        let generation = self.allocate_generation();
        let sender = self.sender.clone();
        let label = source.label();
        log::debug!("loading texture {label} (generation {generation})");
        self.in_flight += 1;
        thread::spawn(move || {
            let image = decode(&source);
            // Receiver gone means the editor was dropped; nothing to report.
            let _ = sender.send(LoadResult {
                generation,
                label,
                image,
            });
        });
        generation
    }

    /// Hand a finished result to the queue directly, bypassing the worker.
    pub(crate) fn deliver(&self, result: LoadResult) {
        let _ = self.sender.send(result);
    }

    /// Number of requests whose result has not been collected yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Every result that has arrived since the last call.
    pub fn drain(&mut self) -> Vec<LoadResult> {
        let results: Vec<LoadResult> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    /// Block until every outstanding request has reported back. Results are
    /// returned in arrival order.
    pub fn wait_all(&mut self) -> Vec<LoadResult> {
        let mut out = self.drain();
        while self.in_flight > 0 {
            let Ok(result) = self.receiver.recv() else {
                break;
            };
            self.in_flight -= 1;
            out.push(result);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::exporter::{ExportFormat, encode_image};
    use image::Rgba;

    fn png(color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 3, Rgba(color));
        encode_image(&img, ExportFormat::PNG).unwrap()
    }

    #[test]
    fn file_urls_are_stripped() {
        assert_eq!(
            TextureSource::from("file:///tmp/armor_0.png"),
            TextureSource::Path(PathBuf::from("/tmp/armor_0.png"))
        );
        assert_eq!(
            TextureSource::from("assets/models/armor_0.png"),
            TextureSource::Path(PathBuf::from("assets/models/armor_0.png"))
        );
    }

    #[test]
    fn decodes_bytes() {
        let img = decode(&TextureSource::Bytes(png([1, 2, 3, 255]))).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(*img.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = decode(&TextureSource::from("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(&TextureSource::Bytes(vec![0, 1, 2, 3])).unwrap_err();
        assert!(matches!(err, EditorError::Decode(_)));
    }

    #[test]
    fn generations_increase_per_request() {
        let mut loader = TextureLoader::new();
        let a = loader.request(TextureSource::Bytes(png([0, 0, 0, 255])));
        let b = loader.request(TextureSource::Bytes(png([9, 9, 9, 255])));
        assert!(b > a);
        assert_eq!(loader.in_flight(), 2);
        let mut generations: Vec<u64> = loader.wait_all().iter().map(|r| r.generation).collect();
        generations.sort();
        assert_eq!(generations, vec![a, b]);
        assert_eq!(loader.in_flight(), 0);
    }
}
