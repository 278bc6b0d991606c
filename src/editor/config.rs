use std::time::Duration;

use crate::catalog::TextureInfo;
use crate::editor::filters::FilterKind;
use crate::utils::color::Color;

/// Look of the derived outline overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineSettings {
    pub color: Color,
    /// Minimum Sobel magnitude (luma in 0..1) treated as an edge.
    pub threshold: f32,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            color: Color::black(),
            threshold: 0.25,
        }
    }
}

/// Per-editor settings. One editor type covers every variant; what differs is here.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    pub width: u32,
    pub height: u32,
    pub available_filters: Vec<FilterKind>,
    pub outline_enabled: bool,
    pub outline: OutlineSettings,
    /// Minimum spacing between change notifications.
    pub change_interval: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

impl EditorConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            available_filters: FilterKind::ALL.to_vec(),
            outline_enabled: true,
            outline: OutlineSettings::default(),
            change_interval: Duration::from_millis(15),
        }
    }

    /// Size the editor so `texture` is shown `display_height` pixels tall,
    /// keeping its aspect ratio.
    pub fn for_texture(texture: &TextureInfo, display_height: f32) -> Self {
        let (width, height) = texture.editor_size(display_height);
        Self::new(width, height)
    }

    pub fn with_filters(mut self, filters: &[FilterKind]) -> Self {
        self.available_filters = filters.to_vec();
        self
    }

    pub fn without_outline(mut self) -> Self {
        self.outline_enabled = false;
        self
    }
}
