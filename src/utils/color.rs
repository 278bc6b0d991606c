use eframe::egui::Color32;

use crate::error::EditorError;

/// Simple RGBA color stored as floats in 0..1 (not premultiplied).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Construct from 0-255 channel values.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Opaque color from 0-255 channel values.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn red() -> Self {
        Self::rgb(255, 0, 0)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Parse a `#rrggbb` (or `rrggbb`) string into an opaque color.
    pub fn from_hex(hex: &str) -> Result<Self, EditorError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EditorError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| EditorError::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format the RGB channels as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Rec. 601 weighted luminance of the RGB channels.
    pub fn luma(&self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Quantize to 8-bit straight-alpha channels.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Build from 8-bit straight-alpha channels.
    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }

    /// Convert to egui's 8-bit (premultiplied) color format.
    pub fn to_color32(&self) -> Color32 {
        let [r, g, b, a] = self.to_rgba8();
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    /// Convert from egui's 8-bit color format to floats.
    pub fn from_color32(c: Color32) -> Self {
        Self::from_rgba8(c.to_srgba_unmultiplied())
    }
}
