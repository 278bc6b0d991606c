use crate::brush_engine::brush::{Brush, BrushShape};
use eframe::egui::Color32;
use rayon::prelude::*;

/// Square raster stamped once per brush impression. Pixels are premultiplied.
#[derive(Clone, Debug, PartialEq)]
pub struct StampTexture {
    brush: Brush,
    size: usize,
    pixels: Vec<Color32>,
}

impl StampTexture {
    /// Rasterize the stamp for `brush`. Cost grows with `size²`, so callers keep the
    /// result around until the brush changes.
    pub fn generate(brush: &Brush) -> Self {
        let size = brush.size.max(1) as usize;
        let mut pixels = vec![Color32::TRANSPARENT; size * size];
        let [r, g, b, _] = brush.color.to_rgba8();

        match brush.shape {
            BrushShape::Square => {
                pixels.fill(Color32::from_rgb(r, g, b));
            }
            BrushShape::Circle => {
                let smoothing = brush.smoothing;
                let (r, g, b) = (r as f32, g as f32, b as f32);
                pixels
                    .par_chunks_mut(size)
                    .enumerate()
                    .for_each(|(y, row)| {
                        let v = (y as f32 + 0.5) / size as f32 - 0.5;
                        for (x, px) in row.iter_mut().enumerate() {
                            let u = (x as f32 + 0.5) / size as f32 - 0.5;
                            // 0 at the center, 1 on the inscribed circle
                            let dist = (u * u + v * v).sqrt() * 2.0;
                            let alpha = (1.0 - dist).max(0.0);
                            if alpha <= 0.0 {
                                continue;
                            }
                            let alpha = alpha.powf(smoothing);
                            *px = Color32::from_rgba_premultiplied(
                                (r * alpha).round() as u8,
                                (g * alpha).round() as u8,
                                (b * alpha).round() as u8,
                                (255.0 * alpha).round() as u8,
                            );
                        }
                    });
            }
        }

        Self {
            brush: brush.clone(),
            size,
            pixels,
        }
    }

    /// Edge length in pixels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The brush this stamp was rasterized from.
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color32 {
        self.pixels[y * self.size + x]
    }
}
