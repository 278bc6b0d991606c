use eframe::egui::Color32;
use image::RgbaImage;
use rayon::prelude::*;

use crate::brush_engine::paint_buffer::{BlendMode, Stamp};
use crate::utils::profiler::ScopeTimer;

/// Long-lived raster that accumulates committed strokes. Pixels are premultiplied.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintSurface {
    width: usize,
    height: usize,
    pixels: Vec<Color32>,
}

impl PaintSurface {
    /// Create a fully transparent surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color32::TRANSPARENT; width * height],
        }
    }

    /// Current surface width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Current surface height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color32 {
        self.pixels[y * self.width + x]
    }

    /// True when nothing has been painted (or everything was erased).
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p.a() == 0)
    }

    /// Drop all committed paint.
    pub fn clear(&mut self) {
        self.pixels.fill(Color32::TRANSPARENT);
    }

    /// Composite stamps over the existing content, in order, without clearing first.
    ///
    /// Rows are processed in parallel; within a row every stamp is applied in
    /// insertion order, so per-pixel ordering matches a sequential blit.
    pub fn composite_stamps(&mut self, stamps: &[Stamp]) {
        if stamps.is_empty() || self.width == 0 {
            return;
        }
        let _timer = ScopeTimer::new("composite_stamps");

        let width = self.width as i64;
        let height = self.height as i64;
        // cull in float space so far-off origins never reach the integer cast
        let placed: Vec<(i64, i64, &Stamp)> = stamps
            .iter()
            .filter(|s| {
                let size = s.texture.size() as f32;
                let (x, y) = (s.origin.x.round(), s.origin.y.round());
                x + size > 0.0 && y + size > 0.0 && x < width as f32 && y < height as f32
            })
            .map(|s| (s.origin.x.round() as i64, s.origin.y.round() as i64, s))
            .collect();

        self.pixels
            .par_chunks_mut(self.width)
            .enumerate()
            .for_each(|(gy, row)| {
                let gy = gy as i64;
                for (x0, y0, stamp) in &placed {
                    let size = stamp.texture.size() as i64;
                    if gy < *y0 || gy >= *y0 + size {
                        continue;
                    }
                    let sy = (gy - y0) as usize;
                    let start_x = (*x0).max(0);
                    let end_x = (*x0 + size).min(width);
                    for gx in start_x..end_x {
                        let src = stamp.texture.pixel((gx - x0) as usize, sy);
                        if src.a() == 0 {
                            continue;
                        }
                        let dst = &mut row[gx as usize];
                        *dst = match stamp.blend_mode {
                            BlendMode::Normal => alpha_over(src, *dst),
                            BlendMode::Eraser => blend_erase(src, *dst),
                        };
                    }
                }
            });
    }

    /// Composite the surface over a straight-alpha image of the same size.
    /// Pixels with no paint are left untouched.
    pub fn composite_over(&self, base: &mut RgbaImage) {
        if base.width() as usize != self.width || base.height() as usize != self.height {
            log::warn!(
                "paint surface {}x{} does not match image {}x{}",
                self.width,
                self.height,
                base.width(),
                base.height()
            );
            return;
        }
        let raw: &mut [u8] = base;
        raw.par_chunks_mut(4)
            .zip(self.pixels.par_iter())
            .for_each(|(px, &paint)| {
                if paint.a() == 0 {
                    return;
                }
                let dst = premultiply([px[0], px[1], px[2], px[3]]);
                px.copy_from_slice(&unpremultiply(alpha_over(paint, dst)));
            });
    }
}

/// Straight RGBA8 to premultiplied, with the same integer rounding as the blends.
pub fn premultiply([r, g, b, a]: [u8; 4]) -> Color32 {
    let a32 = a as u32;
    let mul = |c: u8| ((c as u32 * a32 + 127) / 255) as u8;
    Color32::from_rgba_premultiplied(mul(r), mul(g), mul(b), a)
}

/// Premultiplied back to straight RGBA8. Fully transparent pixels become zero.
pub fn unpremultiply(c: Color32) -> [u8; 4] {
    let a = c.a() as u32;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let div = |v: u8| ((v as u32 * 255 + a / 2) / a).min(255) as u8;
    [div(c.r()), div(c.g()), div(c.b()), c.a()]
}

/// Erase blend mode: reduce destination alpha by the source alpha.
pub fn blend_erase(src: Color32, dst: Color32) -> Color32 {
    let src_a = src.a() as u32;
    let inv = 255 - src_a;
    let out_a = (dst.a() as u32 * inv + 127) / 255;
    let out_r = (dst.r() as u32 * inv + 127) / 255;
    let out_g = (dst.g() as u32 * inv + 127) / 255;
    let out_b = (dst.b() as u32 * inv + 127) / 255;
    Color32::from_rgba_premultiplied(
        out_r.min(255) as u8,
        out_g.min(255) as u8,
        out_b.min(255) as u8,
        out_a.min(255) as u8,
    )
}

/// Standard "source over" alpha compositing for premultiplied colors.
pub fn alpha_over(src: Color32, dst: Color32) -> Color32 {
    let src_a = src.a() as u32;
    let dst_a = dst.a() as u32;
    let inv = 255 - src_a;
    let out_a = src_a + (dst_a * inv + 127) / 255;
    if out_a == 0 {
        return Color32::TRANSPARENT;
    }

    let out_r = src.r() as u32 + (dst.r() as u32 * inv + 127) / 255;
    let out_g = src.g() as u32 + (dst.g() as u32 * inv + 127) / 255;
    let out_b = src.b() as u32 + (dst.b() as u32 * inv + 127) / 255;

    Color32::from_rgba_premultiplied(
        out_r.min(255) as u8,
        out_g.min(255) as u8,
        out_b.min(255) as u8,
        out_a.min(255) as u8,
    )
}
