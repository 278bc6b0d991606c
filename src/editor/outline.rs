use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::editor::config::OutlineSettings;

/// Edge overlay for `src`: pixels whose Sobel gradient of alpha-weighted luma
/// reaches `settings.threshold` are painted in the outline color, the rest stay
/// transparent. Picks up both silhouette edges and seams between UV islands.
pub fn extract_outline(src: &RgbaImage, settings: &OutlineSettings) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    let luma: Vec<f32> = src
        .pixels()
        .map(|Rgba([r, g, b, a])| {
            let l = 0.299 * *r as f32 + 0.587 * *g as f32 + 0.114 * *b as f32;
            l * (*a as f32 / 255.0) / 255.0
        })
        .collect();

    let sample = |x: i64, y: i64| -> f32 {
        let x = x.clamp(0, w as i64 - 1) as usize;
        let y = y.clamp(0, h as i64 - 1) as usize;
        luma[y * w as usize + x]
    };

    let color = settings.color.to_rgba8();
    let threshold = settings.threshold;
    let raw: &mut [u8] = &mut out;
    raw.par_chunks_mut(w as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i64;
            for x in 0..w as i64 {
                let gx = sample(x + 1, y - 1) + 2.0 * sample(x + 1, y) + sample(x + 1, y + 1)
                    - sample(x - 1, y - 1)
                    - 2.0 * sample(x - 1, y)
                    - sample(x - 1, y + 1);
                let gy = sample(x - 1, y + 1) + 2.0 * sample(x, y + 1) + sample(x + 1, y + 1)
                    - sample(x - 1, y - 1)
                    - 2.0 * sample(x, y - 1)
                    - sample(x + 1, y - 1);
                if (gx * gx + gy * gy).sqrt() >= threshold {
                    let i = x as usize * 4;
                    row[i..i + 4].copy_from_slice(&color);
                }
            }
        });
    out
}
