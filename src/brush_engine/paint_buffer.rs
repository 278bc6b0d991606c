use std::sync::Arc;

use crate::brush_engine::stamp::StampTexture;
use crate::canvas::surface::PaintSurface;
use crate::utils::vector::{Vec2, distance};

/// Share of the stamp size between interpolated stamps along a line.
pub const LINE_STEP_DIVISOR: f32 = 8.0;

/// Blending strategy for how a stamp affects the paint surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source-over compositing.
    #[default]
    Normal,
    /// Stamp alpha is subtracted from the destination alpha.
    Eraser,
}

/// One pending impression: top-left corner of the stamp plus how to blend it.
#[derive(Clone, Debug)]
pub struct Stamp {
    pub origin: Vec2,
    pub blend_mode: BlendMode,
    pub texture: Arc<StampTexture>,
}

impl Stamp {
    /// Center of the impression in editor space.
    pub fn center(&self) -> Vec2 {
        let half = self.texture.size() as f32 / 2.0;
        self.origin + Vec2::new(half, half)
    }
}

/// Stamps added since the last flush, waiting to be committed to a [`PaintSurface`].
#[derive(Clone, Debug, Default)]
pub struct PaintBuffer {
    stamp: Option<Arc<StampTexture>>,
    blend_mode: BlendMode,
    pending: Vec<Stamp>,
}

impl PaintBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp texture used by subsequent `add_*` calls. Already-pending stamps keep theirs.
    pub fn set_stamp(&mut self, stamp: Option<Arc<StampTexture>>) {
        self.stamp = stamp;
    }

    pub fn stamp(&self) -> Option<&Arc<StampTexture>> {
        self.stamp.as_ref()
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Pending stamps in insertion order.
    pub fn stamps(&self) -> &[Stamp] {
        &self.pending
    }

    /// Queue one stamp centered on `pos`. Does nothing without a stamp texture.
    pub fn add_point(&mut self, pos: Vec2) {
        let Some(texture) = &self.stamp else {
            return;
        };
        let half = texture.size() as f32 / 2.0;
        self.pending.push(Stamp {
            origin: pos - Vec2::splat(half),
            blend_mode: self.blend_mode,
            texture: Arc::clone(texture),
        });
    }

    /// Stamp at `to`, then back-fill toward `from` every `size / 8` pixels so fast
    /// pointer movement still yields a continuous stroke. `from` itself is not
    /// stamped; the previous call already covered it.
    pub fn add_line(&mut self, from: Vec2, to: Vec2) {
        let Some(texture) = &self.stamp else {
            return;
        };
        let step = texture.size() as f32 / LINE_STEP_DIVISOR;

        self.add_point(to);

        let length = distance(from, to);
        if length >= step {
            let count = (length / step).ceil() as usize;
            for i in 1..count {
                self.add_point(to.lerp(from, i as f32 / count as f32));
            }
        }
    }

    /// Render all pending stamps onto `target` in insertion order. The buffer is left
    /// untouched; call [`PaintBuffer::clear`] once the stamps are committed.
    pub fn flush_to(&self, target: &mut PaintSurface) {
        target.composite_stamps(&self.pending);
    }

    /// Discard all pending stamps.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
