use std::sync::Arc;

use crate::brush_engine::brush::Brush;
use crate::brush_engine::paint_buffer::{BlendMode, PaintBuffer};
use crate::brush_engine::stamp::StampTexture;
use crate::canvas::surface::PaintSurface;
use crate::error::EditorError;
use crate::utils::vector::Vec2;

/// Buttons held while a pointer event fired.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerButtons {
    pub primary: bool,
    pub secondary: bool,
}

impl PointerButtons {
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
    };
    pub const PRIMARY: Self = Self {
        primary: true,
        secondary: false,
    };
    pub const SECONDARY: Self = Self {
        primary: false,
        secondary: true,
    };

    /// Paint mode for this button combination. Exactly one button must be held.
    pub fn stroke_mode(self) -> Option<BlendMode> {
        match (self.primary, self.secondary) {
            (true, false) => Some(BlendMode::Normal),
            (false, true) => Some(BlendMode::Eraser),
            _ => None,
        }
    }

    pub fn any(self) -> bool {
        self.primary || self.secondary
    }
}

/// Pointer input in editor pixel space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Down { pos: Vec2, buttons: PointerButtons },
    Move { pos: Vec2, buttons: PointerButtons },
    Up { pos: Vec2 },
    Enter { pos: Vec2, buttons: PointerButtons },
    Leave { pos: Vec2 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayerState {
    Idle,
    Drawing(BlendMode),
}

/// Turns pointer events into stamps and commits them to the paint surface once per tick.
pub struct PaintLayer {
    brush: Brush,
    buffer: PaintBuffer,
    surface: PaintSurface,
    state: LayerState,
    last_position: Option<Vec2>,
}

impl PaintLayer {
    /// Create a layer with the default brush over a transparent surface.
    pub fn new(width: usize, height: usize) -> Self {
        let brush = Brush::default();
        let mut buffer = PaintBuffer::new();
        buffer.set_stamp(Some(Arc::new(StampTexture::generate(&brush))));
        Self {
            brush,
            buffer,
            surface: PaintSurface::new(width, height),
            state: LayerState::Idle,
            last_position: None,
        }
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Swap the brush, regenerating the stamp only when it actually changed.
    /// An invalid brush is rejected and the previous one stays active.
    pub fn set_brush(&mut self, brush: Brush) -> Result<(), EditorError> {
        let brush = brush.validated()?;
        let unchanged = self
            .buffer
            .stamp()
            .is_some_and(|stamp| stamp.brush() == &brush);
        if !unchanged {
            log::debug!("regenerating {}px {:?} stamp", brush.size, brush.shape);
            self.buffer
                .set_stamp(Some(Arc::new(StampTexture::generate(&brush))));
        }
        self.brush = brush;
        Ok(())
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }

    pub fn buffer(&self) -> &PaintBuffer {
        &self.buffer
    }

    pub fn surface(&self) -> &PaintSurface {
        &self.surface
    }

    /// Feed one pointer event. Returns true when stamps were queued.
    pub fn handle_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { pos, buttons } => self.begin_stroke(pos, buttons),
            PointerEvent::Enter { pos, buttons } => {
                if buttons.any() {
                    self.begin_stroke(pos, buttons)
                } else {
                    self.last_position = Some(pos);
                    false
                }
            }
            PointerEvent::Move { pos, buttons } => match self.state {
                LayerState::Drawing(mode) => {
                    if buttons.stroke_mode() != Some(mode) {
                        return false;
                    }
                    let from = self.last_position.unwrap_or(pos);
                    self.buffer.add_line(from, pos);
                    self.last_position = Some(pos);
                    true
                }
                LayerState::Idle => {
                    self.last_position = Some(pos);
                    false
                }
            },
            PointerEvent::Up { pos } | PointerEvent::Leave { pos } => {
                self.state = LayerState::Idle;
                self.last_position = Some(pos);
                false
            }
        }
    }

    fn begin_stroke(&mut self, pos: Vec2, buttons: PointerButtons) -> bool {
        let Some(mode) = buttons.stroke_mode() else {
            return false;
        };
        self.state = LayerState::Drawing(mode);
        self.last_position = Some(pos);
        self.buffer.set_blend_mode(mode);
        self.buffer.add_point(pos);
        true
    }

    /// Commit pending stamps to the surface. Returns false (and does nothing) when
    /// the buffer is empty.
    pub fn tick(&mut self) -> bool {
        if self.buffer.is_empty() {
            return false;
        }
        self.buffer.flush_to(&mut self.surface);
        self.buffer.clear();
        true
    }

    /// Forget all paint, committed or pending.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.surface.clear();
    }
}
