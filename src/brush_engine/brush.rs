use crate::error::EditorError;
use crate::utils::color::Color;

/// Footprint of a single brush stamp.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BrushShape {
    Circle,
    Square,
}

impl BrushShape {
    pub fn label(&self) -> &'static str {
        match self {
            BrushShape::Circle => "Circle",
            BrushShape::Square => "Square",
        }
    }
}

/// User-facing brush configuration. Replaced wholesale whenever the user changes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    pub shape: BrushShape,
    /// Edge length of the stamp in pixels.
    pub size: u32,
    pub color: Color,
    /// Falloff exponent for circular stamps, 0..1.
    pub smoothing: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            shape: BrushShape::Circle,
            size: 24,
            color: Color::red(),
            smoothing: 0.5,
        }
    }
}

impl Brush {
    pub fn new(shape: BrushShape, size: u32, color: Color, smoothing: f32) -> Self {
        Self {
            shape,
            size,
            color,
            smoothing,
        }
    }

    /// Convenience constructor for a round brush.
    pub fn circle(size: u32, color: Color, smoothing: f32) -> Self {
        Self::new(BrushShape::Circle, size, color, smoothing)
    }

    /// Convenience constructor for a hard square brush.
    pub fn square(size: u32, color: Color) -> Self {
        Self::new(BrushShape::Square, size, color, 1.0)
    }

    /// Check the brush can produce a stamp, clamping smoothing into range.
    pub fn validated(mut self) -> Result<Self, EditorError> {
        if self.size == 0 {
            return Err(EditorError::InvalidBrush("size must be positive".to_string()));
        }
        if !self.smoothing.is_finite() {
            return Err(EditorError::InvalidBrush(format!(
                "smoothing must be finite, got {}",
                self.smoothing
            )));
        }
        self.smoothing = self.smoothing.clamp(0.0, 1.0);
        self.color.a = 1.0;
        Ok(self)
    }
}
