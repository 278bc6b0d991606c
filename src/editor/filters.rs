use image::RgbaImage;
use rayon::prelude::*;

use crate::utils::color::Color;
use crate::utils::profiler::ScopeTimer;

/// Adjustments the editor can apply to the base texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Hue,
    Saturation,
    Lightness,
    Brightness,
    Contrast,
    Blur,
}

impl FilterKind {
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Hue,
        FilterKind::Saturation,
        FilterKind::Lightness,
        FilterKind::Brightness,
        FilterKind::Contrast,
        FilterKind::Blur,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::Hue => "Hue",
            FilterKind::Saturation => "Saturation",
            FilterKind::Lightness => "Lightness",
            FilterKind::Brightness => "Brightness",
            FilterKind::Contrast => "Contrast",
            FilterKind::Blur => "Blur",
        }
    }
}

/// One slider: its bounds, neutral default, current value and toggle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterInput {
    pub enabled: bool,
    pub default_value: f32,
    pub min_value: f32,
    pub max_value: f32,
    pub value: f32,
    /// Hue only: tint a luminance copy instead of rotating the original colors.
    pub colorize: bool,
}

impl FilterInput {
    pub const fn new(default_value: f32, min_value: f32, max_value: f32) -> Self {
        Self {
            enabled: false,
            default_value,
            min_value,
            max_value,
            value: default_value,
            colorize: false,
        }
    }

    /// Set the value, clamped into bounds.
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min_value, self.max_value);
    }

    /// Enabled copy with `value` applied.
    pub fn with_value(mut self, value: f32) -> Self {
        self.enabled = true;
        self.set_value(value);
        self
    }

    /// What actually gets rendered: the value when enabled, the default otherwise.
    pub fn effective(&self) -> f32 {
        if self.enabled {
            self.value.clamp(self.min_value, self.max_value)
        } else {
            self.default_value
        }
    }
}

/// Full set of adjustment sliders shown next to the editor.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSet {
    /// Degrees, -180..180.
    pub hue: FilterInput,
    pub saturation: FilterInput,
    pub lightness: FilterInput,
    /// Multiplier, 1 is neutral.
    pub brightness: FilterInput,
    /// Multiplier around mid-grey, 1 is neutral.
    pub contrast: FilterInput,
    /// Gaussian sigma in pixels.
    pub blur: FilterInput,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            hue: FilterInput::new(0.0, -180.0, 180.0),
            saturation: FilterInput::new(0.0, -1.0, 1.0),
            lightness: FilterInput::new(0.0, -1.0, 1.0),
            brightness: FilterInput::new(1.0, 0.0, 5.0),
            contrast: FilterInput::new(1.0, 0.0, 5.0),
            blur: FilterInput::new(0.0, 0.0, 16.0),
        }
    }
}

impl FilterSet {
    pub fn get(&self, kind: FilterKind) -> &FilterInput {
        match kind {
            FilterKind::Hue => &self.hue,
            FilterKind::Saturation => &self.saturation,
            FilterKind::Lightness => &self.lightness,
            FilterKind::Brightness => &self.brightness,
            FilterKind::Contrast => &self.contrast,
            FilterKind::Blur => &self.blur,
        }
    }

    pub fn get_mut(&mut self, kind: FilterKind) -> &mut FilterInput {
        match kind {
            FilterKind::Hue => &mut self.hue,
            FilterKind::Saturation => &mut self.saturation,
            FilterKind::Lightness => &mut self.lightness,
            FilterKind::Brightness => &mut self.brightness,
            FilterKind::Contrast => &mut self.contrast,
            FilterKind::Blur => &mut self.blur,
        }
    }

    /// Resolve to concrete parameters. Kinds missing from `available` render at
    /// their default regardless of toggles.
    pub fn resolve(&self, available: &[FilterKind]) -> Adjustments {
        let value = |kind: FilterKind| {
            let input = self.get(kind);
            if available.contains(&kind) {
                input.effective()
            } else {
                input.default_value
            }
        };
        Adjustments {
            colorize: available.contains(&FilterKind::Hue)
                && self.hue.enabled
                && self.hue.colorize,
            hue_degrees: value(FilterKind::Hue),
            saturation: value(FilterKind::Saturation),
            lightness: value(FilterKind::Lightness),
            brightness: value(FilterKind::Brightness),
            contrast: value(FilterKind::Contrast),
            blur: value(FilterKind::Blur),
        }
    }
}

/// Resolved filter parameters, independent of toggle history.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Adjustments {
    pub colorize: bool,
    pub hue_degrees: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub blur: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        FilterSet::default().resolve(&[])
    }
}

impl Adjustments {
    fn touches_color(&self) -> bool {
        self.colorize
            || self.hue_degrees != 0.0
            || self.saturation != 0.0
            || self.lightness != 0.0
            || self.brightness != 1.0
            || self.contrast != 1.0
    }

    pub fn is_neutral(&self) -> bool {
        !self.touches_color() && self.blur <= 0.0
    }

    /// Filter `src` into a new image: hue/saturation/lightness, then
    /// brightness/contrast, then blur. Neutral stages are skipped so a neutral
    /// set returns `src` bit for bit.
    pub fn apply(&self, src: &RgbaImage) -> RgbaImage {
        let _timer = ScopeTimer::new("apply_filters");
        let mut out = src.clone();

        if self.touches_color() {
            let adj = *self;
            let raw: &mut [u8] = &mut out;
            raw.par_chunks_mut(4).for_each(|px| {
                let mut c = Color::from_rgba8([px[0], px[1], px[2], px[3]]);
                adj.adjust(&mut c);
                px.copy_from_slice(&c.to_rgba8());
            });
        }

        if self.blur > 0.0 {
            out = image::imageops::blur(&out, self.blur);
        }
        out
    }

    fn adjust(&self, c: &mut Color) {
        let mut rgb = [c.r, c.g, c.b];
        if self.colorize {
            rgb = [c.luma(), 0.0, 0.0];
        }
        if self.hue_degrees != 0.0 {
            rgb = rotate_hue(rgb, self.hue_degrees.to_radians());
        }

        if self.saturation != 0.0 {
            let average = (rgb[0] + rgb[1] + rgb[2]) / 3.0;
            // positive values push away from grey, -1 collapses onto it
            let amount = if self.saturation > 0.0 {
                1.0 - 1.0 / (1.001 - self.saturation)
            } else {
                -self.saturation
            };
            for v in &mut rgb {
                *v += (average - *v) * amount;
            }
        }

        let lightness = self.lightness;
        let target = if lightness > 0.0 { 1.0 } else { 0.0 };
        let brightness = self.brightness;
        let contrast = self.contrast;
        let channel = |v: f32| {
            let v = v + (target - v) * lightness.abs();
            let v = v * brightness;
            ((v - 0.5) * contrast + 0.5).clamp(0.0, 1.0)
        };
        c.r = channel(rgb[0]);
        c.g = channel(rgb[1]);
        c.b = channel(rgb[2]);
    }
}

/// Rotate `rgb` around the grey diagonal of the color cube.
fn rotate_hue([r, g, b]: [f32; 3], radians: f32) -> [f32; 3] {
    const K: f32 = 0.577_350_26;
    let (sin, cos) = radians.sin_cos();
    let along = K * (r + g + b) * K * (1.0 - cos);
    [
        r * cos + K * (b - g) * sin + along,
        g * cos + K * (r - b) * sin + along,
        b * cos + K * (g - r) * sin + along,
    ]
}
