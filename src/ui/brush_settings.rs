use crate::brush_engine::brush::{Brush, BrushShape};
use crate::utils::color::Color;
use eframe::egui;

/// Panel for editing the active brush. Returns true when the user changed it.
pub fn brush_settings_window(ctx: &egui::Context, brush: &mut Brush) -> bool {
    let before = brush.clone();
    egui::Window::new("Brush")
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Shape:");
                for shape in [BrushShape::Circle, BrushShape::Square] {
                    ui.selectable_value(&mut brush.shape, shape, shape.label());
                }
            });

            ui.label("Size:");
            ui.add(egui::Slider::new(&mut brush.size, 1..=128).logarithmic(true));

            if brush.shape == BrushShape::Circle {
                ui.label("Smoothing:");
                ui.add(egui::Slider::new(&mut brush.smoothing, 0.01..=1.0));
            }

            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut rgb = brush.color.to_color32();
                if ui.color_edit_button_srgba(&mut rgb).changed() {
                    brush.color = Color::from_color32(rgb);
                }
                ui.monospace(brush.color.to_hex());
            });

            ui.separator();
            ui.small("Left button paints, right button erases.");
        });
    *brush != before
}
