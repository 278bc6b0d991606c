use eframe::egui;

use crate::brush_engine::brush::{Brush, BrushShape};

/// Backdrop shown behind transparent texture pixels.
pub const CHECKER_LIGHT: egui::Color32 = egui::Color32::from_gray(70);
pub const CHECKER_DARK: egui::Color32 = egui::Color32::from_gray(50);
pub const CHECKER_CELL: f32 = 8.0;

/// Stroke width of the brush outline drawn under the pointer.
pub const CURSOR_STROKE: f32 = 2.0;

/// Dark theme tuned so texture colors read true against the chrome.
pub fn apply_editor_style(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = egui::Color32::from_rgb(24, 22, 20);
    visuals.window_fill = egui::Color32::from_rgb(30, 28, 26);
    visuals.extreme_bg_color = egui::Color32::from_rgb(16, 15, 14);
    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(48, 44, 40);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(92, 70, 44);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgb(150, 96, 40);
    visuals.selection.bg_fill = egui::Color32::from_rgb(176, 110, 46);
    visuals.window_rounding = egui::Rounding::same(6.0);
    visuals.window_shadow = egui::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 16.0,
        spread: 0.0,
        color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 120),
    };
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.slider_width = 140.0;
    ctx.set_style(style);
}

/// Fill `rect` with a checkerboard so transparency is visible.
pub fn paint_checkerboard(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 0.0, CHECKER_DARK);
    let cols = (rect.width() / CHECKER_CELL).ceil() as usize;
    let rows = (rect.height() / CHECKER_CELL).ceil() as usize;
    for row in 0..rows {
        for col in (row % 2..cols).step_by(2) {
            let min = rect.min + egui::vec2(col as f32, row as f32) * CHECKER_CELL;
            let cell = egui::Rect::from_min_size(min, egui::Vec2::splat(CHECKER_CELL)).intersect(rect);
            painter.rect_filled(cell, 0.0, CHECKER_LIGHT);
        }
    }
}

/// Outline of `brush` centered on a screen position, scaled by the canvas zoom
/// and drawn in the brush color.
pub fn brush_cursor(center: egui::Pos2, brush: &Brush, zoom: f32) -> egui::Shape {
    let side = brush.size as f32 * zoom;
    let stroke = egui::Stroke::new(CURSOR_STROKE, brush.color.to_color32());
    match brush.shape {
        BrushShape::Circle => egui::Shape::circle_stroke(center, side / 2.0, stroke),
        BrushShape::Square => egui::Shape::rect_stroke(
            egui::Rect::from_center_size(center, egui::Vec2::splat(side)),
            0.0,
            stroke,
        ),
    }
}
