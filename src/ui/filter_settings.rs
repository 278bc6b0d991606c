use crate::editor::filters::{FilterKind, FilterSet};
use eframe::egui;

/// Adjustment sliders, one per available filter. Returns true on any change.
pub fn filter_settings_window(
    ctx: &egui::Context,
    filters: &mut FilterSet,
    available: &[FilterKind],
) -> bool {
    let before = filters.clone();
    egui::Window::new("Filters")
        .default_width(220.0)
        .show(ctx, |ui| {
            for &kind in available {
                let input = filters.get_mut(kind);
                ui.horizontal(|ui| {
                    ui.checkbox(&mut input.enabled, kind.label());
                    ui.add_enabled(
                        input.enabled,
                        egui::Slider::new(&mut input.value, input.min_value..=input.max_value),
                    );
                });
                if kind == FilterKind::Hue {
                    ui.add_enabled(
                        input.enabled,
                        egui::Checkbox::new(&mut input.colorize, "Colorize"),
                    );
                }
            }
            ui.separator();
            if ui.button("Reset").clicked() {
                *filters = FilterSet::default();
            }
        });
    *filters != before
}
