use crate::utils::exporter::ExportFormat;
use eframe::egui;

/// Something the user asked for from the top bar.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TopBarAction {
    Open,
    Export(ExportFormat),
    ClearPainting,
    ToggleOutline,
}

pub fn top_bar(
    ctx: &egui::Context,
    title: &str,
    outline_available: bool,
    outline_visible: bool,
    status: Option<&str>,
) -> Option<TopBarAction> {
    let mut action = None;
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.strong(title);
            ui.separator();
            if ui.button("Open...").clicked() {
                action = Some(TopBarAction::Open);
            }
            ui.menu_button("Export", |ui| {
                for format in [ExportFormat::PNG, ExportFormat::JPEG, ExportFormat::TIFF] {
                    if ui.button(format.label()).clicked() {
                        action = Some(TopBarAction::Export(format));
                        ui.close_menu();
                    }
                }
            });
            if ui.button("Clear painting").clicked() {
                action = Some(TopBarAction::ClearPainting);
            }
            if ui
                .add_enabled(
                    outline_available,
                    egui::SelectableLabel::new(outline_visible, "Outline"),
                )
                .clicked()
            {
                action = Some(TopBarAction::ToggleOutline);
            }
            if let Some(status) = status {
                ui.separator();
                ui.label(status);
            }
        });
    });
    action
}
