use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;
use eframe::egui::{Color32, TextureHandle, TextureOptions};

use super::input_handler::PointerTracker;
use super::state::Session;
use crate::{
    brush_engine::brush::Brush,
    editor::{LoadOutcome, TextureEditor, filters::FilterSet},
    styling,
    ui::{self, top_bar::TopBarAction},
    utils::exporter::{ExportFormat, ensure_extension, save_bytes},
    utils::profiler::ScopeTimer,
};

/// Desktop shell around a single [`TextureEditor`].
pub struct SkinPainterApp {
    pub(crate) editor: TextureEditor,
    pub(crate) title: String,
    pub(crate) brush: Brush,
    pub(crate) filters: FilterSet,
    pub(crate) tracker: PointerTracker,
    pub(crate) texture: Option<TextureHandle>,
    pub(crate) uploaded_revision: Option<u64>,
    pub(crate) status: Option<String>,
}

impl SkinPainterApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: Session) -> Self {
        styling::apply_editor_style(&cc.egui_ctx);

        let mut editor = TextureEditor::new(session.config);
        let ctx = cc.egui_ctx.clone();
        editor.on_ready(move || ctx.request_repaint());
        if let Some(source) = session.texture {
            editor.load_texture(source);
        }

        Self {
            brush: editor.brush().clone(),
            filters: editor.filters().clone(),
            editor,
            title: session.title,
            tracker: PointerTracker::new(),
            texture: None,
            uploaded_revision: None,
            status: None,
        }
    }

    fn apply_action(&mut self, action: TopBarAction) {
        match action {
            TopBarAction::Open => {
                if let Some(path) = pick_texture() {
                    self.status = Some(format!("Loading {}...", path.display()));
                    self.editor.load_texture(path);
                }
            }
            TopBarAction::Export(format) => self.export(format),
            TopBarAction::ClearPainting => self.editor.clear_painting(),
            TopBarAction::ToggleOutline => {
                self.editor.toggle_outline();
            }
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(path) = pick_export_path(&self.title, format) else {
            return;
        };
        let path = ensure_extension(path, format.extension());
        let result = self
            .editor
            .export_image_as(format)
            .and_then(|bytes| save_bytes(path.clone(), &bytes));
        self.status = Some(match result {
            Ok(()) => {
                log::info!("exported {}", path.display());
                format!("Saved to {}", path.display())
            }
            Err(err) => {
                log::error!("export failed: {err}");
                format!("Export failed: {err}")
            }
        });
    }

    /// Files dropped onto the window replace the base texture; the last one wins.
    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = file.path {
                self.editor.load_texture(path);
            } else if let Some(bytes) = file.bytes {
                self.editor.load_texture(bytes.to_vec());
            }
        }
    }

    fn collect_loads(&mut self) {
        for outcome in self.editor.poll_loads() {
            match outcome {
                LoadOutcome::Applied { .. } => self.status = None,
                LoadOutcome::Failed { error, .. } => {
                    self.status = Some(format!("Could not load texture: {error}"));
                }
                LoadOutcome::Discarded { .. } => {}
            }
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context) {
        if self.uploaded_revision == Some(self.editor.revision()) {
            return;
        }
        let _timer = ScopeTimer::new("texture_upload");
        let img = self.editor.render_image();
        let size = [img.width() as usize, img.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
        match &mut self.texture {
            Some(handle) => handle.set(color_image, TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("skin_editor", color_image, TextureOptions::NEAREST));
            }
        }
        self.uploaded_revision = Some(self.editor.revision());
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (w, h) = (self.editor.width() as f32, self.editor.height() as f32);
        let available = ui.available_size();
        let zoom = (available.x / w).min(available.y / h).max(0.1) * 0.95;
        let size = egui::vec2(w, h) * zoom;
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

        let painter = ui.painter_at(rect);
        styling::paint_checkerboard(&painter, rect);
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        if let Some(hover) = response.hover_pos() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::None);
            painter.add(styling::brush_cursor(hover, self.editor.brush(), zoom));
        }

        let editor_size = [self.editor.width(), self.editor.height()];
        let events = ui.ctx().input(|i| i.events.clone());
        for event in &events {
            if let Some(pointer) = self.tracker.translate(event, rect, editor_size) {
                self.editor.handle_pointer(pointer);
            }
        }
    }
}

fn pick_texture() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "tif", "tiff", "bmp"])
        .pick_file()
}

fn pick_export_path(title: &str, format: ExportFormat) -> Option<PathBuf> {
    let name = format!("{}.{}", crate::catalog::slugify(title), format.extension());
    rfd::FileDialog::new()
        .set_file_name(name)
        .add_filter(format.label(), &[format.extension()])
        .save_file()
}

impl eframe::App for SkinPainterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.accept_dropped_files(ctx);
        self.collect_loads();

        let outline_available = self.editor.config().outline_enabled;
        if let Some(action) = ui::top_bar::top_bar(
            ctx,
            &self.title,
            outline_available,
            self.editor.outline_visible(),
            self.status.as_deref(),
        ) {
            self.apply_action(action);
        }

        if ui::brush_settings::brush_settings_window(ctx, &mut self.brush) {
            if let Err(err) = self.editor.set_brush(self.brush.clone()) {
                self.status = Some(err.to_string());
                self.brush = self.editor.brush().clone();
            }
        }

        let available = self.editor.config().available_filters.clone();
        if ui::filter_settings::filter_settings_window(ctx, &mut self.filters, &available) {
            self.editor.set_filters(self.filters.clone());
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas(ui);
        });

        self.editor.tick(Instant::now());
        self.sync_texture(ctx);

        if self.editor.loads_in_flight() > 0 || self.tracker.buttons().any() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
