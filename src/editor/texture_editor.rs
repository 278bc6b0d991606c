use std::time::Instant;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::brush_engine::brush::Brush;
use crate::brush_engine::paint_layer::{PaintLayer, PointerEvent};
use crate::canvas::surface::PaintSurface;
use crate::editor::config::EditorConfig;
use crate::editor::filters::{Adjustments, FilterSet};
use crate::editor::loader::{LoadResult, TextureLoader, TextureSource, decode};
use crate::editor::outline::extract_outline;
use crate::editor::throttle::Throttle;
use crate::error::EditorError;
use crate::utils::exporter::{ExportFormat, encode_image};
use crate::utils::profiler::ScopeTimer;
use crate::viewer::{ModelViewer, check_material};

pub type ReadyCallback = Box<dyn FnMut()>;
pub type ChangeCallback = Box<dyn FnMut()>;
pub type ErrorCallback = Box<dyn FnMut(&EditorError)>;

/// What happened to one finished texture load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Became the new base texture.
    Applied { generation: u64 },
    /// A newer load had already settled; result dropped.
    Discarded { generation: u64 },
    /// Could not be read or decoded; editor state untouched.
    Failed { generation: u64, error: EditorError },
}

impl LoadOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            LoadOutcome::Applied { generation }
            | LoadOutcome::Discarded { generation }
            | LoadOutcome::Failed { generation, .. } => *generation,
        }
    }
}

/// Skin editor: a base texture with adjustable filters, a paint surface on
/// top and an optional outline overlay, all at the configured size.
pub struct TextureEditor {
    config: EditorConfig,
    /// Base texture stretched to the editor size.
    base: Option<RgbaImage>,
    /// `base` with the current filters applied.
    filtered: Option<RgbaImage>,
    outline: Option<RgbaImage>,
    outline_visible: bool,
    filters: FilterSet,
    adjustments: Adjustments,
    layer: PaintLayer,
    loader: TextureLoader,
    applied_generation: u64,
    throttle: Throttle,
    revision: u64,
    on_ready: Option<ReadyCallback>,
    on_change: Option<ChangeCallback>,
    on_error: Option<ErrorCallback>,
}

impl TextureEditor {
    pub fn new(config: EditorConfig) -> Self {
        let layer = PaintLayer::new(config.width as usize, config.height as usize);
        let throttle = Throttle::new(config.change_interval);
        Self {
            config,
            base: None,
            filtered: None,
            outline: None,
            outline_visible: false,
            filters: FilterSet::default(),
            adjustments: Adjustments::default(),
            layer,
            loader: TextureLoader::new(),
            applied_generation: 0,
            throttle,
            revision: 0,
            on_ready: None,
            on_change: None,
            on_error: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Called once a loaded texture and its outline are in place.
    pub fn on_ready(&mut self, callback: impl FnMut() + 'static) {
        self.on_ready = Some(Box::new(callback));
    }

    /// Called (throttled) whenever the visible result changes.
    pub fn on_change(&mut self, callback: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Called for every failed texture load.
    pub fn on_error(&mut self, callback: impl FnMut(&EditorError) + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    /// Bumped on every visible change; lets the host know when to re-upload.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_texture(&self) -> bool {
        self.base.is_some()
    }

    /// Base texture at editor size, before filters.
    pub fn base_image(&self) -> Option<&RgbaImage> {
        self.base.as_ref()
    }

    pub fn outline_image(&self) -> Option<&RgbaImage> {
        self.outline.as_ref()
    }

    pub fn surface(&self) -> &PaintSurface {
        self.layer.surface()
    }

    pub fn layer(&self) -> &PaintLayer {
        &self.layer
    }

    /// Start loading a texture in the background. Returns the request's
    /// generation; only the newest settled load ever becomes visible.
    pub fn load_texture(&mut self, source: impl Into<TextureSource>) -> u64 {
        self.loader.request(source.into())
    }

    /// Load and apply a texture on the calling thread.
    pub fn load_texture_blocking(
        &mut self,
        source: impl Into<TextureSource>,
    ) -> Result<(), EditorError> {
        let source = source.into();
        let generation = self.loader.allocate_generation();
        let result = LoadResult {
            generation,
            label: source.label(),
            image: decode(&source),
        };
        match self.apply_load(result) {
            LoadOutcome::Failed { error, .. } => Err(error),
            _ => Ok(()),
        }
    }

    /// Apply every load that finished since the last call.
    pub fn poll_loads(&mut self) -> Vec<LoadOutcome> {
        let results = self.loader.drain();
        results.into_iter().map(|r| self.apply_load(r)).collect()
    }

    /// Block until all background loads have settled, applying them in
    /// arrival order.
    pub fn wait_for_loads(&mut self) -> Vec<LoadOutcome> {
        let results = self.loader.wait_all();
        results.into_iter().map(|r| self.apply_load(r)).collect()
    }

    pub fn loads_in_flight(&self) -> usize {
        self.loader.in_flight()
    }

    fn apply_load(&mut self, result: LoadResult) -> LoadOutcome {
        let LoadResult {
            generation,
            label,
            image,
        } = result;

        if generation <= self.applied_generation {
            log::debug!(
                "discarding stale texture {label} (generation {generation}, showing {})",
                self.applied_generation
            );
            return LoadOutcome::Discarded { generation };
        }

        // A settled failure also retires older requests still in flight.
        self.applied_generation = generation;

        match image {
            Ok(img) => {
                self.set_base(img);
                log::debug!("texture {label} ready (generation {generation})");
                if let Some(cb) = self.on_ready.as_mut() {
                    cb();
                }
                LoadOutcome::Applied { generation }
            }
            Err(error) => {
                log::warn!("failed to load texture {label}: {error}");
                if let Some(cb) = self.on_error.as_mut() {
                    cb(&error);
                }
                LoadOutcome::Failed { generation, error }
            }
        }
    }

    fn set_base(&mut self, img: RgbaImage) {
        let _timer = ScopeTimer::new("set_base");
        let (w, h) = (self.config.width, self.config.height);
        let scaled = if img.dimensions() == (w, h) {
            img
        } else {
            imageops::resize(&img, w, h, FilterType::Triangle)
        };
        self.outline = Some(extract_outline(&scaled, &self.config.outline));
        self.filtered = Some(self.adjustments.apply(&scaled));
        self.base = Some(scaled);
        self.mark_changed(Instant::now());
    }

    pub fn brush(&self) -> &Brush {
        self.layer.brush()
    }

    /// Switch brushes. An invalid brush is rejected and the current one kept.
    pub fn set_brush(&mut self, brush: Brush) -> Result<(), EditorError> {
        self.layer.set_brush(brush).inspect_err(|err| {
            log::warn!("rejected brush: {err}");
        })
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Replace the filter set. Disabled or unavailable filters render at their
    /// default, so the result depends only on the resolved values.
    pub fn set_filters(&mut self, filters: FilterSet) {
        let adjustments = filters.resolve(&self.config.available_filters);
        self.filters = filters;
        if adjustments == self.adjustments {
            return;
        }
        self.adjustments = adjustments;
        if let Some(base) = &self.base {
            self.filtered = Some(adjustments.apply(base));
        }
        self.mark_changed(Instant::now());
    }

    /// Flip the outline overlay. Returns the new visibility; stays hidden when
    /// the outline is disabled for this editor.
    pub fn toggle_outline(&mut self) -> bool {
        if !self.config.outline_enabled {
            return false;
        }
        self.outline_visible = !self.outline_visible;
        self.revision += 1;
        self.outline_visible
    }

    pub fn outline_visible(&self) -> bool {
        self.outline_visible
    }

    /// Drop all paint, committed and pending. Base texture and filters stay.
    pub fn clear_painting(&mut self) {
        self.layer.clear();
        self.mark_changed(Instant::now());
    }

    /// Feed a pointer event in editor pixel coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.layer.handle_event(event)
    }

    /// Per-frame work: commit pending stamps and fire `on_change` at most once
    /// per configured interval. Returns true when the paint surface changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let painted = {
            let _timer = ScopeTimer::new("flush");
            self.layer.tick()
        };
        if painted {
            self.mark_changed(now);
        } else if self.throttle.poll(now) {
            self.notify_change();
        }
        painted
    }

    fn mark_changed(&mut self, now: Instant) {
        self.revision += 1;
        if self.throttle.request(now) {
            self.notify_change();
        }
    }

    fn notify_change(&mut self) {
        if let Some(cb) = self.on_change.as_mut() {
            cb();
        }
    }

    /// Filtered base (transparent when nothing is loaded) with the committed
    /// paint on top. No outline.
    pub fn flatten(&self) -> RgbaImage {
        let mut out = match &self.filtered {
            Some(img) => img.clone(),
            None => RgbaImage::new(self.config.width, self.config.height),
        };
        self.layer.surface().composite_over(&mut out);
        out
    }

    /// What the editor shows: `flatten` plus the outline when visible.
    pub fn render_image(&self) -> RgbaImage {
        let mut out = self.flatten();
        if let (true, Some(outline)) = (self.outline_visible, &self.outline) {
            imageops::overlay(&mut out, outline, 0, 0);
        }
        out
    }

    /// Commit pending paint and encode the flattened result as PNG.
    pub fn export_image(&mut self) -> Result<Vec<u8>, EditorError> {
        self.export_image_as(ExportFormat::PNG)
    }

    pub fn export_image_as(&mut self, format: ExportFormat) -> Result<Vec<u8>, EditorError> {
        let _timer = ScopeTimer::new("export");
        if self.layer.tick() {
            self.mark_changed(Instant::now());
        }
        encode_image(&self.flatten(), format)
    }

    /// Export and bind the result to one of the viewer's materials.
    pub fn push_to_viewer(
        &mut self,
        viewer: &mut dyn ModelViewer,
        material_index: usize,
    ) -> Result<(), EditorError> {
        check_material(viewer, material_index)?;
        let bytes = self.export_image()?;
        viewer.set_texture(&bytes, material_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush_engine::paint_layer::PointerButtons;
    use crate::utils::vector::Vec2;
    use image::Rgba;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    fn result(generation: u64, image: RgbaImage) -> LoadResult {
        LoadResult {
            generation,
            label: format!("test {generation}"),
            image: Ok(image),
        }
    }

    #[test]
    fn newer_load_wins_even_when_it_lands_first() {
        let mut editor = TextureEditor::new(EditorConfig::new(4, 4));
        let a = editor.loader.allocate_generation();
        let b = editor.loader.allocate_generation();
        editor.loader.deliver(result(b, solid(4, 4, [0, 0, 255, 255])));
        editor.loader.deliver(result(a, solid(4, 4, [255, 0, 0, 255])));

        let outcomes = editor.poll_loads();
        assert!(matches!(outcomes[0], LoadOutcome::Applied { generation } if generation == b));
        assert!(matches!(outcomes[1], LoadOutcome::Discarded { generation } if generation == a));
        assert_eq!(editor.flatten().get_pixel(1, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn failed_newer_load_retires_older_one() {
        let mut editor = TextureEditor::new(EditorConfig::new(4, 4));
        let first = editor.loader.allocate_generation();
        editor.loader.deliver(result(first, solid(4, 4, [0, 255, 0, 255])));
        editor.poll_loads();
        let before = editor.flatten();

        let a = editor.loader.allocate_generation();
        let b = editor.loader.allocate_generation();
        editor.loader.deliver(LoadResult {
            generation: b,
            label: "broken".to_string(),
            image: decode(&TextureSource::Bytes(vec![1, 2, 3])),
        });
        editor.loader.deliver(result(a, solid(4, 4, [255, 0, 0, 255])));

        let outcomes = editor.poll_loads();
        assert!(matches!(
            outcomes[0],
            LoadOutcome::Failed { generation, error: EditorError::Decode(_) } if generation == b
        ));
        assert!(matches!(outcomes[1], LoadOutcome::Discarded { generation } if generation == a));
        assert_eq!(editor.flatten(), before);
    }

    #[test]
    fn load_notifies_change_before_ready() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut editor = TextureEditor::new(EditorConfig::new(2, 2));
        let e = events.clone();
        editor.on_change(move || e.borrow_mut().push("change"));
        let e = events.clone();
        editor.on_ready(move || e.borrow_mut().push("ready"));

        editor.load_texture_blocking(TextureSource::Bytes(
            crate::utils::exporter::encode_image(&solid(2, 2, [9, 9, 9, 255]), ExportFormat::PNG)
                .unwrap(),
        ))
        .unwrap();
        assert_eq!(*events.borrow(), ["change", "ready"]);
    }

    #[test]
    fn export_commit_counts_as_a_change() {
        let changes = Rc::new(Cell::new(0));
        let mut editor = TextureEditor::new(EditorConfig::new(16, 16));
        let c = changes.clone();
        editor.on_change(move || c.set(c.get() + 1));

        editor.handle_pointer(PointerEvent::Down {
            pos: Vec2::new(8.0, 8.0),
            buttons: PointerButtons::PRIMARY,
        });
        let revision = editor.revision();
        editor.export_image().unwrap();
        assert!(editor.revision() > revision);
        assert_eq!(changes.get(), 1);

        // nothing pending the second time
        let revision = editor.revision();
        editor.export_image().unwrap();
        assert_eq!(editor.revision(), revision);
    }

    #[test]
    fn base_is_stretched_to_editor_size() {
        let mut editor = TextureEditor::new(EditorConfig::new(10, 4));
        let g = editor.loader.allocate_generation();
        editor.loader.deliver(result(g, solid(3, 7, [5, 6, 7, 255])));
        editor.poll_loads();
        assert_eq!(editor.base_image().map(|b| b.dimensions()), Some((10, 4)));
        assert_eq!(editor.outline_image().map(|o| o.dimensions()), Some((10, 4)));
    }

    #[test]
    fn ready_and_error_callbacks_fire() {
        let ready = Rc::new(Cell::new(0));
        let errors = Rc::new(Cell::new(0));
        let mut editor = TextureEditor::new(EditorConfig::new(2, 2));
        let r = ready.clone();
        editor.on_ready(move || r.set(r.get() + 1));
        let e = errors.clone();
        editor.on_error(move |_| e.set(e.get() + 1));

        let g = editor.loader.allocate_generation();
        editor.loader.deliver(result(g, solid(2, 2, [1, 1, 1, 255])));
        editor.poll_loads();
        assert!(editor.load_texture_blocking(vec![1u8, 2, 3]).is_err());

        assert_eq!(ready.get(), 1);
        assert_eq!(errors.get(), 1);
        assert!(editor.has_texture());
    }

    #[test]
    fn change_notifications_are_throttled() {
        let changes = Rc::new(Cell::new(0));
        let mut editor = TextureEditor::new(EditorConfig::new(32, 32));
        let c = changes.clone();
        editor.on_change(move || c.set(c.get() + 1));

        let start = Instant::now();
        let ms = std::time::Duration::from_millis(1);
        editor.handle_pointer(PointerEvent::Down {
            pos: Vec2::new(5.0, 5.0),
            buttons: PointerButtons::PRIMARY,
        });
        assert!(editor.tick(start));
        assert_eq!(changes.get(), 1);

        editor.handle_pointer(PointerEvent::Move {
            pos: Vec2::new(9.0, 5.0),
            buttons: PointerButtons::PRIMARY,
        });
        assert!(editor.tick(start + 4 * ms));
        assert_eq!(changes.get(), 1);

        // nothing new to paint, but the coalesced notification is released
        assert!(!editor.tick(start + 20 * ms));
        assert_eq!(changes.get(), 2);
        assert!(!editor.tick(start + 60 * ms));
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn outline_toggle_respects_config() {
        let mut editor = TextureEditor::new(EditorConfig::new(4, 4));
        assert!(editor.toggle_outline());
        assert!(!editor.toggle_outline());

        let mut plain = TextureEditor::new(EditorConfig::new(4, 4).without_outline());
        assert!(!plain.toggle_outline());
        assert!(!plain.outline_visible());
    }

    #[test]
    fn outline_only_shows_in_render() {
        let mut editor = TextureEditor::new(EditorConfig::new(8, 8));
        let g = editor.loader.allocate_generation();
        let img = RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        editor.loader.deliver(result(g, img));
        editor.poll_loads();
        editor.toggle_outline();
        assert_ne!(editor.render_image(), editor.flatten());
        editor.toggle_outline();
        assert_eq!(editor.render_image(), editor.flatten());
    }
}
