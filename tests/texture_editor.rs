use image::{Rgba, RgbaImage};
use skin_painter::brush_engine::paint_layer::{PointerButtons, PointerEvent};
use skin_painter::editor::LoadOutcome;
use skin_painter::utils::exporter::{ExportFormat, encode_image};
use skin_painter::utils::vector::Vec2;
use skin_painter::{
    Brush, EditorConfig, EditorError, FilterSet, ModelViewer, TextureEditor, TextureSource,
};
use std::time::Instant;

fn png(img: &RgbaImage) -> Vec<u8> {
    encode_image(img, ExportFormat::PNG).unwrap()
}

fn solid_png(w: u32, h: u32, color: [u8; 4]) -> Vec<u8> {
    png(&RgbaImage::from_pixel(w, h, Rgba(color)))
}

fn gradient_png(w: u32, h: u32) -> Vec<u8> {
    png(&RgbaImage::from_fn(w, h, |x, y| {
        Rgba([(x * 255 / w) as u8, (y * 255 / h) as u8, 120, 255])
    }))
}

fn down(x: f32, y: f32, buttons: PointerButtons) -> PointerEvent {
    PointerEvent::Down {
        pos: Vec2::new(x, y),
        buttons,
    }
}

fn moved(x: f32, y: f32, buttons: PointerButtons) -> PointerEvent {
    PointerEvent::Move {
        pos: Vec2::new(x, y),
        buttons,
    }
}

fn up(x: f32, y: f32) -> PointerEvent {
    PointerEvent::Up {
        pos: Vec2::new(x, y),
    }
}

fn alpha_at(img: &RgbaImage, x: u32, y: u32) -> u8 {
    img.get_pixel(x, y).0[3]
}

#[test]
fn single_click_leaves_a_soft_red_blob() {
    let mut editor = TextureEditor::new(EditorConfig::new(100, 100));
    editor
        .set_brush(Brush::circle(24, skin_painter::utils::color::Color::red(), 0.5))
        .unwrap();
    editor.handle_pointer(down(10.0, 10.0, PointerButtons::PRIMARY));
    editor.handle_pointer(up(10.0, 10.0));
    assert!(editor.tick(Instant::now()));

    let img = editor.flatten();
    let center = img.get_pixel(10, 10).0;
    assert!(center[0] >= 250 && center[1] == 0 && center[2] == 0);
    assert!(center[3] >= 240);

    let a5 = alpha_at(&img, 15, 10);
    let a10 = alpha_at(&img, 20, 10);
    assert!(center[3] > a5 && a5 > a10 && a10 > 0);
    assert_eq!(alpha_at(&img, 23, 10), 0);
    assert_eq!(alpha_at(&img, 10, 23), 0);
    assert_eq!(alpha_at(&img, 60, 60), 0);
}

#[test]
fn fast_drag_paints_a_continuous_line() {
    let mut editor = TextureEditor::new(EditorConfig::new(120, 24));
    editor.handle_pointer(down(0.0, 12.0, PointerButtons::PRIMARY));
    editor.handle_pointer(moved(100.0, 12.0, PointerButtons::PRIMARY));
    // one stamp for the press, then 1 + ceil(100 / 3) - 1 for the segment
    assert_eq!(editor.layer().buffer().len(), 1 + 34);
    editor.tick(Instant::now());

    let img = editor.flatten();
    for x in 0..=100 {
        assert!(alpha_at(&img, x, 12) > 100, "gap at x = {x}");
    }
    assert!(editor.layer().buffer().is_empty());
}

#[test]
fn only_the_newest_load_is_shown() {
    let mut editor = TextureEditor::new(EditorConfig::new(16, 16));
    let a = editor.load_texture(solid_png(512, 512, [255, 0, 0, 255]));
    let b = editor.load_texture(solid_png(8, 8, [0, 0, 255, 255]));
    assert!(b > a);

    let outcomes = editor.wait_for_loads();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, LoadOutcome::Applied { generation } if *generation == b)));
    assert_eq!(editor.flatten().get_pixel(8, 8).0, [0, 0, 255, 255]);
}

#[test]
fn filter_toggled_off_matches_baseline() {
    let mut editor = TextureEditor::new(EditorConfig::new(32, 16));
    editor.load_texture_blocking(gradient_png(32, 16)).unwrap();
    let baseline = editor.flatten();

    let mut filters = FilterSet::default();
    filters.hue = filters.hue.with_value(50.0);
    editor.set_filters(filters.clone());
    let shifted = editor.flatten();
    assert_ne!(shifted, baseline);

    editor.set_filters(filters.clone());
    assert_eq!(editor.flatten(), shifted);

    filters.hue.enabled = false;
    editor.set_filters(filters);
    assert_eq!(editor.flatten(), baseline);
}

#[test]
fn export_twice_gives_identical_bytes() {
    let mut editor = TextureEditor::new(EditorConfig::new(40, 30));
    editor.load_texture_blocking(gradient_png(20, 15)).unwrap();
    editor.handle_pointer(down(20.0, 15.0, PointerButtons::PRIMARY));
    editor.handle_pointer(moved(30.0, 20.0, PointerButtons::PRIMARY));

    // pending stamps are committed by the first export
    let first = editor.export_image().unwrap();
    let second = editor.export_image().unwrap();
    assert_eq!(first, second);

    let decoded = image::load_from_memory(&first).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (40, 30));
    assert_eq!(decoded, editor.flatten());
}

#[test]
fn failed_load_keeps_texture_and_paint() {
    let mut editor = TextureEditor::new(EditorConfig::new(24, 24));
    editor.load_texture_blocking(solid_png(24, 24, [0, 200, 0, 255])).unwrap();
    editor.handle_pointer(down(12.0, 12.0, PointerButtons::PRIMARY));
    editor.tick(Instant::now());
    let before = editor.flatten();

    let err = editor
        .load_texture_blocking(TextureSource::Bytes(b"not an image".to_vec()))
        .unwrap_err();
    assert!(matches!(err, EditorError::Decode(_)));

    editor.load_texture("file:///no/such/dir/skin.png");
    let outcomes = editor.wait_for_loads();
    assert!(matches!(
        outcomes.as_slice(),
        [LoadOutcome::Failed {
            error: EditorError::Io { .. },
            ..
        }]
    ));

    assert_eq!(editor.flatten(), before);
}

#[test]
fn invalid_brush_keeps_previous_one() {
    let mut editor = TextureEditor::new(EditorConfig::new(8, 8));
    let good = Brush::square(6, skin_painter::utils::color::Color::rgb(1, 2, 3));
    editor.set_brush(good.clone()).unwrap();

    let mut bad = good.clone();
    bad.size = 0;
    assert!(matches!(editor.set_brush(bad), Err(EditorError::InvalidBrush(_))));
    assert_eq!(editor.brush(), &good);
}

#[test]
fn export_without_texture_is_paint_over_transparent() {
    let mut editor = TextureEditor::new(EditorConfig::new(50, 50));
    assert!(!editor.has_texture());
    editor.handle_pointer(down(25.0, 25.0, PointerButtons::PRIMARY));

    let bytes = editor.export_image().unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert!(alpha_at(&img, 25, 25) > 200);
    assert_eq!(alpha_at(&img, 0, 0), 0);
    assert_eq!(alpha_at(&img, 49, 49), 0);
}

#[test]
fn secondary_button_erases_paint() {
    let mut editor = TextureEditor::new(EditorConfig::new(40, 40));
    editor
        .set_brush(Brush::square(10, skin_painter::utils::color::Color::red()))
        .unwrap();
    editor.handle_pointer(down(20.0, 20.0, PointerButtons::PRIMARY));
    editor.handle_pointer(up(20.0, 20.0));
    editor.tick(Instant::now());
    assert_eq!(alpha_at(&editor.flatten(), 20, 20), 255);

    editor.handle_pointer(down(20.0, 20.0, PointerButtons::SECONDARY));
    editor.handle_pointer(up(20.0, 20.0));
    editor.tick(Instant::now());
    assert_eq!(alpha_at(&editor.flatten(), 20, 20), 0);
}

#[test]
fn clear_painting_keeps_the_base() {
    let mut editor = TextureEditor::new(EditorConfig::new(16, 16));
    editor.load_texture_blocking(solid_png(16, 16, [9, 9, 9, 255])).unwrap();
    let base = editor.flatten();
    editor.handle_pointer(down(8.0, 8.0, PointerButtons::PRIMARY));
    editor.tick(Instant::now());
    assert_ne!(editor.flatten(), base);

    editor.clear_painting();
    assert!(editor.surface().is_blank());
    assert_eq!(editor.flatten(), base);
}

struct RecordingViewer {
    materials: Vec<Option<Vec<u8>>>,
}

impl ModelViewer for RecordingViewer {
    fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn set_texture(&mut self, image: &[u8], material_index: usize) -> Result<(), EditorError> {
        self.materials[material_index] = Some(image.to_vec());
        Ok(())
    }
}

#[test]
fn export_is_pushed_to_the_requested_material() {
    let mut editor = TextureEditor::new(EditorConfig::new(12, 12));
    editor.load_texture_blocking(solid_png(12, 12, [30, 60, 90, 255])).unwrap();
    let mut viewer = RecordingViewer {
        materials: vec![None, None],
    };

    editor.push_to_viewer(&mut viewer, 1).unwrap();
    assert!(viewer.materials[0].is_none());
    assert_eq!(viewer.materials[1].as_deref(), Some(editor.export_image().unwrap().as_slice()));

    assert!(matches!(
        editor.push_to_viewer(&mut viewer, 2),
        Err(EditorError::MaterialOutOfRange { index: 2, count: 2 })
    ));
}
