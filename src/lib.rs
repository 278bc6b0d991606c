pub mod app;
pub mod brush_engine;
pub mod canvas;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod styling;
pub mod ui;
pub mod utils;
pub mod viewer;

pub use app::{LaunchOptions, SkinPainterApp};
pub use brush_engine::brush::{Brush, BrushShape};
pub use catalog::{Catalog, Item, TextureInfo};
pub use editor::{EditorConfig, FilterSet, TextureEditor, TextureSource};
pub use error::EditorError;
pub use viewer::{ModelViewer, ModelViewerSettings};
