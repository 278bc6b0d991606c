pub mod config;
pub mod filters;
pub mod loader;
pub mod outline;
pub mod texture_editor;
pub mod throttle;

pub use config::{EditorConfig, OutlineSettings};
pub use filters::{FilterInput, FilterKind, FilterSet};
pub use loader::TextureSource;
pub use texture_editor::{LoadOutcome, TextureEditor};
