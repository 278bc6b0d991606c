//! egui panels around the texture editor.
pub mod brush_settings;
pub mod filter_settings;
pub mod top_bar;
