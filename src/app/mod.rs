pub mod input_handler;
pub mod painter;
pub mod state;

pub use painter::SkinPainterApp;
pub use state::{LaunchOptions, Session};
