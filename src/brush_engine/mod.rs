//! Brush stamps, the pending-stamp buffer and the pointer-driven paint layer.
pub mod brush;
pub mod paint_buffer;
pub mod paint_layer;
pub mod stamp;
