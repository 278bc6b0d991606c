//! Hand-off point to a 3D model viewer that shows the edited skin.
use crate::catalog::Item;
use crate::error::EditorError;

/// A viewer that can bind an encoded image onto one of its model's materials.
pub trait ModelViewer {
    fn material_count(&self) -> usize;

    /// Bind `image` (encoded bytes, e.g. PNG) to `material_index`.
    fn set_texture(&mut self, image: &[u8], material_index: usize) -> Result<(), EditorError>;
}

/// What a viewer needs to show an item.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelViewerSettings {
    pub model_path: String,
    pub texture_path: Option<String>,
    pub orientation_degrees: f32,
}

impl ModelViewerSettings {
    pub fn from_item(item: &Item) -> Self {
        Self {
            model_path: item.model_path.clone(),
            texture_path: item.textures.first().map(|t| t.path.clone()),
            orientation_degrees: item.viewer_orientation_degrees,
        }
    }
}

/// Fail with [`EditorError::MaterialOutOfRange`] unless `index` names a material.
pub fn check_material(viewer: &dyn ModelViewer, index: usize) -> Result<(), EditorError> {
    let count = viewer.material_count();
    if index >= count {
        return Err(EditorError::MaterialOutOfRange { index, count });
    }
    Ok(())
}
