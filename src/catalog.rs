//! Static table of game items whose skins can be edited.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::editor::config::EditorConfig;
use crate::error::EditorError;

/// Directory model and texture paths are relative to.
pub const ASSET_ROOT: &str = "assets/models";

const PLAYER_DISPLAY_HEIGHT: f32 = 520.0;
const ITEM_DISPLAY_HEIGHT: f32 = 240.0;

/// One skin texture of a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub material_index: usize,
}

impl TextureInfo {
    /// Editor size that shows this texture `display_height` pixels tall.
    pub fn editor_size(&self, display_height: f32) -> (u32, u32) {
        let scale = display_height / self.height.max(1) as f32;
        let width = (self.width as f32 * scale).round().max(1.0) as u32;
        let height = (self.height as f32 * scale).round().max(1.0) as u32;
        (width, height)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub id: String,
    pub category: String,
    pub model_path: String,
    pub textures: Vec<TextureInfo>,
    pub viewer_orientation_degrees: f32,
}

impl Item {
    /// The player skin gets a larger editor than pickups and weapons.
    pub fn display_height(&self) -> f32 {
        if self.id == "player" {
            PLAYER_DISPLAY_HEIGHT
        } else {
            ITEM_DISPLAY_HEIGHT
        }
    }

    /// One editor configuration per texture, in texture order.
    pub fn editor_configs(&self) -> Vec<EditorConfig> {
        let height = self.display_height();
        self.textures
            .iter()
            .map(|t| EditorConfig::for_texture(t, height))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<Item>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let json = std::fs::read_to_string(path).map_err(|source| EditorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, id: &str) -> Result<&Item, EditorError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| EditorError::UnknownItem(id.to_string()))
    }

    /// Category names in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for item in &self.items {
            if !out.contains(&item.category.as_str()) {
                out.push(&item.category);
            }
        }
        out
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| item.category == category)
    }

    /// Built-in Quake items.
    pub fn quake() -> Self {
        let items = vec![
            item("Green Armor", "Armors", "armor.gltf", 45.0, &[("armor_0.png", 184, 76)]),
            item("Yellow Armor", "Armors", "armor.gltf", 45.0, &[("armor_1.png", 184, 76)]),
            item("Red Armor", "Armors", "armor.gltf", 45.0, &[("armor_2.png", 184, 76)]),
            item("Player", "Units", "player.gltf", 45.0, &[("player_0.png", 296, 194)]),
            item("Super Shotgun", "Weapons", "g_shot.gltf", 45.0, &[("g_shot_0.png", 232, 132)]),
            item("Nailgun", "Weapons", "g_nail.gltf", 45.0, &[("g_nail_0.png", 308, 94)]),
            item("Super Nailgun", "Weapons", "g_nail2.gltf", 45.0, &[("g_nail2_0.png", 308, 79)]),
            item("Grenade Launcher", "Weapons", "g_rock.gltf", 45.0, &[("g_rock_0.png", 224, 195)]),
            item("Rocket Launcher", "Weapons", "g_rock2.gltf", 45.0, &[("g_rock2_0.png", 232, 156)]),
            item("Lightning Gun", "Weapons", "g_light.gltf", 45.0, &[("g_light_0.png", 308, 144)]),
            item("Grenade", "Projectiles", "grenade.gltf", 90.0, &[("grenade_0.png", 40, 44)]),
            item("Missile", "Projectiles", "missile.gltf", 90.0, &[("missile_0.png", 288, 195)]),
            item("Quad", "Powerups", "quaddama.gltf", 30.0, &[("quaddama_0.png", 308, 121)]),
            item("Pent", "Powerups", "invulner.gltf", 30.0, &[("invulner_0.png", 308, 67)]),
            item("Ring", "Powerups", "invisibl.gltf", 30.0, &[("invisibl_0.png", 104, 52)]),
            item("Backpack", "Misc", "backpack.gltf", 30.0, &[("backpack_0.png", 152, 108)]),
            item(
                "Small health",
                "Health packs",
                "bh10.gltf",
                45.0,
                &[("med3_1.png", 32, 16), ("med3_0.png", 32, 32)],
            ),
            item(
                "Large health",
                "Health packs",
                "bh25.gltf",
                45.0,
                &[("+0_med25s.png", 32, 16), ("+0_med25.png", 32, 32)],
            ),
            item(
                "Mega health",
                "Health packs",
                "bh100.gltf",
                45.0,
                &[("+3_med100.png", 240, 240), ("med100.png", 240, 240)],
            ),
        ];
        Self { items }
    }
}

fn item(
    name: &str,
    category: &str,
    model: &str,
    orientation: f32,
    textures: &[(&str, u32, u32)],
) -> Item {
    Item {
        name: name.to_string(),
        id: slugify(name),
        category: category.to_string(),
        model_path: format!("{ASSET_ROOT}/{model}"),
        textures: textures
            .iter()
            .enumerate()
            .map(|(material_index, (file, width, height))| TextureInfo {
                path: format!("{ASSET_ROOT}/{file}"),
                width: *width,
                height: *height,
                material_index,
            })
            .collect(),
        viewer_orientation_degrees: orientation,
    }
}

/// Lowercase, with runs of non-alphanumerics collapsed to `-`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_url_friendly() {
        assert_eq!(slugify("Green Armor"), "green-armor");
        assert_eq!(slugify("  Shells (small) "), "shells-small");
    }

    #[test]
    fn player_gets_the_tall_editor() {
        let catalog = Catalog::quake();
        let player = catalog.get("player").unwrap();
        let configs = player.editor_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].height, 520);
        assert_eq!(configs[0].width, 793);

        let armor = catalog.get("green-armor").unwrap();
        assert_eq!(armor.editor_configs()[0].height, 240);
    }

    #[test]
    fn multi_texture_items_keep_material_order() {
        let catalog = Catalog::quake();
        let mega = catalog.get("mega-health").unwrap();
        let indices: Vec<usize> = mega.textures.iter().map(|t| t.material_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(mega.textures[1].path, "assets/models/med100.png");
    }

    #[test]
    fn unknown_item_is_an_error() {
        assert!(matches!(
            Catalog::quake().get("bfg"),
            Err(EditorError::UnknownItem(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_items() {
        let catalog = Catalog::quake();
        let parsed = Catalog::from_json(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(parsed, catalog);
        assert_eq!(parsed.categories()[0], "Armors");
        assert_eq!(parsed.by_category("Weapons").count(), 6);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            Catalog::from_json("{\"items\": 3}"),
            Err(EditorError::Catalog(_))
        ));
    }
}
