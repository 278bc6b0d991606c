use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::editor::config::EditorConfig;
use crate::editor::loader::TextureSource;
use crate::error::EditorError;

/// Command-line options for the desktop binary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchOptions {
    pub texture: Option<String>,
    pub size: Option<(u32, u32)>,
    pub catalog: Option<PathBuf>,
    pub item: Option<String>,
    pub display_height: Option<f32>,
}

/// Everything the app needs to open its first editor.
#[derive(Debug)]
pub struct Session {
    pub title: String,
    pub config: EditorConfig,
    pub texture: Option<TextureSource>,
}

impl LaunchOptions {
    pub fn from_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parse `--flag value` and `--flag=value` pairs. Unknown flags and
    /// malformed values are logged and skipped.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg, None),
            };
            let mut value = || inline.clone().or_else(|| args.next());
            match flag.as_str() {
                "--texture" => options.texture = value(),
                "--catalog" => options.catalog = value().map(PathBuf::from),
                "--item" => options.item = value(),
                "--size" => {
                    if let Some(v) = value() {
                        options.size = parse_size(&v);
                        if options.size.is_none() {
                            log::warn!("ignoring --size {v:?}, expected WIDTHxHEIGHT");
                        }
                    }
                }
                "--display-height" => {
                    if let Some(v) = value() {
                        options.display_height = v.parse::<f32>().ok().filter(|h| *h > 0.0);
                        if options.display_height.is_none() {
                            log::warn!("ignoring --display-height {v:?}");
                        }
                    }
                }
                other => log::warn!("unknown argument {other:?}"),
            }
        }
        options
    }

    /// Work out the editor size and initial texture. A catalog item wins over
    /// `--size`; `--texture` overrides the item's own texture.
    pub fn resolve(&self) -> Result<Session, EditorError> {
        let explicit_texture = self.texture.as_deref().map(TextureSource::from);

        if let Some(id) = &self.item {
            let catalog = match &self.catalog {
                Some(path) => Catalog::load(path)?,
                None => Catalog::quake(),
            };
            let item = catalog.get(id)?;
            let texture = item
                .textures
                .first()
                .ok_or_else(|| EditorError::UnknownItem(format!("{id} has no textures")))?;
            let height = self.display_height.unwrap_or_else(|| item.display_height());
            return Ok(Session {
                title: item.name.clone(),
                config: EditorConfig::for_texture(texture, height),
                texture: explicit_texture.or_else(|| Some(TextureSource::from(texture.path.as_str()))),
            });
        }

        let config = match self.size {
            Some((w, h)) => EditorConfig::new(w, h),
            None => EditorConfig::default(),
        };
        Ok(Session {
            title: "Untitled".to_string(),
            config,
            texture: explicit_texture,
        })
    }
}

fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}
