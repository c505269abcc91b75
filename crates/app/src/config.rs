//! Scene file: which wall meshes to load and where their images live.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

pub const DEFAULT_CONFIG: &str = "wallmapper.toml";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Misc {
    /// Eye height above the wall origin.
    pub camera_height: f32,
    /// Log the UV-space corner vertices of every mesh after loading.
    pub output_corner_vertices: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ObjectConfig {
    pub name: String,
    pub model: PathBuf,
    #[serde(default)]
    pub images: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SceneConfig {
    #[serde(default)]
    pub misc: Misc,
    #[serde(default, rename = "object")]
    pub objects: Vec<ObjectConfig>,
}

impl SceneConfig {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid scene config")
    }

    /// Read a config file. Relative mesh and image paths are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading scene config {}", path.display());
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for object in &mut self.objects {
            object.model = base.join(&object.model);
            if let Some(images) = object.images.as_mut() {
                *images = base.join(&*images);
            }
        }
    }
}

/// Find `path`, or a file of the same name in one of its ancestor
/// directories.
pub fn find_config(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("Config path has no file name: {}", path.display()))?;
    let start = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().context("Failed to read working directory")?,
    };
    let start = std::path::absolute(&start).unwrap_or(start);

    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| anyhow!("Could not find '{}'", name.to_string_lossy()))
}
