//! Wall objects and the per-frame handlers that drive their image caches.

use std::{cell::RefCell, rc::Rc};

use anyhow::{Context, Result};
use asset::{ImageCache, MeshData, TextureStore, list_image_paths, load_mesh};
use corelib::{AppState, Mat4};

use crate::config::{ObjectConfig, SceneConfig};

/// One texture store shared by every object's cache.
pub type SharedTextures = Rc<RefCell<TextureStore>>;

pub struct SceneObject {
    pub name: String,
    pub mesh: MeshData,
    pub images: ImageCache<SharedTextures>,
}

impl SceneObject {
    pub fn load(config: &ObjectConfig, textures: &SharedTextures, report_corners: bool) -> Result<Self> {
        let (mesh, report) = load_mesh(&config.model, report_corners).with_context(|| {
            format!("Failed to load mesh '{}': {}", config.name, config.model.display())
        })?;
        log::info!(
            "'{}': {} triangles from {}",
            config.name,
            mesh.triangle_count(),
            config.model.display()
        );

        if let Some(report) = report {
            log::info!("Corner vertices of '{}':\n{}", config.name, report);
            if !report.is_complete() {
                log::warn!("'{}' has no UV extent on at least one corner", config.name);
            }
        }

        let paths = match &config.images {
            Some(dir) => list_image_paths(dir).with_context(|| {
                format!("Failed to list images for '{}': {}", config.name, dir.display())
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            name: config.name.clone(),
            mesh,
            images: ImageCache::new(paths, Rc::clone(textures)),
        })
    }

    /// `name: path (handle)`, handle 0 when nothing is resident.
    pub fn status_line(&self) -> String {
        let handle = self.images.texture().map_or(0, |h| h.id());
        format!("{}: {} ({})", self.name, self.images.loaded_image(), handle)
    }
}

pub struct Scene {
    pub state: AppState,
    pub objects: Vec<SceneObject>,
    textures: SharedTextures,
}

impl Scene {
    /// Initialization phase: load every mesh and show the first image.
    pub fn init(config: &SceneConfig) -> Result<Self> {
        let textures = SharedTextures::default();
        let objects = config
            .objects
            .iter()
            .map(|o| SceneObject::load(o, &textures, config.misc.output_corner_vertices))
            .collect::<Result<Vec<_>>>()?;

        let mut scene = Self {
            state: AppState::new(config.misc.camera_height),
            objects,
            textures,
        };
        scene.post_sync_pre_draw();
        log::info!("Finished loading {} objects", scene.objects.len());
        Ok(scene)
    }

    pub fn pre_sync(&mut self) {
        self.state.pre_sync();
    }

    /// Point every cache at the synchronized image index.
    pub fn post_sync_pre_draw(&mut self) {
        let index = self.state.current_image as usize;
        for object in &mut self.objects {
            object.images.set_current_image(index);
        }
    }

    pub fn frame(&mut self) {
        self.pre_sync();
        self.post_sync_pre_draw();
        log::trace!("view matrix: {:?}", self.state.viewer.view());
    }

    /// Transform for drawing the objects into one viewport, given the
    /// model-view-projection the display cluster supplies for it.
    pub fn draw_transform(&self, cluster_mvp: Mat4) -> Mat4 {
        self.state.viewer.mvp(cluster_mvp)
    }

    pub fn overlay_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        if self.state.show_help {
            lines.extend(AppState::help_text().lines().map(str::to_owned));
        }
        lines.extend(self.objects.iter().map(SceneObject::status_line));
        lines.push(format!("Images // Current image: {}", self.state.current_image));
        lines
    }

    pub fn resident_textures(&self) -> usize {
        self.textures.borrow().resident_count()
    }
}
