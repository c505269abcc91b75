//! Single-slot texture cache over a sorted list of image files.
//!
//! The current index is driven from outside, usually a frame counter that can
//! run past the end of the list. Indices outside the list are ignored and the
//! resident texture stays bound.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{AssetError, AssetResult},
    texture::{TextureHandle, TextureLoader},
};

/// List every entry of `dir`, sorted lexicographically. An empty path yields
/// an empty list. Entries are not filtered by extension.
pub fn list_image_paths(dir: impl AsRef<Path>) -> AssetResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if dir.as_os_str().is_empty() {
        return Ok(Vec::new());
    }

    let mut paths = fs::read_dir(dir)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|err| AssetError::read(dir, err))?;
    paths.sort();
    log::info!("Found {} images in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Holds at most one decoded texture out of `paths`.
pub struct ImageCache<L: TextureLoader> {
    paths: Vec<PathBuf>,
    loader: L,
    current: Option<usize>,
    texture: Option<TextureHandle>,
}

impl<L: TextureLoader> ImageCache<L> {
    /// Starts empty; nothing is loaded until [`Self::set_current_image`].
    pub fn new(paths: Vec<PathBuf>, loader: L) -> Self {
        Self {
            paths,
            loader,
            current: None,
            texture: None,
        }
    }

    /// Make image `index` the resident texture.
    ///
    /// No-op when `index` is already current or outside the path list.
    /// Otherwise the resident texture is released before the new one is
    /// loaded. A failed load is logged and leaves no resident texture; it is
    /// not retried until a different index is requested.
    pub fn set_current_image(&mut self, index: usize) {
        if self.current == Some(index) || index >= self.paths.len() {
            return;
        }

        self.current = Some(index);
        if let Some(old) = self.texture.take() {
            self.loader.release(old);
        }

        let path = &self.paths[index];
        log::debug!("Loading image {}", path.display());
        match self.loader.load(path) {
            Ok(handle) => self.texture = Some(handle),
            Err(err) => log::error!("Failed to load image {}: {}", path.display(), err),
        }
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Path of the current image, or an empty string if there is none.
    pub fn loaded_image(&self) -> String {
        self.current
            .and_then(|i| self.paths.get(i))
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: TextureLoader> Drop for ImageCache<L> {
    fn drop(&mut self) {
        if let Some(handle) = self.texture.take() {
            self.loader.release(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, num::NonZeroU32, rc::Rc};

    use super::*;

    /// Records every call instead of decoding anything.
    #[derive(Default)]
    struct CountingLoader {
        next: u32,
        loads: Vec<PathBuf>,
        released: Vec<TextureHandle>,
        live: Vec<TextureHandle>,
        fail: bool,
    }

    impl TextureLoader for CountingLoader {
        fn load(&mut self, path: &Path) -> AssetResult<TextureHandle> {
            self.loads.push(path.to_path_buf());
            if self.fail {
                return Err(AssetError::MissingResource {
                    path: path.to_path_buf(),
                });
            }
            self.next += 1;
            let handle = TextureHandle(NonZeroU32::new(self.next).unwrap());
            self.live.push(handle);
            Ok(handle)
        }

        fn release(&mut self, handle: TextureHandle) {
            self.released.push(handle);
            self.live.retain(|h| *h != handle);
        }
    }

    fn three_paths() -> Vec<PathBuf> {
        vec!["img/a.png".into(), "img/b.png".into(), "img/c.png".into()]
    }

    #[test]
    fn starts_empty() {
        let cache = ImageCache::new(three_paths(), CountingLoader::default());
        assert_eq!(cache.current_index(), None);
        assert_eq!(cache.texture(), None);
        assert_eq!(cache.loaded_image(), "");
        assert!(cache.loader().loads.is_empty());
    }

    #[test]
    fn out_of_range_then_load_then_repeat() {
        let mut cache = ImageCache::new(three_paths(), CountingLoader::default());

        cache.set_current_image(5);
        assert_eq!(cache.current_index(), None);
        assert!(cache.loader().loads.is_empty());

        cache.set_current_image(1);
        assert_eq!(cache.current_index(), Some(1));
        assert!(cache.texture().is_some());
        assert_eq!(cache.loaded_image(), PathBuf::from("img/b.png").display().to_string());

        cache.set_current_image(1);
        assert_eq!(cache.loader().loads.len(), 1);
        assert_eq!(cache.loader().live.len(), 1);
    }

    #[test]
    fn switching_evicts_previous_texture_first() {
        let mut cache = ImageCache::new(three_paths(), CountingLoader::default());
        cache.set_current_image(0);
        let first = cache.texture().unwrap();
        cache.set_current_image(2);

        let loader = cache.loader();
        assert_eq!(loader.released, vec![first]);
        assert_eq!(loader.live.len(), 1);
        assert_eq!(loader.loads.last().unwrap(), &PathBuf::from("img/c.png"));
        assert_ne!(cache.texture(), Some(first));
    }

    #[test]
    fn out_of_range_keeps_resident_texture() {
        let mut cache = ImageCache::new(three_paths(), CountingLoader::default());
        cache.set_current_image(2);
        let resident = cache.texture();

        for frame in 3..10 {
            cache.set_current_image(frame);
        }
        assert_eq!(cache.texture(), resident);
        assert_eq!(cache.current_index(), Some(2));
        assert!(cache.loader().released.is_empty());
    }

    #[test]
    fn empty_path_list_ignores_everything() {
        let mut cache = ImageCache::new(Vec::new(), CountingLoader::default());
        cache.set_current_image(0);
        assert_eq!(cache.current_index(), None);
        assert!(cache.loader().loads.is_empty());
    }

    #[test]
    fn failed_load_leaves_no_texture_and_does_not_retry() {
        let loader = CountingLoader {
            fail: true,
            ..Default::default()
        };
        let mut cache = ImageCache::new(three_paths(), loader);
        cache.set_current_image(0);
        cache.set_current_image(0);
        assert_eq!(cache.texture(), None);
        assert_eq!(cache.current_index(), Some(0));
        assert_eq!(cache.loader().loads.len(), 1);
    }

    #[test]
    fn drop_releases_resident_texture() {
        let shared = Rc::new(RefCell::new(CountingLoader::default()));
        {
            let mut cache = ImageCache::new(three_paths(), Rc::clone(&shared));
            cache.set_current_image(1);
            assert_eq!(shared.borrow().live.len(), 1);
        }
        assert!(shared.borrow().live.is_empty());
        assert_eq!(shared.borrow().released.len(), 1);
    }

    #[test]
    fn listing_is_sorted_and_unfiltered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.png", "a.jpg", "b.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<String> = list_image_paths(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.txt", "c.png"]);
    }

    #[test]
    fn listing_edge_cases() {
        assert!(list_image_paths("").unwrap().is_empty());
        assert!(matches!(
            list_image_paths("no/such/dir"),
            Err(AssetError::MissingResource { .. })
        ));
    }

    #[test]
    fn listing_a_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.png");
        fs::write(&file, b"").unwrap();
        match list_image_paths(&file) {
            Err(AssetError::Read { path, .. }) => assert_eq!(path, file),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
