//! Texture decoding and the handle-based store image caches load into.

use std::{
    cell::RefCell, collections::HashMap, fmt, io, num::NonZeroU32, path::Path, rc::Rc,
};

use image::ImageError;

use crate::error::{AssetError, AssetResult};

/// Decoded RGBA8 pixels, rows top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Decode an image file (PNG or JPEG) into RGBA8.
    pub fn load<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| match source {
            ImageError::IoError(err) if err.kind() == io::ErrorKind::NotFound => {
                AssetError::MissingResource {
                    path: path.to_path_buf(),
                }
            }
            source => AssetError::Image {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("Decoded {}: {}x{}", path.display(), width, height);

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }
}

/// Opaque texture id handed out by a [`TextureLoader`]. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub NonZeroU32);

impl TextureHandle {
    pub fn id(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Service that turns image files into live textures.
pub trait TextureLoader {
    fn load(&mut self, path: &Path) -> AssetResult<TextureHandle>;

    /// Free a texture. Unknown handles are ignored.
    fn release(&mut self, handle: TextureHandle);
}

impl<T: TextureLoader> TextureLoader for Rc<RefCell<T>> {
    fn load(&mut self, path: &Path) -> AssetResult<TextureHandle> {
        self.borrow_mut().load(path)
    }

    fn release(&mut self, handle: TextureHandle) {
        self.borrow_mut().release(handle)
    }
}

/// In-memory texture registry keyed by handle.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: HashMap<TextureHandle, TextureData>,
    /// Last id handed out; 0 before the first insert.
    last_id: u32,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register already decoded data under a fresh handle. Ids are never
    /// reused; once the id space is spent every insert fails.
    pub fn insert(&mut self, data: TextureData) -> AssetResult<TextureHandle> {
        let id = self
            .last_id
            .checked_add(1)
            .and_then(NonZeroU32::new)
            .ok_or(AssetError::HandlesExhausted)?;
        self.last_id = id.get();

        let handle = TextureHandle(id);
        self.textures.insert(handle, data);
        Ok(handle)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureData> {
        self.textures.get(&handle)
    }

    pub fn resident_count(&self) -> usize {
        self.textures.len()
    }
}

impl TextureLoader for TextureStore {
    fn load(&mut self, path: &Path) -> AssetResult<TextureHandle> {
        let data = TextureData::load(path)?;
        self.insert(data)
    }

    fn release(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_none() {
            log::warn!("Release of unknown texture {}", handle);
        }
    }
}
