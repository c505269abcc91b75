//! Asset ingestion: OBJ meshes and file-backed image textures.
//! Meshes are parsed into a `Model`, then assembled into a flat triangle list.
//! Textures are decoded on demand and kept one at a time per `ImageCache`.

pub mod error;
pub mod image_cache;
pub mod mesh;
pub mod obj;
pub mod texture;

pub use error::{AssetError, AssetResult, Attribute};
pub use image_cache::{ImageCache, list_image_paths};
pub use mesh::{CornerReport, MeshData, Vertex, assemble, load_mesh};
pub use obj::{Face, FaceCorner, Model, Normal, Position, Uv};
pub use texture::{TextureData, TextureHandle, TextureLoader, TextureStore};
