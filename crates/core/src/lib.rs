//! Core shared types: math re-exports, errors, viewer camera and the
//! application state synchronized across render nodes.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod error;
pub mod state;

pub use error::{CoreError, CoreResult};
pub use state::{AppState, Key, MouseButton};
