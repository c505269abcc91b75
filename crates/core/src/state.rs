//! Application state shared by the per-frame handlers.
//!
//! The master node mutates it from input, encodes it once per frame, and
//! every node decodes the same bytes before drawing.

use crate::{
    Vec3,
    camera::Viewer,
    error::{CoreError, CoreResult},
    vec3,
};

/// Eye step for one key press.
const MOVE_STEP: f32 = 0.1;

/// Keys with a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    W,
    S,
    A,
    D,
    Space,
    Up,
    Down,
    F1,
    Key1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub viewer: Viewer,
    /// Index into every object's image list. Unbounded while playing.
    pub current_image: u32,
    pub playing: bool,
    pub show_help: bool,
    left_down: bool,
    right_down: bool,
}

impl AppState {
    /// Eye starts `camera_height` units above the wall origin.
    pub fn new(camera_height: f32) -> Self {
        Self {
            viewer: Viewer::new(vec3(0.0, -camera_height, 0.0)),
            ..Self::default()
        }
    }

    /// Runs on the master before state is broadcast.
    pub fn pre_sync(&mut self) {
        if self.playing {
            self.current_image = self.current_image.saturating_add(1);
        }
    }

    pub fn key_pressed(&mut self, key: Key) {
        match key {
            Key::W => self.viewer.eye += vec3(MOVE_STEP, 0.0, 0.0),
            Key::S => self.viewer.eye -= vec3(MOVE_STEP, 0.0, 0.0),
            Key::A => self.viewer.eye += vec3(0.0, 0.0, MOVE_STEP),
            Key::D => self.viewer.eye -= vec3(0.0, 0.0, MOVE_STEP),
            Key::Space => self.playing = !self.playing,
            Key::Up => self.current_image = self.current_image.saturating_add(1),
            Key::Down => self.current_image = self.current_image.saturating_sub(1),
            Key::F1 => self.show_help = !self.show_help,
            Key::Key1 => {
                self.current_image = 0;
                self.playing = false;
            }
        }
    }

    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left_down = pressed,
            MouseButton::Right => self.right_down = pressed,
        }
    }

    /// While a button is held the cursor is hidden and re-centred every move.
    fn is_dragging(&self) -> bool {
        self.left_down || self.right_down
    }

    /// Cursor moved to `(x, y)` in a `width` x `height` window. Returns `true`
    /// when the caller should warp the cursor back to the centre.
    pub fn mouse_moved(&mut self, x: f64, y: f64, width: u32, height: u32) -> bool {
        let dx = (x - f64::from(width / 2)) / Viewer::SENSITIVITY;
        let dy = (y - f64::from(height / 2)) / Viewer::SENSITIVITY;

        if self.left_down {
            self.viewer.look(dx, dy);
        }
        if self.right_down {
            self.viewer.eye.y += dy as f32;
        }
        self.is_dragging()
    }

    /// Help and status lines for the overlay.
    pub fn help_text() -> &'static str {
        "Help\nWSAD: Move camera\nSpace: Play/stop images\nUp/Down: Advance images\n\
         1: Back to first image"
    }

    /// Little-endian: eye xyz (f32), phi, theta (f64), current image (u32),
    /// help flag (u8).
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::ENCODED_LEN);
        for c in self.viewer.eye.to_array() {
            out.extend_from_slice(&c.to_le_bytes());
        }
        out.extend_from_slice(&self.viewer.phi.to_le_bytes());
        out.extend_from_slice(&self.viewer.theta.to_le_bytes());
        out.extend_from_slice(&self.current_image.to_le_bytes());
        out.push(u8::from(self.show_help));
        out
    }

    pub const ENCODED_LEN: usize = 3 * 4 + 2 * 8 + 4 + 1;

    /// Overwrite the synchronized fields from `bytes`. On error nothing
    /// changes.
    pub fn decode(&mut self, bytes: &[u8]) -> CoreResult<()> {
        let mut r = Reader { bytes, offset: 0 };
        let eye = Vec3::new(
            f32::from_le_bytes(r.take()?),
            f32::from_le_bytes(r.take()?),
            f32::from_le_bytes(r.take()?),
        );
        let phi = f64::from_le_bytes(r.take()?);
        let theta = f64::from_le_bytes(r.take()?);
        let current_image = u32::from_le_bytes(r.take()?);
        let [help] = r.take::<1>()?;

        self.viewer.eye = eye;
        self.viewer.phi = phi;
        self.viewer.theta = theta;
        self.current_image = current_image;
        self.show_help = help != 0;
        Ok(())
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> CoreResult<[u8; N]> {
        let slice = self
            .bytes
            .get(self.offset..self.offset + N)
            .ok_or(CoreError::Truncated {
                offset: self.offset,
                needed: N,
                len: self.bytes.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.offset += N;
        Ok(out)
    }
}
