use std::f64::consts::FRAC_PI_2;

use crate::{Mat4, Quat, Vec3};

/// First-person viewer: eye translation plus yaw `phi` (about +Y) and pitch
/// `theta` (about +X). Projection comes from the display cluster.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewer {
    pub eye: Vec3,
    pub phi: f64,
    pub theta: f64,
}

impl Viewer {
    /// Pixels of mouse travel per radian.
    pub const SENSITIVITY: f64 = 750.0;

    pub fn new(eye: Vec3) -> Self {
        Self {
            eye,
            phi: 0.0,
            theta: 0.0,
        }
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        let phi = Quat::from_axis_angle(Vec3::Y, self.phi as f32);
        let theta = Quat::from_axis_angle(Vec3::X, self.theta as f32);
        theta * phi
    }

    /// Rotation applied after translating by the eye position.
    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::from_quat(self.rotation()) * Mat4::from_translation(self.eye)
    }

    /// Combine with the per-viewport model-view-projection from the cluster.
    #[inline]
    pub fn mvp(&self, cluster_mvp: Mat4) -> Mat4 {
        cluster_mvp * self.view()
    }

    /// Turn by a drag delta in radians. Pitch stays within ±π/2.
    pub fn look(&mut self, d_phi: f64, d_theta: f64) {
        self.phi += d_phi;
        self.theta = (self.theta + d_theta).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}
