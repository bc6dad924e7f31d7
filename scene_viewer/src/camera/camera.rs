/// Camera: location, orientation, projection and the derived frustum.
///
/// The world is Z-up. Orientation is stored as pitch/yaw in radians.
/// Every setter rederives the view, projection and live frustum, so the
/// frustum is always consistent with the matrices.
///
/// Projection is reversed-depth zero-to-one: the near plane maps to depth 1
/// and the far plane to depth 0.

use std::f32::consts::FRAC_PI_2;
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::config::CameraConfig;
use crate::error::Result;
use crate::picking::PickingTexture;
use crate::uniform::ViewConstants;
use crate::viewer_warn;
use super::frustum::Frustum;

/// Pitch stays clear of the poles so the up vector never degenerates
const MAX_PITCH: f32 = FRAC_PI_2 - 0.001;

pub struct Camera {
    location: Vec3,
    pitch: f32,
    yaw: f32,
    field_of_view: f32,
    near: f32,
    far: f32,
    scale: f32,
    viewport_width: u32,
    viewport_height: u32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    frustum: Frustum,
    picker: Option<PickingTexture>,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            location: Vec3::ONE,
            pitch: 0.0,
            yaw: 0.0,
            field_of_view: config.field_of_view_degrees.to_radians(),
            near: config.near,
            far: config.far,
            scale: 1.0,
            viewport_width: 1,
            viewport_height: 1,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            frustum: Frustum::from_view_projection(&Mat4::IDENTITY),
            picker: None,
        };
        camera.update_projection();
        camera.update_view();
        camera
    }

    // ===== VIEWPORT / PROJECTION =====

    /// Recompute the projection for a new viewport and resize the picker.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update_projection();
        self.update_frustum();

        if let Some(picker) = &mut self.picker {
            picker.resize(width, height)?;
        }
        Ok(())
    }

    /// Shrink the clip distances by `scale` so small-scale geometry
    /// (a skybox authored at 1/scale) fills the same screen area.
    pub fn set_scaled_projection(&mut self, scale: f32) {
        self.scale = if scale > 0.0 { scale } else { 1.0 };
        self.update_projection();
        self.update_frustum();
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    // ===== LOCATION / ORIENTATION =====

    pub fn set_location(&mut self, location: Vec3) {
        self.location = location;
        self.update_view();
    }

    pub fn set_pitch_yaw(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.yaw = yaw;
        self.update_view();
    }

    /// Turn towards `target`. A target at the camera location keeps the
    /// current orientation.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.location;
        let length = direction.length();
        if !(length > f32::EPSILON) {
            viewer_warn!("viewer::Camera",
                "look_at target {:?} coincides with camera location, orientation kept", target);
            return;
        }

        let direction = direction / length;
        self.set_pitch_yaw(direction.z.asin(), direction.y.atan2(direction.x));
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch)
    }

    /// Copy pose, lens and viewport from `other`. The picker is not copied.
    pub fn copy_from(&mut self, other: &Camera) {
        self.location = other.location;
        self.pitch = other.pitch;
        self.yaw = other.yaw;
        self.field_of_view = other.field_of_view;
        self.near = other.near;
        self.far = other.far;
        self.scale = other.scale;
        self.viewport_width = other.viewport_width;
        self.viewport_height = other.viewport_height;
        self.update_projection();
        self.update_view();
    }

    // ===== GETTERS =====

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Live frustum, rederived on every change
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Write matrices, location and viewport into the per-frame block.
    pub fn set_view_constants(&self, constants: &mut ViewConstants) {
        constants.world_to_projection = self.view_projection_matrix();
        constants.world_to_view = self.view_matrix;
        constants.view_to_projection = self.projection_matrix;
        constants.camera_position = Vec4::from((self.location, 0.0));
        constants.viewport_size = Vec2::new(self.viewport_width as f32, self.viewport_height as f32);
        constants.scale = self.scale;
    }

    // ===== PICKER =====

    pub fn picker(&self) -> Option<&PickingTexture> {
        self.picker.as_ref()
    }

    pub fn picker_mut(&mut self) -> Option<&mut PickingTexture> {
        self.picker.as_mut()
    }

    /// Attach a picker, returning the previous one
    pub fn set_picker(&mut self, picker: PickingTexture) -> Option<PickingTexture> {
        self.picker.replace(picker)
    }

    pub fn take_picker(&mut self) -> Option<PickingTexture> {
        self.picker.take()
    }

    // ===== DERIVED STATE =====

    fn update_projection(&mut self) {
        let aspect = if self.viewport_height > 0 {
            self.viewport_width.max(1) as f32 / self.viewport_height as f32
        } else {
            1.0
        };
        // Reversed depth: near/far swapped.
        self.projection_matrix = Mat4::perspective_rh(
            self.field_of_view,
            aspect,
            self.far / self.scale,
            self.near / self.scale,
        );
    }

    fn update_view(&mut self) {
        self.view_matrix = Mat4::look_to_rh(self.location, self.forward(), Vec3::Z);
        self.update_frustum();
    }

    fn update_frustum(&mut self) {
        self.frustum = Frustum::from_view_projection(&self.view_projection_matrix());
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
