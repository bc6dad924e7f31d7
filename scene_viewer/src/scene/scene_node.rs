/// Scene nodes: the drawable units a `Scene` indexes and culls.
///
/// A node reports its world-space bounds, the layer it belongs to and the
/// geometry/material/shader triple it draws with. Nodes are owned by the
/// scene; the GPU resources they reference are shared handles.

use std::sync::Arc;
use glam::Mat4;
use slotmap::new_key_type;
use crate::error::Result;
use crate::math::AABB;
use crate::resource::{Geometry, Material, ShaderCache, ShaderProgram};

new_key_type! {
    /// Stable key of a node inside its scene
    pub struct SceneNodeKey;
}

/// Which spatial index a node lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mobility {
    /// Never moves after insertion
    Static,
    /// Re-indexed every update
    Dynamic,
}

/// Timing handed to per-frame updates
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateContext {
    /// Seconds since the previous frame
    pub frame_time: f32,
    /// Seconds since the scene finished loading
    pub uptime: f32,
}

/// Resources a node draws with
#[derive(Clone)]
pub struct DrawData {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
    pub shader: Arc<ShaderProgram>,
}

/// Polymorphic drawable owned by a `Scene`
pub trait SceneNode: Send {
    fn name(&self) -> &str;

    /// World-space bounds
    fn bounding_box(&self) -> AABB;

    fn transform(&self) -> Mat4;

    /// Layer tag matched against the scene's enabled layers
    fn layer_name(&self) -> &str;

    /// Advance animation state
    fn update(&mut self, _context: &UpdateContext) {}

    /// Geometry to draw, `None` for nodes with nothing to rasterize
    fn draw_data(&self) -> Option<DrawData>;

    /// Render modes the node's shader supports
    fn supported_render_modes(&self) -> Vec<String>;

    /// Switch to the shader variant for `mode` (`None` = default)
    fn set_render_mode(&mut self, shaders: &mut ShaderCache, mode: Option<&str>) -> Result<()>;

    fn render_mode(&self) -> Option<&str>;
}

/// A single mesh with a material, optionally spinning about its Z axis
pub struct ModelNode {
    name: String,
    geometry: Arc<Geometry>,
    material: Arc<Material>,
    shader: Arc<ShaderProgram>,
    local_bounds: AABB,
    base_transform: Mat4,
    transform: Mat4,
    layer_name: String,
    render_mode: Option<String>,
    /// Radians per second
    spin_speed: f32,
}

impl ModelNode {
    pub fn new(
        name: impl Into<String>,
        geometry: Arc<Geometry>,
        material: Arc<Material>,
        shaders: &mut ShaderCache,
        local_bounds: AABB,
    ) -> Result<Self> {
        let shader = shaders.get(material.shader_name(), None)?;
        Ok(Self {
            name: name.into(),
            geometry,
            material,
            shader,
            local_bounds,
            base_transform: Mat4::IDENTITY,
            transform: Mat4::IDENTITY,
            layer_name: "default".to_string(),
            render_mode: None,
            spin_speed: 0.0,
        })
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.base_transform = transform;
        self.transform = transform;
        self
    }

    pub fn with_layer(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = layer_name.into();
        self
    }

    /// Spin about the local Z axis (dynamic nodes)
    pub fn with_spin(mut self, radians_per_second: f32) -> Self {
        self.spin_speed = radians_per_second;
        self
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub fn shader(&self) -> &Arc<ShaderProgram> {
        &self.shader
    }
}

impl SceneNode for ModelNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounding_box(&self) -> AABB {
        self.local_bounds.transformed(&self.transform)
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }

    fn layer_name(&self) -> &str {
        &self.layer_name
    }

    fn update(&mut self, context: &UpdateContext) {
        if self.spin_speed != 0.0 {
            self.transform = self.base_transform
                * Mat4::from_rotation_z(context.uptime * self.spin_speed);
        }
    }

    fn draw_data(&self) -> Option<DrawData> {
        Some(DrawData {
            geometry: self.geometry.clone(),
            material: self.material.clone(),
            shader: self.shader.clone(),
        })
    }

    fn supported_render_modes(&self) -> Vec<String> {
        self.shader.render_modes().to_vec()
    }

    fn set_render_mode(&mut self, shaders: &mut ShaderCache, mode: Option<&str>) -> Result<()> {
        // Modes the shader does not know fall back to its default variant.
        let mode = mode.filter(|m| self.shader.supports_render_mode(m));
        self.shader = shaders.get(self.material.shader_name(), mode)?;
        self.render_mode = mode.map(str::to_string);
        Ok(())
    }

    fn render_mode(&self) -> Option<&str> {
        self.render_mode.as_deref()
    }
}
