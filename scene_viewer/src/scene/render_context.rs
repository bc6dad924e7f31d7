/// Per-pass render context.
///
/// Built fresh for every pass and dropped at its end.

use std::sync::Arc;
use crate::camera::Camera;
use crate::renderer::Framebuffer;
use crate::resource::ShaderProgram;
use super::scene::Scene;

#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub camera: &'a Camera,
    pub framebuffer: &'a Arc<dyn Framebuffer>,
    pub scene: &'a Scene,
    /// Replaces every material's shader (picking, debug modes)
    pub replacement_shader: Option<&'a Arc<ShaderProgram>>,
    /// Write 1-based picking identifiers into the per-draw constants
    pub pick_ids: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(camera: &'a Camera, framebuffer: &'a Arc<dyn Framebuffer>, scene: &'a Scene) -> Self {
        Self {
            camera,
            framebuffer,
            scene,
            replacement_shader: None,
            pick_ids: true,
        }
    }

    pub fn with_replacement_shader(mut self, shader: Option<&'a Arc<ShaderProgram>>) -> Self {
        self.replacement_shader = shader;
        self
    }

    pub fn with_pick_ids(mut self, pick_ids: bool) -> Self {
        self.pick_ids = pick_ids;
        self
    }
}
