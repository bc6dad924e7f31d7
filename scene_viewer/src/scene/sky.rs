/// 2D sky drawn in screen space between the skybox and translucent passes.

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::CommandList;
use crate::resource::{ShaderProgram, Texture};
use super::render_context::RenderContext;
use super::scene_node::UpdateContext;

pub trait Sky: Send {
    fn update(&mut self, _context: &UpdateContext) {}

    fn render(&self, cmd: &mut dyn CommandList, context: &RenderContext) -> Result<()>;
}

/// Full-screen triangle sampling a sky texture
pub struct ScreenSpaceSky {
    shader: Arc<ShaderProgram>,
    texture: Option<Arc<Texture>>,
}

impl ScreenSpaceSky {
    pub fn new(shader: Arc<ShaderProgram>, texture: Option<Arc<Texture>>) -> Self {
        Self { shader, texture }
    }
}

impl Sky for ScreenSpaceSky {
    fn render(&self, cmd: &mut dyn CommandList, _context: &RenderContext) -> Result<()> {
        cmd.bind_shader(&self.shader)?;
        if let Some(texture) = &self.texture {
            cmd.bind_texture(0, texture)?;
        }
        cmd.draw(3, 0)
    }
}
