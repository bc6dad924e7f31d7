/// Infinite reference grid on the Z = 0 plane.
///
/// The grid shader expands a full-screen quad in the vertex stage, so no
/// geometry is bound.

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::CommandList;
use crate::resource::{ShaderCache, ShaderProgram, GRID_SHADER};

pub struct InfiniteGrid {
    shader: Arc<ShaderProgram>,
}

impl InfiniteGrid {
    pub fn new(shaders: &mut ShaderCache) -> Result<Self> {
        Ok(Self { shader: shaders.get(GRID_SHADER, None)? })
    }

    /// Pick up a freshly compiled grid shader.
    pub fn reload_shader(&mut self, shaders: &mut ShaderCache) -> Result<()> {
        self.shader = shaders.get(GRID_SHADER, None)?;
        Ok(())
    }

    pub fn shader(&self) -> &Arc<ShaderProgram> {
        &self.shader
    }

    pub fn render(&self, cmd: &mut dyn CommandList) -> Result<()> {
        cmd.bind_shader(&self.shader)?;
        cmd.draw(6, 0)
    }
}
