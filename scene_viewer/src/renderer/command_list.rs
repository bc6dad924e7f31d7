/// CommandList trait - for recording rendering commands

use std::sync::Arc;
use crate::camera::DepthRange;
use crate::error::Result;
use crate::renderer::{Buffer, Framebuffer};
use crate::resource::{ShaderProgram, Texture};

/// Command list for recording rendering commands
///
/// Commands are recorded and later submitted via `Renderer::submit()`.
pub trait CommandList: Send + Sync {
    /// Begin recording commands
    fn begin(&mut self) -> Result<()>;

    /// End recording commands
    fn end(&mut self) -> Result<()>;

    /// Make `framebuffer` the target of subsequent draws
    fn bind_framebuffer(&mut self, framebuffer: &Arc<dyn Framebuffer>) -> Result<()>;

    /// Clear color and depth of the bound framebuffer
    fn clear(&mut self, value: ClearValue) -> Result<()>;

    /// Set the viewport, including its depth range
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Set rasterization fill mode (wireframe toggle)
    fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<()>;

    /// Bind a uniform buffer to a fixed block slot
    fn bind_uniform_buffer(&mut self, slot: u32, buffer: &Arc<dyn Buffer>) -> Result<()>;

    /// Bind a compiled shader program
    fn bind_shader(&mut self, shader: &Arc<ShaderProgram>) -> Result<()>;

    /// Bind a texture to a sampler slot
    fn bind_texture(&mut self, slot: u32, texture: &Arc<Texture>) -> Result<()>;

    /// Push per-draw constants
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset in bytes into the push constant range
    /// * `data` - Data to push
    fn push_constants(&mut self, offset: u32, data: &[u8]) -> Result<()>;

    /// Bind a vertex buffer
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()>;

    /// Draw vertices
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Draw indexed vertices
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()>;
}

/// Viewport dimensions and depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Viewport covering a whole framebuffer with the full depth range
    pub fn covering(framebuffer: &dyn Framebuffer) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: framebuffer.width() as f32,
            height: framebuffer.height() as f32,
            min_depth: DepthRange::FULL.min,
            max_depth: DepthRange::FULL.max,
        }
    }

    /// Same rectangle, restricted depth range
    pub fn with_depth_range(self, range: DepthRange) -> Self {
        Self {
            min_depth: range.min,
            max_depth: range.max,
            ..self
        }
    }

    pub fn depth_range(&self) -> DepthRange {
        DepthRange { min: self.min_depth, max: self.max_depth }
    }
}

/// Clear values for the color and depth attachments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearValue {
    /// Color clear value (RGBA)
    pub color: [f32; 4],
    /// Depth clear value (0.0 is farthest with reversed depth)
    pub depth: f32,
}

/// Rasterization fill mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    U32,
}
