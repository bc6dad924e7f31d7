/// Renderer trait - main GPU factory and submission interface

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{Buffer, BufferDesc, CommandList, Framebuffer, FramebufferDesc};

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct RendererStats {
    /// Number of draw calls submitted this frame
    pub draw_calls: u32,
    /// Number of command lists submitted this frame
    pub submissions: u32,
    /// GPU memory used (bytes)
    pub gpu_memory_used: u64,
}

/// Main renderer trait
///
/// Central factory for GPU resources plus command submission and
/// pixel read-back (used by object picking).
/// Shared as `Arc<Mutex<dyn Renderer>>` between the orchestrator,
/// uniform buffers and the picking target.
pub trait Renderer: Send + Sync {
    /// Create a GPU buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create an off-screen framebuffer (color + optional depth)
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// The window-backed framebuffer the visible passes render into
    fn main_framebuffer(&self) -> Arc<dyn Framebuffer>;

    /// Create a command list for recording rendering commands
    fn create_command_list(&self) -> Result<Box<dyn CommandList>>;

    /// Submit recorded command lists for execution, in order
    fn submit(&self, commands: &[&dyn CommandList]) -> Result<()>;

    /// Synchronously read one texel of the first color attachment
    ///
    /// `y` counts from the bottom row of the framebuffer.
    fn read_pixel(&self, framebuffer: &Arc<dyn Framebuffer>, x: u32, y: u32) -> Result<[u32; 4]>;

    /// Get statistics about the renderer
    fn stats(&self) -> RendererStats;

    /// Notify the renderer that the window has been resized
    fn resize(&mut self, width: u32, height: u32);
}
