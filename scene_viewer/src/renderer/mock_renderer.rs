/// Mock Renderer for unit tests (no GPU required)
///
/// Every command, buffer upload and resource release is appended to a
/// shared journal so tests can assert pass ordering, upload counts and
/// disposal order across the whole viewer.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::renderer::{
    Buffer, BufferDesc, ClearValue, CommandList, Framebuffer, FramebufferDesc,
    FramebufferFormat, IndexType, PolygonMode, Renderer, RendererStats, Viewport,
};
use crate::resource::{ShaderProgram, Texture};
use crate::viewer_bail;

/// Shared, ordered record of everything the mock backend saw
pub type Journal = Arc<Mutex<Vec<String>>>;

fn record(journal: &Journal, entry: String) {
    if let Ok(mut entries) = journal.lock() {
        entries.push(entry);
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub name: String,
    pub last_data: Mutex<Vec<u8>>,
    journal: Journal,
}

impl MockBuffer {
    pub fn new(size: u64, name: String, journal: Journal) -> Self {
        Self { size, name, last_data: Mutex::new(Vec::new()), journal }
    }
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            viewer_bail!("viewer::mock",
                "update of {} bytes at {} overflows buffer '{}' ({} bytes)",
                data.len(), offset, self.name, self.size);
        }
        if let Ok(mut last) = self.last_data.lock() {
            *last = data.to_vec();
        }
        record(&self.journal, format!("update_buffer:{}", self.name));
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        record(&self.journal, format!("release_buffer:{}", self.name));
    }
}

// ============================================================================
// Mock Framebuffer
// ============================================================================

#[derive(Debug)]
pub struct MockFramebuffer {
    pub width: u32,
    pub height: u32,
    pub name: String,
    pub format: FramebufferFormat,
    journal: Journal,
}

impl MockFramebuffer {
    pub fn new(width: u32, height: u32, name: String, format: FramebufferFormat, journal: Journal) -> Self {
        Self { width, height, name, format, journal }
    }
}

impl Framebuffer for MockFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Drop for MockFramebuffer {
    fn drop(&mut self) {
        record(&self.journal, format!("release_framebuffer:{}", self.name));
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug)]
pub struct MockCommandList {
    pub commands: Vec<String>,
    journal: Journal,
}

impl MockCommandList {
    pub fn new(journal: Journal) -> Self {
        Self { commands: Vec::new(), journal }
    }

    fn push(&mut self, command: String) {
        record(&self.journal, format!("cmd:{}", command));
        self.commands.push(command);
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        self.push("begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.push("end".to_string());
        Ok(())
    }

    fn bind_framebuffer(&mut self, framebuffer: &Arc<dyn Framebuffer>) -> Result<()> {
        self.push(format!("bind_framebuffer:{}", framebuffer.label()));
        Ok(())
    }

    fn clear(&mut self, _value: ClearValue) -> Result<()> {
        self.push("clear".to_string());
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.push(format!("set_viewport:{}..{}", viewport.min_depth, viewport.max_depth));
        Ok(())
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<()> {
        self.push(format!("polygon_mode:{:?}", mode));
        Ok(())
    }

    fn bind_uniform_buffer(&mut self, slot: u32, buffer: &Arc<dyn Buffer>) -> Result<()> {
        self.push(format!("bind_uniform:{}:{}", slot, buffer.label()));
        Ok(())
    }

    fn bind_shader(&mut self, shader: &Arc<ShaderProgram>) -> Result<()> {
        self.push(format!("bind_shader:{}", shader.label()));
        Ok(())
    }

    fn bind_texture(&mut self, slot: u32, texture: &Arc<Texture>) -> Result<()> {
        self.push(format!("bind_texture:{}:{}", slot, texture.name));
        Ok(())
    }

    fn push_constants(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        self.push(format!("push_constants:{}:{}", offset, data.len()));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.push(format!("bind_vertex_buffer:{}", buffer.label()));
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, _offset: u64, _index_type: IndexType) -> Result<()> {
        self.push(format!("bind_index_buffer:{}", buffer.label()));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, _first_vertex: u32) -> Result<()> {
        self.push(format!("draw:{}", vertex_count));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, _first_index: u32, _vertex_offset: i32) -> Result<()> {
        self.push(format!("draw_indexed:{}", index_count));
        Ok(())
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

pub struct MockRenderer {
    journal: Journal,
    main_framebuffer: Arc<dyn Framebuffer>,
    /// Texel values returned by `read_pixel`, keyed by (x, y from bottom)
    pixels: Arc<Mutex<FxHashMap<(u32, u32), [u32; 4]>>>,
    stats: RendererStats,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::with_size(800, 600)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        let journal: Journal = Arc::new(Mutex::new(Vec::new()));
        let main_framebuffer = Arc::new(MockFramebuffer::new(
            width, height, "main".to_string(), FramebufferFormat::R8G8B8A8_UNORM, journal.clone(),
        ));
        Self {
            journal,
            main_framebuffer,
            pixels: Arc::new(Mutex::new(FxHashMap::default())),
            stats: RendererStats::default(),
        }
    }

    /// Handle on the journal that outlives the renderer lock
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Handle on the read-back texels
    pub fn pixels(&self) -> Arc<Mutex<FxHashMap<(u32, u32), [u32; 4]>>> {
        self.pixels.clone()
    }
}

impl Renderer for MockRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        record(&self.journal, format!("create_buffer:{}", desc.label));
        self.stats.gpu_memory_used += desc.size;
        Ok(Arc::new(MockBuffer::new(desc.size, desc.label, self.journal.clone())))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        if desc.width == 0 || desc.height == 0 {
            viewer_bail!("viewer::mock", "framebuffer '{}' has zero size", desc.label);
        }
        record(&self.journal, format!("create_framebuffer:{}:{}x{}", desc.label, desc.width, desc.height));
        Ok(Arc::new(MockFramebuffer::new(
            desc.width, desc.height, desc.label.clone(), desc.color_format, self.journal.clone(),
        )))
    }

    fn main_framebuffer(&self) -> Arc<dyn Framebuffer> {
        self.main_framebuffer.clone()
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(MockCommandList::new(self.journal.clone())))
    }

    fn submit(&self, commands: &[&dyn CommandList]) -> Result<()> {
        record(&self.journal, format!("submit:{}", commands.len()));
        Ok(())
    }

    fn read_pixel(&self, framebuffer: &Arc<dyn Framebuffer>, x: u32, y: u32) -> Result<[u32; 4]> {
        if x >= framebuffer.width() || y >= framebuffer.height() {
            viewer_bail!("viewer::mock", "read_pixel ({}, {}) outside '{}'", x, y, framebuffer.label());
        }
        record(&self.journal, format!("read_pixel:{}:{},{}", framebuffer.label(), x, y));
        let pixels = self.pixels.lock().map_err(|_| crate::error::Error::BackendError(
            "mock pixel lock poisoned".to_string(),
        ))?;
        Ok(pixels.get(&(x, y)).copied().unwrap_or([0; 4]))
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }

    fn resize(&mut self, width: u32, height: u32) {
        record(&self.journal, format!("resize:{}x{}", width, height));
        self.main_framebuffer = Arc::new(MockFramebuffer::new(
            width, height, "main".to_string(), FramebufferFormat::R8G8B8A8_UNORM, self.journal.clone(),
        ));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
