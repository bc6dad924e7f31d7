/// Framebuffer trait - a color + depth target the draw sequence renders into
///
/// Off-screen framebuffers (object picking) are recreated, not resized,
/// when the viewport changes.

/// Color attachment format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum FramebufferFormat {
    /// Presentable color
    R8G8B8A8_UNORM,
    /// Integer identifiers (picking)
    R32G32B32A32_UINT,
}

/// Descriptor for creating a framebuffer
#[derive(Debug, Clone)]
pub struct FramebufferDesc {
    pub label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    pub color_format: FramebufferFormat,
    /// Attach a depth buffer
    pub depth: bool,
}

/// Framebuffer resource trait
pub trait Framebuffer: Send + Sync {
    /// Get the width in pixels
    fn width(&self) -> u32;

    /// Get the height in pixels
    fn height(&self) -> u32;

    fn label(&self) -> &str;
}
