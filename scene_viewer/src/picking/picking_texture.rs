/// Off-screen picking target.
///
/// While a request is pending the viewer renders the scene once more into
/// this target with the picking shader, which writes the draw call's 1-based
/// identifier into the red channel. `finish` then reads the texel under the
/// pointer and hands it to the registered callback. A request lives for one
/// frame only.

use std::sync::{Arc, Mutex};
use bytemuck::{Pod, Zeroable};
use crate::error::{Error, Result};
use crate::renderer::{Framebuffer, FramebufferDesc, FramebufferFormat, Renderer};
use crate::resource::{ShaderCache, ShaderProgram, PICKING_SHADER};
use crate::viewer_debug;

/// What the host intends to do with the picked object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickingIntent {
    Select,
    Open,
}

/// Pointer position in window pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickingRequest {
    pub intent: PickingIntent,
    pub cursor_x: u32,
    pub cursor_y: u32,
}

/// One texel of the picking target
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PixelInfo {
    /// 1-based draw identifier, 0 = nothing
    pub object_id: u32,
    pub mesh_id: u32,
    pub unused1: u32,
    pub unused2: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickingResponse {
    pub intent: PickingIntent,
    pub pixel_info: PixelInfo,
}

pub type PickingCallback = Box<dyn FnMut(PickingResponse) + Send>;

pub struct PickingTexture {
    renderer: Arc<Mutex<dyn Renderer>>,
    framebuffer: Option<Arc<dyn Framebuffer>>,
    shader: Arc<ShaderProgram>,
    debug_shader: Option<Arc<ShaderProgram>>,
    request: Option<PickingRequest>,
    callback: PickingCallback,
}

impl PickingTexture {
    /// Compile the picking shader and register the pick callback.
    ///
    /// The target itself is allocated by the first `resize`.
    pub fn new(
        renderer: Arc<Mutex<dyn Renderer>>,
        shaders: &mut ShaderCache,
        callback: PickingCallback,
    ) -> Result<Self> {
        let shader = shaders.get(PICKING_SHADER, None)?;
        Ok(Self {
            renderer,
            framebuffer: None,
            shader,
            debug_shader: None,
            request: None,
            callback,
        })
    }

    /// Schedule a pick for the next frame (replaces a pending one)
    pub fn request(&mut self, request: PickingRequest) {
        self.request = Some(request);
    }

    /// Remove the pending request without resolving it
    pub fn take_request(&mut self) -> Option<PickingRequest> {
        self.request.take()
    }

    pub fn is_active(&self) -> bool {
        self.request.is_some()
    }

    /// Reallocate the target at the new viewport size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.framebuffer = None;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let framebuffer = self.renderer
            .lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?
            .create_framebuffer(&FramebufferDesc {
                label: "picking".to_string(),
                width,
                height,
                color_format: FramebufferFormat::R32G32B32A32_UINT,
                depth: true,
            })?;
        self.framebuffer = Some(framebuffer);
        Ok(())
    }

    pub fn framebuffer(&self) -> Option<&Arc<dyn Framebuffer>> {
        self.framebuffer.as_ref()
    }

    /// Resolve the pending request, if any, and invoke the callback
    pub fn finish(&mut self) -> Result<()> {
        let Some(request) = self.request.take() else {
            return Ok(());
        };
        let Some(framebuffer) = &self.framebuffer else {
            return Err(Error::InvalidState("picking target was never sized".to_string()));
        };

        let (width, height) = (framebuffer.width(), framebuffer.height());
        let pixel_info = if request.cursor_x < width && request.cursor_y < height {
            // The target is stored bottom-up.
            let y = height - 1 - request.cursor_y;
            let texel = self.renderer
                .lock()
                .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?
                .read_pixel(framebuffer, request.cursor_x, y)?;
            bytemuck::cast(texel)
        } else {
            viewer_debug!("viewer::Picking",
                "Pick at ({}, {}) is outside the {}x{} target",
                request.cursor_x, request.cursor_y, width, height);
            PixelInfo::default()
        };

        (self.callback)(PickingResponse { intent: request.intent, pixel_info });
        Ok(())
    }

    /// Select a debug visualization for the visible pass.
    ///
    /// Modes the picking shader does not support clear the debug shader.
    pub fn set_render_mode(&mut self, shaders: &mut ShaderCache, mode: Option<&str>) -> Result<()> {
        self.debug_shader = match mode {
            Some(mode) if self.shader.supports_render_mode(mode) => {
                Some(shaders.get(PICKING_SHADER, Some(mode))?)
            }
            _ => None,
        };
        Ok(())
    }

    /// Identification shader used by the picking pass
    pub fn shader(&self) -> &Arc<ShaderProgram> {
        &self.shader
    }

    /// Debug variant replacing materials in the visible pass
    pub fn debug_shader(&self) -> Option<&Arc<ShaderProgram>> {
        self.debug_shader.as_ref()
    }

    pub fn render_modes(&self) -> &[String] {
        self.shader.render_modes()
    }

    /// Free the target
    pub fn release(self) {
        drop(self);
    }
}

#[cfg(test)]
#[path = "picking_texture_tests.rs"]
mod tests;
