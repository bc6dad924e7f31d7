/// Interfaces of the external collaborators the viewer consumes.
///
/// Asset discovery, deserialization and shader compilation live outside
/// the viewer; it only sees these traits.

use std::sync::Arc;
use crate::error::Result;
use crate::resource::texture::Texture;

/// Raw bytes of a resource file, not yet decoded
#[derive(Debug, Clone)]
pub struct RawAsset {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Loads resources by virtual path from the mounted game content
pub trait ResourceLoader: Send {
    /// `None` when the content does not contain `path`
    fn load(&self, path: &str) -> Option<RawAsset>;

    /// Resource shipped inside the viewer itself
    fn load_embedded(&self, name: &str) -> Result<RawAsset>;
}

/// Turns raw assets into GPU textures and owns the material cache
pub trait MaterialLoader: Send {
    fn load_texture(&mut self, asset: &RawAsset) -> Result<Arc<Texture>>;

    /// Number of materials loaded so far (diagnostics)
    fn material_count(&self) -> usize;

    /// Drop loader-side caches once the scene is resident
    fn clear_cache(&mut self);
}

/// Output of a successful shader compile
#[derive(Debug, Clone, Default)]
pub struct CompiledShader {
    /// Render modes the shader family supports
    pub render_modes: Vec<String>,
}

/// Compiles one shader family variant
pub trait ShaderCompiler: Send {
    fn compile(&mut self, name: &str, render_mode: Option<&str>) -> Result<CompiledShader>;
}
