//! Resource module
//!
//! GPU-facing resource handles (geometry, materials, textures, shader
//! programs), the shader cache, and the traits of the external
//! collaborators that produce them.

pub mod texture;
pub mod geometry;
pub mod material;
pub mod shader;
pub mod shader_cache;
pub mod loaders;

#[cfg(test)]
pub mod mock_loaders;

pub use texture::Texture;
pub use geometry::{Geometry, GeometryDesc};
pub use material::{Material, MaterialDesc, MaterialTexture};
pub use shader::{ShaderKey, ShaderProgram};
pub use shader_cache::{
    ShaderCache, DEBUG_LINES_SHADER, GRID_SHADER, PICKING_SHADER, SELECTION_SHADER,
};
pub use loaders::{CompiledShader, MaterialLoader, RawAsset, ResourceLoader, ShaderCompiler};
