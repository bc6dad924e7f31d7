/// Resource-level material type.
///
/// A Material names the shader family used to draw a surface and carries
/// its bound textures plus the flags the scene sorts and filters on
/// (translucency, tool material).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use crate::resource::texture::Texture;

static NEXT_MATERIAL_ID: AtomicU32 = AtomicU32::new(1);

/// A texture bound to a sampler slot of the material
#[derive(Debug, Clone)]
pub struct MaterialTexture {
    pub slot: u32,
    pub texture: Arc<Texture>,
}

/// Material creation descriptor
#[derive(Debug, Clone)]
pub struct MaterialDesc {
    pub name: String,
    /// Shader family requested from the shader cache
    pub shader_name: String,
    pub textures: Vec<MaterialTexture>,
    pub translucent: bool,
    /// Editor-only surface (clip brushes, triggers...)
    pub tool_material: bool,
}

/// Material resource
#[derive(Debug)]
pub struct Material {
    id: u32,
    name: String,
    shader_name: String,
    textures: Vec<MaterialTexture>,
    translucent: bool,
    tool_material: bool,
}

impl Material {
    pub fn from_desc(desc: MaterialDesc) -> Self {
        Self {
            id: NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed),
            name: desc.name,
            shader_name: desc.shader_name,
            textures: desc.textures,
            translucent: desc.translucent,
            tool_material: desc.tool_material,
        }
    }

    /// Process-unique id, used as a draw-call batching key
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shader_name(&self) -> &str {
        &self.shader_name
    }

    pub fn textures(&self) -> &[MaterialTexture] {
        &self.textures
    }

    pub fn is_translucent(&self) -> bool {
        self.translucent
    }

    pub fn is_tool_material(&self) -> bool {
        self.tool_material
    }
}
