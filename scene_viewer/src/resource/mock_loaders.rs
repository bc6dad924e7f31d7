/// Mock collaborators for unit tests (no content, no shader compiler)
///
/// Each mock exposes a shared state handle so tests can inspect calls and
/// inject failures after the mock was moved into the viewer.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::resource::loaders::{CompiledShader, MaterialLoader, RawAsset, ResourceLoader, ShaderCompiler};
use crate::resource::texture::Texture;

// ============================================================================
// Mock ShaderCompiler
// ============================================================================

#[derive(Debug, Default)]
pub struct MockShaderState {
    /// Shader families that fail to compile
    pub failing: Vec<String>,
    /// Render modes reported per shader family
    pub render_modes: FxHashMap<String, Vec<String>>,
    /// Every compile request, as `name` or `name[mode]`
    pub compiled: Vec<String>,
}

pub struct MockShaderCompiler {
    state: Arc<Mutex<MockShaderState>>,
}

impl MockShaderCompiler {
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(MockShaderState::default())) }
    }

    pub fn with_render_modes(self, name: &str, modes: &[&str]) -> Self {
        self.state.lock().unwrap().render_modes.insert(
            name.to_string(),
            modes.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn state(&self) -> Arc<Mutex<MockShaderState>> {
        self.state.clone()
    }
}

impl ShaderCompiler for MockShaderCompiler {
    fn compile(&mut self, name: &str, render_mode: Option<&str>) -> Result<CompiledShader> {
        let mut state = self.state.lock().unwrap();
        state.compiled.push(match render_mode {
            Some(mode) => format!("{}[{}]", name, mode),
            None => name.to_string(),
        });
        if state.failing.iter().any(|f| f == name) {
            return Err(Error::ShaderCompilation {
                shader: name.to_string(),
                message: "syntax error at line 1".to_string(),
            });
        }
        Ok(CompiledShader {
            render_modes: state.render_modes.get(name).cloned().unwrap_or_default(),
        })
    }
}

// ============================================================================
// Mock ResourceLoader
// ============================================================================

pub struct MockResourceLoader {
    files: FxHashMap<String, RawAsset>,
    embedded: FxHashMap<String, RawAsset>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockResourceLoader {
    /// Loader with no game content and the viewer's embedded defaults
    pub fn new() -> Self {
        let mut embedded = FxHashMap::default();
        for name in ["ggx_integrate_brdf_lut_schlick.vtex_c", "default_cube.vtex_c"] {
            embedded.insert(name.to_string(), RawAsset { file_name: name.to_string(), data: vec![1] });
        }
        Self {
            files: FxHashMap::default(),
            embedded,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.files.insert(path.to_string(), RawAsset { file_name: path.to_string(), data: vec![2] });
        self
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<String>>> {
        self.requests.clone()
    }
}

impl ResourceLoader for MockResourceLoader {
    fn load(&self, path: &str) -> Option<RawAsset> {
        self.requests.lock().unwrap().push(format!("load:{}", path));
        self.files.get(path).cloned()
    }

    fn load_embedded(&self, name: &str) -> Result<RawAsset> {
        self.requests.lock().unwrap().push(format!("embedded:{}", name));
        self.embedded.get(name).cloned()
            .ok_or_else(|| Error::InvalidResource(format!("no embedded resource '{}'", name)))
    }
}

// ============================================================================
// Mock MaterialLoader
// ============================================================================

#[derive(Debug, Default)]
pub struct MockMaterialState {
    /// File names of decoded textures
    pub textures: Vec<String>,
    /// File names that fail to decode
    pub failing: Vec<String>,
    pub cache_clears: usize,
    pub material_count: usize,
}

pub struct MockMaterialLoader {
    state: Arc<Mutex<MockMaterialState>>,
}

impl MockMaterialLoader {
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(MockMaterialState::default())) }
    }

    pub fn state(&self) -> Arc<Mutex<MockMaterialState>> {
        self.state.clone()
    }
}

impl MaterialLoader for MockMaterialLoader {
    fn load_texture(&mut self, asset: &RawAsset) -> Result<Arc<Texture>> {
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(&asset.file_name) {
            return Err(Error::InvalidResource(format!("cannot decode {}", asset.file_name)));
        }
        state.textures.push(asset.file_name.clone());
        Ok(Arc::new(Texture::new(asset.file_name.clone(), 64, 64)))
    }

    fn material_count(&self) -> usize {
        self.state.lock().unwrap().material_count
    }

    fn clear_cache(&mut self) {
        self.state.lock().unwrap().cache_clears += 1;
    }
}
