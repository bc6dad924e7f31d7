/// Shader cache keyed by (shader family, render mode).
///
/// Reloading compiles every required program into a staging map first and
/// swaps it in only when all of them compiled. A failed reload leaves the
/// live cache, and every handle already bound, untouched.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::resource::loaders::ShaderCompiler;
use crate::resource::shader::{ShaderKey, ShaderProgram};
use crate::{viewer_debug, viewer_error};

/// Object identification shader used by the picking pass
pub const PICKING_SHADER: &str = "vrf.picking";
/// Reference grid overlay
pub const GRID_SHADER: &str = "vrf.grid";
/// Colored line lists (octree overlays)
pub const DEBUG_LINES_SHADER: &str = "vrf.default";
/// Selection outline
pub const SELECTION_SHADER: &str = "vrf.selected";

pub struct ShaderCache {
    compiler: Box<dyn ShaderCompiler>,
    programs: FxHashMap<ShaderKey, Arc<ShaderProgram>>,
    next_id: u32,
}

impl ShaderCache {
    pub fn new(compiler: Box<dyn ShaderCompiler>) -> Self {
        Self {
            compiler,
            programs: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Cached program, compiling it on first use.
    pub fn get(&mut self, name: &str, render_mode: Option<&str>) -> Result<Arc<ShaderProgram>> {
        let key = ShaderKey::new(name, render_mode);
        if let Some(program) = self.programs.get(&key) {
            return Ok(program.clone());
        }

        let program = self.compile(&key)?;
        self.programs.insert(key, program.clone());
        Ok(program)
    }

    /// Recompile `required` into a fresh cache and swap it in.
    ///
    /// Programs not listed are dropped from the cache and recompile lazily
    /// on their next `get`. On error nothing changes.
    pub fn reload(&mut self, required: &[ShaderKey]) -> Result<()> {
        let mut staging = FxHashMap::default();

        for key in required {
            if staging.contains_key(key) {
                continue;
            }
            let program = self.compile(key)?;
            staging.insert(key.clone(), program);
        }

        viewer_debug!("viewer::ShaderCache",
            "Reloaded {} shader programs, discarded {}", staging.len(), self.programs.len());
        self.programs = staging;
        Ok(())
    }

    /// Forget every cached program (bound handles stay valid).
    pub fn clear_cache(&mut self) {
        self.programs.clear();
    }

    /// Number of cached program variants (diagnostics)
    pub fn shader_count(&self) -> usize {
        self.programs.len()
    }

    fn compile(&mut self, key: &ShaderKey) -> Result<Arc<ShaderProgram>> {
        let compiled = self.compiler
            .compile(&key.name, key.render_mode.as_deref())
            .map_err(|error| {
                let message = match error {
                    Error::ShaderCompilation { message, .. } => message,
                    other => other.to_string(),
                };
                viewer_error!("viewer::ShaderCache", "Failed to compile '{}': {}", key.name, message);
                Error::ShaderCompilation { shader: key.name.clone(), message }
            })?;

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(Arc::new(ShaderProgram::new(id, key.clone(), compiled.render_modes)))
    }
}

#[cfg(test)]
#[path = "shader_cache_tests.rs"]
mod tests;
