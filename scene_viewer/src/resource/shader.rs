/// Compiled shader program handle.
///
/// Programs are shared as `Arc<ShaderProgram>`: a handle stays valid for as
/// long as anything holds it, even after the cache that produced it was
/// cleared or reloaded.

/// Cache key: shader family plus optional render-mode variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderKey {
    pub name: String,
    pub render_mode: Option<String>,
}

impl ShaderKey {
    pub fn new(name: &str, render_mode: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            render_mode: render_mode.map(str::to_string),
        }
    }
}

#[derive(Debug)]
pub struct ShaderProgram {
    id: u32,
    key: ShaderKey,
    render_modes: Vec<String>,
}

impl ShaderProgram {
    pub(crate) fn new(id: u32, key: ShaderKey, render_modes: Vec<String>) -> Self {
        Self { id, key, render_modes }
    }

    /// Cache-unique id, used as a draw-call batching key
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn key(&self) -> &ShaderKey {
        &self.key
    }

    /// Render mode this variant was compiled for (`None` = default)
    pub fn render_mode(&self) -> Option<&str> {
        self.key.render_mode.as_deref()
    }

    /// Render modes the shader family supports
    pub fn render_modes(&self) -> &[String] {
        &self.render_modes
    }

    pub fn supports_render_mode(&self, mode: &str) -> bool {
        self.render_modes.iter().any(|m| m == mode)
    }

    /// `name` or `name[mode]`
    pub fn label(&self) -> String {
        match &self.key.render_mode {
            Some(mode) => format!("{}[{}]", self.key.name, mode),
            None => self.key.name.clone(),
        }
    }
}
