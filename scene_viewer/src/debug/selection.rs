/// Highlight of the picked nodes.
///
/// Draws the bounding box of every selected node with a pulsing color
/// driven by the frame time.

use std::sync::{Arc, Mutex};
use glam::Vec4;
use crate::error::Result;
use crate::renderer::{Buffer, CommandList, Renderer};
use crate::resource::{ShaderCache, ShaderProgram, SELECTION_SHADER};
use crate::scene::{Scene, SceneNodeKey, UpdateContext};
use super::lines::{self, LineVertex};

pub struct SelectedNodeRenderer {
    renderer: Arc<Mutex<dyn Renderer>>,
    shader: Arc<ShaderProgram>,
    selected: Vec<SceneNodeKey>,
    time: f32,
    vertex_buffer: Option<Arc<dyn Buffer>>,
}

impl SelectedNodeRenderer {
    pub fn new(renderer: Arc<Mutex<dyn Renderer>>, shaders: &mut ShaderCache) -> Result<Self> {
        Ok(Self {
            renderer,
            shader: shaders.get(SELECTION_SHADER, None)?,
            selected: Vec::new(),
            time: 0.0,
            vertex_buffer: None,
        })
    }

    /// Replace the selection with `key`, or clear it with `None`.
    pub fn select(&mut self, key: Option<SceneNodeKey>) {
        self.selected.clear();
        self.selected.extend(key);
    }

    /// Add `key` to the selection, or remove it if already selected.
    pub fn toggle(&mut self, key: SceneNodeKey) {
        match self.selected.iter().position(|&k| k == key) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(key),
        }
    }

    pub fn selected(&self) -> &[SceneNodeKey] {
        &self.selected
    }

    pub fn update(&mut self, context: &UpdateContext) {
        self.time += context.frame_time;
    }

    /// Follow the viewer's render mode when the selection shader supports it.
    pub fn set_render_mode(&mut self, shaders: &mut ShaderCache, mode: Option<&str>) -> Result<()> {
        let mode = mode.filter(|m| self.shader.supports_render_mode(m));
        self.shader = shaders.get(SELECTION_SHADER, mode)?;
        Ok(())
    }

    pub fn shader(&self) -> &Arc<ShaderProgram> {
        &self.shader
    }

    pub fn render(&mut self, cmd: &mut dyn CommandList, scene: &Scene) -> Result<()> {
        let pulse = 0.5 + 0.5 * (self.time * 4.0).sin();
        let color = Vec4::new(1.0, 1.0, 0.0, pulse);

        let mut vertices: Vec<LineVertex> = Vec::new();
        for &key in &self.selected {
            if let Some(node) = scene.node(key) {
                lines::push_box(&mut vertices, &node.bounding_box(), color);
            }
        }
        if vertices.is_empty() {
            return Ok(());
        }

        lines::upload(&self.renderer, "selection", &mut self.vertex_buffer, &vertices)?;
        let Some(vertex_buffer) = &self.vertex_buffer else {
            return Ok(());
        };

        cmd.bind_shader(&self.shader)?;
        cmd.bind_vertex_buffer(vertex_buffer, 0)?;
        cmd.draw(vertices.len() as u32, 0)
    }
}
