/// Wireframe view of occupied octree cells.
///
/// The static variant builds its line list once, the first time it is
/// needed; the viewer recreates it when the enabled layers change. The
/// dynamic variant rebuilds every frame since dynamic nodes move.

use std::sync::{Arc, Mutex};
use glam::Vec4;
use crate::error::Result;
use crate::renderer::{Buffer, CommandList, Renderer};
use crate::resource::{ShaderCache, ShaderProgram, DEBUG_LINES_SHADER};
use crate::scene::Octree;
use super::lines::{self, LineVertex};

const CELL_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
const OBJECT_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

pub struct OctreeDebugRenderer {
    renderer: Arc<Mutex<dyn Renderer>>,
    shader: Arc<ShaderProgram>,
    dynamic: bool,
    label: &'static str,
    vertex_buffer: Option<Arc<dyn Buffer>>,
    vertex_count: u32,
    built: bool,
}

impl OctreeDebugRenderer {
    pub fn new(renderer: Arc<Mutex<dyn Renderer>>, shaders: &mut ShaderCache, dynamic: bool) -> Result<Self> {
        Ok(Self {
            renderer,
            shader: shaders.get(DEBUG_LINES_SHADER, None)?,
            dynamic,
            label: if dynamic { "octree.dynamic" } else { "octree.static" },
            vertex_buffer: None,
            vertex_count: 0,
            built: false,
        })
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Build the line list if it was never built.
    pub fn static_build(&mut self, octree: &Octree) -> Result<()> {
        if self.built {
            return Ok(());
        }
        self.rebuild(octree)
    }

    fn rebuild(&mut self, octree: &Octree) -> Result<()> {
        let mut vertices: Vec<LineVertex> = Vec::new();
        for cell in octree.occupied_cells() {
            lines::push_box(&mut vertices, &cell.bounds, CELL_COLOR);
            for object in &cell.objects {
                lines::push_box(&mut vertices, object, OBJECT_COLOR);
            }
        }

        lines::upload(&self.renderer, self.label, &mut self.vertex_buffer, &vertices)?;
        self.vertex_count = vertices.len() as u32;
        self.built = true;
        Ok(())
    }

    pub fn render(&mut self, cmd: &mut dyn CommandList, octree: &Octree) -> Result<()> {
        if self.dynamic {
            self.rebuild(octree)?;
        }
        if !self.built || self.vertex_count == 0 {
            return Ok(());
        }
        let Some(vertex_buffer) = &self.vertex_buffer else {
            return Ok(());
        };

        cmd.bind_shader(&self.shader)?;
        cmd.bind_vertex_buffer(vertex_buffer, 0)?;
        cmd.draw(self.vertex_count, 0)
    }
}
