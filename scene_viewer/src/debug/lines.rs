/// Colored line-list vertices shared by the debug overlays.

use std::sync::{Arc, Mutex};
use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use crate::error::{Error, Result};
use crate::math::AABB;
use crate::renderer::{Buffer, BufferDesc, BufferUsage, Renderer};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Append the 12 edges of `aabb` as 24 vertices.
pub(crate) fn push_box(vertices: &mut Vec<LineVertex>, aabb: &AABB, color: Vec4) {
    if aabb.is_empty() {
        return;
    }
    let color = color.to_array();
    for (a, b) in aabb.edges() {
        vertices.push(LineVertex { position: a.to_array(), color });
        vertices.push(LineVertex { position: b.to_array(), color });
    }
}

/// Write `vertices` into `buffer`, growing it when too small.
pub(crate) fn upload(
    renderer: &Arc<Mutex<dyn Renderer>>,
    label: &str,
    buffer: &mut Option<Arc<dyn Buffer>>,
    vertices: &[LineVertex],
) -> Result<()> {
    let bytes: &[u8] = bytemuck::cast_slice(vertices);
    if bytes.is_empty() {
        return Ok(());
    }

    let too_small = buffer.as_ref().is_none_or(|b| b.size() < bytes.len() as u64);
    if too_small {
        *buffer = None;
        let created = renderer
            .lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?
            .create_buffer(BufferDesc {
                label: label.to_string(),
                size: bytes.len() as u64,
                usage: BufferUsage::Vertex,
            })?;
        *buffer = Some(created);
    }

    match buffer {
        Some(buffer) => buffer.update(0, bytes),
        None => Ok(()),
    }
}
