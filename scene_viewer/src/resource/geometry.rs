//! Resource-level geometry type.
//!
//! A `Geometry` owns the vertex buffer (and optional index buffer) of one
//! drawable. Buffers are created and filled once at construction.

use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::renderer::{Buffer, BufferDesc, BufferUsage, IndexType, Renderer};
use crate::viewer_bail;

/// Geometry creation descriptor
pub struct GeometryDesc {
    pub name: String,
    pub renderer: Arc<Mutex<dyn Renderer>>,
    /// Raw vertex data
    pub vertex_data: Vec<u8>,
    /// Bytes per vertex
    pub vertex_stride: u32,
    /// Raw index data (optional)
    pub index_data: Option<Vec<u8>>,
    pub index_type: IndexType,
}

/// Vertex/index buffers of one drawable
pub struct Geometry {
    name: String,
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Option<Arc<dyn Buffer>>,
    index_type: IndexType,
    vertex_count: u32,
    index_count: u32,
}

impl Geometry {
    /// Create geometry from descriptor, uploading its buffers.
    pub fn from_desc(desc: GeometryDesc) -> Result<Self> {
        if desc.vertex_stride == 0 {
            viewer_bail!("viewer::Geometry", "Geometry '{}': vertex stride is 0", desc.name);
        }
        if desc.vertex_data.is_empty() {
            viewer_bail!("viewer::Geometry", "Geometry '{}': no vertex data", desc.name);
        }
        if desc.vertex_data.len() % desc.vertex_stride as usize != 0 {
            viewer_bail!("viewer::Geometry",
                "Geometry '{}': vertex data size {} is not a multiple of stride {}",
                desc.name, desc.vertex_data.len(), desc.vertex_stride);
        }

        let vertex_count = (desc.vertex_data.len() / desc.vertex_stride as usize) as u32;

        let mut renderer = desc.renderer.lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?;

        let vertex_buffer = renderer.create_buffer(BufferDesc {
            label: format!("{}.vertices", desc.name),
            size: desc.vertex_data.len() as u64,
            usage: BufferUsage::Vertex,
        })?;
        vertex_buffer.update(0, &desc.vertex_data)?;

        let (index_buffer, index_count) = match desc.index_data {
            Some(ref index_data) => {
                let index_size = match desc.index_type {
                    IndexType::U16 => 2,
                    IndexType::U32 => 4,
                };
                if index_data.len() % index_size != 0 {
                    viewer_bail!("viewer::Geometry",
                        "Geometry '{}': index data size {} is not a multiple of {}",
                        desc.name, index_data.len(), index_size);
                }
                let buffer = renderer.create_buffer(BufferDesc {
                    label: format!("{}.indices", desc.name),
                    size: index_data.len() as u64,
                    usage: BufferUsage::Index,
                })?;
                buffer.update(0, index_data)?;
                (Some(buffer), (index_data.len() / index_size) as u32)
            }
            None => (None, 0),
        };

        Ok(Self {
            name: desc.name,
            vertex_buffer,
            index_buffer,
            index_type: desc.index_type,
            vertex_count,
            index_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> Option<&Arc<dyn Buffer>> {
        self.index_buffer.as_ref()
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
