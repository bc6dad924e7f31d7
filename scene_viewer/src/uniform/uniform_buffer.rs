/// Slot-bound uniform buffer for one constant block type.
///
/// The CPU copy is mutated freely during a frame and pushed to the device
/// with a single `update`. The buffer is released by consuming it, so a
/// second release cannot be written.

use std::sync::{Arc, Mutex};
use bytemuck::{Pod, Zeroable};
use crate::error::{Error, Result};
use crate::renderer::{Buffer, BufferDesc, BufferUsage, CommandList, Renderer};

pub struct UniformBuffer<T: Pod> {
    buffer: Arc<dyn Buffer>,
    slot: u32,
    data: T,
}

impl<T: Pod> UniformBuffer<T> {
    /// Allocate a device buffer sized for `T`, zero-initialized on the CPU side
    pub fn new(renderer: &Arc<Mutex<dyn Renderer>>, slot: u32, label: &str) -> Result<Self> {
        let buffer = renderer
            .lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?
            .create_buffer(BufferDesc {
                label: label.to_string(),
                size: std::mem::size_of::<T>() as u64,
                usage: BufferUsage::Uniform,
            })?;

        Ok(Self {
            buffer,
            slot,
            data: T::zeroed(),
        })
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn set_data(&mut self, data: T) {
        self.data = data;
    }

    /// Push the CPU copy to the device
    pub fn update(&self) -> Result<()> {
        self.buffer.update(0, bytemuck::bytes_of(&self.data))
    }

    /// Bind to the buffer's fixed slot
    pub fn bind(&self, cmd: &mut dyn CommandList) -> Result<()> {
        cmd.bind_uniform_buffer(self.slot, &self.buffer)
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }

    /// Give the device buffer back
    pub fn release(self) {
        drop(self);
    }
}

#[cfg(test)]
#[path = "uniform_buffer_tests.rs"]
mod tests;
