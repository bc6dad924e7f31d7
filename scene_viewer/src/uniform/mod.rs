//! Per-frame constant blocks and the slot-bound buffers that carry them.

mod constants;
mod uniform_buffer;

pub use constants::{
    LightingConstants, ObjectConstants, ViewConstants,
    LIGHTING_CONSTANTS_SLOT, VIEW_CONSTANTS_SLOT,
};
pub use uniform_buffer::UniformBuffer;
