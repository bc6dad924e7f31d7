/// GPU constant block layouts.
///
/// All blocks are `#[repr(C)]` and `Pod`, laid out so that no implicit
/// padding is inserted (std140 compatible).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};

/// Block slot of `ViewConstants`
pub const VIEW_CONSTANTS_SLOT: u32 = 0;
/// Block slot of `LightingConstants`
pub const LIGHTING_CONSTANTS_SLOT: u32 = 1;

/// Camera, fog and time, written once per frame
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ViewConstants {
    pub world_to_projection: Mat4,
    pub world_to_view: Mat4,
    pub view_to_projection: Mat4,
    /// xyz = camera location, w unused
    pub camera_position: Vec4,
    pub clear_color: Vec4,
    /// x = start, y = end, z = exponent, w = 1 when enabled
    pub fog_params: Vec4,
    pub fog_color: Vec4,
    pub viewport_size: Vec2,
    /// Seconds since the scene finished loading
    pub time: f32,
    /// Projection scale (1 for the main camera)
    pub scale: f32,
}

/// Sun, ambient and probe count
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightingConstants {
    /// xyz = direction towards the sun, w unused
    pub sun_direction: Vec4,
    /// rgb = color, a = intensity
    pub sun_color: Vec4,
    pub ambient_color: Vec4,
    pub env_map_count: u32,
    pub _pad: [u32; 3],
}

/// Per-draw constants pushed before each draw call
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectConstants {
    pub transform: Mat4,
    /// 1-based picking identifier, 0 = not pickable
    pub pick_id: u32,
    pub env_map: u32,
    pub _pad: [u32; 2],
}
