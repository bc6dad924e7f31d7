/// Scene-wide lighting, fog and environment-map probes.

use std::sync::Arc;
use glam::{Vec3, Vec4};
use crate::math::AABB;
use crate::resource::Texture;
use crate::uniform::{LightingConstants, ViewConstants};

/// Directional sun plus ambient term
#[derive(Debug, Clone)]
pub struct LightingInfo {
    /// Direction towards the sun (normalized on upload)
    pub sun_direction: Vec3,
    /// rgb = color, a = intensity
    pub sun_color: Vec4,
    pub ambient_color: Vec4,
}

impl Default for LightingInfo {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(0.3, 0.2, 1.0),
            sun_color: Vec4::ONE,
            ambient_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
        }
    }
}

impl LightingInfo {
    pub fn set_lighting_constants(&self, constants: &mut LightingConstants, env_map_count: u32) {
        constants.sun_direction = Vec4::from((self.sun_direction.normalize_or_zero(), 0.0));
        constants.sun_color = self.sun_color;
        constants.ambient_color = self.ambient_color;
        constants.env_map_count = env_map_count;
    }
}

/// Gradient fog
#[derive(Debug, Clone, Default)]
pub struct FogInfo {
    pub enabled: bool,
    pub start: f32,
    pub end: f32,
    pub exponent: f32,
    pub color: Vec4,
    /// Cube texture sampled when the map has no fog texture of its own
    pub default_fog_texture: Option<Arc<Texture>>,
}

impl FogInfo {
    pub fn set_view_constants(&self, constants: &mut ViewConstants) {
        constants.fog_params = Vec4::new(
            self.start,
            self.end,
            self.exponent,
            if self.enabled { 1.0 } else { 0.0 },
        );
        constants.fog_color = self.color;
    }
}

/// Region served by one environment map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvMapProbe {
    pub bounds: AABB,
    /// Slot in the environment map array
    pub array_index: u32,
}

impl EnvMapProbe {
    /// Probe for a node centered at `point`: the first one containing it,
    /// else the nearest one.
    pub fn select(probes: &[EnvMapProbe], point: Vec3) -> Option<&EnvMapProbe> {
        probes
            .iter()
            .find(|probe| probe.bounds.contains_point(point))
            .or_else(|| {
                probes.iter().min_by(|a, b| {
                    a.bounds
                        .distance_squared_to_point(point)
                        .total_cmp(&b.bounds.distance_squared_to_point(point))
                })
            })
    }
}
