/// Draw calls and their batching keys.
///
/// Visible nodes become `DrawCall`s which are ordered by a 128-bit key:
/// full shader id, then full material id, then the node's insertion
/// sequence. Equal shader/material pairs end up adjacent and ties resolve
/// by insertion order, so the order is deterministic.

use std::sync::Arc;
use glam::Mat4;
use rdst::{RadixKey, RadixSort};
use crate::resource::{Geometry, Material, ShaderProgram};
use super::scene_node::SceneNodeKey;

#[derive(Clone)]
pub struct DrawCall {
    pub node: SceneNodeKey,
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
    pub shader: Arc<ShaderProgram>,
    pub transform: Mat4,
    pub env_map: u32,
    pub sort_key: u128,
}

impl DrawCall {
    pub fn sort_key(shader_id: u32, material_id: u32, sequence: u32) -> u128 {
        ((shader_id as u128) << 64) | ((material_id as u128) << 32) | sequence as u128
    }
}

#[derive(Debug, Clone, Copy)]
struct SortEntry {
    key: u128,
    index: u32,
}

impl RadixKey for SortEntry {
    const LEVELS: usize = 16;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        (self.key >> (level * 8)) as u8
    }
}

/// Reorder `calls` by ascending sort key.
pub fn sort_draw_calls(calls: &mut Vec<DrawCall>) {
    if calls.len() < 2 {
        return;
    }

    let mut entries: Vec<SortEntry> = calls
        .iter()
        .enumerate()
        .map(|(index, call)| SortEntry { key: call.sort_key, index: index as u32 })
        .collect();
    entries.radix_sort_unstable();

    let mut slots: Vec<Option<DrawCall>> = calls.drain(..).map(Some).collect();
    calls.extend(entries.iter().filter_map(|entry| slots[entry.index as usize].take()));
}
