/// Octree: static-layout spatial index for frustum culling.
///
/// Single-node placement: each object is stored in exactly one cell, the
/// deepest one whose bounds fully contain the object. Objects that straddle
/// a child boundary stay in the parent, so queries never yield duplicates.
///
/// The cell array is pre-allocated at construction with a fixed depth.
/// Objects that do not fit inside the root bounds are kept in a separate
/// overflow list that every query tests individually.

use rustc_hash::FxHashMap;
use glam::Vec3;
use crate::camera::{Frustum, FrustumTest};
use crate::math::AABB;
use super::scene_node::SceneNodeKey;

/// Index of the root cell in the flat cell array.
const ROOT: usize = 0;

/// Where an object is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Cell(usize),
    Overflow,
}

struct OctreeNode {
    aabb: AABB,
    /// Index of the first child in the flat array (0 = leaf)
    first_child: usize,
    objects: Vec<SceneNodeKey>,
}

/// A cell holding at least one object, as reported to the debug overlay
#[derive(Debug, Clone)]
pub struct OctreeCell {
    pub bounds: AABB,
    /// Bounds of the objects stored directly in this cell
    pub objects: Vec<AABB>,
}

pub struct Octree {
    nodes: Vec<OctreeNode>,
    max_depth: u32,
    overflow: Vec<SceneNodeKey>,
    /// Reverse lookup: key → (slot, world AABB)
    object_locations: FxHashMap<SceneNodeKey, (Slot, AABB)>,
    /// subtree_sizes[d] = cell count of a subtree of depth d
    subtree_sizes: Vec<usize>,
}

impl Octree {
    /// Create an empty octree covering `bounds`, `max_depth` levels below the root.
    pub fn new(bounds: AABB, max_depth: u32) -> Self {
        let total_nodes = Self::total_node_count(max_depth);
        let mut nodes = Vec::with_capacity(total_nodes);
        Self::build_recursive(&mut nodes, &bounds, 0, max_depth);
        debug_assert_eq!(nodes.len(), total_nodes);

        Self {
            nodes,
            max_depth,
            overflow: Vec::new(),
            object_locations: FxHashMap::default(),
            subtree_sizes: (0..=max_depth).map(Self::total_node_count).collect(),
        }
    }

    pub fn bounds(&self) -> AABB {
        self.nodes[ROOT].aabb
    }

    pub fn len(&self) -> usize {
        self.object_locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_locations.is_empty()
    }

    pub fn contains(&self, key: SceneNodeKey) -> bool {
        self.object_locations.contains_key(&key)
    }

    /// Insert (or re-insert) an object with its world-space bounds.
    pub fn insert(&mut self, key: SceneNodeKey, world_aabb: &AABB) {
        if self.object_locations.contains_key(&key) {
            self.remove(key);
        }
        let slot = self.target_slot(world_aabb);
        self.place(key, slot);
        self.object_locations.insert(key, (slot, *world_aabb));
    }

    pub fn remove(&mut self, key: SceneNodeKey) {
        let Some((slot, _)) = self.object_locations.remove(&key) else {
            return;
        };
        let objects = match slot {
            Slot::Cell(index) => &mut self.nodes[index].objects,
            Slot::Overflow => &mut self.overflow,
        };
        if let Some(pos) = objects.iter().position(|&k| k == key) {
            objects.swap_remove(pos);
        }
    }

    /// Move an object after its bounds changed.
    pub fn update(&mut self, key: SceneNodeKey, world_aabb: &AABB) {
        let target = self.target_slot(world_aabb);

        if let Some(entry) = self.object_locations.get_mut(&key) {
            if entry.0 == target {
                entry.1 = *world_aabb;
                return;
            }
        }

        self.remove(key);
        self.place(key, target);
        self.object_locations.insert(key, (target, *world_aabb));
    }

    /// Append every object whose bounds intersect `frustum`.
    pub fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<SceneNodeKey>) {
        for &key in &self.overflow {
            if let Some((_, aabb)) = self.object_locations.get(&key) {
                if frustum.intersects_aabb(aabb) {
                    results.push(key);
                }
            }
        }

        let root_class = frustum.classify_aabb(&self.nodes[ROOT].aabb);
        self.query_recursive(ROOT, frustum, root_class, results, 0);
    }

    /// Append every object, no culling.
    pub fn query_all(&self, results: &mut Vec<SceneNodeKey>) {
        results.extend_from_slice(&self.overflow);
        self.collect_all(ROOT, results, 0);
    }

    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.objects.clear();
        }
        self.overflow.clear();
        self.object_locations.clear();
    }

    /// Cells that hold at least one object, in depth-first order.
    pub fn occupied_cells(&self) -> Vec<OctreeCell> {
        self.nodes
            .iter()
            .filter(|node| !node.objects.is_empty())
            .map(|node| OctreeCell {
                bounds: node.aabb,
                objects: node.objects
                    .iter()
                    .filter_map(|key| self.object_locations.get(key).map(|(_, aabb)| *aabb))
                    .collect(),
            })
            .collect()
    }

    // ===== PLACEMENT =====

    fn place(&mut self, key: SceneNodeKey, slot: Slot) {
        match slot {
            Slot::Cell(index) => self.nodes[index].objects.push(key),
            Slot::Overflow => self.overflow.push(key),
        }
    }

    fn target_slot(&self, world_aabb: &AABB) -> Slot {
        if self.nodes[ROOT].aabb.contains(world_aabb) {
            Slot::Cell(self.find_target_node(world_aabb))
        } else {
            Slot::Overflow
        }
    }

    /// Deepest cell fully containing `world_aabb`.
    ///
    /// If both corners fall into the same octant the object fits in that
    /// child, otherwise it straddles a boundary and stays in the current cell.
    fn find_target_node(&self, world_aabb: &AABB) -> usize {
        let mut node_idx = ROOT;
        let mut depth = 0;

        loop {
            let first_child = self.nodes[node_idx].first_child;
            if depth >= self.max_depth || first_child == 0 {
                return node_idx;
            }

            let center = self.nodes[node_idx].aabb.center();
            let min_oct = Self::point_octant(&center, &world_aabb.min);
            let max_oct = Self::point_octant(&center, &world_aabb.max);
            if min_oct != max_oct {
                return node_idx;
            }

            node_idx = first_child + self.subtree_offset(min_oct, self.max_depth - depth - 1);
            depth += 1;
        }
    }

    // ===== LAYOUT =====

    /// (8^(d+1) - 1) / 7
    fn total_node_count(max_depth: u32) -> usize {
        let mut count = 0usize;
        let mut level_count = 1usize;
        for _ in 0..=max_depth {
            count += level_count;
            level_count *= 8;
        }
        count
    }

    fn build_recursive(nodes: &mut Vec<OctreeNode>, aabb: &AABB, depth: u32, max_depth: u32) {
        let node_index = nodes.len();
        nodes.push(OctreeNode {
            aabb: *aabb,
            first_child: 0,
            objects: Vec::new(),
        });

        if depth >= max_depth {
            return;
        }

        let center = aabb.center();
        nodes[node_index].first_child = nodes.len();
        for octant in 0..8u8 {
            let child_aabb = Self::octant_aabb(aabb, &center, octant);
            Self::build_recursive(nodes, &child_aabb, depth + 1, max_depth);
        }
    }

    /// Octant bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low, 1 = high).
    fn octant_aabb(parent: &AABB, center: &Vec3, octant: u8) -> AABB {
        AABB::new(
            Vec3::new(
                if octant & 1 == 0 { parent.min.x } else { center.x },
                if octant & 2 == 0 { parent.min.y } else { center.y },
                if octant & 4 == 0 { parent.min.z } else { center.z },
            ),
            Vec3::new(
                if octant & 1 == 0 { center.x } else { parent.max.x },
                if octant & 2 == 0 { center.y } else { parent.max.y },
                if octant & 4 == 0 { center.z } else { parent.max.z },
            ),
        )
    }

    fn point_octant(center: &Vec3, point: &Vec3) -> u8 {
        ((point.x >= center.x) as u8)
            | (((point.y >= center.y) as u8) << 1)
            | (((point.z >= center.z) as u8) << 2)
    }

    fn subtree_offset(&self, octant: u8, remaining_depth: u32) -> usize {
        octant as usize * self.subtree_sizes[remaining_depth as usize]
    }

    // ===== QUERIES =====

    fn query_recursive(
        &self,
        node_idx: usize,
        frustum: &Frustum,
        classification: FrustumTest,
        results: &mut Vec<SceneNodeKey>,
        depth: u32,
    ) {
        let node = &self.nodes[node_idx];

        match classification {
            FrustumTest::Outside => {}
            FrustumTest::Inside => self.collect_all(node_idx, results, depth),
            FrustumTest::Partial => {
                for &key in &node.objects {
                    if let Some((_, world_aabb)) = self.object_locations.get(&key) {
                        if frustum.intersects_aabb(world_aabb) {
                            results.push(key);
                        }
                    }
                }

                if depth < self.max_depth && node.first_child != 0 {
                    for octant in 0..8u8 {
                        let child_idx = node.first_child
                            + self.subtree_offset(octant, self.max_depth - depth - 1);
                        let child_class = frustum.classify_aabb(&self.nodes[child_idx].aabb);
                        self.query_recursive(child_idx, frustum, child_class, results, depth + 1);
                    }
                }
            }
        }
    }

    fn collect_all(&self, node_idx: usize, results: &mut Vec<SceneNodeKey>, depth: u32) {
        let node = &self.nodes[node_idx];
        results.extend_from_slice(&node.objects);

        if depth < self.max_depth && node.first_child != 0 {
            for octant in 0..8u8 {
                let child_idx = node.first_child
                    + self.subtree_offset(octant, self.max_depth - depth - 1);
                self.collect_all(child_idx, results, depth + 1);
            }
        }
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
