/// Scene: the node collection, its two octrees, lighting and sky.
///
/// Nodes live in a SlotMap and keep stable keys across removals. Every
/// enabled node is indexed in exactly one octree (static or dynamic, by
/// mobility). Nodes hidden by the layer filter or the tool-material toggle
/// are taken out of their octree and come back when re-enabled.
///
/// `collect_draw_calls` culls against a frustum and produces the opaque and
/// translucent batches consumed by the render passes and by picking.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use glam::Vec3;
use crate::camera::{Camera, Frustum};
use crate::config::OctreeConfig;
use crate::error::Result;
use crate::math::AABB;
use crate::renderer::CommandList;
use crate::resource::ShaderCache;
use crate::uniform::ObjectConstants;
use super::draw_call::{sort_draw_calls, DrawCall};
use super::lighting::{EnvMapProbe, FogInfo, LightingInfo};
use super::octree::Octree;
use super::render_context::RenderContext;
use super::scene_node::{Mobility, SceneNode, SceneNodeKey, UpdateContext};
use super::sky::Sky;

struct NodeEntry {
    node: Box<dyn SceneNode>,
    mobility: Mobility,
    /// Insertion order, the final draw-order tie-break
    sequence: u32,
    env_map: u32,
    /// Passes the layer and tool-material filters (indexed in an octree)
    enabled: bool,
}

pub struct Scene {
    nodes: SlotMap<SceneNodeKey, NodeEntry>,
    static_octree: Octree,
    dynamic_octree: Octree,
    /// `None` = every layer enabled
    enabled_layers: Option<FxHashSet<String>>,
    show_tool_materials: bool,
    lighting: LightingInfo,
    fog: FogInfo,
    sky: Option<Box<dyn Sky>>,
    env_map_probes: Vec<EnvMapProbe>,
    world_offset: Vec3,
    next_sequence: u32,
    visible: Vec<SceneNodeKey>,
    opaque: Vec<DrawCall>,
    translucent: Vec<DrawCall>,
}

impl Scene {
    pub fn new(config: &OctreeConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            static_octree: Octree::new(config.bounds, config.static_depth),
            dynamic_octree: Octree::new(config.bounds, config.dynamic_depth),
            enabled_layers: None,
            show_tool_materials: false,
            lighting: LightingInfo::default(),
            fog: FogInfo::default(),
            sky: None,
            env_map_probes: Vec::new(),
            world_offset: Vec3::ZERO,
            next_sequence: 0,
            visible: Vec::new(),
            opaque: Vec::new(),
            translucent: Vec::new(),
        }
    }

    // ===== NODES =====

    /// Add a node to the static or dynamic index.
    pub fn add_node(&mut self, node: Box<dyn SceneNode>, mobility: Mobility) -> SceneNodeKey {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);

        let enabled = self.passes_filters(node.as_ref());
        let bounds = node.bounding_box();
        let key = self.nodes.insert(NodeEntry {
            node,
            mobility,
            sequence,
            env_map: 0,
            enabled,
        });

        if enabled {
            self.octree_mut(mobility).insert(key, &bounds);
        }
        key
    }

    pub fn remove_node(&mut self, key: SceneNodeKey) -> Option<Box<dyn SceneNode>> {
        let entry = self.nodes.remove(key)?;
        self.octree_mut(entry.mobility).remove(key);
        self.opaque.retain(|call| call.node != key);
        self.translucent.retain(|call| call.node != key);
        Some(entry.node)
    }

    pub fn node(&self, key: SceneNodeKey) -> Option<&dyn SceneNode> {
        self.nodes.get(key).map(|entry| entry.node.as_ref())
    }

    pub fn node_mut(&mut self, key: SceneNodeKey) -> Option<&mut (dyn SceneNode + 'static)> {
        self.nodes.get_mut(key).map(|entry| entry.node.as_mut())
    }

    pub fn is_node_enabled(&self, key: SceneNodeKey) -> bool {
        self.nodes.get(key).is_some_and(|entry| entry.enabled)
    }

    /// Environment-map slot assigned by `calculate_environment_maps`
    pub fn env_map(&self, key: SceneNodeKey) -> Option<u32> {
        self.nodes.get(key).map(|entry| entry.env_map)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ===== FILTERS =====

    /// Restrict drawing to nodes whose layer is in `layers`.
    pub fn set_enabled_layers<I, S>(&mut self, layers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_layers = Some(layers.into_iter().map(Into::into).collect());
        self.refresh_enabled();
    }

    /// Show or hide nodes drawn with tool materials.
    pub fn set_show_tool_materials(&mut self, show: bool) {
        self.show_tool_materials = show;
        self.refresh_enabled();
    }

    fn passes_filters(&self, node: &dyn SceneNode) -> bool {
        let layer_enabled = self.enabled_layers
            .as_ref()
            .is_none_or(|layers| layers.contains(node.layer_name()));
        let tool_hidden = !self.show_tool_materials
            && node.draw_data().is_some_and(|data| data.material.is_tool_material());
        layer_enabled && !tool_hidden
    }

    fn refresh_enabled(&mut self) {
        let keys: Vec<SceneNodeKey> = self.nodes.keys().collect();
        for key in keys {
            let (enabled, mobility, bounds) = {
                let entry = &self.nodes[key];
                (self.passes_filters(entry.node.as_ref()), entry.mobility, entry.node.bounding_box())
            };
            if enabled == self.nodes[key].enabled {
                continue;
            }

            self.nodes[key].enabled = enabled;
            if enabled {
                self.octree_mut(mobility).insert(key, &bounds);
            } else {
                self.octree_mut(mobility).remove(key);
            }
        }
    }

    fn octree_mut(&mut self, mobility: Mobility) -> &mut Octree {
        match mobility {
            Mobility::Static => &mut self.static_octree,
            Mobility::Dynamic => &mut self.dynamic_octree,
        }
    }

    pub fn static_octree(&self) -> &Octree {
        &self.static_octree
    }

    pub fn dynamic_octree(&self) -> &Octree {
        &self.dynamic_octree
    }

    // ===== PER FRAME =====

    /// Advance animation and re-index dynamic nodes.
    pub fn update(&mut self, context: &UpdateContext) {
        for (key, entry) in &mut self.nodes {
            entry.node.update(context);
            if entry.enabled && entry.mobility == Mobility::Dynamic {
                self.dynamic_octree.update(key, &entry.node.bounding_box());
            }
        }

        if let Some(sky) = &mut self.sky {
            sky.update(context);
        }
    }

    /// Cull and batch.
    ///
    /// Tests against `locked_frustum` when given, else the camera's live
    /// frustum; with neither, every enabled node is drawn.
    pub fn collect_draw_calls(&mut self, camera: Option<&Camera>, locked_frustum: Option<&Frustum>) {
        self.visible.clear();
        self.opaque.clear();
        self.translucent.clear();

        match locked_frustum.or(camera.map(|c| c.frustum())) {
            Some(frustum) => {
                self.static_octree.query_frustum(frustum, &mut self.visible);
                self.dynamic_octree.query_frustum(frustum, &mut self.visible);
            }
            None => {
                self.static_octree.query_all(&mut self.visible);
                self.dynamic_octree.query_all(&mut self.visible);
            }
        }

        for &key in &self.visible {
            let Some(entry) = self.nodes.get(key) else {
                continue;
            };
            let Some(data) = entry.node.draw_data() else {
                continue;
            };

            let call = DrawCall {
                node: key,
                sort_key: DrawCall::sort_key(data.shader.id(), data.material.id(), entry.sequence),
                transform: entry.node.transform(),
                env_map: entry.env_map,
                geometry: data.geometry,
                material: data.material,
                shader: data.shader,
            };
            if call.material.is_translucent() {
                self.translucent.push(call);
            } else {
                self.opaque.push(call);
            }
        }

        sort_draw_calls(&mut self.opaque);
        sort_draw_calls(&mut self.translucent);
    }

    pub fn opaque_draw_calls(&self) -> &[DrawCall] {
        &self.opaque
    }

    pub fn translucent_draw_calls(&self) -> &[DrawCall] {
        &self.translucent
    }

    pub fn render_opaque_layer(&self, cmd: &mut dyn CommandList, context: &RenderContext) -> Result<()> {
        Self::render_draw_calls(cmd, context, &self.opaque, 0)
    }

    pub fn render_translucent_layer(&self, cmd: &mut dyn CommandList, context: &RenderContext) -> Result<()> {
        Self::render_draw_calls(cmd, context, &self.translucent, self.opaque.len())
    }

    /// Picking identifiers number the opaque batch first, then the
    /// translucent one, starting at 1.
    fn render_draw_calls(
        cmd: &mut dyn CommandList,
        context: &RenderContext,
        calls: &[DrawCall],
        pick_offset: usize,
    ) -> Result<()> {
        let mut bound_shader = None;
        let mut bound_material = None;

        for (index, call) in calls.iter().enumerate() {
            let shader = context.replacement_shader.unwrap_or(&call.shader);
            if bound_shader != Some(shader.id()) {
                cmd.bind_shader(shader)?;
                bound_shader = Some(shader.id());
                bound_material = None;
            }
            if bound_material != Some(call.material.id()) {
                for texture in call.material.textures() {
                    cmd.bind_texture(texture.slot, &texture.texture)?;
                }
                bound_material = Some(call.material.id());
            }

            let constants = ObjectConstants {
                transform: call.transform,
                pick_id: if context.pick_ids { (pick_offset + index + 1) as u32 } else { 0 },
                env_map: call.env_map,
                _pad: [0; 2],
            };
            cmd.push_constants(0, bytemuck::bytes_of(&constants))?;

            let geometry = &call.geometry;
            cmd.bind_vertex_buffer(geometry.vertex_buffer(), 0)?;
            match geometry.index_buffer() {
                Some(index_buffer) => {
                    cmd.bind_index_buffer(index_buffer, 0, geometry.index_type())?;
                    cmd.draw_indexed(geometry.index_count(), 0, 0)?;
                }
                None => cmd.draw(geometry.vertex_count(), 0)?,
            }
        }
        Ok(())
    }

    /// Node drawn with picking identifier `pick_id` in the last collected batches.
    pub fn node_for_pick_id(&self, pick_id: u32) -> Option<SceneNodeKey> {
        let index = (pick_id as usize).checked_sub(1)?;
        match self.opaque.get(index) {
            Some(call) => Some(call.node),
            None => self.translucent.get(index - self.opaque.len()).map(|call| call.node),
        }
    }

    // ===== LOAD-TIME DERIVED STATE =====

    pub fn add_env_map_probe(&mut self, probe: EnvMapProbe) {
        self.env_map_probes.push(probe);
    }

    pub fn env_map_probes(&self) -> &[EnvMapProbe] {
        &self.env_map_probes
    }

    /// Assign every node the probe containing its center, else the nearest.
    pub fn calculate_environment_maps(&mut self) {
        for entry in self.nodes.values_mut() {
            let center = entry.node.bounding_box().center();
            entry.env_map = EnvMapProbe::select(&self.env_map_probes, center)
                .map(|probe| probe.array_index)
                .unwrap_or(0);
        }
    }

    /// Union of every node's bounds; empty for a scene without nodes.
    pub fn compute_framing_bounds(&self) -> AABB {
        self.nodes
            .values()
            .fold(AABB::empty(), |bounds, entry| bounds.union(&entry.node.bounding_box()))
    }

    // ===== RENDER MODES =====

    pub fn set_render_mode(&mut self, shaders: &mut ShaderCache, mode: Option<&str>) -> Result<()> {
        for entry in self.nodes.values_mut() {
            entry.node.set_render_mode(shaders, mode)?;
        }
        Ok(())
    }

    /// Distinct render modes of the enabled nodes, in insertion order.
    pub fn supported_render_modes(&self) -> Vec<String> {
        let mut entries: Vec<&NodeEntry> = self.nodes.values().filter(|e| e.enabled).collect();
        entries.sort_by_key(|entry| entry.sequence);

        let mut modes: Vec<String> = Vec::new();
        for entry in entries {
            for mode in entry.node.supported_render_modes() {
                if !modes.contains(&mode) {
                    modes.push(mode);
                }
            }
        }
        modes
    }

    // ===== ENVIRONMENT =====

    pub fn lighting(&self) -> &LightingInfo {
        &self.lighting
    }

    pub fn lighting_mut(&mut self) -> &mut LightingInfo {
        &mut self.lighting
    }

    pub fn fog(&self) -> &FogInfo {
        &self.fog
    }

    pub fn fog_mut(&mut self) -> &mut FogInfo {
        &mut self.fog
    }

    pub fn sky(&self) -> Option<&dyn Sky> {
        self.sky.as_deref()
    }

    pub fn set_sky(&mut self, sky: Option<Box<dyn Sky>>) {
        self.sky = sky;
    }

    /// Translation subtracted from the camera when this scene is a skybox
    pub fn world_offset(&self) -> Vec3 {
        self.world_offset
    }

    pub fn set_world_offset(&mut self, offset: Vec3) {
        self.world_offset = offset;
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
