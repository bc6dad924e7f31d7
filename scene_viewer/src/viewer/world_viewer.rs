/// Viewer for a whole map: layers, environment maps, lighting, fog, sky and
/// an optional 3D skybox.
///
/// World viewers always start from the configured camera pose and never
/// frame the scene.

use glam::Vec3;
use crate::error::Result;
use crate::scene::{EnvMapProbe, FogInfo, LightingInfo, Mobility, Scene, SceneNode, Sky};
use crate::viewer_debug;
use super::controls::{ViewerControls, ViewerFlags};
use super::scene_viewer::{LoadContext, SceneViewer, Skybox};

/// Nodes of the 3D skybox and where the skybox sits relative to the map
pub struct LoadedSkybox {
    pub nodes: Vec<(Box<dyn SceneNode>, Mobility)>,
    pub world_offset: Vec3,
}

#[derive(Default)]
pub struct LoadedWorld {
    pub nodes: Vec<(Box<dyn SceneNode>, Mobility)>,
    /// Layers enabled after load, also offered to the host
    pub layers: Vec<String>,
    pub env_maps: Vec<EnvMapProbe>,
    pub lighting: Option<LightingInfo>,
    /// The default fog texture installed before load is kept
    pub fog: Option<FogInfo>,
    pub sky: Option<Box<dyn Sky>>,
    pub skybox: Option<LoadedSkybox>,
}

pub trait WorldLoader: Send {
    fn load_world(&mut self, context: &mut LoadContext) -> Result<LoadedWorld>;
}

pub struct WorldViewer {
    name: String,
    loader: Box<dyn WorldLoader>,
}

impl WorldViewer {
    pub fn new(name: impl Into<String>, loader: Box<dyn WorldLoader>) -> Self {
        Self { name: name.into(), loader }
    }
}

impl SceneViewer for WorldViewer {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize_control(&mut self, controls: &mut ViewerControls) {
        controls.flags.remove(ViewerFlags::GRID);
    }

    fn load_scene(&mut self, context: &mut LoadContext) -> Result<()> {
        let world = self.loader.load_world(context)?;
        let scene = &mut *context.scene;

        for (node, mobility) in world.nodes {
            scene.add_node(node, mobility);
        }
        for probe in world.env_maps {
            scene.add_env_map_probe(probe);
        }
        if let Some(lighting) = world.lighting {
            *scene.lighting_mut() = lighting;
        }
        if let Some(fog) = world.fog {
            let default_texture = scene.fog().default_fog_texture.clone();
            *scene.fog_mut() = FogInfo {
                default_fog_texture: fog.default_fog_texture.or(default_texture),
                ..fog
            };
        }
        scene.set_sky(world.sky);

        if !world.layers.is_empty() {
            scene.set_enabled_layers(world.layers.iter().cloned());
        }

        if let Some(loaded) = world.skybox {
            let mut skybox_scene = Scene::new(&context.config.octree);
            skybox_scene.set_world_offset(loaded.world_offset);
            for (node, mobility) in loaded.nodes {
                skybox_scene.add_node(node, mobility);
            }
            if !world.layers.is_empty() {
                skybox_scene.set_enabled_layers(world.layers.iter().cloned());
            }
            *context.skybox = Some(Skybox { scene: skybox_scene });
        }

        viewer_debug!(
            "viewer::WorldViewer",
            "'{}': {} nodes, {} layers, skybox: {}",
            self.name,
            scene.len(),
            world.layers.len(),
            context.skybox.is_some()
        );
        context.controls.available_layers = world.layers;
        Ok(())
    }

    fn frames_scene(&self) -> bool {
        false
    }
}
