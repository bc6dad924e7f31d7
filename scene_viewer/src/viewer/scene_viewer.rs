/// Viewer variants seen through one interface.
///
/// The orchestrator drives a `Box<dyn SceneViewer>`: it asks the variant to
/// set up its controls, to fill the scene during load and to react to
/// picks. Concrete variants never see the orchestrator itself.

use std::sync::{Arc, Mutex};
use crate::config::ViewerConfig;
use crate::debug::SelectedNodeRenderer;
use crate::error::Result;
use crate::picking::PickingIntent;
use crate::renderer::Renderer;
use crate::resource::{MaterialLoader, ResourceLoader, ShaderCache};
use crate::scene::{Scene, SceneNodeKey};
use crate::viewer_info;
use super::controls::ViewerControls;

/// Secondary scene drawn behind the main one in the lower depth sub-range
pub struct Skybox {
    pub scene: Scene,
}

/// Everything a viewer may touch while loading its scene
pub struct LoadContext<'a> {
    pub renderer: &'a Arc<Mutex<dyn Renderer>>,
    pub shaders: &'a mut ShaderCache,
    pub resources: &'a dyn ResourceLoader,
    pub materials: &'a mut dyn MaterialLoader,
    pub scene: &'a mut Scene,
    /// Set by viewers whose content ships a 3D skybox
    pub skybox: &'a mut Option<Skybox>,
    pub controls: &'a mut ViewerControls,
    pub config: &'a ViewerConfig,
}

/// State handed to the viewer when a pick resolves
pub struct PickContext<'a> {
    pub scene: &'a Scene,
    pub selection: &'a mut SelectedNodeRenderer,
}

pub trait SceneViewer: Send {
    fn name(&self) -> &str;

    /// Adjust the host controls before anything is loaded.
    fn initialize_control(&mut self, _controls: &mut ViewerControls) {}

    fn load_scene(&mut self, context: &mut LoadContext) -> Result<()>;

    /// React to a resolved pick. `node` is `None` when the cursor hit nothing.
    ///
    /// Selecting replaces the highlighted node; opening is only logged.
    fn on_picked(&mut self, context: &mut PickContext, node: Option<SceneNodeKey>, intent: PickingIntent) {
        match intent {
            PickingIntent::Select => context.selection.select(node),
            PickingIntent::Open => {
                if let Some(node) = node.and_then(|key| context.scene.node(key)) {
                    viewer_info!("viewer::SceneViewer", "Open requested for '{}'", node.name());
                }
            }
        }
    }

    /// Whether the camera is placed to frame the loaded scene
    fn frames_scene(&self) -> bool {
        true
    }
}
