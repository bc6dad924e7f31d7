/// Viewer for a single model.

use crate::error::Result;
use crate::scene::{Mobility, SceneNode};
use crate::viewer_debug;
use super::controls::{ViewerControls, ViewerFlags};
use super::scene_viewer::{LoadContext, SceneViewer};

/// Produces the nodes of one model
pub trait ModelLoader: Send {
    fn load_model(&mut self, context: &mut LoadContext) -> Result<Vec<(Box<dyn SceneNode>, Mobility)>>;
}

pub struct ModelViewer {
    name: String,
    loader: Box<dyn ModelLoader>,
}

impl ModelViewer {
    pub fn new(name: impl Into<String>, loader: Box<dyn ModelLoader>) -> Self {
        Self { name: name.into(), loader }
    }
}

impl SceneViewer for ModelViewer {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize_control(&mut self, controls: &mut ViewerControls) {
        controls.flags.insert(ViewerFlags::GRID);
    }

    fn load_scene(&mut self, context: &mut LoadContext) -> Result<()> {
        let nodes = self.loader.load_model(context)?;
        viewer_debug!("viewer::ModelViewer", "'{}': {} nodes", self.name, nodes.len());
        for (node, mobility) in nodes {
            context.scene.add_node(node, mobility);
        }
        Ok(())
    }
}
