//! Viewer layer: the viewer variants, host controls, hook registration and
//! the orchestrator that drives a scene frame by frame.

mod controls;
mod hooks;
mod model_viewer;
mod orchestrator;
mod scene_viewer;
mod world_viewer;

pub use controls::{ReloadNotification, RenderModeList, ViewerControls, ViewerFlags, DEFAULT_RENDER_MODE};
pub use hooks::{EventSource, Hook, HookSet};
#[cfg(test)]
pub use hooks::MockEventSource;
pub use model_viewer::{ModelLoader, ModelViewer};
pub use orchestrator::{
    Collaborators, Orchestrator, ViewerState,
    BRDF_LOOKUP_EMBEDDED, BRDF_LOOKUP_NAME, BRDF_LOOKUP_PATH, DEFAULT_FOG_TEXTURE, RESERVED_TEXTURE_SLOT,
};
pub use scene_viewer::{LoadContext, PickContext, SceneViewer, Skybox};
pub use world_viewer::{LoadedSkybox, LoadedWorld, WorldLoader, WorldViewer};
