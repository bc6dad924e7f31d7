/*!
# Scene Viewer

Core of a real-time 3D scene viewer.

The crate owns a scene of nodes indexed by two octrees (static and dynamic),
culls it against a live or frozen camera frustum, and drives a fixed
multi-pass draw sequence through a backend-agnostic renderer.

## Architecture

- **Orchestrator**: per-frame state machine (Update, Cull, Upload, Draw)
- **Scene**: nodes, octrees, draw-call batches, lighting, fog and sky
- **Camera**: reversed-depth projection and frustum, optional picker
- **Picking**: off-screen identifier target read back under the cursor
- **Hot reload**: shader directory watch with debounce and a reentrancy gate
- **Renderer**: factory and command-recording traits implemented by backends

Viewer variants (model, world) implement `SceneViewer` and fill the scene
during load; the host event loop calls into the orchestrator.
*/

pub mod camera;
pub mod config;
pub mod debug;
mod error;
pub mod hot_reload;
pub mod log;
pub mod math;
pub mod picking;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod uniform;
pub mod viewer;

// Error types
pub use error::{Error, Result};

// Configuration
pub use config::{CameraConfig, HotReloadConfig, OctreeConfig, ViewerConfig};

// Viewer entry points
pub use viewer::{
    Collaborators, EventSource, Hook, ModelLoader, ModelViewer, Orchestrator, SceneViewer,
    ViewerFlags, ViewerState, WorldLoader, WorldViewer,
};

// Renderer factory trait
pub use renderer::Renderer;

// Re-export math library at crate root
pub use glam;
