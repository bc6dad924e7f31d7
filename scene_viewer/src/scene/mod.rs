//! Scene module
//!
//! Scene nodes, the static/dynamic octrees, culling and draw-call batching,
//! lighting and sky.

mod draw_call;
mod lighting;
mod octree;
mod render_context;
mod scene;
mod scene_node;
mod sky;

pub use draw_call::{sort_draw_calls, DrawCall};
pub use lighting::{EnvMapProbe, FogInfo, LightingInfo};
pub use octree::{Octree, OctreeCell};
pub use render_context::RenderContext;
pub use scene::Scene;
pub use scene_node::{DrawData, Mobility, ModelNode, SceneNode, SceneNodeKey, UpdateContext};
pub use sky::{ScreenSpaceSky, Sky};
