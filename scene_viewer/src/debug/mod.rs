//! Debug overlays drawn after the main passes.

mod grid;
mod lines;
mod octree_renderer;
mod selection;

pub use grid::InfiniteGrid;
pub use lines::LineVertex;
pub use octree_renderer::OctreeDebugRenderer;
pub use selection::SelectedNodeRenderer;
