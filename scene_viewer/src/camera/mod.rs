//! Camera module: camera, frustum and depth-range partitioning.

mod camera;
mod depth_partition;
mod frustum;

pub use camera::Camera;
pub use depth_partition::{DepthPartition, DepthRange};
pub use frustum::{
    Frustum, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
