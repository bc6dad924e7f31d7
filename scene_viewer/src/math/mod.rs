//! Math helpers shared by culling, framing and the debug overlays.

mod aabb;

pub use aabb::AABB;
