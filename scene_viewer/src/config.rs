//! Viewer configuration.
//!
//! A `ViewerConfig` is handed to the orchestrator at construction. Nothing in
//! the crate reads settings from global state.

use std::path::PathBuf;
use std::time::Duration;
use glam::{Vec3, Vec4};
use crate::math::AABB;

/// Top-level viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Clear color used when the scene has no 2D sky (RGBA)
    pub background_color: Vec4,
    /// Depth value splitting the skybox sub-range from the foreground one
    pub depth_split: f32,
    /// Camera pose used when the scene cannot be framed
    pub default_camera_location: Vec3,
    pub default_camera_target: Vec3,
    pub camera: CameraConfig,
    /// Projection scale applied to the skybox camera
    pub skybox_scale: f32,
    pub octree: OctreeConfig,
    pub hot_reload: HotReloadConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            depth_split: 0.05,
            default_camera_location: Vec3::splat(256.0),
            default_camera_target: Vec3::ZERO,
            camera: CameraConfig::default(),
            skybox_scale: 16.0,
            octree: OctreeConfig::default(),
            hot_reload: HotReloadConfig::default(),
        }
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub field_of_view_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            field_of_view_degrees: 60.0,
            near: 1.0,
            far: 20000.0,
        }
    }
}

/// Octree extents and subdivision depth
#[derive(Debug, Clone, Copy)]
pub struct OctreeConfig {
    pub bounds: AABB,
    pub static_depth: u32,
    pub dynamic_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            bounds: AABB::new(Vec3::splat(-16384.0), Vec3::splat(16384.0)),
            static_depth: 4,
            dynamic_depth: 3,
        }
    }
}

/// Shader hot-reload settings
#[derive(Debug, Clone)]
pub struct HotReloadConfig {
    /// Watch the shader directory (on by default in debug builds)
    pub enabled: bool,
    /// Directory to watch; no watcher is started without one
    pub shader_directory: Option<PathBuf>,
    /// Minimum interval between two accepted change events
    pub change_cooldown: Duration,
    /// Quiet period after a reload completes
    pub reload_cooldown: Duration,
    /// Suffix of editor temporary files, ignored outright
    pub temporary_suffix: String,
}

impl Default for HotReloadConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            shader_directory: None,
            change_cooldown: Duration::from_secs(1),
            reload_cooldown: Duration::from_millis(500),
            temporary_suffix: ".TMP".to_string(),
        }
    }
}
