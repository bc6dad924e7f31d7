//! Shader hot reload: background file watching and the render-thread
//! debounce/reentrancy coordinator.

mod coordinator;
mod shader_watcher;

pub use coordinator::{HotReloadCoordinator, RejectReason, ReloadDecision, ReloadGuard};
pub use shader_watcher::{classify, FileChangeEvent, FileChangeKind, ShaderWatcher};
