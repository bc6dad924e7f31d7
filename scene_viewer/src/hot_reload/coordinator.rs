/// Debounce and reentrancy gate for shader reloads.
///
/// Lives on the render thread. File events pass three gates in order: a
/// reload in flight, the post-reload cooldown, then the change cooldown.
/// Temporary files are rejected before any gate and never touch the timers.
/// A rejected trigger is dropped, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::config::HotReloadConfig;
use crate::viewer_debug;
use super::shader_watcher::FileChangeEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TemporaryFile,
    Reloading,
    ReloadCooldown,
    ChangeCooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadDecision {
    Accepted,
    Rejected(RejectReason),
}

/// Holds the single reload slot; releases it on drop.
#[derive(Debug)]
pub struct ReloadGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for ReloadGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct HotReloadCoordinator {
    change_cooldown: Duration,
    reload_cooldown: Duration,
    temporary_suffix: String,
    last_changed: Option<Instant>,
    last_reload: Option<Instant>,
    reload_started: Option<Instant>,
    reloading: Arc<AtomicBool>,
}

impl HotReloadCoordinator {
    pub fn new(config: &HotReloadConfig) -> Self {
        Self {
            change_cooldown: config.change_cooldown,
            reload_cooldown: config.reload_cooldown,
            temporary_suffix: config.temporary_suffix.to_ascii_uppercase(),
            last_changed: None,
            last_reload: None,
            reload_started: None,
            reloading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Decide whether `event` triggers a reload.
    pub fn on_file_event(&mut self, event: &FileChangeEvent, now: Instant) -> ReloadDecision {
        if self.is_temporary(event) {
            return ReloadDecision::Rejected(RejectReason::TemporaryFile);
        }

        viewer_debug!("viewer::HotReload", "{:?} {}", event.kind, event.path.display());

        let decision = if self.is_reloading() {
            ReloadDecision::Rejected(RejectReason::Reloading)
        } else if Self::within(self.last_reload, self.reload_cooldown, now) {
            ReloadDecision::Rejected(RejectReason::ReloadCooldown)
        } else if Self::within(self.last_changed, self.change_cooldown, now) {
            ReloadDecision::Rejected(RejectReason::ChangeCooldown)
        } else {
            self.last_changed = Some(now);
            ReloadDecision::Accepted
        };

        if let ReloadDecision::Rejected(reason) = decision {
            viewer_debug!("viewer::HotReload", "Ignored {} ({:?})", event.path.display(), reason);
        }
        decision
    }

    /// Take the reload slot, `None` while another reload holds it.
    pub fn try_begin(&mut self, now: Instant) -> Option<ReloadGuard> {
        self.reloading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.reload_started = Some(now);
        Some(ReloadGuard { flag: self.reloading.clone() })
    }

    /// Record the end of a reload and return how long it took.
    pub fn finish(&mut self, now: Instant) -> Duration {
        self.last_reload = Some(now);
        self.reload_started
            .take()
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading.load(Ordering::Acquire)
    }

    fn is_temporary(&self, event: &FileChangeEvent) -> bool {
        event.path
            .to_string_lossy()
            .to_ascii_uppercase()
            .ends_with(&self.temporary_suffix)
    }

    fn within(last: Option<Instant>, window: Duration, now: Instant) -> bool {
        last.is_some_and(|t| now.saturating_duration_since(t) < window)
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
