/// Host-visible viewer controls: toggles, the render-mode selector and
/// the reload notification.

use bitflags::bitflags;
use crate::error::{Error, Result};

/// First entry of every render-mode list
pub const DEFAULT_RENDER_MODE: &str = "Default Render Mode";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ViewerFlags: u32 {
        const WIREFRAME = 1 << 0;
        const SKYBOX = 1 << 1;
        const GRID = 1 << 2;
        const STATIC_OCTREE = 1 << 3;
        const DYNAMIC_OCTREE = 1 << 4;
        /// Cull against a frozen snapshot of the frustum
        const LOCK_FRUSTUM = 1 << 5;
        const TOOL_MATERIALS = 1 << 6;
    }
}

impl Default for ViewerFlags {
    fn default() -> Self {
        ViewerFlags::SKYBOX | ViewerFlags::GRID
    }
}

/// Render modes offered to the host, default entry first
#[derive(Debug, Clone)]
pub struct RenderModeList {
    entries: Vec<String>,
    selected: usize,
}

impl Default for RenderModeList {
    fn default() -> Self {
        Self {
            entries: vec![DEFAULT_RENDER_MODE.to_string()],
            selected: 0,
        }
    }
}

impl RenderModeList {
    /// Replace the modes, dropping duplicates and keeping first occurrences.
    ///
    /// `selected` is kept when still in range, otherwise the default entry
    /// is selected.
    pub fn set_modes<I>(&mut self, modes: I, selected: usize)
    where
        I: IntoIterator<Item = String>,
    {
        self.entries.truncate(1);
        for mode in modes {
            if !self.entries.contains(&mode) {
                self.entries.push(mode);
            }
        }
        self.selected = if selected < self.entries.len() { selected } else { 0 };
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selected mode, `None` for the default entry
    pub fn selected_mode(&self) -> Option<&str> {
        match self.selected {
            0 => None,
            index => self.entries.get(index).map(String::as_str),
        }
    }

    /// Mode at `index`, `None` for the default entry
    pub fn mode_at(&self, index: usize) -> Result<Option<&str>> {
        match self.entries.get(index) {
            Some(_) if index == 0 => Ok(None),
            Some(mode) => Ok(Some(mode.as_str())),
            None => Err(Error::InvalidState(format!(
                "render mode index {} out of range ({} entries)",
                index,
                self.entries.len()
            ))),
        }
    }

    /// Select `mode` by name; unknown names select the default entry.
    pub fn select_mode(&mut self, mode: Option<&str>) {
        self.selected = mode
            .and_then(|mode| self.entries.iter().position(|entry| entry == mode))
            .unwrap_or(0);
    }
}

/// Non-blocking error surfaced to the host after a failed reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadNotification {
    pub title: String,
    pub message: String,
}

/// Everything the host UI reflects
#[derive(Debug, Clone, Default)]
pub struct ViewerControls {
    pub flags: ViewerFlags,
    pub render_modes: RenderModeList,
    /// Layer names the host can toggle (world viewers)
    pub available_layers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_list_is_prefixed_with_default_and_deduplicated() {
        let mut list = RenderModeList::default();

        list.set_modes(modes(&["Normals", "Albedo", "Normals", DEFAULT_RENDER_MODE, "ObjectId"]), 0);

        assert_eq!(list.entries(), &modes(&[DEFAULT_RENDER_MODE, "Normals", "Albedo", "ObjectId"])[..]);
        assert_eq!(list.selected_mode(), None);
    }

    #[test]
    fn test_set_modes_keeps_valid_selection() {
        let mut list = RenderModeList::default();
        list.set_modes(modes(&["Normals", "Albedo"]), 2);
        assert_eq!(list.selected_mode(), Some("Albedo"));

        list.set_modes(modes(&["Normals"]), 2);
        assert_eq!(list.selected_index(), 0);
    }

    #[test]
    fn test_mode_at_and_select_mode() {
        let mut list = RenderModeList::default();
        list.set_modes(modes(&["Normals"]), 0);

        assert_eq!(list.mode_at(0).unwrap(), None);
        assert_eq!(list.mode_at(1).unwrap(), Some("Normals"));
        assert!(matches!(list.mode_at(5), Err(Error::InvalidState(_))));

        list.select_mode(Some("Normals"));
        assert_eq!(list.selected_index(), 1);
        list.select_mode(Some("Missing"));
        assert_eq!(list.selected_index(), 0);
    }

    #[test]
    fn test_default_flags() {
        let flags = ViewerFlags::default();
        assert!(flags.contains(ViewerFlags::SKYBOX | ViewerFlags::GRID));
        assert!(!flags.contains(ViewerFlags::LOCK_FRUSTUM));
    }
}
