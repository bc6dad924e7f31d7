/// Background watch of the shader source directory.
///
/// `notify` delivers events on its own thread. The watcher only classifies
/// them and forwards a `FileChangeEvent` over a channel; the render thread
/// drains that channel at the start of each frame.

use std::path::{Path, PathBuf};
use crossbeam_channel::Sender;
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use crate::error::Result;
use crate::{viewer_info, viewer_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeKind {
    Changed,
    Created,
    Renamed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    pub kind: FileChangeKind,
    pub path: PathBuf,
}

impl FileChangeEvent {
    pub fn new(kind: FileChangeKind, path: impl Into<PathBuf>) -> Self {
        Self { kind, path: path.into() }
    }
}

/// Map a raw notify event kind; access and removal events are ignored.
pub fn classify(kind: &EventKind) -> Option<FileChangeKind> {
    match kind {
        EventKind::Create(_) => Some(FileChangeKind::Created),
        EventKind::Modify(ModifyKind::Name(_)) => Some(FileChangeKind::Renamed),
        EventKind::Modify(_) => Some(FileChangeKind::Changed),
        _ => None,
    }
}

pub struct ShaderWatcher {
    _watcher: RecommendedWatcher,
    directory: PathBuf,
}

impl ShaderWatcher {
    /// Watch `directory` recursively, forwarding changes to `sender`.
    pub fn new(directory: &Path, sender: Sender<FileChangeEvent>) -> Result<Self> {
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    let Some(kind) = classify(&event.kind) else {
                        return;
                    };
                    for path in event.paths {
                        // The receiver is gone once the viewer is disposed.
                        if sender.send(FileChangeEvent { kind, path }).is_err() {
                            return;
                        }
                    }
                }
                Err(error) => {
                    viewer_warn!("viewer::ShaderWatcher", "File watch error: {}", error);
                }
            }
        })?;
        watcher.watch(directory, RecursiveMode::Recursive)?;

        viewer_info!("viewer::ShaderWatcher", "Watching {} for shader changes", directory.display());
        Ok(Self {
            _watcher: watcher,
            directory: directory.to_path_buf(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind, RenameMode};

    #[test]
    fn test_classify_event_kinds() {
        assert_eq!(classify(&EventKind::Create(CreateKind::File)), Some(FileChangeKind::Created));
        assert_eq!(
            classify(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(FileChangeKind::Renamed),
        );
        assert_eq!(
            classify(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(FileChangeKind::Changed),
        );
        assert_eq!(classify(&EventKind::Remove(RemoveKind::File)), None);
        assert_eq!(classify(&EventKind::Access(AccessKind::Any)), None);
    }

    #[test]
    fn test_missing_directory_is_watch_error() {
        let (sender, _receiver) = crossbeam_channel::unbounded();
        let result = ShaderWatcher::new(Path::new("/nonexistent/shader/dir"), sender);
        assert!(matches!(result, Err(crate::error::Error::Watch(_))));
    }
}
