/// Registration of the viewer's callbacks with the host event loop.
///
/// The host only delivers callbacks that are registered. A `HookSet`
/// unregisters everything it still holds when dropped.

use crate::viewer_trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Load,
    Paint,
    Resize,
    PointerClick,
}

/// Host side of the callback contract
pub trait EventSource: Send {
    fn register(&mut self, hook: Hook);

    fn unregister(&mut self, hook: Hook);
}

pub struct HookSet {
    source: Box<dyn EventSource>,
    registered: Vec<Hook>,
}

impl HookSet {
    pub fn new(source: Box<dyn EventSource>) -> Self {
        Self { source, registered: Vec::new() }
    }

    pub fn register(&mut self, hook: Hook) {
        if self.registered.contains(&hook) {
            return;
        }
        viewer_trace!("viewer::Hooks", "register {:?}", hook);
        self.source.register(hook);
        self.registered.push(hook);
    }

    pub fn unregister(&mut self, hook: Hook) {
        if let Some(index) = self.registered.iter().position(|&h| h == hook) {
            self.registered.remove(index);
            self.source.unregister(hook);
        }
    }

    pub fn is_registered(&self, hook: Hook) -> bool {
        self.registered.contains(&hook)
    }

    pub fn unregister_all(&mut self) {
        for hook in std::mem::take(&mut self.registered) {
            self.source.unregister(hook);
        }
    }
}

impl Drop for HookSet {
    fn drop(&mut self) {
        self.unregister_all();
    }
}

/// Event source writing into a mock renderer journal
#[cfg(test)]
pub struct MockEventSource {
    journal: crate::renderer::mock_renderer::Journal,
}

#[cfg(test)]
impl MockEventSource {
    pub fn new(journal: crate::renderer::mock_renderer::Journal) -> Self {
        Self { journal }
    }
}

#[cfg(test)]
impl EventSource for MockEventSource {
    fn register(&mut self, hook: Hook) {
        self.journal.lock().unwrap().push(format!("register:{:?}", hook));
    }

    fn unregister(&mut self, hook: Hook) {
        self.journal.lock().unwrap().push(format!("unregister:{:?}", hook));
    }
}
