pub mod file;

use std::sync::Mutex;

use crate::api::Project;

pub use file::FileProjectStore;

/// Shared project-detail snapshot. The reset widget only ever publishes into it.
pub trait ProjectStore: Send + Sync {
    fn publish(&self, project: Project);
}

/// In-process store holding the latest published snapshot.
#[derive(Default)]
pub struct MemoryProjectStore {
    latest: Mutex<Option<Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Project> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ProjectStore for MemoryProjectStore {
    fn publish(&self, project: Project) {
        if let Ok(mut guard) = self.latest.lock() {
            *guard = Some(project);
        }
    }
}
