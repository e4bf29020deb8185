use std::io::Write;
use std::path::PathBuf;

use crate::api::Project;
use crate::error::DbpassError;
use crate::store::ProjectStore;

/// Publishes the project snapshot as pretty JSON next to the config.
pub struct FileProjectStore {
    path: PathBuf,
}

impl FileProjectStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read back the last published snapshot, if any.
    pub fn load(&self) -> Result<Option<Project>, DbpassError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read(&self.path)?;
        let project =
            serde_json::from_slice(&raw).map_err(|e| DbpassError::Serialization(e.to_string()))?;
        Ok(Some(project))
    }

    /// Atomic write: write to temp file → fsync → rename
    pub fn save(&self, project: &Project) -> Result<(), DbpassError> {
        let json = serde_json::to_vec_pretty(project)
            .map_err(|e| DbpassError::Serialization(e.to_string()))?;

        let parent = self
            .path
            .parent()
            .ok_or_else(|| DbpassError::Config("Project cache has no parent directory.".into()))?;
        std::fs::create_dir_all(parent)?;

        let tmp_path = parent.join(format!(".project.tmp.{}", rand::random::<u64>()));

        {
            let mut tmp = std::fs::File::create(&tmp_path)?;
            tmp.write_all(&json)?;
            tmp.sync_all()?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl ProjectStore for FileProjectStore {
    fn publish(&self, project: Project) {
        match self.save(&project) {
            Ok(()) => tracing::debug!(
                project_ref = %project.project_ref,
                path = %self.path.display(),
                "published project snapshot"
            ),
            Err(e) => tracing::warn!(
                project_ref = %project.project_ref,
                error = %e,
                "failed to publish project snapshot"
            ),
        }
    }
}
