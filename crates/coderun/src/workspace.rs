//! Per-request working directories
//!
//! Every request stages its source into a fresh directory under the scratch
//! root. The directory is owned by the request and removed when its
//! [`Workspace`] is cleaned up or dropped, whichever happens first.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::profile::LanguageProfile;

/// Prefix of every per-request directory name
const WORKSPACE_PREFIX: &str = "run-";

/// Errors that occur while staging code on disk
#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to create workspace under {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("failed to remove workspace {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A uniquely named scratch directory
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh directory under `scratch_root`
    ///
    /// The scratch root itself is created when missing.
    #[instrument]
    pub async fn create(scratch_root: &Path) -> Result<Self, StageError> {
        tokio::fs::create_dir_all(scratch_root)
            .await
            .map_err(|source| StageError::CreateDir {
                path: scratch_root.to_path_buf(),
                source,
            })?;

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(scratch_root)
            .map_err(|source| StageError::CreateDir {
                path: scratch_root.to_path_buf(),
                source,
            })?;

        debug!(path = ?dir.path(), "workspace created");
        Ok(Self { dir })
    }

    /// Get the workspace directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the path of a file directly inside the workspace
    ///
    /// Returns an error if the name would escape the workspace.
    pub fn file_path(&self, name: &str) -> Result<PathBuf, StageError> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(StageError::InvalidPath(format!(
                "file name not allowed: {name:?}"
            )));
        }
        Ok(self.dir.path().join(name))
    }

    /// Write a file into the workspace
    #[instrument(skip(self, contents))]
    pub async fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf, StageError> {
        let path = self.file_path(name)?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| StageError::WriteFile {
                path: path.clone(),
                source,
            })?;
        debug!(?path, len = contents.len(), "wrote file to workspace");
        Ok(path)
    }

    /// Remove the workspace and everything in it
    ///
    /// Dropping a workspace also removes it, but silently; this reports
    /// failures so they can be logged.
    #[instrument(skip(self), fields(path = ?self.dir.path()))]
    pub fn cleanup(self) -> Result<(), StageError> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| StageError::Cleanup { path, source })?;
        debug!("workspace removed");
        Ok(())
    }
}

/// Source code written to disk and ready for a command plan
#[derive(Debug)]
pub struct StagedSource {
    workspace: Workspace,
    source_name: String,
}

impl StagedSource {
    /// Get the directory holding the source
    pub fn dir(&self) -> &Path {
        self.workspace.path()
    }

    /// Get the file name of the submitted source
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Get the full path of the submitted source
    pub fn source_path(&self) -> PathBuf {
        self.workspace.path().join(&self.source_name)
    }

    /// Source file name without its extension
    pub fn source_stem(&self) -> &str {
        self.source_name
            .rsplit_once('.')
            .map_or(self.source_name.as_str(), |(stem, _)| stem)
    }

    /// Remove the staged directory, logging rather than failing
    pub fn cleanup(self) {
        if let Err(err) = self.workspace.cleanup() {
            warn!(%err, "workspace cleanup failed");
        }
    }
}

/// Stage code for a language into a fresh workspace
///
/// Writes the profile's scaffold files and then the source itself. On error
/// the partially written workspace is removed.
#[instrument(skip(profile, code), fields(language = %profile.id()))]
pub async fn stage(
    profile: &dyn LanguageProfile,
    scratch_root: &Path,
    code: &str,
) -> Result<StagedSource, StageError> {
    let plan = profile.stage(code);
    let workspace = Workspace::create(scratch_root).await?;

    for file in &plan.scaffold {
        workspace.write_file(&file.name, &file.contents).await?;
    }
    workspace
        .write_file(&plan.source.name, &plan.source.contents)
        .await?;

    debug!(source = %plan.source.name, scaffold = plan.scaffold.len(), "source staged");
    Ok(StagedSource {
        workspace,
        source_name: plan.source.name,
    })
}
