//! Outbound services
//!
//! Finished outputs can be pushed to remote storage through an
//! [`ArtifactUploader`]. The orchestrator only talks to the trait.

pub mod dropbox;

use async_trait::async_trait;
use std::path::Path;

use crate::errors::AppResult;

pub use dropbox::{DropboxCredentials, DropboxUploader};

/// Pushes a finished output file to remote storage
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    /// Whether uploads can be attempted at all (credentials and destination
    /// present)
    fn is_available(&self) -> bool;

    /// Upload the file at `path`, returning the remote path it was stored at
    async fn upload(&self, path: &Path) -> AppResult<String>;
}
