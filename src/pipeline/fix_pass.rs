//! Curated icon overrides applied to the intermediate guide

use std::path::Path;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::SpecificFixes;
use crate::utils::fs::{copy_with_parents, write_atomic};
use crate::xmltv::rewrite_channel_icons;

/// Apply `fixes` to the guide at `intermediate` and write the final guide.
///
/// With no fixes the intermediate file is copied unchanged. Returns the
/// number of channels whose icon was overridden.
pub async fn apply_specific_fixes(intermediate: &Path, fixes: &SpecificFixes, final_path: &Path) -> AppResult<usize> {
    if !tokio::fs::try_exists(intermediate)
        .await
        .map_err(|e| AppError::io(intermediate, e))?
    {
        return Err(AppError::io(
            intermediate,
            std::io::Error::new(std::io::ErrorKind::NotFound, "intermediate guide not found"),
        ));
    }

    if fixes.is_empty() {
        info!("No specific fixes to apply. Copying intermediate file to final output.");
        copy_with_parents(intermediate, final_path).await?;
        info!("Final XML saved to {}", final_path.display());
        return Ok(0);
    }

    info!("Applying {} specific fixes to {}", fixes.len(), intermediate.display());
    let document = tokio::fs::read_to_string(intermediate)
        .await
        .map_err(|e| AppError::io(intermediate, e))?;

    let rewrite = rewrite_channel_icons(&document, &intermediate.display().to_string(), |channel| {
        let url = fixes.get(&channel.id)?;
        debug!("Applied fix for channel {}: {}", channel.id, url);
        Some(url.to_string())
    })?;

    write_atomic(final_path, rewrite.document.as_bytes()).await?;
    let fixed = rewrite.assigned();
    info!("Applied {} specific fix(es). Final XML saved to {}", fixed, final_path.display());
    Ok(fixed)
}
