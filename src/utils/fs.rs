//! Output file helpers

use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

/// Path of the intermediate guide written before fixes are applied:
/// `<stem>_intermediate.<ext>` beside `output`, with `.xml` when the output
/// has no extension.
pub fn intermediate_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "xml".to_string());
    output.with_file_name(format!("{stem}_intermediate.{extension}"))
}

async fn create_parent_dirs(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::io(parent, e))?;
    }
    Ok(())
}

/// Write `contents` to `path` via a temporary sibling and a rename, creating
/// parent directories first. A failed write leaves nothing at `path`.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> AppResult<()> {
    create_parent_dirs(path).await?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::validation(format!("{} is not a file path", path.display())))?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(e) = tokio::fs::write(&temp, contents).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(AppError::io(&temp, e));
    }
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(AppError::io(path, e));
    }
    Ok(())
}

/// Plain write with parent directory creation.
pub async fn write_with_parents(path: &Path, contents: &[u8]) -> AppResult<()> {
    create_parent_dirs(path).await?;
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| AppError::io(path, e))
}

/// Byte-for-byte copy with parent directory creation.
pub async fn copy_with_parents(from: &Path, to: &Path) -> AppResult<()> {
    create_parent_dirs(to).await?;
    tokio::fs::copy(from, to)
        .await
        .map(|_| ())
        .map_err(|e| AppError::io(from, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("/out/guide.xml", "/out/guide_intermediate.xml")]
    #[case("/out/guide", "/out/guide_intermediate.xml")]
    #[case("guide.xmltv", "guide_intermediate.xmltv")]
    fn test_intermediate_path(#[case] output: &str, #[case] expected: &str) {
        assert_eq!(intermediate_path(Path::new(output)), PathBuf::from(expected));
    }

    #[tokio::test]
    async fn test_write_atomic_creates_parents_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/guide.xml");

        write_atomic(&path, b"<tv></tv>").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"<tv></tv>");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn test_copy_with_parents() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.xml");
        std::fs::write(&from, b"\xef\xbb\xbf<tv/>").unwrap();
        let to = dir.path().join("deep/b.xml");

        copy_with_parents(&from, &to).await.unwrap();
        assert_eq!(std::fs::read(&to).unwrap(), std::fs::read(&from).unwrap());
    }
}
