//! Channel identifier to icon lookup built from a finished guide

use std::path::Path;
use tracing::{info, warn};

use super::rewriter::scan_channels;
use crate::errors::AppResult;
use crate::models::{CrossReferenceMap, Outcome};

/// Collect `id -> icon src` for every channel that has both.
pub fn collect_channel_icons(document: &str, document_name: &str) -> AppResult<CrossReferenceMap> {
    let mut map = CrossReferenceMap::default();
    scan_channels(document, document_name, |info| {
        if let Some(src) = &info.icon_src {
            map.insert(info.id.clone(), src.clone());
        }
    })?;
    Ok(map)
}

/// Build the cross-reference map from the guide written at `path`.
///
/// A missing or unparsable guide yields an empty map; the playlist pass then
/// falls back to fixes and catalog matching.
pub async fn load_cross_reference(path: &Path) -> Outcome<CrossReferenceMap> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Cannot read {} for cross-referencing: {}", path.display(), e);
            return Outcome::degraded(
                CrossReferenceMap::default(),
                format!("cannot read {}: {e}", path.display()),
            );
        }
    };

    match collect_channel_icons(&contents, &path.display().to_string()) {
        Ok(map) => {
            info!("Created cross-reference map with {} channel logos from {}", map.len(), path.display());
            Outcome::Complete(map)
        }
        Err(e) => {
            warn!("Error parsing {} for cross-referencing: {}", path.display(), e);
            Outcome::degraded(CrossReferenceMap::default(), e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GUIDE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tv>
  <channel id="BBCONE.uk"><display-name>BBC One</display-name><icon src="https://x/bbc-one-uk.png"></icon></channel>
  <channel id="ITV1.uk"><display-name>ITV1</display-name><icon src=""></icon></channel>
  <channel id=""><icon src="https://x/orphan.png"></icon></channel>
  <channel id="C4.uk"><display-name>Channel 4</display-name></channel>
</tv>"#;

    #[test]
    fn test_only_channels_with_id_and_icon_are_collected() {
        let map = collect_channel_icons(GUIDE, "guide").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("BBCONE.uk"), Some("https://x/bbc-one-uk.png"));
        assert_eq!(map.get("C4.uk"), None);
    }

    #[test]
    fn test_second_root_element_is_rejected() {
        let document = r#"<tv><channel id="a"><icon src="https://x/a.png"></icon></channel></tv><tv></tv>"#;
        assert!(collect_channel_icons(document, "guide").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GUIDE.as_bytes()).unwrap();

        let outcome = load_cross_reference(file.path()).await;
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_or_broken_guide_degrades_to_empty() {
        let missing = load_cross_reference(Path::new("/nonexistent/guide.xml")).await;
        assert!(missing.is_degraded());
        assert!(missing.value().is_empty());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<tv><channel id=\"a\">").unwrap();
        let broken = load_cross_reference(file.path()).await;
        assert!(broken.is_degraded());
        assert!(broken.value().is_empty());
    }
}
