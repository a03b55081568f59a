/// Saving compressed output to disk
///
/// Single downloads go through a native save dialog. Download All asks for
/// one folder and writes every compressed image into it.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::codec::DataUrl;
use crate::error::DownloadError;
use crate::state::registry::{EntryId, Registry};
use crate::state::settings::OutputFormat;

/// Suffix inserted before the new extension
const COMPRESSED_SUFFIX: &str = "-compressed";

/// Output filename: the stem before the last `.` plus `-compressed.<format>`
///
/// Names without a dot keep their full text as the stem.
pub fn output_file_name(original: &str, format: OutputFormat) -> String {
    let stem = match original.rfind('.') {
        Some(dot) => &original[..dot],
        None => original,
    };
    format!("{}{}.{}", stem, COMPRESSED_SUFFIX, format.extension())
}

/// Where save dialogs open by default
pub fn default_directory() -> Option<PathBuf> {
    dirs::download_dir().or_else(dirs::home_dir)
}

/// First free path for `file_name` in `dir`, adding " (n)" like a browser
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = match file_name.rfind('.') {
        Some(dot) => (&file_name[..dot], &file_name[dot..]),
        None => (file_name, ""),
    };

    (1..)
        .map(|n| dir.join(format!("{} ({}){}", stem, n, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// One file to write: its suggested name and the payload
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub id: EntryId,
    pub file_name: String,
    pub data_url: DataUrl,
}

impl SaveRequest {
    /// None if the entry is gone or has not been compressed yet
    ///
    /// The name uses the currently selected format, not the one the entry
    /// was compressed with.
    pub fn for_entry(registry: &Registry, id: EntryId, format: OutputFormat) -> Option<Self> {
        let entry = registry.get(id)?;
        let compressed = entry.compressed.as_ref()?;

        Some(Self {
            id,
            file_name: output_file_name(&entry.file.name, format),
            data_url: compressed.data_url.clone(),
        })
    }

    /// Requests for every entry that has output; the rest are skipped
    pub fn collect_all(registry: &Registry, format: OutputFormat) -> Vec<Self> {
        registry
            .ids()
            .filter_map(|id| Self::for_entry(registry, id, format))
            .collect()
    }
}

/// Outcome of Download All
#[derive(Debug, Clone, Default)]
pub struct SaveSummary {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Decode a data URL and write its bytes to `path`
pub async fn save(path: PathBuf, data_url: DataUrl) -> Result<PathBuf, DownloadError> {
    let bytes = data_url.decode()?;
    tokio::fs::write(&path, bytes).await?;
    info!("💾 Saved {}", path.display());
    Ok(path)
}

/// Write every request into `dir`, never overwriting existing files
pub async fn save_all(dir: PathBuf, requests: Vec<SaveRequest>) -> SaveSummary {
    let mut summary = SaveSummary::default();

    for request in requests {
        let path = unique_path(&dir, &request.file_name);
        match save(path, request.data_url).await {
            Ok(path) => summary.saved.push(path),
            Err(e) => {
                warn!("⚠️  Failed to save {}: {}", request.file_name, e);
                summary.failed.push(format!("{}: {}", request.file_name, e));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::entry::fixtures::{compressed, entry};
    use iced::widget::image::Handle;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("photo.png", OutputFormat::Jpeg), "photo-compressed.jpeg");
        assert_eq!(output_file_name("noext", OutputFormat::Webp), "noext-compressed.webp");
    }

    #[test]
    fn test_output_file_name_uses_last_dot() {
        assert_eq!(
            output_file_name("archive.tar.png", OutputFormat::Png),
            "archive.tar-compressed.png"
        );
        assert_eq!(output_file_name(".hidden", OutputFormat::Jpeg), "-compressed.jpeg");
    }

    #[test]
    fn test_unique_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(unique_path(dir.path(), "a.jpeg"), dir.path().join("a.jpeg"));

        std::fs::write(dir.path().join("a.jpeg"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "a.jpeg"), dir.path().join("a (1).jpeg"));

        std::fs::write(dir.path().join("a (1).jpeg"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "a.jpeg"), dir.path().join("a (2).jpeg"));

        std::fs::write(dir.path().join("plain"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "plain"), dir.path().join("plain (1)"));
    }

    #[test]
    fn test_request_requires_compressed_output() {
        let mut registry = Registry::new();
        let a = registry.insert(entry("a.png", 100));
        let b = registry.insert(entry("b", 100));

        assert!(SaveRequest::for_entry(&registry, a, OutputFormat::Jpeg).is_none());

        registry.begin_compression(b);
        registry.apply_compression(b, compressed(40), Handle::from_bytes(Vec::new()));

        let request = SaveRequest::for_entry(&registry, b, OutputFormat::Webp).unwrap();
        assert_eq!(request.file_name, "b-compressed.webp");

        registry.remove(b);
        assert!(SaveRequest::for_entry(&registry, b, OutputFormat::Webp).is_none());
    }

    #[test]
    fn test_collect_all_skips_uncompressed() {
        let mut registry = Registry::new();
        let a = registry.insert(entry("a.png", 100));
        registry.insert(entry("b.png", 100));
        let c = registry.insert(entry("c.png", 100));

        for id in [a, c] {
            registry.begin_compression(id);
            registry.apply_compression(id, compressed(40), Handle::from_bytes(Vec::new()));
        }

        let names: Vec<String> = SaveRequest::collect_all(&registry, OutputFormat::Png)
            .into_iter()
            .map(|r| r.file_name)
            .collect();
        assert_eq!(names, ["a-compressed.png", "c-compressed.png"]);
    }

    #[tokio::test]
    async fn test_save_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpeg");

        let saved = save(path.clone(), DataUrl::encode("image/jpeg", b"jpeg bytes"))
            .await
            .unwrap();
        assert_eq!(saved, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_save_all_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = Registry::new();
        let a = registry.insert(entry("same.png", 100));
        let b = registry.insert(entry("same.jpg", 100));
        for id in [a, b] {
            registry.begin_compression(id);
            registry.apply_compression(id, compressed(40), Handle::from_bytes(Vec::new()));
        }

        let requests = SaveRequest::collect_all(&registry, OutputFormat::Jpeg);
        let summary = save_all(dir.path().to_path_buf(), requests).await;

        assert!(summary.failed.is_empty());
        assert_eq!(
            summary.saved,
            vec![
                dir.path().join("same-compressed.jpeg"),
                dir.path().join("same-compressed (1).jpeg"),
            ]
        );
    }

    #[tokio::test]
    async fn test_save_all_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut registry = Registry::new();
        let a = registry.insert(entry("x.png", 100));
        registry.begin_compression(a);
        registry.apply_compression(a, compressed(40), Handle::from_bytes(Vec::new()));

        let requests = SaveRequest::collect_all(&registry, OutputFormat::Png);
        let summary = save_all(missing, requests).await;
        assert!(summary.saved.is_empty());
        assert_eq!(summary.failed.len(), 1);
    }
}
