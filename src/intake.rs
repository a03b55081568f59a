/// File intake: dropped or picked paths become registry entries
///
/// Both the window drop event and the file picker funnel through
/// `accept`, which silently skips anything that is not declared as an
/// image. Each accepted file is read on its own task.

use iced::widget::image::Handle;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::codec::DataUrl;
use crate::error::IntakeError;
use crate::state::entry::{ImageEntry, SourceFile};

/// MIME type used when the extension is not a known image format
const UNKNOWN_MIME: &str = "application/octet-stream";

/// A file that has been read and is ready to register
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub file: SourceFile,
    pub original: DataUrl,
    pub preview: Handle,
}

impl LoadedImage {
    pub fn into_entry(self) -> ImageEntry {
        ImageEntry::new(self.file, self.original, self.preview)
    }
}

/// MIME type declared by the file's extension
pub fn declared_mime(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MIME.to_string())
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Keep only image paths, paired with their declared MIME type
pub fn accept(paths: Vec<PathBuf>) -> Vec<(PathBuf, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let mime = declared_mime(&path);
            if is_image_mime(&mime) {
                Some((path, mime))
            } else {
                trace!("Skipping non-image file {} ({})", path.display(), mime);
                None
            }
        })
        .collect()
}

/// Read a file into a data URL and a preview handle
pub async fn load(path: PathBuf, mime: String) -> Result<LoadedImage, IntakeError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| IntakeError::read(&path, e))?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let original = DataUrl::encode(mime.as_str(), &bytes);
    let file = SourceFile {
        name,
        size: bytes.len() as u64,
        mime,
        path,
    };

    Ok(LoadedImage {
        file,
        original,
        preview: Handle::from_bytes(bytes),
    })
}
