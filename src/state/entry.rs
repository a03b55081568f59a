/// Per-image records held by the registry

use iced::widget::image::Handle;
use std::path::PathBuf;

use crate::codec::DataUrl;
use crate::state::settings::OutputFormat;
use crate::units;

/// The file as it was handed to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Filename only (e.g., "holiday.png")
    pub name: String,
    /// Full path the file was read from
    pub path: PathBuf,
    /// Size on disk in bytes
    pub size: u64,
    /// MIME type derived from the extension
    pub mime: String,
}

/// Result of the most recent completed compression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub data_url: DataUrl,
    /// Estimated from the data URL payload length
    pub byte_size: u64,
    pub width: u32,
    pub height: u32,
    /// Format the bytes were actually encoded in
    pub format: OutputFormat,
}

/// What the card shows next to the sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Idle,
    Compressing,
    Failed(String),
}

/// One tracked image and its original/compressed state
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub file: SourceFile,
    /// Original bytes, fixed at intake
    pub original: DataUrl,
    /// None until a compression completes; overwritten by later ones
    pub compressed: Option<CompressedImage>,
    /// On-screen preview: the original until compressed, then the output
    pub preview: Handle,
    /// Compressions dispatched but not yet completed
    in_flight: u32,
    /// Message from the last failed compression, cleared on success
    last_error: Option<String>,
}

impl ImageEntry {
    pub fn new(file: SourceFile, original: DataUrl, preview: Handle) -> Self {
        Self {
            file,
            original,
            compressed: None,
            preview,
            in_flight: 0,
            last_error: None,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed.is_some()
    }

    pub fn status(&self) -> EntryStatus {
        if self.in_flight > 0 {
            EntryStatus::Compressing
        } else if let Some(message) = &self.last_error {
            EntryStatus::Failed(message.clone())
        } else {
            EntryStatus::Idle
        }
    }

    /// Savings against the original file size, if compressed
    pub fn savings_percent(&self) -> Option<i64> {
        let compressed = self.compressed.as_ref()?;
        units::savings_percent(self.file.size, compressed.byte_size)
    }

    pub(crate) fn start_compression(&mut self) {
        self.in_flight += 1;
    }

    /// Overlapping compressions: the last one to finish wins
    pub(crate) fn finish_compression(&mut self, image: CompressedImage, preview: Handle) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_error = None;
        self.compressed = Some(image);
        self.preview = preview;
    }

    /// Keeps any earlier compressed output
    pub(crate) fn fail_compression(&mut self, message: String) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_error = Some(message);
    }
}
