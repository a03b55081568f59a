use iced::widget::image::Handle;
use iced::widget::{column, container, scrollable, text};
use iced::{event, window, Element, Event, Length, Subscription, Task, Theme};
use iced_aw::Wrap;
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod codec;
mod download;
mod error;
mod intake;
mod state;
mod ui;
mod units;

use codec::{Compression, DataUrl};
use download::{SaveRequest, SaveSummary};
use error::{CompressError, DownloadError, IntakeError};
use intake::LoadedImage;
use state::registry::{EntryId, Registry};
use state::settings::{CompressionSettings, OutputFormat};

/// Extensions offered by the picker's "Images" filter
const IMAGE_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff", "ico",
];

/// Main application state
struct ImageCompressor {
    /// Every image added this session, tombstones included
    registry: Registry,
    /// Parsed settings, copied into each compression when it starts
    settings: CompressionSettings,
    /// Raw text of the max-width input
    max_width_input: String,
    /// Raw text of the max-height input
    max_height_input: String,
    /// Files are being dragged over the window
    drop_hovered: bool,
    /// Status message to display to the user
    status: String,
}

/// One dispatched compression; later settings edits do not reach it
#[derive(Debug, Clone)]
struct CompressJob {
    id: EntryId,
    original: DataUrl,
    settings: CompressionSettings,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Browse…"
    PickFiles,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// Files started or stopped hovering over the window
    DropHover(bool),
    /// Background read of one file finished
    Loaded(Result<LoadedImage, IntakeError>),
    QualityChanged(u8),
    MaxWidthChanged(String),
    MaxHeightChanged(String),
    FormatSelected(OutputFormat),
    /// Compress one image with the current settings
    Compress(EntryId),
    /// Compress every image with the current settings
    CompressAll,
    /// Background compression finished
    Compressed(EntryId, Result<Compression, CompressError>),
    /// Save one compressed image
    Download(EntryId),
    /// Save every compressed image into one folder
    DownloadAll,
    /// Single save finished
    Saved(Result<PathBuf, DownloadError>),
    /// Batch save finished
    SavedAll(SaveSummary),
    /// Drop an image from the grid
    Remove(EntryId),
}

impl ImageCompressor {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = CompressionSettings::load();
        info!(
            "🎨 Image Compressor initialized (quality {}%, format {})",
            settings.quality, settings.format
        );

        (Self::with_settings(settings), Task::none())
    }

    fn with_settings(settings: CompressionSettings) -> Self {
        let dimension_text = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();

        ImageCompressor {
            registry: Registry::new(),
            settings,
            max_width_input: dimension_text(settings.max_width),
            max_height_input: dimension_text(settings.max_height),
            drop_hovered: false,
            status: "Ready. Drop some images to get started.".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFiles => {
                // Show the native file picker dialog
                let files = FileDialog::new()
                    .set_title("Select Images")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .add_filter("All files", &["*"])
                    .pick_files();

                match files {
                    Some(paths) => self.intake(paths),
                    None => Task::none(),
                }
            }
            Message::FileDropped(path) => {
                self.drop_hovered = false;
                self.intake(vec![path])
            }
            Message::DropHover(hovered) => {
                self.drop_hovered = hovered;
                Task::none()
            }
            Message::Loaded(Ok(loaded)) => {
                let name = loaded.file.name.clone();
                let id = self.registry.insert(loaded.into_entry());
                info!("📥 Added {} as {}", name, id);
                self.status = format!("Added {}.", name);
                Task::none()
            }
            Message::Loaded(Err(e)) => {
                warn!("⚠️  {}", e);
                self.status = e.to_string();
                Task::none()
            }
            Message::QualityChanged(quality) => {
                self.settings.quality = quality;
                Task::none()
            }
            Message::MaxWidthChanged(input) => {
                self.settings.max_width = CompressionSettings::parse_dimension(&input);
                self.max_width_input = input;
                Task::none()
            }
            Message::MaxHeightChanged(input) => {
                self.settings.max_height = CompressionSettings::parse_dimension(&input);
                self.max_height_input = input;
                Task::none()
            }
            Message::FormatSelected(format) => {
                self.settings.format = format;
                Task::none()
            }
            Message::Compress(id) => self.compress(id),
            Message::CompressAll => {
                let ids: Vec<EntryId> = self.registry.ids().collect();
                let task = Task::batch(ids.into_iter().map(|id| self.compress(id)));

                self.status = format!("Compressing {} images...", self.registry.present_count());
                task
            }
            Message::Compressed(id, Ok(compression)) => {
                let Compression { image, bytes } = compression;
                let byte_size = image.byte_size;

                if self.registry.apply_compression(id, image, Handle::from_bytes(bytes)) {
                    if let Some(entry) = self.registry.get(id) {
                        info!(
                            "✅ Compressed {}: {} -> {}",
                            entry.file.name,
                            units::format_size(entry.file.size),
                            units::format_size(byte_size)
                        );
                        self.status = format!("Compressed {}.", entry.file.name);
                    }
                }
                Task::none()
            }
            Message::Compressed(id, Err(e)) => {
                if self.registry.fail_compression(id, e.to_string()) {
                    warn!("⚠️  Compression of {} failed: {}", id, e);
                }
                Task::none()
            }
            Message::Download(id) => self.download(id),
            Message::DownloadAll => self.download_all(),
            Message::Saved(Ok(path)) => {
                self.status = format!("Saved {}.", path.display());
                Task::none()
            }
            Message::Saved(Err(e)) => {
                warn!("⚠️  Save failed: {}", e);
                self.status = format!("Save failed: {}", e);
                Task::none()
            }
            Message::SavedAll(summary) => {
                info!(
                    "📊 Download all: {} saved, {} failed",
                    summary.saved.len(),
                    summary.failed.len()
                );
                self.status = if summary.failed.is_empty() {
                    format!("Saved {} images.", summary.saved.len())
                } else {
                    format!(
                        "Saved {} images, {} failed ({}).",
                        summary.saved.len(),
                        summary.failed.len(),
                        summary.failed.join("; ")
                    )
                };
                Task::none()
            }
            Message::Remove(id) => {
                if let Some(entry) = self.registry.remove(id) {
                    info!("🗑️  Removed {} ({})", entry.file.name, id);
                    self.status = format!("Removed {}.", entry.file.name);
                }
                Task::none()
            }
        }
    }

    /// Start reading every image among `paths`; other files are ignored
    fn intake(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        let accepted = intake::accept(paths);
        if accepted.is_empty() {
            return Task::none();
        }

        self.status = format!("Loading {} file(s)...", accepted.len());
        Task::batch(
            accepted
                .into_iter()
                .map(|(path, mime)| Task::perform(intake::load(path, mime), Message::Loaded)),
        )
    }

    /// Mark an entry as compressing and capture what its task will use
    fn begin_compress(&mut self, id: EntryId) -> Option<CompressJob> {
        let original = self.registry.begin_compression(id)?;
        Some(CompressJob {
            id,
            original,
            settings: self.settings,
        })
    }

    /// Launch a compression of one entry with a snapshot of the settings
    fn compress(&mut self, id: EntryId) -> Task<Message> {
        let Some(CompressJob { id, original, settings }) = self.begin_compress(id) else {
            return Task::none();
        };

        debug!("Compressing {} with {:?}", id, settings);

        Task::perform(codec::compress(original, settings), move |result| {
            Message::Compressed(id, result)
        })
    }

    fn download(&mut self, id: EntryId) -> Task<Message> {
        let Some(request) = SaveRequest::for_entry(&self.registry, id, self.settings.format) else {
            return Task::none();
        };

        let mut dialog = FileDialog::new()
            .set_title("Save Compressed Image")
            .set_file_name(&request.file_name);
        if let Some(dir) = download::default_directory() {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            return Task::none();
        };

        debug!("Saving {} to {}", request.id, path.display());
        Task::perform(download::save(path, request.data_url), Message::Saved)
    }

    fn download_all(&mut self) -> Task<Message> {
        let requests = SaveRequest::collect_all(&self.registry, self.settings.format);
        if requests.is_empty() {
            return Task::none();
        }

        let mut dialog = FileDialog::new().set_title("Choose a Folder for Compressed Images");
        if let Some(dir) = download::default_directory() {
            dialog = dialog.set_directory(dir);
        }

        let Some(folder) = dialog.pick_folder() else {
            return Task::none();
        };

        self.status = format!("Saving {} images to {}...", requests.len(), folder.display());
        Task::perform(download::save_all(folder, requests), Message::SavedAll)
    }

    /// Window file drag-and-drop events
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            Event::Window(window::Event::FileHovered(_)) => Some(Message::DropHover(true)),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::DropHover(false)),
            _ => None,
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let cards: Vec<Element<Message>> = self
            .registry
            .iter()
            .map(|(id, entry)| ui::card::view(id, entry))
            .collect();

        let gallery: Element<Message> = if self.registry.is_empty() {
            container(text("No images yet.").size(16))
                .padding(40)
                .center_x(Length::Fill)
                .into()
        } else {
            scrollable(Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0))
                .height(Length::Fill)
                .into()
        };

        let content = column![
            text("Image Compressor").size(32),
            ui::controls::settings_panel(
                &self.settings,
                &self.max_width_input,
                &self.max_height_input
            ),
            ui::controls::drop_zone(self.drop_hovered),
            ui::controls::batch_actions(&self.registry),
            text(&self.status).size(14),
            gallery,
        ]
        .spacing(20)
        .padding(30);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("=== Image Compressor starting ===");

    iced::application(
        "Image Compressor",
        ImageCompressor::update,
        ImageCompressor::view,
    )
    .subscription(ImageCompressor::subscription)
    .theme(ImageCompressor::theme)
    .window_size((1100.0, 820.0))
    .centered()
    .run_with(ImageCompressor::new)
}
