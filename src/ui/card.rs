/// One card in the image grid: preview, sizes, and per-image actions
use iced::widget::{button, column, container, image, row, text};
use iced::{Element, Length};

use crate::state::entry::{EntryStatus, ImageEntry};
use crate::state::registry::EntryId;
use crate::units::format_size;
use crate::Message;

/// Fixed card width so the grid wraps evenly
pub const CARD_WIDTH: f32 = 240.0;
const PREVIEW_HEIGHT: f32 = 160.0;

pub fn original_label(entry: &ImageEntry) -> String {
    format!("Original: {}", format_size(entry.file.size))
}

pub fn compressed_label(entry: &ImageEntry) -> String {
    match &entry.compressed {
        Some(compressed) => format!("Compressed: {}", format_size(compressed.byte_size)),
        None => "Compressed: -".to_string(),
    }
}

/// Savings percentage, rendered as-is even when negative
pub fn savings_label(entry: &ImageEntry) -> String {
    match entry.savings_percent() {
        Some(percent) => format!("Saved: {}%", percent),
        None => "Saved: -".to_string(),
    }
}

/// Output dimensions and format of the last compression
pub fn output_label(entry: &ImageEntry) -> Option<String> {
    entry
        .compressed
        .as_ref()
        .map(|c| format!("{}×{} {}", c.width, c.height, c.format))
}

pub fn status_label(entry: &ImageEntry) -> Option<String> {
    match entry.status() {
        EntryStatus::Idle => None,
        EntryStatus::Compressing => Some("Compressing…".to_string()),
        EntryStatus::Failed(message) => Some(format!("⚠ {}", message)),
    }
}

/// Build the card for a single entry
pub fn view(id: EntryId, entry: &ImageEntry) -> Element<'_, Message> {
    let preview = image(entry.preview.clone())
        .width(Length::Fill)
        .height(Length::Fixed(PREVIEW_HEIGHT));

    let mut details = column![
        text(&entry.file.name).size(14),
        text(original_label(entry)).size(12),
        text(compressed_label(entry)).size(12),
        text(savings_label(entry)).size(12),
    ]
    .spacing(4);

    if let Some(output) = output_label(entry) {
        details = details.push(text(output).size(12));
    }
    if let Some(status) = status_label(entry) {
        details = details.push(text(status).size(12));
    }

    let actions = row![
        button(text("Compress").size(12)).on_press(Message::Compress(id)),
        button(text("Download").size(12))
            .on_press_maybe(entry.is_compressed().then_some(Message::Download(id))),
        button(text("Remove").size(12))
            .on_press(Message::Remove(id))
            .style(button::danger),
    ]
    .spacing(6);

    container(column![preview, details, actions].spacing(8))
        .padding(10)
        .width(Length::Fixed(CARD_WIDTH))
        .style(container::rounded_box)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::entry::fixtures::{compressed, entry};
    use crate::state::registry::Registry;
    use iced::widget::image::Handle;

    #[test]
    fn test_labels_before_compression() {
        let entry = entry("a.png", 2048);
        assert_eq!(original_label(&entry), "Original: 2 KB");
        assert_eq!(compressed_label(&entry), "Compressed: -");
        assert_eq!(savings_label(&entry), "Saved: -");
        assert_eq!(output_label(&entry), None);
        assert_eq!(status_label(&entry), None);
    }

    #[test]
    fn test_labels_after_compression() {
        let mut registry = Registry::new();
        let id = registry.insert(entry("a.png", 1000));
        registry.begin_compression(id);
        assert_eq!(status_label(registry.get(id).unwrap()).as_deref(), Some("Compressing…"));

        registry.apply_compression(id, compressed(400), Handle::from_bytes(Vec::new()));
        let entry = registry.get(id).unwrap();

        assert_eq!(compressed_label(entry), "Compressed: 400 Bytes");
        assert_eq!(savings_label(entry), "Saved: 60%");
        assert_eq!(output_label(entry).as_deref(), Some("10×10 jpeg"));
        assert_eq!(status_label(entry), None);
    }

    #[test]
    fn test_negative_savings_rendered_unmodified() {
        let mut registry = Registry::new();
        let id = registry.insert(entry("a.png", 500));
        registry.begin_compression(id);
        registry.apply_compression(id, compressed(600), Handle::from_bytes(Vec::new()));

        assert_eq!(savings_label(registry.get(id).unwrap()), "Saved: -20%");
    }

    #[test]
    fn test_failure_label() {
        let mut registry = Registry::new();
        let id = registry.insert(entry("a.png", 500));
        registry.begin_compression(id);
        registry.fail_compression(id, "Decode failed: eof");

        assert_eq!(
            status_label(registry.get(id).unwrap()).as_deref(),
            Some("⚠ Decode failed: eof")
        );
    }
}
