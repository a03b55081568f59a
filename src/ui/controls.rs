/// Global controls: settings panel, drop zone, and batch actions
use iced::widget::{button, column, container, pick_list, row, slider, text, text_input};
use iced::{Alignment, Element, Length};

use crate::state::registry::Registry;
use crate::state::settings::{CompressionSettings, OutputFormat};
use crate::units::format_size;
use crate::Message;

/// Quality slider, max dimension inputs, and output format picker
///
/// The max-dimension inputs are shown verbatim so a half-typed value is not
/// rewritten under the cursor; `settings` holds the parsed result.
pub fn settings_panel<'a>(
    settings: &CompressionSettings,
    max_width: &'a str,
    max_height: &'a str,
) -> Element<'a, Message> {
    let quality_label = if settings.format.is_lossy() {
        format!("Quality: {}%", settings.quality)
    } else {
        format!("Quality: {}% (ignored for {})", settings.quality, settings.format)
    };

    let quality = column![
        text(quality_label).size(14),
        slider(0..=100, settings.quality, Message::QualityChanged).width(Length::Fixed(220.0)),
    ]
    .spacing(6);

    let width = column![
        text("Max width").size(14),
        text_input("unbounded", max_width)
            .on_input(Message::MaxWidthChanged)
            .width(Length::Fixed(120.0)),
    ]
    .spacing(6);

    let height = column![
        text("Max height").size(14),
        text_input("unbounded", max_height)
            .on_input(Message::MaxHeightChanged)
            .width(Length::Fixed(120.0)),
    ]
    .spacing(6);

    let format = column![
        text("Format").size(14),
        pick_list(OutputFormat::ALL, Some(settings.format), Message::FormatSelected)
            .width(Length::Fixed(120.0)),
    ]
    .spacing(6);

    row![quality, width, height, format]
        .spacing(24)
        .align_y(Alignment::End)
        .into()
}

/// Drop target with a Browse button; highlighted while files hover
pub fn drop_zone<'a>(hovered: bool) -> Element<'a, Message> {
    let prompt = if hovered {
        "Release to add images"
    } else {
        "Drag & drop images anywhere in this window"
    };

    let content = column![
        text(prompt).size(18),
        button("Browse…").on_press(Message::PickFiles).padding(10),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .padding(30)
        .center_x(Length::Fill)
        .style(if hovered {
            container::rounded_box
        } else {
            container::bordered_box
        })
        .into()
}

/// Compress All / Download All, enabled from registry state
pub fn batch_actions<'a>(registry: &Registry) -> Element<'a, Message> {
    row![
        button("Compress All")
            .on_press_maybe(registry.can_compress_all().then_some(Message::CompressAll))
            .padding(10),
        button("Download All")
            .on_press_maybe(registry.can_download_all().then_some(Message::DownloadAll))
            .style(button::success)
            .padding(10),
        text(summary_label(registry)).size(14),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

/// "3 images, 2 compressed (1.2 MB → 340 KB)"
pub fn summary_label(registry: &Registry) -> String {
    let count = registry.present_count();
    if count == 0 {
        return String::new();
    }

    let compressed: Vec<_> = registry
        .iter()
        .filter_map(|(_, entry)| entry.compressed.as_ref().map(|c| (entry.file.size, c.byte_size)))
        .collect();

    let noun = if count == 1 { "image" } else { "images" };
    if compressed.is_empty() {
        return format!("{} {}", count, noun);
    }

    let before: u64 = compressed.iter().map(|(original, _)| original).sum();
    let after: u64 = compressed.iter().map(|(_, output)| output).sum();
    format!(
        "{} {}, {} compressed ({} → {})",
        count,
        noun,
        compressed.len(),
        format_size(before),
        format_size(after)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::entry::fixtures::{compressed, entry};
    use iced::widget::image::Handle;

    #[test]
    fn test_summary_label() {
        let mut registry = Registry::new();
        assert_eq!(summary_label(&registry), "");

        let a = registry.insert(entry("a.png", 2048));
        assert_eq!(summary_label(&registry), "1 image");

        let b = registry.insert(entry("b.png", 2048));
        registry.begin_compression(a);
        registry.apply_compression(a, compressed(1024), Handle::from_bytes(Vec::new()));
        assert_eq!(summary_label(&registry), "2 images, 1 compressed (2 KB → 1 KB)");

        registry.remove(b);
        registry.remove(a);
        assert_eq!(summary_label(&registry), "");
    }
}
