/// Information tab: file details and the edit history
use iced::widget::{column, text, Column};
use iced::Element;

use image_viewer::state::session::Session;
use crate::Message;

/// Human-readable file size
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

pub fn view(session: Option<&Session>) -> Element<'_, Message> {
    let Some(session) = session else {
        return column![
            text("Width: "),
            text("Height: "),
            text("Size: "),
            text("Last modified: "),
        ]
        .spacing(8)
        .into();
    };

    let info = session.info();
    let modified = info
        .modified
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let history = session.history();
    let mut entries = Column::new().spacing(4).push(text("History").size(18));
    if history.is_empty() {
        entries = entries.push(text("No edits").size(14));
    }
    for (i, entry) in history.entries().iter().enumerate() {
        // Entries right of the cursor can still be redone
        let marker = if i < history.cursor() { "•" } else { "○" };
        entries = entries.push(text(format!("{} {}", marker, entry.label())).size(14));
    }

    column![
        text(format!("Width: {}px", info.width)),
        text(format!("Height: {}px", info.height)),
        text(format!("Size: {}", format_size(info.file_size))),
        text(format!("Last modified: {}", modified)),
        entries,
    ]
    .spacing(8)
    .into()
}
