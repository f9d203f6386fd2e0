/// Menu row, preferences and about panes
use iced::widget::{button, column, container, horizontal_space, pick_list, row, text};
use iced::{Alignment, Element, Length};
use std::fmt;
use std::path::PathBuf;

use image_viewer::state::settings::ThemeChoice;
use crate::Message;

/// A recent-files entry, shown by file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFile(pub PathBuf);

impl fmt::Display for RecentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.file_name() {
            Some(name) => write!(f, "{}", name.to_string_lossy()),
            None => write!(f, "{}", self.0.display()),
        }
    }
}

/// State the menu row needs from the application
pub struct MenuState<'a> {
    pub recent: &'a [PathBuf],
    pub has_image: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

pub fn view<'a>(state: MenuState<'a>) -> Element<'a, Message> {
    let recent: Vec<RecentFile> = state.recent.iter().cloned().map(RecentFile).collect();

    let file = row![
        button("Open").on_press(Message::OpenDialog),
        button("Save As").on_press_maybe(state.has_image.then_some(Message::SaveDialog)),
        pick_list(recent, None::<RecentFile>, |r: RecentFile| Message::OpenRecent(r.0))
            .placeholder("Open recent"),
    ]
    .spacing(6);

    let edit = row![
        button("Undo").on_press_maybe(state.can_undo.then_some(Message::Undo)),
        button("Redo").on_press_maybe(state.can_redo.then_some(Message::Redo)),
        button("Preferences").on_press(Message::ShowPane(Pane::Preferences)),
    ]
    .spacing(6);

    let view = row![
        button("Focus Mode (Ctrl+F)").on_press(Message::ToggleFocus),
        button("About").on_press(Message::ShowPane(Pane::About)),
    ]
    .spacing(6);

    row![file, edit, horizontal_space(), view]
        .spacing(20)
        .padding(8)
        .align_y(Alignment::Center)
        .into()
}

/// Which pane fills the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Viewer,
    Preferences,
    About,
}

pub fn preferences<'a>(theme: ThemeChoice) -> Element<'a, Message> {
    let content = column![
        text("Settings").size(24),
        row![
            text("Theme"),
            pick_list(ThemeChoice::ALL.to_vec(), Some(theme), Message::ThemeSelected),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text(format!("v{} | License: MIT", env!("CARGO_PKG_VERSION"))).size(14),
        button("Back").on_press(Message::ShowPane(Pane::Viewer)),
    ]
    .spacing(16);

    container(content)
        .padding(40)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn about<'a>() -> Element<'a, Message> {
    let content = column![
        text("About").size(24),
        text("A simple image viewer with some editing functionality."),
        text("Shortcuts: Ctrl+O open, Ctrl+S save, Ctrl+Z undo, Ctrl+Y redo, Ctrl+F focus mode, Ctrl+Left/Right previous/next image, Ctrl+Q quit").size(14),
        button("Ok").on_press(Message::ShowPane(Pane::Viewer)),
    ]
    .spacing(16);

    container(content)
        .padding(40)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .into()
}
