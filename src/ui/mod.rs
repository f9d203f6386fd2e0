/// User interface module
///
/// The views are thin: they read the session and emit `Message`s,
/// all state changes happen in `ImageViewer::update`.
///
/// - Editor tab with sliders and transform buttons (editor.rs)
/// - Information tab with file details and history (info.rs)
/// - Menu row, preferences and about panes (menu.rs)

pub mod editor;
pub mod info;
pub mod menu;

use iced::widget::{button, column, container, horizontal_rule, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Length};

use image_viewer::state::session::Session;
use crate::Message;
use editor::Sliders;

/// Sidebar tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    Information,
    #[default]
    Editor,
}

/// Tab buttons plus the selected tab's content
pub fn sidebar<'a>(tab: Tab, session: Option<&'a Session>, sliders: &Sliders) -> Element<'a, Message> {
    let tab_button = |label: &'a str, target: Tab| {
        button(text(label))
            .on_press_maybe((tab != target).then_some(Message::SelectTab(target)))
            .width(Length::Fill)
    };

    let content = match tab {
        Tab::Information => info::view(session),
        Tab::Editor => editor::view(session, sliders),
    };

    column![
        row![
            tab_button("Information", Tab::Information),
            tab_button("Editor", Tab::Editor),
        ]
        .spacing(4),
        scrollable(container(content).padding([0, 12])).height(Length::Fill),
    ]
    .spacing(12)
    .width(Length::Fixed(280.0))
    .into()
}

/// Path label with previous/next arrows
pub fn status_bar<'a>(session: Option<&'a Session>) -> Element<'a, Message> {
    let path = session
        .map(|s| s.path().display().to_string())
        .unwrap_or_default();
    let back = session.and_then(|s| s.neighbor(false)).map(|_| Message::Navigate(false));
    let next = session.and_then(|s| s.neighbor(true)).map(|_| Message::Navigate(true));

    column![
        horizontal_rule(1),
        row![
            text(format!("Path: {}", path)).size(14),
            horizontal_space(),
            button("◀").on_press_maybe(back),
            button("▶").on_press_maybe(next),
        ]
        .spacing(6)
        .padding(6)
        .align_y(Alignment::Center),
    ]
    .into()
}
