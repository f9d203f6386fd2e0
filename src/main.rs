use iced::keyboard::{self, key::Named, Key};
use iced::widget::image::Handle;
use iced::widget::{column, container, row, text, Image};
use iced::{ContentFit, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;

use image_viewer::error::ViewerError;
use image_viewer::imaging::codec::{self, LoadedImage};
use image_viewer::imaging::filters::{FilterEngine, ImageOps};
use image_viewer::imaging::render::RenderOutput;
use image_viewer::state::edit::{Adjustment, Edit, TransformOp};
use image_viewer::state::session::{Action, Session};
use image_viewer::state::settings::{Settings, ThemeChoice};

mod ui;

use ui::editor::{Slider, Sliders};
use ui::menu::{MenuState, Pane};
use ui::Tab;

/// Main application state
struct ImageViewer {
    /// The open image, if any
    session: Option<Session>,
    /// Bumped whenever `session` gets a different image, so renders
    /// started for the previous one are dropped
    epoch: u64,
    /// Displayed copy of the rendered image
    preview: Option<Handle>,
    engine: Arc<dyn FilterEngine>,
    settings: Option<Settings>,
    recent: Vec<PathBuf>,
    theme: ThemeChoice,
    sliders: Sliders,
    tab: Tab,
    pane: Pane,
    focus: bool,
    /// Last error or confirmation shown above the status bar
    notice: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    OpenDialog,
    OpenRecent(PathBuf),
    /// Decoding finished; `bool` = record in recent files
    Opened(Result<LoadedImage, ViewerError>, bool),
    SaveDialog,
    Saved(Result<PathBuf, ViewerError>),
    Navigate(bool),
    /// Folder load finished; tagged with the epoch and folder index it was
    /// started for
    Navigated(u64, usize, Result<LoadedImage, ViewerError>),
    SliderMoved(Slider, f32),
    SliderReleased(Slider),
    Transform(TransformOp),
    ToggleGrayscale,
    Undo,
    Redo,
    Reset,
    Rendered(u64, RenderOutput),
    SelectTab(Tab),
    ShowPane(Pane),
    ThemeSelected(ThemeChoice),
    ToggleFocus,
    Quit,
    Noop,
}

impl ImageViewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // A broken settings database only costs persistence
        let settings = Settings::new()
            .or_else(|e| {
                log::warn!("Using in-memory settings: {}", e);
                Settings::in_memory()
            })
            .map_err(|e| log::error!("Settings unavailable: {}", e))
            .ok();

        let theme = settings
            .as_ref()
            .and_then(|s| s.theme().ok())
            .unwrap_or_default();
        let recent = settings
            .as_ref()
            .and_then(|s| s.recent_files().ok())
            .unwrap_or_default();

        log::info!("Image viewer started ({} recent files)", recent.len());

        let viewer = ImageViewer {
            session: None,
            epoch: 0,
            preview: None,
            engine: Arc::new(ImageOps),
            settings,
            recent,
            theme,
            sliders: Sliders::default(),
            tab: Tab::default(),
            pane: Pane::default(),
            focus: false,
            notice: String::new(),
        };

        // Open a file passed on the command line
        let task = match std::env::args_os().nth(1) {
            Some(path) => viewer.open(PathBuf::from(path), true),
            None => Task::none(),
        };

        (viewer, task)
    }

    fn title(&self) -> String {
        match &self.session {
            Some(session) => match session.path().file_name() {
                Some(name) => format!("{} - Image Viewer", name.to_string_lossy()),
                None => "Image Viewer".to_string(),
            },
            None => "Image Viewer".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenDialog => {
                let file = FileDialog::new()
                    .set_title("Open image")
                    .add_filter("Images", &codec::SUPPORTED_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => self.open(path, true),
                    None => Task::none(),
                }
            }
            Message::OpenRecent(path) => self.open(path, true),
            Message::Opened(Ok(loaded), remember) => {
                let path = loaded.path.clone();
                let folder = Session::scan_folder(&path);
                self.session = Some(Session::new(loaded, folder, Arc::clone(&self.engine)));
                self.image_changed();

                if remember {
                    self.remember(path);
                }
                Task::none()
            }
            Message::Opened(Err(e), _) => {
                self.report(e);
                Task::none()
            }
            Message::SaveDialog => {
                let Some(session) = &self.session else {
                    return Task::none();
                };

                let default_name = session
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "image.png".to_string());
                let mut dialog = FileDialog::new()
                    .set_title("Save As")
                    .set_file_name(default_name)
                    .add_filter("Images", &codec::SUPPORTED_EXTENSIONS);
                if let Some(dir) = session.path().parent() {
                    dialog = dialog.set_directory(dir);
                }

                match dialog.save_file() {
                    Some(path) => Task::perform(
                        codec::save_async(path, session.rendered().clone()),
                        Message::Saved,
                    ),
                    None => Task::none(),
                }
            }
            Message::Saved(Ok(path)) => {
                self.notice = format!("Saved {}", path.display());
                Task::none()
            }
            Message::Saved(Err(e)) => {
                self.report(e);
                Task::none()
            }
            Message::Navigate(forward) => {
                let Some((index, path)) =
                    self.session.as_mut().and_then(|s| s.begin_navigation(forward))
                else {
                    return Task::none();
                };
                let epoch = self.epoch;
                Task::perform(codec::load_async(path), move |result| {
                    Message::Navigated(epoch, index, result)
                })
            }
            Message::Navigated(epoch, _, _) if epoch != self.epoch => {
                log::debug!("Dropping folder load for a previous image");
                Task::none()
            }
            Message::Navigated(_, index, Ok(loaded)) => {
                let Some(session) = self.session.as_mut() else {
                    return Task::none();
                };
                if session.replace_image(loaded, index) {
                    self.image_changed();
                }
                Task::none()
            }
            Message::Navigated(_, index, Err(e)) => {
                if let Some(session) = self.session.as_mut() {
                    session.cancel_navigation(index);
                }
                self.report(e);
                Task::none()
            }
            Message::SliderMoved(slider, value) => {
                self.sliders.set(slider, value);
                Task::none()
            }
            Message::SliderReleased(slider) => {
                let adjustment = self.sliders.adjustment(slider);
                self.dispatch(Action::Commit(Edit::Adjust(adjustment)))
            }
            Message::Transform(op) => self.dispatch(Action::Commit(Edit::Transform(op))),
            Message::ToggleGrayscale => {
                let Some(session) = &self.session else {
                    return Task::none();
                };
                let grayscale = !session.latest_params().grayscale;
                self.dispatch(Action::Commit(Edit::Adjust(Adjustment::Grayscale(grayscale))))
            }
            Message::Undo => self.dispatch(Action::Undo),
            Message::Redo => self.dispatch(Action::Redo),
            Message::Reset => self.dispatch(Action::Reset),
            Message::Rendered(epoch, output) => {
                if epoch != self.epoch {
                    log::debug!("Dropping render for a previous image");
                    return Task::none();
                }
                let Some(session) = self.session.as_mut() else {
                    return Task::none();
                };
                match session.complete(output) {
                    Ok(true) => self.refresh_preview(),
                    Ok(false) => {}
                    Err(e) => {
                        self.report(e);
                        // The session may have fallen back to an earlier change
                        self.refresh_preview();
                    }
                }
                self.sync_sliders();
                Task::none()
            }
            Message::SelectTab(tab) => {
                self.tab = tab;
                Task::none()
            }
            Message::ShowPane(pane) => {
                self.pane = pane;
                Task::none()
            }
            Message::ThemeSelected(theme) => {
                self.theme = theme;
                if let Some(settings) = &self.settings {
                    if let Err(e) = settings.set_theme(theme) {
                        log::warn!("Could not store theme: {}", e);
                    }
                }
                Task::none()
            }
            Message::ToggleFocus => {
                self.focus = !self.focus;
                Task::none()
            }
            Message::Quit => iced::exit(),
            Message::Noop => Task::none(),
        }
    }

    /// Start decoding a file
    fn open(&self, path: PathBuf, remember: bool) -> Task<Message> {
        log::info!("Opening {}", path.display());
        Task::perform(codec::load_async(path), move |result| {
            Message::Opened(result, remember)
        })
    }

    /// Run an action against the session, rendering off the UI thread
    fn dispatch(&mut self, action: Action) -> Task<Message> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };

        let task = match session.begin(action) {
            Ok(Some(job)) => {
                let epoch = self.epoch;
                Task::perform(job.run_async(), move |output| Message::Rendered(epoch, output))
            }
            Ok(None) => Task::none(),
            Err(e) => {
                self.report(e);
                Task::none()
            }
        };
        self.sync_sliders();
        task
    }

    /// A different image is now in the session
    fn image_changed(&mut self) {
        self.epoch += 1;
        self.notice.clear();
        self.refresh_preview();
        self.sync_sliders();
    }

    fn refresh_preview(&mut self) {
        self.preview = self.session.as_ref().map(|session| {
            let rendered = session.rendered();
            Handle::from_rgba(rendered.width(), rendered.height(), rendered.as_raw().clone())
        });
    }

    fn sync_sliders(&mut self) {
        if let Some(session) = &self.session {
            self.sliders = Sliders::from_params(session.latest_params());
        }
    }

    fn remember(&mut self, path: PathBuf) {
        let Some(settings) = self.settings.as_mut() else {
            return;
        };
        match settings.push_recent(&path).and_then(|()| settings.recent_files()) {
            Ok(recent) => self.recent = recent,
            Err(e) => log::warn!("Could not update recent files: {}", e),
        }
    }

    fn report(&mut self, error: ViewerError) {
        log::error!("{}", error);
        self.notice = error.to_string();
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let picture: Element<Message> = match &self.preview {
            Some(handle) => Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("Open an image (Ctrl+O)").size(20))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        if self.focus {
            return picture;
        }

        match self.pane {
            Pane::Preferences => return ui::menu::preferences(self.theme),
            Pane::About => return ui::menu::about(),
            Pane::Viewer => {}
        }

        let session = self.session.as_ref();
        let menu = ui::menu::view(MenuState {
            recent: &self.recent,
            has_image: session.is_some(),
            can_undo: session.map_or(false, Session::can_undo),
            can_redo: session.map_or(false, Session::can_redo),
        });

        let body = row![
            container(picture).width(Length::Fill).height(Length::Fill),
            ui::sidebar(self.tab, session, &self.sliders),
        ]
        .spacing(8)
        .height(Length::Fill);

        column![
            menu,
            body,
            text(&self.notice).size(14),
            ui::status_bar(session),
        ]
        .padding(4)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.theme {
            ThemeChoice::Light => Theme::Light,
            ThemeChoice::Dark => Theme::Dark,
        }
    }

    /// Keyboard shortcuts; Ctrl on Linux/Windows, Cmd on macOS
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, modifiers| {
            if !modifiers.command() {
                return None;
            }
            match key.as_ref() {
                Key::Character("o") => Some(Message::OpenDialog),
                Key::Character("s") => Some(Message::SaveDialog),
                Key::Character("z") => Some(Message::Undo),
                Key::Character("y") => Some(Message::Redo),
                Key::Character("f") => Some(Message::ToggleFocus),
                Key::Character("q") => Some(Message::Quit),
                Key::Named(Named::ArrowLeft) => Some(Message::Navigate(false)),
                Key::Named(Named::ArrowRight) => Some(Message::Navigate(true)),
                _ => None,
            }
        })
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(ImageViewer::title, ImageViewer::update, ImageViewer::view)
        .theme(ImageViewer::theme)
        .subscription(ImageViewer::subscription)
        .centered()
        .run_with(ImageViewer::new)
}
