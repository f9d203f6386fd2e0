/// State management module
///
/// This module handles all application state, including:
/// - Edit parameters and non-destructive editing (edit.rs)
/// - Edit history and undo/redo (history.rs)
/// - The open image and its replay logic (session.rs)
/// - Folder navigation (folder.rs)
/// - Persisted preferences and recent files (settings.rs)

pub mod edit;
pub mod folder;
pub mod history;
pub mod session;
pub mod settings;
