use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

/// Number of entries kept in the "Open recent" menu
pub const MAX_RECENT_FILES: usize = 10;

const THEME_KEY: &str = "Theme";

/// Theme preference, stored as "Light" / "Dark"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeChoice {
    Light,
    #[default]
    Dark,
}

impl ThemeChoice {
    pub const ALL: [ThemeChoice; 2] = [ThemeChoice::Light, ThemeChoice::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeChoice::Light => "Light",
            ThemeChoice::Dark => "Dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.as_str() == value)
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings manages the small SQLite database holding user preferences:
/// the theme and the recently opened files.
pub struct Settings {
    conn: Connection,
    db_path: PathBuf,
}

impl Settings {
    /// Open the settings database in the user's data directory.
    ///
    /// - Linux: ~/.local/share/image-viewer/settings.db
    /// - macOS: ~/Library/Application Support/image-viewer/settings.db
    /// - Windows: %APPDATA%\image-viewer\settings.db
    pub fn new() -> Result<Self, SettingsError> {
        let db_path = Self::get_db_path()?;

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Self::open(&db_path)
    }

    /// Open (or create) a settings database at an explicit path
    pub fn open(db_path: &Path) -> Result<Self, SettingsError> {
        let conn = Connection::open(db_path)?;
        log::info!("Settings database at {}", db_path.display());

        let mut settings = Settings {
            conn,
            db_path: db_path.to_path_buf(),
        };
        settings.init_schema()?;
        Ok(settings)
    }

    /// Non-persistent settings, used when the data directory is unusable
    pub fn in_memory() -> Result<Self, SettingsError> {
        let mut settings = Settings {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        settings.init_schema()?;
        Ok(settings)
    }

    /// Get the path where the database should be stored
    fn get_db_path() -> Result<PathBuf, SettingsError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(SettingsError::NoDataDir)?;

        path.push("image-viewer");
        path.push("settings.db");
        Ok(path)
    }

    fn init_schema(&mut self) -> Result<(), SettingsError> {
        // Key/value preferences (theme)
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;

        // Recently opened files; higher id = more recent
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS recent_files (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                path        TEXT NOT NULL UNIQUE,
                opened_at   INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Stored theme, falling back to dark
    pub fn theme(&self) -> Result<ThemeChoice, SettingsError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [THEME_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(match value {
            Some(value) => ThemeChoice::parse(&value).unwrap_or_else(|| {
                log::warn!("Unknown theme {:?}, using default", value);
                ThemeChoice::default()
            }),
            None => ThemeChoice::default(),
        })
    }

    pub fn set_theme(&self, theme: ThemeChoice) -> Result<(), SettingsError> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [THEME_KEY, theme.as_str()],
        )?;
        Ok(())
    }

    /// Recently opened files, most recent first
    pub fn recent_files(&self) -> Result<Vec<PathBuf>, SettingsError> {
        let mut stmt = self
            .conn
            .prepare("SELECT path FROM recent_files ORDER BY id DESC LIMIT ?1")?;

        let paths = stmt
            .query_map([MAX_RECENT_FILES], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(paths.into_iter().map(PathBuf::from).collect())
    }

    /// Move `path` to the front of the recent list, dropping the oldest
    /// entries beyond `MAX_RECENT_FILES`
    pub fn push_recent(&mut self, path: &Path) -> Result<(), SettingsError> {
        let path = path.to_string_lossy().to_string();
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM recent_files WHERE path = ?1", [&path])?;
        tx.execute(
            "INSERT INTO recent_files (path, opened_at) VALUES (?1, ?2)",
            params![&path, chrono::Utc::now().timestamp()],
        )?;
        tx.execute(
            "DELETE FROM recent_files WHERE id NOT IN (
                SELECT id FROM recent_files ORDER BY id DESC LIMIT ?1
             )",
            [MAX_RECENT_FILES],
        )?;

        tx.commit()?;
        Ok(())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("db_path", &self.db_path)
            .finish()
    }
}
