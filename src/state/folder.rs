/// Folder navigation
///
/// Lists the images next to the open file so the user can step through
/// them with the prev/next arrows. Listing is lexically sorted because
/// directory order differs between platforms.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ViewerError;
use crate::imaging::codec;

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    directory: PathBuf,
    /// File names only, sorted and deduplicated
    images: Vec<String>,
    index: usize,
}

impl Folder {
    /// List the folder containing `file` and point the cursor at it
    pub fn scan(file: &Path) -> Result<Self, ViewerError> {
        let directory = file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let mut images = Vec::new();
        for entry in WalkDir::new(&directory).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ViewerError::filesystem("list", &directory, e))?;
            if !entry.file_type().is_file() || !codec::is_supported(entry.path()) {
                continue;
            }
            images.push(entry.file_name().to_string_lossy().to_string());
        }
        images.sort();
        images.dedup();

        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let index = match images.binary_search(&name) {
            Ok(index) => index,
            // Opened a file with an unlisted extension; keep it reachable
            Err(index) => {
                images.insert(index, name);
                index
            }
        };

        log::debug!(
            "Listed {} images in {} (current index {})",
            images.len(),
            directory.display(),
            index
        );

        Ok(Self {
            directory,
            images,
            index,
        })
    }

    /// A listing holding only `file`; navigation stays disabled
    pub fn single(file: &Path) -> Self {
        Self {
            directory: file.parent().map(Path::to_path_buf).unwrap_or_default(),
            images: vec![file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()],
            index: 0,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Prev/next only make sense with at least two images
    pub fn can_navigate(&self) -> bool {
        self.images.len() >= 2
    }

    /// Index one step forward or back, `None` at either end
    pub fn neighbor(&self, forward: bool) -> Option<usize> {
        self.neighbor_of(self.index, forward)
    }

    /// Like `neighbor`, but stepping from `from` instead of the cursor
    pub fn neighbor_of(&self, from: usize, forward: bool) -> Option<usize> {
        if !self.can_navigate() || from >= self.images.len() {
            return None;
        }
        if forward {
            (from + 1 < self.images.len()).then_some(from + 1)
        } else {
            from.checked_sub(1)
        }
    }

    pub fn path_at(&self, index: usize) -> Option<PathBuf> {
        self.images.get(index).map(|name| self.directory.join(name))
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.path_at(self.index)
    }

    /// Move the cursor; out-of-range indices are ignored
    pub fn set_index(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.index = index;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn folder_with(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = folder_with(&["c.png", "a.JPG", "notes.txt", "b.webp"]);
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let folder = Folder::scan(&dir.path().join("b.webp")).unwrap();

        assert_eq!(folder.images(), &["a.JPG", "b.webp", "c.png"]);
        assert_eq!(folder.index(), 1);
        assert_eq!(folder.current_path(), Some(dir.path().join("b.webp")));
    }

    #[test]
    fn test_neighbor_stops_at_ends() {
        let dir = folder_with(&["1.png", "2.png", "3.png"]);
        let mut folder = Folder::scan(&dir.path().join("1.png")).unwrap();

        assert_eq!(folder.neighbor(false), None);
        assert_eq!(folder.neighbor(true), Some(1));

        assert!(folder.set_index(2));
        assert_eq!(folder.neighbor(true), None);
        assert_eq!(folder.neighbor(false), Some(1));
        assert!(!folder.set_index(3));
    }

    #[test]
    fn test_neighbor_of_ignores_cursor() {
        let dir = folder_with(&["1.png", "2.png", "3.png"]);
        let folder = Folder::scan(&dir.path().join("1.png")).unwrap();

        assert_eq!(folder.neighbor_of(1, true), Some(2));
        assert_eq!(folder.neighbor_of(2, true), None);
        assert_eq!(folder.neighbor_of(7, false), None);
        assert_eq!(folder.index(), 0);
    }

    #[test]
    fn test_single_image_disables_navigation() {
        let dir = folder_with(&["only.png"]);
        let folder = Folder::scan(&dir.path().join("only.png")).unwrap();
        assert!(!folder.can_navigate());
        assert_eq!(folder.neighbor(true), None);
    }

    #[test]
    fn test_unlisted_file_is_kept() {
        let dir = folder_with(&["a.png", "c.png", "b.raw"]);
        let folder = Folder::scan(&dir.path().join("b.raw")).unwrap();
        assert_eq!(folder.images(), &["a.png", "b.raw", "c.png"]);
        assert_eq!(folder.index(), 1);
    }
}
