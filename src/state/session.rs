/// Image session: the open image, its parameter set and its history
///
/// Every change goes through `begin` (compute the prospective state and a
/// render job) and `complete` (adopt the state once the render succeeds).
/// `apply` runs both on the calling thread. Parameters and history only
/// change after a successful render, so a failing filter never corrupts
/// either.
///
/// Folder navigation follows the same split: `begin_navigation` picks the
/// target and `replace_image` adopts the decoded file. `open`, `apply` and
/// its wrappers, `next_image` and `save` block the calling thread; the UI
/// uses the split calls and the async codec instead.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::edit::{Adjustment, Edit, EditParams, TransformOp};
use super::folder::Folder;
use super::history::{History, HistoryEntry};
use crate::error::ViewerError;
use crate::imaging::codec::{self, ImageInfo, LoadedImage};
use crate::imaging::filters::FilterEngine;
use crate::imaging::render::{RenderJob, RenderOutput};

/// A user action against the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Commit(Edit),
    Undo,
    Redo,
    Reset,
}

/// Prospective state waiting for its render to finish
#[derive(Debug)]
struct Pending {
    generation: u64,
    params: EditParams,
    history: History,
    /// Set when the render succeeded after a newer change was started
    rendered: Option<RgbaImage>,
}

pub struct Session {
    path: PathBuf,
    original: Arc<RgbaImage>,
    rendered: RgbaImage,
    info: ImageInfo,
    params: EditParams,
    history: History,
    folder: Folder,
    engine: Arc<dyn FilterEngine>,
    generation: u64,
    /// Oldest first; the last one is what the user sees
    pending: Vec<Pending>,
    /// Folder index of the latest navigation still loading
    navigation: Option<usize>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("history", &self.history)
            .field("generation", &self.generation)
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Load a file and list its folder
    pub fn open(path: &Path, engine: Arc<dyn FilterEngine>) -> Result<Self, ViewerError> {
        let loaded = codec::load(path)?;
        Ok(Self::new(loaded, Self::scan_folder(path), engine))
    }

    /// Folder listing for `path`; listing failures only disable navigation
    pub fn scan_folder(path: &Path) -> Folder {
        Folder::scan(path).unwrap_or_else(|e| {
            log::warn!("Folder navigation disabled: {}", e);
            Folder::single(path)
        })
    }

    pub fn new(loaded: LoadedImage, folder: Folder, engine: Arc<dyn FilterEngine>) -> Self {
        Self {
            path: loaded.path,
            rendered: loaded.pixels.clone(),
            original: Arc::new(loaded.pixels),
            info: loaded.info,
            params: EditParams::new(),
            history: History::new(),
            folder,
            engine,
            generation: 0,
            pending: Vec::new(),
            navigation: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn rendered(&self) -> &RgbaImage {
        &self.rendered
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    /// Committed parameters (those reflected in `rendered`)
    pub fn params(&self) -> &EditParams {
        &self.params
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    pub fn is_rendering(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Latest parameters, including a change whose render is in flight
    pub fn latest_params(&self) -> &EditParams {
        self.pending.last().map_or(&self.params, |p| &p.params)
    }

    fn latest_history(&self) -> &History {
        self.pending.last().map_or(&self.history, |p| &p.history)
    }

    pub fn can_undo(&self) -> bool {
        self.latest_history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.latest_history().can_redo()
    }

    /// Reset is disabled while nothing differs from the defaults
    pub fn can_reset(&self) -> bool {
        !self.latest_params().is_unedited()
    }

    /// Compute the state `action` leads to and a job that renders it
    ///
    /// Returns `Ok(None)` when the action changes nothing (repeated slider
    /// value, undo at the start, redo at the end, reset when unedited).
    /// Builds on a pending change if one is in flight.
    pub fn begin(&mut self, action: Action) -> Result<Option<RenderJob>, ViewerError> {
        let mut params = self.latest_params().clone();
        let mut history = self.latest_history().clone();

        let changed = match action {
            Action::Commit(Edit::Adjust(adjustment)) => {
                let new = adjustment.clamped()?;
                let old = params.get(new.field());
                if old == new {
                    false
                } else {
                    params.set(new);
                    history.commit(HistoryEntry::Adjust { old, new });
                    true
                }
            }
            Action::Commit(Edit::Transform(op)) => {
                params.transforms.push(op);
                history.commit(HistoryEntry::Transform(op));
                true
            }
            Action::Undo => history.undo(&mut params),
            Action::Redo => history.redo(&mut params),
            Action::Reset => {
                if params.is_unedited() {
                    false
                } else {
                    let previous = params.clone();
                    params.reset();
                    history.commit(HistoryEntry::Reset { previous });
                    true
                }
            }
        };

        if !changed {
            log::debug!("{:?} changed nothing", action);
            return Ok(None);
        }

        self.generation += 1;
        log::debug!(
            "{:?} -> generation {} (history {}/{})",
            action,
            self.generation,
            history.cursor(),
            history.len()
        );

        let job = RenderJob::new(
            self.generation,
            Arc::clone(&self.original),
            params.clone(),
            Arc::clone(&self.engine),
        );
        self.pending.push(Pending {
            generation: self.generation,
            params,
            history,
            rendered: None,
        });
        Ok(Some(job))
    }

    /// Adopt a finished render
    ///
    /// Only the newest change is adopted (`Ok(true)`). A superseded render
    /// that succeeded is kept as a fallback and reports `Ok(false)`. When
    /// the newest render fails, the session falls back to the latest
    /// change that did render, or keeps its committed state if there is
    /// none, and the error is returned.
    pub fn complete(&mut self, output: RenderOutput) -> Result<bool, ViewerError> {
        let Some(pos) = self
            .pending
            .iter()
            .position(|p| p.generation == output.generation)
        else {
            log::debug!("Ignoring stale render {}", output.generation);
            return Ok(false);
        };
        let newest = pos + 1 == self.pending.len();

        match output.result {
            Ok(rendered) if newest => {
                if let Some(pending) = self.pending.pop() {
                    self.adopt(pending, rendered);
                }
                self.pending.clear();
                Ok(true)
            }
            Ok(rendered) => {
                log::debug!("Render {} superseded, kept as fallback", output.generation);
                self.pending[pos].rendered = Some(rendered);
                // Older changes can no longer be the fallback
                self.pending = self.pending.split_off(pos);
                Ok(false)
            }
            Err(e) if newest => {
                log::warn!("Render {} failed: {}", output.generation, e);
                self.pending.pop();
                self.fall_back();
                Err(e)
            }
            Err(e) => {
                // A newer change replays the same parameters and decides
                log::warn!("Superseded render {} failed: {}", output.generation, e);
                self.pending.remove(pos);
                Ok(false)
            }
        }
    }

    fn adopt(&mut self, pending: Pending, rendered: RgbaImage) {
        self.params = pending.params;
        self.history = pending.history;
        self.rendered = rendered;
    }

    /// Adopt the newest pending change that already rendered
    fn fall_back(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|p| p.rendered.is_some()) else {
            return;
        };
        // Changes started after the fallback are still in flight
        let newer = self.pending.split_off(pos + 1);
        let fallback = self.pending.pop();
        self.pending = newer;

        if let Some(mut pending) = fallback {
            if let Some(rendered) = pending.rendered.take() {
                log::debug!("Falling back to generation {}", pending.generation);
                self.adopt(pending, rendered);
            }
        }
    }

    /// `begin` + render + `complete` on the calling thread
    pub fn apply(&mut self, action: Action) -> Result<bool, ViewerError> {
        match self.begin(action)? {
            Some(job) => self.complete(job.run()),
            None => Ok(false),
        }
    }

    /// Replace one scalar field
    pub fn change_parameter(&mut self, adjustment: Adjustment) -> Result<bool, ViewerError> {
        self.apply(Action::Commit(Edit::Adjust(adjustment)))
    }

    /// Append a rotation or flip
    pub fn add_parameter(&mut self, op: TransformOp) -> Result<bool, ViewerError> {
        self.apply(Action::Commit(Edit::Transform(op)))
    }

    pub fn undo(&mut self) -> Result<bool, ViewerError> {
        self.apply(Action::Undo)
    }

    pub fn redo(&mut self) -> Result<bool, ViewerError> {
        self.apply(Action::Redo)
    }

    pub fn reset(&mut self) -> Result<bool, ViewerError> {
        self.apply(Action::Reset)
    }

    /// Path of the previous/next image in the folder, if there is one
    ///
    /// Steps from the image still loading when a navigation is in flight.
    pub fn neighbor(&self, forward: bool) -> Option<(usize, PathBuf)> {
        let from = self.navigation.unwrap_or_else(|| self.folder.index());
        let index = self.folder.neighbor_of(from, forward)?;
        self.folder.path_at(index).map(|path| (index, path))
    }

    /// Pick the previous/next image and remember it as the navigation
    /// target; only that target is adopted by `replace_image`
    pub fn begin_navigation(&mut self, forward: bool) -> Option<(usize, PathBuf)> {
        let (index, path) = self.neighbor(forward)?;
        self.navigation = Some(index);
        Some((index, path))
    }

    /// Forget a navigation whose file could not be loaded
    pub fn cancel_navigation(&mut self, index: usize) {
        if self.navigation == Some(index) {
            self.navigation = None;
        }
    }

    /// Switch to another image of the same folder
    ///
    /// Parameters and history start over; the folder listing is kept.
    /// Returns false, changing nothing, when `loaded` is not the file at
    /// `index` of this folder or a newer navigation has replaced it.
    pub fn replace_image(&mut self, loaded: LoadedImage, index: usize) -> bool {
        if self.folder.path_at(index).as_deref() != Some(loaded.path.as_path()) {
            log::debug!("{} is not entry {} of this folder", loaded.path.display(), index);
            return false;
        }
        if self.navigation.is_some_and(|target| target != index) {
            log::debug!("Navigation to {} superseded", index);
            return false;
        }

        self.folder.set_index(index);
        self.navigation = None;
        self.path = loaded.path;
        self.rendered = loaded.pixels.clone();
        self.original = Arc::new(loaded.pixels);
        self.info = loaded.info;
        self.params = EditParams::new();
        self.history = History::new();
        self.pending.clear();
        true
    }

    /// Step through the folder. Returns false at either end or when the
    /// folder holds a single image. A load failure changes nothing.
    pub fn next_image(&mut self, forward: bool) -> Result<bool, ViewerError> {
        let Some((index, path)) = self.neighbor(forward) else {
            return Ok(false);
        };
        let loaded = codec::load(&path)?;
        Ok(self.replace_image(loaded, index))
    }

    /// Write the rendered image; the format follows the extension
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        codec::save(path, &self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::filters::{Filter, ImageOps};
    use image::Rgba;

    fn loaded(width: u32, height: u32) -> LoadedImage {
        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 40) as u8, (y * 40) as u8, 90, 255])
        });
        LoadedImage {
            path: PathBuf::from("memory.png"),
            info: ImageInfo {
                width,
                height,
                file_size: 0,
                modified: None,
            },
            pixels,
        }
    }

    fn session() -> Session {
        let image = loaded(4, 2);
        let folder = Folder::single(&image.path);
        Session::new(image, folder, Arc::new(ImageOps))
    }

    /// Delegates to `ImageOps` but refuses one filter kind
    struct Refusing(fn(&Filter) -> bool);

    impl FilterEngine for Refusing {
        fn apply(&self, image: &RgbaImage, filter: &Filter) -> Result<RgbaImage, ViewerError> {
            if (self.0)(filter) {
                return Err(ViewerError::Recompute(format!("{:?} refused", filter)));
            }
            ImageOps.apply(image, filter)
        }
    }

    #[test]
    fn test_change_parameter_replaces_value() {
        let mut s = session();
        assert!(s.change_parameter(Adjustment::Brightness(10.0)).unwrap());
        assert!(s.change_parameter(Adjustment::Brightness(40.0)).unwrap());

        let mut only_forty = EditParams::new();
        only_forty.brightness = 40.0;
        let expected = crate::imaging::render::render(&ImageOps, s.original(), &only_forty).unwrap();

        assert_eq!(s.rendered(), &expected);
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_repeated_value_is_not_recorded() {
        let mut s = session();
        assert!(s.change_parameter(Adjustment::Contrast(25.0)).unwrap());
        assert!(!s.change_parameter(Adjustment::Contrast(25.0)).unwrap());
        // Clamps to the same stored value
        assert!(s.change_parameter(Adjustment::Hue(180.0)).unwrap());
        assert!(!s.change_parameter(Adjustment::Hue(999.0)).unwrap());

        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_fractional_hue_matching_rendered_value_is_not_recorded() {
        let mut s = session();
        assert!(s.change_parameter(Adjustment::Hue(12.0)).unwrap());
        assert!(!s.change_parameter(Adjustment::Hue(12.4)).unwrap());
        assert!(s.change_parameter(Adjustment::Hue(12.6)).unwrap());

        assert_eq!(s.params().hue, 13.0);
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_transforms_accumulate_and_undo() {
        let mut s = session();
        assert!(s.add_parameter(TransformOp::Rotate90).unwrap());
        assert!(s.add_parameter(TransformOp::FlipHorizontal).unwrap());
        assert_eq!(s.history().len(), 2);

        assert!(s.undo().unwrap());

        assert_eq!(s.params().transforms, vec![TransformOp::Rotate90]);
        assert_eq!(s.rendered().dimensions(), (2, 4));
        assert!(s.can_redo());
    }

    #[test]
    fn test_same_transform_twice_records_twice() {
        let mut s = session();
        s.add_parameter(TransformOp::FlipVertical).unwrap();
        s.add_parameter(TransformOp::FlipVertical).unwrap();
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.rendered(), s.original());
    }

    #[test]
    fn test_undo_redo_pair_is_noop() {
        let mut s = session();
        s.change_parameter(Adjustment::Saturation(80.0)).unwrap();
        s.add_parameter(TransformOp::Rotate90).unwrap();
        s.change_parameter(Adjustment::Sepia(40.0)).unwrap();

        let params = s.params().clone();
        let rendered = s.rendered().clone();

        assert!(s.undo().unwrap());
        assert!(s.redo().unwrap());

        assert_eq!(s.params(), &params);
        assert_eq!(s.rendered(), &rendered);
    }

    #[test]
    fn test_commit_after_undo_discards_redo_branch() {
        let mut s = session();
        s.change_parameter(Adjustment::Brightness(10.0)).unwrap();
        s.change_parameter(Adjustment::Blur(2.0)).unwrap();
        s.undo().unwrap();
        s.add_parameter(TransformOp::FlipVertical).unwrap();

        assert!(!s.redo().unwrap());
        assert_eq!(s.params().blur, 0.0);
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_undo_and_redo_at_bounds() {
        let mut s = session();
        assert!(!s.undo().unwrap());
        assert!(!s.redo().unwrap());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_reset_without_changes_is_noop() {
        let mut s = session();
        assert!(!s.can_reset());
        assert!(!s.reset().unwrap());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_reset_is_undoable() {
        let mut s = session();
        s.change_parameter(Adjustment::Grayscale(true)).unwrap();
        s.add_parameter(TransformOp::Rotate90).unwrap();
        let edited = s.params().clone();

        assert!(s.reset().unwrap());
        assert!(s.params().is_unedited());
        assert_eq!(s.rendered(), s.original());
        assert_eq!(s.history().len(), 3);

        assert!(s.undo().unwrap());
        assert_eq!(s.params(), &edited);
    }

    #[test]
    fn test_failed_render_leaves_state_untouched() {
        let image = loaded(3, 3);
        let folder = Folder::single(&image.path);
        let engine = Arc::new(Refusing(|f| matches!(f, Filter::Sepia(_))));
        let mut s = Session::new(image, folder, engine);

        s.change_parameter(Adjustment::Brightness(5.0)).unwrap();
        let params = s.params().clone();
        let rendered = s.rendered().clone();

        let err = s.change_parameter(Adjustment::Sepia(50.0)).unwrap_err();

        assert!(matches!(err, ViewerError::Recompute(_)));
        assert_eq!(s.params(), &params);
        assert_eq!(s.rendered(), &rendered);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history().cursor(), 1);
        assert!(!s.is_rendering());
    }

    #[test]
    fn test_failed_commit_then_undo() {
        let image = loaded(3, 3);
        let folder = Folder::single(&image.path);
        let engine = Arc::new(Refusing(|f| matches!(f, Filter::FlipHorizontal)));
        let mut s = Session::new(image, folder, engine);

        s.change_parameter(Adjustment::Hue(30.0)).unwrap();
        // Committing the flip fails, so history holds only the hue change
        assert!(s.add_parameter(TransformOp::FlipHorizontal).is_err());
        assert_eq!(s.history().len(), 1);
        assert!(s.undo().unwrap());
        assert_eq!(s.history().cursor(), 0);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let mut s = session();
        assert!(s.change_parameter(Adjustment::Blur(f32::INFINITY)).is_err());
        assert!(s.history().is_empty());
        assert!(!s.is_rendering());
    }

    #[test]
    fn test_superseded_render_is_ignored() {
        let mut s = session();
        let first = s
            .begin(Action::Commit(Edit::Adjust(Adjustment::Brightness(20.0))))
            .unwrap()
            .unwrap();
        let second = s
            .begin(Action::Commit(Edit::Transform(TransformOp::Rotate90)))
            .unwrap()
            .unwrap();
        assert!(s.is_rendering());
        assert_eq!(s.latest_params().transforms.len(), 1);
        assert!(s.params().is_unedited());

        let first_output = first.run();
        assert!(s.complete(second.run()).unwrap());
        assert!(!s.complete(first_output).unwrap());

        assert_eq!(s.params().brightness, 20.0);
        assert_eq!(s.params().transforms, vec![TransformOp::Rotate90]);
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.rendered().dimensions(), (2, 4));
    }

    fn sepia_refusing_session() -> Session {
        let image = loaded(3, 3);
        let folder = Folder::single(&image.path);
        Session::new(image, folder, Arc::new(Refusing(|f| matches!(f, Filter::Sepia(_)))))
    }

    #[test]
    fn test_failed_render_falls_back_to_superseded_change() {
        let mut s = sepia_refusing_session();
        let brighter = s
            .begin(Action::Commit(Edit::Adjust(Adjustment::Brightness(20.0))))
            .unwrap()
            .unwrap();
        let sepia = s
            .begin(Action::Commit(Edit::Adjust(Adjustment::Sepia(60.0))))
            .unwrap()
            .unwrap();

        assert!(!s.complete(brighter.run()).unwrap());
        assert!(s.params().is_unedited());
        assert!(matches!(s.complete(sepia.run()), Err(ViewerError::Recompute(_))));

        let mut expected = EditParams::new();
        expected.brightness = 20.0;
        let rendered = crate::imaging::render::render(&ImageOps, s.original(), &expected).unwrap();
        assert_eq!(s.params(), &expected);
        assert_eq!(s.rendered(), &rendered);
        assert_eq!(s.history().len(), 1);
        assert!(!s.is_rendering());
    }

    #[test]
    fn test_failed_render_waits_for_older_change() {
        let mut s = sepia_refusing_session();
        let flip = s
            .begin(Action::Commit(Edit::Transform(TransformOp::FlipVertical)))
            .unwrap()
            .unwrap();
        let sepia = s
            .begin(Action::Commit(Edit::Adjust(Adjustment::Sepia(60.0))))
            .unwrap()
            .unwrap();

        assert!(s.complete(sepia.run()).is_err());
        // The flip is still rendering and is now the latest change
        assert!(s.is_rendering());
        assert_eq!(s.latest_params().transforms, vec![TransformOp::FlipVertical]);

        assert!(s.complete(flip.run()).unwrap());
        assert_eq!(s.params().transforms, vec![TransformOp::FlipVertical]);
        assert_eq!(s.history().len(), 1);
        assert!(!s.is_rendering());
    }

    fn write_folder(count: usize) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..count {
            let pixels = RgbaImage::from_pixel(1, 1, Rgba([i as u8 * 40, 0, 0, 255]));
            codec::save(&dir.path().join(format!("img_{i}.png")), &pixels).unwrap();
        }
        dir
    }

    #[test]
    fn test_folder_navigation_bounds() {
        let dir = write_folder(5);
        let mut s = Session::open(&dir.path().join("img_0.png"), Arc::new(ImageOps)).unwrap();

        assert_eq!(s.folder().index(), 0);
        assert!(!s.next_image(false).unwrap());

        for expected in 1..=4 {
            assert!(s.next_image(true).unwrap());
            assert_eq!(s.folder().index(), expected);
        }
        assert!(!s.next_image(true).unwrap());
        assert_eq!(s.folder().index(), 4);
        assert_eq!(s.path(), dir.path().join("img_4.png"));
        assert_eq!(s.original().get_pixel(0, 0).0, [160, 0, 0, 255]);
    }

    #[test]
    fn test_navigation_starts_fresh_history() {
        let dir = write_folder(2);
        let mut s = Session::open(&dir.path().join("img_0.png"), Arc::new(ImageOps)).unwrap();
        s.change_parameter(Adjustment::Brightness(30.0)).unwrap();

        assert!(s.next_image(true).unwrap());

        assert!(s.params().is_unedited());
        assert!(s.history().is_empty());
        assert_eq!(s.rendered(), s.original());
    }

    #[test]
    fn test_navigation_load_failure_changes_nothing() {
        let dir = write_folder(1);
        std::fs::write(dir.path().join("zz_broken.png"), b"nope").unwrap();
        let mut s = Session::open(&dir.path().join("img_0.png"), Arc::new(ImageOps)).unwrap();
        s.change_parameter(Adjustment::Contrast(10.0)).unwrap();

        assert!(matches!(s.next_image(true), Err(ViewerError::Decode { .. })));
        assert_eq!(s.folder().index(), 0);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_replace_image_refuses_file_from_another_folder() {
        let here = write_folder(3);
        let elsewhere = write_folder(3);
        let mut s = Session::open(&here.path().join("img_0.png"), Arc::new(ImageOps)).unwrap();
        s.change_parameter(Adjustment::Hue(40.0)).unwrap();

        let stray = codec::load(&elsewhere.path().join("img_1.png")).unwrap();

        assert!(!s.replace_image(stray, 1));
        assert_eq!(s.path(), here.path().join("img_0.png"));
        assert_eq!(s.folder().index(), 0);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_repeated_navigation_steps_from_pending_target() {
        let dir = write_folder(4);
        let mut s = Session::open(&dir.path().join("img_0.png"), Arc::new(ImageOps)).unwrap();

        let (first, first_path) = s.begin_navigation(true).unwrap();
        let (second, second_path) = s.begin_navigation(true).unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(s.folder().index(), 0);

        // The newer target wins whichever load lands first
        assert!(s.replace_image(codec::load(&second_path).unwrap(), second));
        assert!(!s.replace_image(codec::load(&first_path).unwrap(), first));
        assert_eq!(s.folder().index(), 2);
        assert_eq!(s.path(), second_path);
    }

    #[test]
    fn test_cancelled_navigation_steps_from_cursor() {
        let dir = write_folder(3);
        let mut s = Session::open(&dir.path().join("img_1.png"), Arc::new(ImageOps)).unwrap();

        let (index, _) = s.begin_navigation(true).unwrap();
        assert_eq!(s.neighbor(true), None);

        s.cancel_navigation(index);

        assert_eq!(s.neighbor(true).map(|(i, _)| i), Some(2));
        assert_eq!(s.neighbor(false).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn test_save_writes_rendered_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        s.add_parameter(TransformOp::Rotate90).unwrap();

        let out = dir.path().join("rotated.png");
        s.save(&out).unwrap();

        let reloaded = codec::load(&out).unwrap();
        assert_eq!(&reloaded.pixels, s.rendered());
    }
}
