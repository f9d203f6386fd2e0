/// Image codec and file access
///
/// Decoding and encoding are delegated to the `image` crate. Everything is
/// normalized to RGBA8 on load so the filter engine works on one pixel type.

use chrono::{DateTime, Local};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::ViewerError;

/// File extensions listed during folder navigation
pub const SUPPORTED_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp", "ico",
];

/// Returns true if the path has one of the supported image extensions
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map_or(false, |ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// What the Information tab shows about the open file
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Size on disk in bytes
    pub file_size: u64,
    pub modified: Option<DateTime<Local>>,
}

/// A decoded file, ready to become a session
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub pixels: RgbaImage,
    pub info: ImageInfo,
}

/// Decode in-memory image data; `source` is only used in error messages
pub fn decode(bytes: &[u8], source: &Path) -> Result<RgbaImage, ViewerError> {
    image::load_from_memory(bytes)
        .map(DynamicImage::into_rgba8)
        .map_err(|e| ViewerError::decode(source, e))
}

/// Encode to the given format. Formats without alpha get an RGB copy.
pub fn encode(pixels: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>, ViewerError> {
    let image = match format {
        ImageFormat::Jpeg | ImageFormat::Bmp => {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(pixels.clone()).to_rgb8())
        }
        _ => DynamicImage::ImageRgba8(pixels.clone()),
    };

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| ViewerError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Output format chosen from the file extension
pub fn format_for_path(path: &Path) -> Result<ImageFormat, ViewerError> {
    ImageFormat::from_path(path).map_err(|_| {
        ViewerError::Encode(format!(
            "unsupported file type: {}",
            path.extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        ))
    })
}

/// Read and decode a file
pub fn load(path: &Path) -> Result<LoadedImage, ViewerError> {
    let bytes = fs::read(path).map_err(|e| ViewerError::filesystem("open", path, e))?;
    let metadata = fs::metadata(path).map_err(|e| ViewerError::filesystem("open", path, e))?;
    let pixels = decode(&bytes, path)?;

    log::info!(
        "Opened {} ({}x{}, {} bytes)",
        path.display(),
        pixels.width(),
        pixels.height(),
        metadata.len()
    );

    let info = ImageInfo {
        width: pixels.width(),
        height: pixels.height(),
        file_size: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Local>::from),
    };

    Ok(LoadedImage {
        path: path.to_path_buf(),
        pixels,
        info,
    })
}

/// Encode and write a file; the format follows the extension
pub fn save(path: &Path, pixels: &RgbaImage) -> Result<(), ViewerError> {
    let format = format_for_path(path)?;
    let bytes = encode(pixels, format)?;
    fs::write(path, bytes).map_err(|e| ViewerError::filesystem("save", path, e))?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// `load` on tokio's blocking pool (decoding is CPU-intensive)
pub async fn load_async(path: PathBuf) -> Result<LoadedImage, ViewerError> {
    let error_path = path.clone();
    task::spawn_blocking(move || load(&path))
        .await
        .map_err(|e| ViewerError::filesystem("open", &error_path, e))?
}

/// `save` on tokio's blocking pool
pub async fn save_async(path: PathBuf, pixels: RgbaImage) -> Result<PathBuf, ViewerError> {
    task::spawn_blocking(move || save(&path, &pixels).map(|()| path))
        .await
        .map_err(|e| ViewerError::Encode(format!("save task failed: {}", e)))?
}
