/// Filter engine
///
/// Applies one named filter to an RGBA buffer and returns a new buffer.
/// The engine is stateless and deterministic so a parameter set can be
/// replayed any number of times with identical output.

use image::{imageops, RgbaImage};

use crate::error::ViewerError;
use crate::state::edit::{Adjustment, TransformOp};

/// A filter kind together with its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Brightness(f32),
    Contrast(f32),
    Hue(f32),
    Saturation(f32),
    ColorBalance([f32; 3]),
    Grayscale,
    Sepia(f32),
    GaussianBlur(f32),
    Rotate90,
    FlipHorizontal,
    FlipVertical,
}

impl Filter {
    /// Filter for a scalar adjustment, `None` when it would be a no-op
    pub fn from_adjustment(adjustment: Adjustment) -> Option<Self> {
        if adjustment.is_default() {
            return None;
        }
        Some(match adjustment {
            Adjustment::Brightness(v) => Filter::Brightness(v),
            Adjustment::Contrast(v) => Filter::Contrast(v),
            Adjustment::Hue(v) => Filter::Hue(v),
            Adjustment::Saturation(v) => Filter::Saturation(v),
            Adjustment::ColorBalance(rgb) => Filter::ColorBalance(rgb),
            Adjustment::Grayscale(_) => Filter::Grayscale,
            Adjustment::Sepia(v) => Filter::Sepia(v),
            Adjustment::Blur(v) => Filter::GaussianBlur(v),
        })
    }
}

impl From<TransformOp> for Filter {
    fn from(op: TransformOp) -> Self {
        match op {
            TransformOp::Rotate90 => Filter::Rotate90,
            TransformOp::FlipHorizontal => Filter::FlipHorizontal,
            TransformOp::FlipVertical => Filter::FlipVertical,
        }
    }
}

/// Pixel backend used by the render pipeline
///
/// Implementations take one filter step and return a fresh buffer, leaving
/// the input untouched. The same input must always give the same output.
pub trait FilterEngine: Send + Sync {
    fn apply(&self, image: &RgbaImage, filter: &Filter) -> Result<RgbaImage, ViewerError>;
}

/// Filter engine backed by the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageOps;

impl FilterEngine for ImageOps {
    fn apply(&self, image: &RgbaImage, filter: &Filter) -> Result<RgbaImage, ViewerError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ViewerError::Recompute(format!(
                "cannot apply {:?} to an empty {}x{} buffer",
                filter,
                image.width(),
                image.height()
            )));
        }

        let output = match *filter {
            Filter::Brightness(percent) => {
                imageops::colorops::brighten(image, (percent * 2.55).round() as i32)
            }
            Filter::Contrast(percent) => imageops::colorops::contrast(image, percent),
            Filter::Hue(degrees) => imageops::colorops::huerotate(image, degrees.round() as i32),
            Filter::Saturation(percent) => {
                let factor = 1.0 + percent / 100.0;
                map_rgb(image, |rgb| {
                    let gray = luma(rgb);
                    rgb.map(|c| gray + (c - gray) * factor)
                })
            }
            Filter::ColorBalance([r, g, b]) => {
                let gains = [1.0 + r / 100.0, 1.0 + g / 100.0, 1.0 + b / 100.0];
                map_rgb(image, |[r, g, b]| [r * gains[0], g * gains[1], b * gains[2]])
            }
            Filter::Grayscale => map_rgb(image, |rgb| [luma(rgb); 3]),
            Filter::Sepia(percent) => {
                let amount = percent / 100.0;
                map_rgb(image, |[r, g, b]| {
                    let sepia = [
                        0.393 * r + 0.769 * g + 0.189 * b,
                        0.349 * r + 0.686 * g + 0.168 * b,
                        0.272 * r + 0.534 * g + 0.131 * b,
                    ];
                    [
                        r + (sepia[0] - r) * amount,
                        g + (sepia[1] - g) * amount,
                        b + (sepia[2] - b) * amount,
                    ]
                })
            }
            Filter::GaussianBlur(sigma) => imageops::blur(image, sigma),
            Filter::Rotate90 => imageops::rotate270(image),
            Filter::FlipHorizontal => imageops::flip_horizontal(image),
            Filter::FlipVertical => imageops::flip_vertical(image),
        };

        Ok(output)
    }
}

/// Rec. 601 luma
fn luma([r, g, b]: [f32; 3]) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Per-pixel color transform on 0..255 floats; alpha is preserved
fn map_rgb(image: &RgbaImage, f: impl Fn([f32; 3]) -> [f32; 3]) -> RgbaImage {
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let [r, g, b] = f([r as f32, g as f32, b as f32]);
        pixel.0 = [to_channel(r), to_channel(g), to_channel(b), a];
    }
    output
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
