/// Imaging module
///
/// This module handles:
/// - Decoding and encoding image files (codec.rs)
/// - Applying individual filters (filters.rs)
/// - Replaying a parameter set against the original image (render.rs)

pub mod codec;
pub mod filters;
pub mod render;
