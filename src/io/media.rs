// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Character image loading.
//!
//! This module decodes image files into RGBA pixels suitable for an egui
//! texture. Files that do not decode as an image are rejected.

use anyhow::{Context, Result};
use std::path::Path;

/// Extensions offered by the file picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif"];

/// A decoded image.
#[derive(Debug)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row major
    pub pixels: Vec<u8>,
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode_image(&bytes).with_context(|| format!("{} is not a supported image", path.display()))
}

/// Decode image bytes, sniffing the format from the content rather than the file name.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
