// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformations between screen
//! positions and container-relative marker positions, and the placement
//! rules used when markers are generated.

use crate::models::marker::ContainerSize;
use rand::Rng;

/// Convert a screen position to container coordinates.
///
/// `rect` is where the container is drawn on screen and `size` its
/// coordinate space, so markers keep their place when the display is resized.
pub fn to_container(screen: egui::Pos2, rect: egui::Rect, size: ContainerSize) -> egui::Pos2 {
    let (sx, sy) = scale(rect, size);
    egui::pos2((screen.x - rect.min.x) / sx, (screen.y - rect.min.y) / sy)
}

/// Convert container coordinates back to screen space.
pub fn to_screen(pos: egui::Pos2, rect: egui::Rect, size: ContainerSize) -> egui::Pos2 {
    let (sx, sy) = scale(rect, size);
    egui::pos2(rect.min.x + pos.x * sx, rect.min.y + pos.y * sy)
}

/// Screen points per container pixel on each axis.
fn scale(rect: egui::Rect, size: ContainerSize) -> (f32, f32) {
    let axis = |shown: f32, stored: f32| if shown > 0.0 && stored > 0.0 { shown / stored } else { 1.0 };
    (axis(rect.width(), size.width), axis(rect.height(), size.height))
}

/// Clamp a container-relative position to `[0, width] x [0, height]`.
pub fn clamp_to_container(pos: egui::Pos2, size: ContainerSize) -> egui::Pos2 {
    egui::pos2(
        pos.x.clamp(0.0, size.width.max(0.0)),
        pos.y.clamp(0.0, size.height.max(0.0)),
    )
}

/// Vertical center of the `index`-th of `count` equal-height bands, floored to a whole pixel.
pub fn band_center_y(index: usize, count: usize, height: f32) -> f32 {
    let band = height / count as f32;
    (index as f32 * band + height / (2.0 * count as f32)).floor()
}

/// Bounds `[top, bottom)` of the `index`-th of `count` equal-height bands.
pub fn band_bounds(index: usize, count: usize, height: f32) -> (f32, f32) {
    let band = height / count as f32;
    (index as f32 * band, (index + 1) as f32 * band)
}

/// Random whole-pixel x in `[margin, width - margin)`.
///
/// Falls back to the horizontal center when the container is too narrow
/// to keep the margin on both sides.
pub fn sample_x<R: Rng + ?Sized>(rng: &mut R, width: f32, margin: f32) -> f32 {
    let low = margin.ceil() as i64;
    let high = (width - margin).ceil() as i64;
    if high <= low {
        return (width / 2.0).floor();
    }
    rng.random_range(low..high) as f32
}
