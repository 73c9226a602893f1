// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker data structures.
//!
//! This module defines the labeled points shown over the character image
//! and the four anatomy layers that group them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Size of the marker container in pixels: the image at its natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A labeled marker with pixel coordinates relative to the container's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPoint {
    pub x: f32,
    pub y: f32,
    pub label: String,
    /// Reserved for the correctable layers; stored but not interpreted.
    #[serde(default)]
    pub is_editing: bool,
    /// Only meaningful on the massage layer.
    #[serde(default)]
    pub is_found: bool,
}

impl MarkerPoint {
    /// Create a new marker at the given position.
    pub fn new(x: f32, y: f32, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: label.into(),
            is_editing: false,
            is_found: false,
        }
    }

    /// Move the marker, leaving its label and flags untouched.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

/// One of the four anatomy layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Surface,
    Internal,
    Skeletal,
    Massage,
}

impl LayerKind {
    /// All layers in display order.
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Surface,
        LayerKind::Internal,
        LayerKind::Skeletal,
        LayerKind::Massage,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            LayerKind::Surface => "Surface",
            LayerKind::Internal => "Internal organs",
            LayerKind::Skeletal => "Skeleton",
            LayerKind::Massage => "Massage",
        }
    }

    /// Fixed labels used to generate the layer, top to bottom.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            LayerKind::Surface => &["Head", "Shoulders", "Arms", "Torso", "Hips", "Legs"],
            LayerKind::Internal => &["Brain", "Heart", "Lungs", "Stomach", "Intestines"],
            LayerKind::Skeletal => &["Skull", "Collarbone", "Ribcage", "Pelvis", "Femur"],
            LayerKind::Massage => &["Neck", "Upper back", "Lower back", "Calves", "Feet"],
        }
    }
}

/// The four marker layers, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LayerSet {
    layers: BTreeMap<LayerKind, Vec<MarkerPoint>>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points of a layer; empty until the layer has been generated.
    pub fn get(&self, kind: LayerKind) -> &[MarkerPoint] {
        self.layers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_mut(&mut self, kind: LayerKind) -> &mut Vec<MarkerPoint> {
        self.layers.entry(kind).or_default()
    }

    /// Replace a layer wholesale.
    pub fn replace(&mut self, kind: LayerKind, points: Vec<MarkerPoint>) {
        self.layers.insert(kind, points);
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.layers.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_counts() {
        assert_eq!(LayerKind::Surface.labels().len(), 6);
        assert_eq!(LayerKind::Internal.labels().len(), 5);
        assert_eq!(LayerKind::Skeletal.labels().len(), 5);
        assert_eq!(LayerKind::Massage.labels().len(), 5);
    }

    #[test]
    fn test_layer_set_keyed_access() {
        let mut layers = LayerSet::new();
        assert!(layers.get(LayerKind::Internal).is_empty());
        assert!(layers.is_empty());

        layers.replace(LayerKind::Internal, vec![MarkerPoint::new(10.0, 20.0, "Heart")]);
        layers.get_mut(LayerKind::Internal)[0].move_to(30.0, 40.0);

        let heart = &layers.get(LayerKind::Internal)[0];
        assert_eq!((heart.x, heart.y), (30.0, 40.0));
        assert_eq!(heart.label, "Heart");
        assert!(layers.get(LayerKind::Surface).is_empty());

        layers.clear();
        assert!(layers.is_empty());
    }
}
