// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Flavor text for the capybara mage.

/// Tools shown one after another while the analysis runs.
pub const ANALYSIS_TOOLS: &[&str] = &[
    "Crystal magnifier",
    "Bone-reading runes",
    "Organ lantern",
    "Pressure-point compass",
];

/// Quotes cycled while viewing the analysis.
pub const ANALYSIS_QUOTES: &[&str] = &[
    "Every character hides a skeleton. Usually inside.",
    "Proportions are a spell cast with a ruler.",
    "A calm capybara sees the whole silhouette.",
    "The shoulders tell me more than the sword does.",
    "Anatomy is just magic that forgot to glow.",
];

/// Quotes picked after a marker has been moved.
pub const CORRECTION_QUOTES: &[&str] = &[
    "Ah, you know this body better than my runes do.",
    "A small nudge, a big truth.",
    "Corrected. The spirits nod approvingly.",
    "Even mages misplace a knee now and then.",
];

/// Quotes used during a massage round.
pub const MASSAGE_QUOTES: &[&str] = &[
    "Gently now, the tension melts like warm butter.",
    "Breathe in. Let the capybara calm flow.",
    "That knot had been there since the last quest.",
    "Relaxation is the strongest buff.",
    "Slow circles. Capybaras never rush.",
];
