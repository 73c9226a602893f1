// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Anatomy Lens application.

pub mod canvas;
pub mod marker;
pub mod sidebar;
pub mod toolbar;
