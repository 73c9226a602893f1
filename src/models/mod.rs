// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session data model: markers, layers and the anatomy session.

pub mod lore;
pub mod marker;
pub mod session;
