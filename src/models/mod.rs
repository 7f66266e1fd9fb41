// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: shapes, indexed images and the project container list.

pub mod image;
pub mod project;
pub mod shape;
