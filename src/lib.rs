// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shape cutting projects for legacy 2D engines.
//!
//! A project is a list of source images, each with rectangular shapes cut
//! from it. Projects are stored as JSON (or YAML) documents and exported
//! either as an MPSH file, with a manifest giving direct access to every
//! shape, or as a plain Blitz shapes file. Both exports crop each shape
//! from its palette-reduced source image and store it as planar bitmaps.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod ui;
pub mod util;

pub use app::ShapeEditor;
pub use config::ExportConfig;
pub use error::{ErrorKind, ShapeError};
pub use models::image::{BitDepth, SimpleImage};
pub use models::project::{ContainerId, Project, ShapeContainer};
pub use models::shape::Shape;
