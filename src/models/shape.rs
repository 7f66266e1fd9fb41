// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shape rectangles.
//!
//! A shape is a rectangular region of a source image, measured in pixels
//! from the image's top-left corner. Shapes have no identity of their own;
//! their position in the owning container is their export index.

use serde::{Deserialize, Serialize};

/// A rectangle cut from a source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Shape {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Shape {
    /// Create a new shape.
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shapes with a zero dimension are kept by the editor but never exported.
    pub fn is_exportable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Whether the rectangle lies fully inside an image of the given size.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        u32::from(self.x) + u32::from(self.width) <= image_width
            && u32::from(self.y) + u32::from(self.height) <= image_height
    }
}
