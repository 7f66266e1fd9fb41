// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Indexed pixel buffers.
//!
//! Source images are held as palette-indexed buffers: one byte per pixel
//! indexing into an RGB palette. This is the representation every image
//! collaborator call works on, from decoding through palette reduction to
//! planar conversion.

use crate::error::ShapeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits per pixel after palette reduction, always in 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BitDepth(u8);

impl BitDepth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(bits: u8) -> Result<Self, ShapeError> {
        if (Self::MIN..=Self::MAX).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(ShapeError::InvalidBitDepth(bits))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Palette size addressable at this depth.
    pub fn colors(self) -> usize {
        1usize << self.0
    }

    /// Smallest depth able to address `count` palette entries.
    pub fn for_palette_len(count: usize) -> Self {
        let mut bits = Self::MIN;
        while bits < Self::MAX && (1usize << bits) < count {
            bits += 1;
        }
        Self(bits)
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = ShapeError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.0
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A palette-indexed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleImage {
    pub width: u32,
    pub height: u32,
    pub depth: BitDepth,
    pub palette: Vec<[u8; 3]>,
    /// Row-major palette indices, `width * height` long.
    pub pixels: Vec<u8>,
}

impl SimpleImage {
    /// Build an image, deriving its depth from the palette size.
    pub fn new(width: u32, height: u32, palette: Vec<[u8; 3]>, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            depth: BitDepth::for_palette_len(palette.len()),
            palette,
            pixels,
        }
    }

    /// Palette index at `(x, y)`, or 0 outside the image.
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(0)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth_range() {
        assert!(BitDepth::new(0).is_err());
        assert!(BitDepth::new(9).is_err());
        assert_eq!(BitDepth::new(1).unwrap().colors(), 2);
        assert_eq!(BitDepth::new(8).unwrap().colors(), 256);
    }

    #[test]
    fn test_depth_for_palette_len() {
        assert_eq!(BitDepth::for_palette_len(0).get(), 1);
        assert_eq!(BitDepth::for_palette_len(2).get(), 1);
        assert_eq!(BitDepth::for_palette_len(3).get(), 2);
        assert_eq!(BitDepth::for_palette_len(32).get(), 5);
        assert_eq!(BitDepth::for_palette_len(33).get(), 6);
        assert_eq!(BitDepth::for_palette_len(256).get(), 8);
    }

    #[test]
    fn test_bit_depth_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<BitDepth>("5").is_ok());
        assert!(serde_json::from_str::<BitDepth>("12").is_err());
    }
}
