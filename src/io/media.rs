// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Source image handling.
//!
//! Decoding, cropping, palette reduction and planar conversion are owned by
//! an image collaborator behind [`ImageProcessor`]. The project codec and
//! exporters only call through this trait. [`ImageCrateProcessor`] is the
//! stock implementation backed by the `image` crate.

use crate::error::ShapeError;
use crate::io::planar::PlanarShape;
use crate::models::image::{BitDepth, SimpleImage};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors reported by an image collaborator while decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("image uses {0} distinct colours, at most 256 can be indexed")]
    TooManyColors(usize),

    #[error("{0}")]
    Other(String),
}

/// Image operations the exporters and the project loader depend on.
pub trait ImageProcessor {
    /// Decode a source file into an indexed image.
    fn decode(&self, path: &Path) -> Result<SimpleImage, DecodeError>;

    /// Copy a rectangle out of `image`.
    fn crop(&self, image: &SimpleImage, x: u16, y: u16, width: u16, height: u16) -> SimpleImage;

    /// Reduce `image` to `depth` bits per pixel. Deterministic for a given
    /// image and depth.
    fn quantize(&self, image: &SimpleImage, depth: BitDepth, background_index: u8) -> SimpleImage;

    /// Convert an indexed image into a planar shape record.
    fn to_planar(&self, image: &SimpleImage) -> Result<PlanarShape, ShapeError> {
        PlanarShape::from_image(image)
    }
}

/// [`ImageProcessor`] backed by the `image` crate.
///
/// Decoded images are indexed by exact colour in first-seen order, so
/// sources must be palette art of at most 256 colours. Palette reduction
/// keeps the first `2^depth` entries and maps every other index to the
/// background index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateProcessor;

impl ImageProcessor for ImageCrateProcessor {
    fn decode(&self, path: &Path) -> Result<SimpleImage, DecodeError> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut palette: Vec<[u8; 3]> = Vec::new();
        let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
        let mut pixels = Vec::with_capacity(width as usize * height as usize);

        for pixel in rgb.pixels() {
            let colour = pixel.0;
            let index = match lookup.get(&colour) {
                Some(&index) => index,
                None => {
                    let index = u8::try_from(palette.len())
                        .map_err(|_| DecodeError::TooManyColors(count_colours(&rgb)))?;
                    palette.push(colour);
                    lookup.insert(colour, index);
                    index
                }
            };
            pixels.push(index);
        }

        log::debug!(
            "Decoded {} ({}x{}, {} colours)",
            path.display(),
            width,
            height,
            palette.len()
        );
        Ok(SimpleImage::new(width, height, palette, pixels))
    }

    fn crop(&self, image: &SimpleImage, x: u16, y: u16, width: u16, height: u16) -> SimpleImage {
        let (x, y) = (u32::from(x), u32::from(y));
        let (width, height) = (u32::from(width), u32::from(height));

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in y..y + height {
            for column in x..x + width {
                pixels.push(image.index_at(column, row));
            }
        }

        SimpleImage {
            width,
            height,
            depth: image.depth,
            palette: image.palette.clone(),
            pixels,
        }
    }

    fn quantize(&self, image: &SimpleImage, depth: BitDepth, background_index: u8) -> SimpleImage {
        let colors = depth.colors();
        let background = if usize::from(background_index) < colors {
            background_index
        } else {
            0
        };

        let mut palette = image.palette.clone();
        palette.truncate(colors);
        let pixels = image
            .pixels
            .iter()
            .map(|&index| if usize::from(index) < colors { index } else { background })
            .collect();

        SimpleImage {
            width: image.width,
            height: image.height,
            depth,
            palette,
            pixels,
        }
    }
}

fn count_colours(rgb: &image::RgbImage) -> usize {
    let mut seen = std::collections::HashSet::new();
    for pixel in rgb.pixels() {
        seen.insert(pixel.0);
    }
    seen.len()
}
