// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Cutting export regions out of a project.
//!
//! Both exporters start from the same sequence: every shape of every
//! container, in container order and then shape order, cropped from its
//! container's palette-reduced image. Each container image is reduced once.

use crate::config::ExportConfig;
use crate::error::{Result, ShapeError};
use crate::io::media::ImageProcessor;
use crate::models::image::SimpleImage;
use crate::models::project::Project;
use crate::models::shape::Shape;

/// A cropped, palette-reduced shape ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub container: usize,
    pub index: usize,
    pub image: SimpleImage,
}

/// A shape left out of an export because it has no area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedShape {
    pub container: usize,
    pub index: usize,
    pub shape: Shape,
}

impl SkippedShape {
    pub fn to_error(&self) -> ShapeError {
        ShapeError::InvalidGeometry {
            container: self.container,
            shape: self.index,
            width: self.shape.width,
            height: self.shape.height,
        }
    }
}

/// Outcome of a completed export.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Number of shapes written.
    pub records: usize,
    /// Bytes written to disk.
    pub bytes: usize,
    pub skipped: Vec<SkippedShape>,
}

/// Regions in export order plus the shapes that were skipped.
#[derive(Debug, Clone, Default)]
pub struct RegionCut {
    pub regions: Vec<Region>,
    pub skipped: Vec<SkippedShape>,
}

/// Produce the export region sequence for `project`.
///
/// Zero-sized shapes are skipped with a warning. A container with
/// exportable shapes but no decoded image fails the whole cut.
pub fn cut_regions<P>(project: &Project, imaging: &P, config: &ExportConfig) -> Result<RegionCut>
where
    P: ImageProcessor + ?Sized,
{
    let mut cut = RegionCut::default();

    for (container_index, container) in project.containers().iter().enumerate() {
        let (exportable, empty): (Vec<_>, Vec<_>) = container
            .shapes
            .iter()
            .copied()
            .enumerate()
            .partition(|(_, shape)| shape.is_exportable());

        for (index, shape) in empty {
            let skipped = SkippedShape {
                container: container_index,
                index,
                shape,
            };
            log::warn!("Skipping shape: {}", skipped.to_error());
            cut.skipped.push(skipped);
        }

        if exportable.is_empty() {
            continue;
        }

        let image = container
            .image
            .as_ref()
            .ok_or_else(|| ShapeError::ImageNotLoaded {
                image_file: container.image_file.clone(),
            })?;
        let reduced = imaging.quantize(image, config.bit_depth, config.background_index);

        for (index, shape) in exportable {
            if !shape.fits_within(reduced.width, reduced.height) {
                log::debug!(
                    "Shape {} of {} extends past the image bounds",
                    index,
                    container.image_file.display()
                );
            }
            cut.regions.push(Region {
                container: container_index,
                index,
                image: imaging.crop(&reduced, shape.x, shape.y, shape.width, shape.height),
            });
        }
    }

    Ok(cut)
}
