// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Batch shape export.
//!
//! The batch exporter cuts the same region sequence as the MPSH exporter and
//! hands the images to a [`BatchWriter`], which owns the file format.

use crate::config::ExportConfig;
use crate::error::Result;
use crate::io::media::ImageProcessor;
use crate::io::planar::PlanarShape;
use crate::io::regions::{cut_regions, ExportReport};
use crate::io::write_atomic;
use crate::models::image::SimpleImage;
use crate::models::project::Project;
use std::path::Path;

/// Writes a list of shape images to a single file.
pub trait BatchWriter {
    /// Write `images` in order, returning the number of bytes written.
    fn write_batch(&self, path: &Path, images: &[SimpleImage]) -> Result<usize>;
}

/// Blitz shapes file: each shape's 32-byte descriptor followed by its
/// bitplanes, back to back, with no file header.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlitzShapesWriter;

impl BatchWriter for BlitzShapesWriter {
    fn write_batch(&self, path: &Path, images: &[SimpleImage]) -> Result<usize> {
        let mut bytes = Vec::new();
        for image in images {
            PlanarShape::from_image(image)?.write_to(&mut bytes);
        }
        write_atomic(path, &bytes)?;
        Ok(bytes.len())
    }
}

/// Export every shape of `project` through `writer`.
pub fn export_batch<P, W>(
    path: &Path,
    project: &Project,
    imaging: &P,
    writer: &W,
    config: &ExportConfig,
) -> Result<ExportReport>
where
    P: ImageProcessor + ?Sized,
    W: BatchWriter + ?Sized,
{
    let cut = cut_regions(project, imaging, config)?;
    let images: Vec<SimpleImage> = cut.regions.into_iter().map(|region| region.image).collect();

    let bytes = writer.write_batch(path, &images)?;
    log::info!(
        "Exported {} shapes at depth {} to {}",
        images.len(),
        config.bit_depth,
        path.display()
    );

    Ok(ExportReport {
        records: images.len(),
        bytes,
        skipped: cut.skipped,
    })
}
