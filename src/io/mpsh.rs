// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MPSH shape files.
//!
//! An MPSH file bundles every shape of a project as planar records behind a
//! manifest, so a loader can seek straight to any shape:
//!
//! ```text
//! header    "MPSH"  version: u32  count: u32
//! manifest  count x (offset: u32, size: u32)   offsets from file start
//! records   count x (32-byte descriptor + bitplanes), back to back
//! ```
//!
//! Everything is little-endian. Records follow the manifest with no gaps,
//! so the first offset is `12 + 8 * count` and the last record ends at the
//! end of the file.

use crate::config::ExportConfig;
use crate::error::{Result, ShapeError};
use crate::io::media::ImageProcessor;
use crate::io::planar::{PlanarShape, PLANAR_HEADER_LEN};
use crate::io::regions::{cut_regions, ExportReport};
use crate::io::write_atomic;
use crate::models::project::Project;
use std::path::Path;
use thiserror::Error;

pub const MAGIC: [u8; 4] = *b"MPSH";
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 12;
pub const MANIFEST_ENTRY_LEN: usize = 8;

/// Location of one record inside an MPSH file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestEntry {
    pub offset: u32,
    pub size: u32,
}

/// Structural problems found while reading an MPSH file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MpshFormatError {
    #[error("missing MPSH magic")]
    BadMagic,
    #[error("unsupported version {0}")]
    UnsupportedVersion(u32),
    #[error("file ends inside the header or manifest")]
    Truncated,
    #[error("record {index} is not where the manifest expects it")]
    Misplaced { index: usize },
    #[error("record {index} is smaller than a shape descriptor")]
    RecordTooSmall { index: usize },
    #[error("{0} unexpected bytes after the last record")]
    TrailingBytes(usize),
}

/// Encode planar records into a complete MPSH byte image.
pub fn encode(records: &[PlanarShape]) -> Result<Vec<u8>> {
    let count = u32::try_from(records.len()).map_err(|_| ShapeError::Oversize)?;
    let records_start = HEADER_LEN
        .checked_add(MANIFEST_ENTRY_LEN * records.len())
        .ok_or(ShapeError::Oversize)?;
    let mut offset = u32::try_from(records_start).map_err(|_| ShapeError::Oversize)?;

    let mut manifest = Vec::with_capacity(records.len());
    for record in records {
        let size = u32::try_from(record.encoded_len()).map_err(|_| ShapeError::Oversize)?;
        manifest.push(ManifestEntry { offset, size });
        offset = offset.checked_add(size).ok_or(ShapeError::Oversize)?;
    }

    let mut out = Vec::with_capacity(offset as usize);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());

    for entry in &manifest {
        log::debug!("MPSH record at {} ({} bytes)", entry.offset, entry.size);
        out.extend_from_slice(&entry.offset.to_le_bytes());
        out.extend_from_slice(&entry.size.to_le_bytes());
    }

    for record in records {
        record.write_to(&mut out);
    }

    debug_assert_eq!(out.len(), offset as usize);
    Ok(out)
}

/// Export every shape of `project` to an MPSH file at `path`.
///
/// The file is only replaced once the whole byte image has been built.
pub fn export_mpsh<P>(
    path: &Path,
    project: &Project,
    imaging: &P,
    config: &ExportConfig,
) -> Result<ExportReport>
where
    P: ImageProcessor + ?Sized,
{
    let cut = cut_regions(project, imaging, config)?;
    let records = cut
        .regions
        .iter()
        .map(|region| imaging.to_planar(&region.image))
        .collect::<Result<Vec<_>>>()?;

    let bytes = encode(&records)?;
    write_atomic(path, &bytes)?;

    log::info!(
        "Exported {} shapes at depth {} to {} ({} bytes)",
        records.len(),
        config.bit_depth,
        path.display(),
        bytes.len()
    );

    Ok(ExportReport {
        records: records.len(),
        bytes: bytes.len(),
        skipped: cut.skipped,
    })
}

/// A parsed view over MPSH bytes.
#[derive(Debug, Clone)]
pub struct MpshFile<'a> {
    bytes: &'a [u8],
    version: u32,
    manifest: Vec<ManifestEntry>,
}

impl<'a> MpshFile<'a> {
    /// Validate the header and manifest of `bytes`.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, MpshFormatError> {
        if bytes.len() < HEADER_LEN {
            return Err(if bytes.starts_with(&MAGIC) || MAGIC.starts_with(bytes) {
                MpshFormatError::Truncated
            } else {
                MpshFormatError::BadMagic
            });
        }
        if bytes[0..4] != MAGIC {
            return Err(MpshFormatError::BadMagic);
        }

        let read_u32 = |offset: usize| {
            u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        let version = read_u32(4);
        if version != VERSION {
            return Err(MpshFormatError::UnsupportedVersion(version));
        }

        let count = read_u32(8) as usize;
        let records_start = count
            .checked_mul(MANIFEST_ENTRY_LEN)
            .and_then(|len| len.checked_add(HEADER_LEN))
            .filter(|&end| end <= bytes.len())
            .ok_or(MpshFormatError::Truncated)?;

        let mut manifest = Vec::with_capacity(count);
        let mut expected = records_start;
        for index in 0..count {
            let at = HEADER_LEN + index * MANIFEST_ENTRY_LEN;
            let entry = ManifestEntry {
                offset: read_u32(at),
                size: read_u32(at + 4),
            };

            if entry.offset as usize != expected {
                return Err(MpshFormatError::Misplaced { index });
            }
            if (entry.size as usize) < PLANAR_HEADER_LEN {
                return Err(MpshFormatError::RecordTooSmall { index });
            }
            expected += entry.size as usize;
            if expected > bytes.len() {
                return Err(MpshFormatError::Misplaced { index });
            }
            manifest.push(entry);
        }

        if expected != bytes.len() {
            return Err(MpshFormatError::TrailingBytes(bytes.len() - expected));
        }

        Ok(Self {
            bytes,
            version,
            manifest,
        })
    }

    /// Like [`MpshFile::parse`], reporting damage as a corrupt `path`.
    pub fn parse_file(path: &Path, bytes: &'a [u8]) -> Result<Self> {
        Self::parse(bytes).map_err(|e| ShapeError::corrupt(path, e))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    pub fn manifest(&self) -> &[ManifestEntry] {
        &self.manifest
    }

    /// Raw bytes of record `index`.
    pub fn record_bytes(&self, index: usize) -> Option<&'a [u8]> {
        let entry = self.manifest.get(index)?;
        let start = entry.offset as usize;
        self.bytes.get(start..start + entry.size as usize)
    }

    /// Decoded record `index`.
    pub fn record(&self, index: usize) -> Option<PlanarShape> {
        PlanarShape::read_from(self.record_bytes(index)?)
    }
}

/// Read the raw bytes of an MPSH file.
///
/// Only checks that the file exists and can be read; hand the bytes to
/// [`MpshFile::parse_file`] to validate them.
pub fn read_mpsh(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(ShapeError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read(path).map_err(|e| ShapeError::io(path, e))
}
