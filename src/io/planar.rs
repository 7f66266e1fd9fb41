// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Planar shape records.
//!
//! A planar shape is the bitmap layout used by the Blitz-era engine: the
//! image is split into one single-bit plane per colour bit, each plane made
//! of word-aligned rows, preceded by a 32-byte descriptor the engine's blit
//! routines read directly.
//!
//! Descriptor layout (all little-endian):
//!
//! | offset | field                                        |
//! |--------|----------------------------------------------|
//! | 0      | width, height, depth, ebwidth, blitsize (u16) |
//! | 10     | handle x, handle y (u16)                     |
//! | 14     | legacy data/cookie pointers (8 opaque bytes) |
//! | 22     | onebpmem, onebpmemx, allbpmem, allbpmemx (u16)|
//! | 30     | padding (u16)                                |

use crate::error::ShapeError;
use crate::models::image::SimpleImage;

/// Size of the fixed descriptor preceding the bitplane data.
pub const PLANAR_HEADER_LEN: usize = 32;

/// Runtime pointers the engine patched in at load time.
///
/// They carry no meaning on disk and are copied through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyPointers(pub [u8; 8]);

/// A shape converted to planar bitmap form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarShape {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    /// Bytes per row, rounded up to a whole 16-bit word.
    pub ebwidth: u16,
    /// Packed blitter size: height in the upper ten bits, row words below.
    pub blitsize: u16,
    pub handle_x: u16,
    pub handle_y: u16,
    pub legacy_pointers: LegacyPointers,
    pub onebpmem: u16,
    pub onebpmemx: u16,
    pub allbpmem: u16,
    pub allbpmemx: u16,
    pub padding: u16,
    /// Bitplanes, plane 0 first.
    pub data: Vec<u8>,
}

impl PlanarShape {
    /// Convert an indexed image into planar form at the image's own depth.
    ///
    /// The handle is always the top-left corner.
    pub fn from_image(image: &SimpleImage) -> Result<Self, ShapeError> {
        let width = u16::try_from(image.width).map_err(|_| ShapeError::Oversize)?;
        let height = u16::try_from(image.height).map_err(|_| ShapeError::Oversize)?;
        let depth = image.depth.get();

        let ebwidth = ((usize::from(width) + 15) / 16) * 2;
        let plane_len = ebwidth * usize::from(height);

        let mut data = vec![0u8; plane_len * usize::from(depth)];
        for y in 0..image.height {
            let row = y as usize * ebwidth;
            for x in 0..image.width {
                let index = image.index_at(x, y);
                let byte = row + x as usize / 8;
                let mask = 0x80u8 >> (x % 8);
                for plane in 0..usize::from(depth) {
                    if index & (1 << plane) != 0 {
                        data[plane * plane_len + byte] |= mask;
                    }
                }
            }
        }

        // The engine's descriptor fields are 16 bits wide and wrap for very large shapes
        let onebpmem = plane_len;
        let onebpmemx = (ebwidth + 2) * usize::from(height);
        Ok(Self {
            width,
            height,
            depth: u16::from(depth),
            ebwidth: ebwidth as u16,
            blitsize: ((usize::from(height) << 6) | (ebwidth / 2)) as u16,
            handle_x: 0,
            handle_y: 0,
            legacy_pointers: LegacyPointers::default(),
            onebpmem: onebpmem as u16,
            onebpmemx: onebpmemx as u16,
            allbpmem: (onebpmem * usize::from(depth)) as u16,
            allbpmemx: (onebpmemx * usize::from(depth)) as u16,
            padding: 0,
            data,
        })
    }

    /// Descriptor plus bitplane bytes.
    pub fn encoded_len(&self) -> usize {
        PLANAR_HEADER_LEN + self.data.len()
    }

    /// Append the descriptor and bitplanes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        for field in [
            self.width,
            self.height,
            self.depth,
            self.ebwidth,
            self.blitsize,
            self.handle_x,
            self.handle_y,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&self.legacy_pointers.0);
        for field in [
            self.onebpmem,
            self.onebpmemx,
            self.allbpmem,
            self.allbpmemx,
            self.padding,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&self.data);
    }

    /// Parse one record: a descriptor followed by everything else as bitplanes.
    pub fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < PLANAR_HEADER_LEN {
            return None;
        }
        let word = |offset: usize| u16::from_le_bytes([bytes[offset], bytes[offset + 1]]);
        let mut pointers = [0u8; 8];
        pointers.copy_from_slice(&bytes[14..22]);

        Some(Self {
            width: word(0),
            height: word(2),
            depth: word(4),
            ebwidth: word(6),
            blitsize: word(8),
            handle_x: word(10),
            handle_y: word(12),
            legacy_pointers: LegacyPointers(pointers),
            onebpmem: word(22),
            onebpmemx: word(24),
            allbpmem: word(26),
            allbpmemx: word(28),
            padding: word(30),
            data: bytes[PLANAR_HEADER_LEN..].to_vec(),
        })
    }
}
