// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export configuration.
//!
//! Settings can be read from a YAML or JSON file; absent fields keep their
//! defaults (bit depth 4, background index 0).

use crate::error::{Result, ShapeError};
use crate::models::image::BitDepth;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the MPSH and batch exporters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Bits per pixel every region is reduced to.
    pub bit_depth: BitDepth,
    /// Palette index for pixels whose colour does not survive the reduction.
    pub background_index: u8,
}

impl ExportConfig {
    pub fn new(bit_depth: BitDepth) -> Self {
        Self {
            bit_depth,
            ..Self::default()
        }
    }

    /// Read settings from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShapeError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path).map_err(|e| ShapeError::io(path, e))?;

        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_slice(&bytes).map_err(|e| ShapeError::corrupt(path, e))
            }
            _ => serde_json::from_slice(&bytes).map_err(|e| ShapeError::corrupt(path, e)),
        }
    }
}
