// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project data serialization and deserialization.
//!
//! A project document is an array of containers, each with its source image
//! path and ordered shapes. JSON is the default; `.yaml`/`.yml` paths are
//! written and read as YAML with the same structure. Pixel data and display
//! textures are never stored; they are rebuilt from the source images on
//! load.

use crate::error::{Result, ShapeError};
use crate::io::media::ImageProcessor;
use crate::io::write_atomic;
use crate::models::project::Project;
use crate::models::shape::Shape;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted form of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerDocument {
    pub image_file: PathBuf,
    pub shapes: Vec<Shape>,
}

/// Text encoding of a project document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Persisted fields of every container, in project order.
pub fn to_documents(project: &Project) -> Vec<ContainerDocument> {
    project
        .containers()
        .iter()
        .map(|container| ContainerDocument {
            image_file: container.image_file.clone(),
            shapes: container.shapes.clone(),
        })
        .collect()
}

/// Render a project document.
pub fn to_string(documents: &[ContainerDocument], format: DocumentFormat) -> Result<String, String> {
    match format {
        DocumentFormat::Json => serde_json::to_string_pretty(documents).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::to_string(documents).map_err(|e| e.to_string()),
    }
}

/// Parse a project document.
pub fn from_str(text: &str, format: DocumentFormat) -> Result<Vec<ContainerDocument>, String> {
    from_slice(text.as_bytes(), format)
}

/// Parse a project document from raw file bytes. Invalid UTF-8 is a parse error.
pub fn from_slice(bytes: &[u8], format: DocumentFormat) -> Result<Vec<ContainerDocument>, String> {
    match format {
        DocumentFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
    }
}

/// Save the persisted fields of `project` to `path`.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let documents = to_documents(project);
    let text = to_string(&documents, DocumentFormat::from_path(path))
        .map_err(|e| ShapeError::io(path, std::io::Error::other(e)))?;
    write_atomic(path, text.as_bytes())?;

    log::info!("Saved {} containers to {}", documents.len(), path.display());
    Ok(())
}

/// Read a project document without touching any image.
pub fn read_documents(path: &Path) -> Result<Vec<ContainerDocument>> {
    if !path.exists() {
        return Err(ShapeError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| ShapeError::io(path, e))?;
    from_slice(&bytes, DocumentFormat::from_path(path)).map_err(|e| ShapeError::corrupt(path, e))
}

/// Load a project, decoding every referenced image relative to `root`.
///
/// Any missing or undecodable image fails the whole load.
pub fn load_project<P>(path: &Path, root: &Path, imaging: &P) -> Result<Project>
where
    P: ImageProcessor + ?Sized,
{
    let documents = read_documents(path)?;

    let mut project = Project::new();
    for document in documents {
        let source = root.join(&document.image_file);
        if !source.exists() {
            return Err(ShapeError::NotFound { path: source });
        }
        let image = imaging
            .decode(&source)
            .map_err(|e| ShapeError::DecodeFailure {
                path: source.clone(),
                source: e,
            })?;
        project.push_container(document.image_file, document.shapes, Some(image));
    }

    log::info!(
        "Loaded {} containers ({} shapes) from {}",
        project.len(),
        project.shape_count(),
        path.display()
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_json_layout() {
        let mut project = Project::new();
        project.push_container("sprite.png", vec![Shape::new(0, 0, 16, 16)], None);

        let text = to_string(&to_documents(&project), DocumentFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {
                    "image_file": "sprite.png",
                    "shapes": [{ "x": 0, "y": 0, "width": 16, "height": 16 }]
                }
            ])
        );
    }

    #[test]
    fn test_sparse_document_uses_defaults() {
        let documents = from_str(r#"[{"image_file": "a.png"}, {"shapes": [{"x": 4}]}, {}]"#, DocumentFormat::Json)
            .unwrap();
        assert_eq!(documents.len(), 3);
        assert!(documents[0].shapes.is_empty());
        assert_eq!(documents[1].image_file, PathBuf::new());
        assert_eq!(documents[1].shapes, vec![Shape::new(4, 0, 0, 0)]);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let documents = vec![ContainerDocument {
            image_file: PathBuf::from("art/hero.png"),
            shapes: vec![Shape::new(1, 2, 3, 4), Shape::new(5, 6, 7, 8)],
        }];
        let text = to_string(&documents, DocumentFormat::Yaml).unwrap();
        assert_eq!(from_str(&text, DocumentFormat::Yaml).unwrap(), documents);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("p.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("p.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("p.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("p")), DocumentFormat::Json);
    }

    #[test]
    fn test_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(read_documents(&missing).unwrap_err().kind(), ErrorKind::NotFound);

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[{\"image_file\": ").unwrap();
        assert_eq!(read_documents(&broken).unwrap_err().kind(), ErrorKind::Corrupt);

        let wrong_shape = dir.path().join("object.json");
        std::fs::write(&wrong_shape, r#"{"image_file": "a.png"}"#).unwrap();
        assert_eq!(read_documents(&wrong_shape).unwrap_err().kind(), ErrorKind::Corrupt);

        let not_utf8 = dir.path().join("binary.json");
        std::fs::write(&not_utf8, [0xff, 0xfe, b'[', b']']).unwrap();
        assert_eq!(read_documents(&not_utf8).unwrap_err().kind(), ErrorKind::Corrupt);

        let not_utf8_yaml = dir.path().join("binary.yaml");
        std::fs::write(&not_utf8_yaml, [0xff, 0xfe, b'[', b']']).unwrap();
        assert_eq!(read_documents(&not_utf8_yaml).unwrap_err().kind(), ErrorKind::Corrupt);
    }
}
