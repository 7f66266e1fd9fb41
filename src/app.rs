// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shape editor session.
//!
//! This module contains the editor state a front end drives: the project,
//! the project root that source paths are relative to, the current
//! selection, removals requested while the container list is being drawn,
//! and the display textures. Load, save and export run to completion here;
//! a failed operation leaves the session as it was.

use crate::config::ExportConfig;
use crate::error::{Result, ShapeError};
use crate::io::batch::{self, BatchWriter};
use crate::io::media::ImageProcessor;
use crate::io::mpsh;
use crate::io::regions::ExportReport;
use crate::io::serialization;
use crate::models::project::{AppliedRemovals, ContainerId, PendingRemovals, Project};
use crate::models::shape::Shape;
use crate::ui::textures::{DisplayHandles, TextureUploader};
use crate::util::paths::relative_to;
use std::path::{Path, PathBuf};

/// Main editor state.
pub struct ShapeEditor<U: TextureUploader> {
    /// Directory source image paths are stored relative to
    root: PathBuf,

    /// Containers and their shapes
    project: Project,

    /// Container whose shapes are being edited
    selected: Option<ContainerId>,

    /// Removals requested during the current update
    pending: PendingRemovals,

    /// Settings used by both exporters
    config: ExportConfig,

    uploader: U,
    textures: DisplayHandles<U::Handle>,
}

impl<U: TextureUploader> ShapeEditor<U> {
    /// Create an empty session rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, uploader: U) -> Self {
        Self {
            root: root.into(),
            project: Project::new(),
            selected: None,
            pending: PendingRemovals::default(),
            config: ExportConfig::default(),
            uploader,
            textures: DisplayHandles::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Direct access for in-place field edits (shape coordinates).
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn textures(&self) -> &DisplayHandles<U::Handle> {
        &self.textures
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }

    /// Select the container at `index` for shape editing.
    pub fn select(&mut self, index: usize) -> Option<ContainerId> {
        self.selected = self.project.container(index).map(|c| c.id());
        self.selected
    }

    /// Current position of the selected container.
    pub fn selected_index(&self) -> Option<usize> {
        self.project.position(self.selected?)
    }

    /// Decode a source image and append it as a new container.
    ///
    /// The stored path is relative to the session root.
    pub fn add_source_image<P>(&mut self, file: &Path, imaging: &P) -> Result<ContainerId>
    where
        P: ImageProcessor + ?Sized,
    {
        if !file.exists() {
            return Err(ShapeError::NotFound {
                path: file.to_path_buf(),
            });
        }
        let image = imaging
            .decode(file)
            .map_err(|e| ShapeError::DecodeFailure {
                path: file.to_path_buf(),
                source: e,
            })?;

        let image_file = relative_to(file, &self.root);
        let id = self.project.push_container(image_file, Vec::new(), Some(image));
        if let Some(container) = self.project.find(id) {
            if let Some(image) = &container.image {
                self.textures
                    .refresh(id, &container.name(), image, &mut self.uploader);
            }
        }

        log::info!(
            "Added source image {}, total: {}",
            file.display(),
            self.project.len()
        );
        Ok(id)
    }

    /// Append a shape to the container at `container`.
    pub fn add_shape(&mut self, container: usize, shape: Shape) -> Option<usize> {
        let index = self.project.push_shape(container, shape)?;
        log::info!("Added shape {} to container {}", index, container);
        Some(index)
    }

    /// Request removal of a container; applied by [`Self::apply_removals`].
    pub fn mark_container_for_removal(&mut self, index: usize) {
        if let Some(container) = self.project.container(index) {
            self.pending.mark_container(container.id());
        }
    }

    /// Request removal of a shape; applied by [`Self::apply_removals`].
    pub fn mark_shape_for_removal(&mut self, container: usize, shape: usize) {
        if let Some(owner) = self.project.container(container) {
            self.pending.mark_shape(owner.id(), shape);
        }
    }

    /// Apply removals requested since the last call.
    pub fn apply_removals(&mut self) -> AppliedRemovals {
        let applied = self.pending.apply(&mut self.project);

        if let Some(container) = &applied.container {
            self.textures.retain_live(&self.project);
            if self.selected == Some(container.id()) {
                self.selected = None;
            }
            log::info!(
                "Removed container {}, total: {}",
                container.image_file.display(),
                self.project.len()
            );
        }
        if applied.shape.is_some() {
            log::info!("Removed shape, total: {}", self.project.shape_count());
        }

        applied
    }

    /// Labels for the shapes of one container, numbered across the project.
    pub fn shape_labels(&self, container: usize) -> Vec<String> {
        let count = self
            .project
            .container(container)
            .map_or(0, |c| c.shapes.len());
        (0..count)
            .filter_map(|shape| self.project.display_index(container, shape))
            .map(|index| format!("Shape {}", index))
            .collect()
    }

    /// Replace the session's project with the one stored at `path`.
    pub fn load<P>(&mut self, path: &Path, imaging: &P) -> Result<()>
    where
        P: ImageProcessor + ?Sized,
    {
        let project = serialization::load_project(path, &self.root, imaging)?;
        self.textures = DisplayHandles::rebuild(&project, &mut self.uploader);
        self.project = project;
        self.selected = None;
        self.pending = PendingRemovals::default();
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        serialization::save_project(&self.project, path)
    }

    pub fn export_mpsh<P>(&self, path: &Path, imaging: &P) -> Result<ExportReport>
    where
        P: ImageProcessor + ?Sized,
    {
        mpsh::export_mpsh(path, &self.project, imaging, &self.config)
    }

    pub fn export_batch<P, W>(&self, path: &Path, imaging: &P, writer: &W) -> Result<ExportReport>
    where
        P: ImageProcessor + ?Sized,
        W: BatchWriter + ?Sized,
    {
        batch::export_batch(path, &self.project, imaging, writer, &self.config)
    }
}
