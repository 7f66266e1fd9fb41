// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project is an ordered list of shape containers, each holding one source
//! image and the shapes cut from it. Containers carry a stable id so that
//! side tables (display textures) and deferred edits survive reordering and
//! removals of other containers.

use super::image::SimpleImage;
use super::shape::Shape;
use std::path::PathBuf;

/// Stable identity of a container within one [`Project`].
///
/// Ids are never reused inside a project and are not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(u64);

/// One source image plus the shapes cut from it.
#[derive(Debug, Clone)]
pub struct ShapeContainer {
    id: ContainerId,
    /// Source image path, relative to the project root.
    pub image_file: PathBuf,
    /// Ordered shapes; the order is the export order.
    pub shapes: Vec<Shape>,
    /// Decoded pixels, attached by the image collaborator. Never persisted.
    pub image: Option<SimpleImage>,
}

impl ShapeContainer {
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Short display name: the source file stem.
    pub fn name(&self) -> String {
        self.image_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image_file.display().to_string())
    }
}

/// Location of a shape selected for export, in flattened export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRef {
    pub container: usize,
    pub index: usize,
    pub shape: Shape,
}

/// The complete, ordered project.
#[derive(Debug, Clone, Default)]
pub struct Project {
    containers: Vec<ShapeContainer>,
    next_id: u64,
}

impl Project {
    /// Create an empty project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a container and return its id.
    pub fn push_container(
        &mut self,
        image_file: impl Into<PathBuf>,
        shapes: Vec<Shape>,
        image: Option<SimpleImage>,
    ) -> ContainerId {
        let id = ContainerId(self.next_id);
        self.next_id += 1;
        self.containers.push(ShapeContainer {
            id,
            image_file: image_file.into(),
            shapes,
            image,
        });
        id
    }

    pub fn containers(&self) -> &[ShapeContainer] {
        &self.containers
    }

    pub fn container(&self, index: usize) -> Option<&ShapeContainer> {
        self.containers.get(index)
    }

    /// Current position of the container with the given id.
    pub fn position(&self, id: ContainerId) -> Option<usize> {
        self.containers.iter().position(|c| c.id == id)
    }

    pub fn find(&self, id: ContainerId) -> Option<&ShapeContainer> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Total number of shapes across all containers.
    pub fn shape_count(&self) -> usize {
        self.containers.iter().map(|c| c.shapes.len()).sum()
    }

    /// Remove a container. Out of range indices are ignored.
    pub fn remove_container(&mut self, index: usize) -> Option<ShapeContainer> {
        (index < self.containers.len()).then(|| self.containers.remove(index))
    }

    /// Append a shape to a container, returning the new shape's index.
    pub fn push_shape(&mut self, container: usize, shape: Shape) -> Option<usize> {
        let container = self.containers.get_mut(container)?;
        container.shapes.push(shape);
        Some(container.shapes.len() - 1)
    }

    /// Remove a shape by index. Out of range indices are ignored.
    pub fn remove_shape(&mut self, container: usize, shape: usize) -> Option<Shape> {
        let shapes = &mut self.containers.get_mut(container)?.shapes;
        (shape < shapes.len()).then(|| shapes.remove(shape))
    }

    /// Global label number of a shape: the shape counts of every earlier
    /// container plus the shape's own position.
    ///
    /// Display only; the export order is given by [`Project::flattened`].
    pub fn display_index(&self, container: usize, shape: usize) -> Option<usize> {
        let owner = self.containers.get(container)?;
        if shape >= owner.shapes.len() {
            return None;
        }
        let before: usize = self.containers[..container]
            .iter()
            .map(|c| c.shapes.len())
            .sum();
        Some(before + shape)
    }

    /// All shapes, container by container, each container's shapes in order.
    pub fn flattened(&self) -> impl Iterator<Item = ShapeRef> + '_ {
        self.containers
            .iter()
            .enumerate()
            .flat_map(|(container, c)| {
                c.shapes.iter().enumerate().map(move |(index, &shape)| ShapeRef {
                    container,
                    index,
                    shape,
                })
            })
    }
}

/// Removals requested while a container list is being traversed.
///
/// Marks are recorded by container id and applied once the traversal is
/// over: the container removal first, then the shape removal, which is
/// dropped if its container has just been removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingRemovals {
    container: Option<ContainerId>,
    shape: Option<(ContainerId, usize)>,
}

/// What [`PendingRemovals::apply`] actually removed.
#[derive(Debug, Default)]
pub struct AppliedRemovals {
    pub container: Option<ShapeContainer>,
    pub shape: Option<Shape>,
}

impl PendingRemovals {
    pub fn mark_container(&mut self, id: ContainerId) {
        self.container = Some(id);
    }

    pub fn mark_shape(&mut self, container: ContainerId, shape: usize) {
        self.shape = Some((container, shape));
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_none() && self.shape.is_none()
    }

    /// Apply and clear the pending removals.
    pub fn apply(&mut self, project: &mut Project) -> AppliedRemovals {
        let mut applied = AppliedRemovals::default();

        if let Some(id) = self.container.take() {
            if let Some(index) = project.position(id) {
                applied.container = project.remove_container(index);
            }
        }

        if let Some((id, shape)) = self.shape.take() {
            // Re-resolve against the current list
            if let Some(index) = project.position(id) {
                applied.shape = project.remove_shape(index, shape);
            }
        }

        applied
    }
}
