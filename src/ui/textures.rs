// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Display textures for source images.
//!
//! Textures belong to the rendering backend, not to the project: they are
//! kept in a side table keyed by container id and rebuilt from pixel data
//! whenever that data changes. Nothing here is ever persisted.

use crate::models::image::SimpleImage;
use crate::models::project::{ContainerId, Project};
use std::collections::HashMap;

/// Uploads pixel data to the display backend.
pub trait TextureUploader {
    type Handle;

    fn upload(&mut self, name: &str, image: &SimpleImage) -> Self::Handle;
}

/// Uploader for sessions without a display.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl TextureUploader for Headless {
    type Handle = ();

    fn upload(&mut self, _name: &str, _image: &SimpleImage) -> Self::Handle {}
}

/// Display handles per container.
#[derive(Debug)]
pub struct DisplayHandles<H> {
    handles: HashMap<ContainerId, H>,
}

impl<H> Default for DisplayHandles<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> DisplayHandles<H> {
    pub fn get(&self, id: ContainerId) -> Option<&H> {
        self.handles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Upload (or re-upload) one container's image.
    pub fn refresh<U>(&mut self, id: ContainerId, name: &str, image: &SimpleImage, uploader: &mut U)
    where
        U: TextureUploader<Handle = H>,
    {
        self.handles.insert(id, uploader.upload(name, image));
    }

    /// Replace every handle with a fresh upload of `project`'s images.
    pub fn rebuild<U>(project: &Project, uploader: &mut U) -> Self
    where
        U: TextureUploader<Handle = H>,
    {
        let mut handles = Self::default();
        for container in project.containers() {
            if let Some(image) = &container.image {
                handles.refresh(container.id(), &container.name(), image, uploader);
            }
        }
        handles
    }

    /// Drop handles whose container is gone.
    pub fn retain_live(&mut self, project: &Project) {
        self.handles.retain(|id, _| project.find(*id).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out sequential handle numbers and remembers what it saw.
    #[derive(Default)]
    struct CountingUploader {
        uploads: Vec<String>,
    }

    impl TextureUploader for CountingUploader {
        type Handle = usize;

        fn upload(&mut self, name: &str, _image: &SimpleImage) -> usize {
            self.uploads.push(name.to_string());
            self.uploads.len()
        }
    }

    fn pixel() -> SimpleImage {
        SimpleImage::new(1, 1, vec![[0, 0, 0]], vec![0])
    }

    #[test]
    fn test_rebuild_skips_containers_without_pixels() {
        let mut project = Project::new();
        let a = project.push_container("a.png", Vec::new(), Some(pixel()));
        let b = project.push_container("b.png", Vec::new(), None);

        let mut uploader = CountingUploader::default();
        let handles = DisplayHandles::rebuild(&project, &mut uploader);
        assert_eq!(handles.get(a), Some(&1));
        assert_eq!(handles.get(b), None);
        assert_eq!(uploader.uploads, vec!["a"]);
    }

    #[test]
    fn test_retain_live_drops_removed_containers() {
        let mut project = Project::new();
        project.push_container("a.png", Vec::new(), Some(pixel()));
        let b = project.push_container("b.png", Vec::new(), Some(pixel()));

        let mut uploader = CountingUploader::default();
        let mut handles = DisplayHandles::rebuild(&project, &mut uploader);
        project.remove_container(0);
        handles.retain_live(&project);

        assert_eq!(handles.len(), 1);
        assert_eq!(handles.get(b), Some(&2));
    }
}
