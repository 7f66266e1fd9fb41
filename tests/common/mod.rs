#![allow(dead_code)]

use mpsh_shapes::io::media::ImageCrateProcessor;
use mpsh_shapes::{Project, Shape, ShapeEditor};
use mpsh_shapes::ui::textures::Headless;
use std::path::Path;

/// Sixteen grey levels, one per column modulo 16.
pub fn write_palette_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    image::RgbImage::from_fn(width, height, |x, y| {
        let level = ((x + y) % 16) as u8 * 16;
        image::Rgb([level, level, level])
    })
    .save(path)
    .expect("write png");
}

/// Editor rooted at `root` with one container per `(file, shapes)` pair.
pub fn editor_with(root: &Path, containers: &[(&str, Vec<Shape>)]) -> ShapeEditor<Headless> {
    let mut editor = ShapeEditor::new(root, Headless);
    for (file, shapes) in containers {
        let path = root.join(file);
        if !path.exists() {
            write_palette_png(&path, 64, 32);
        }
        editor
            .add_source_image(&path, &ImageCrateProcessor)
            .expect("add source image");
        let index = editor.project().len() - 1;
        for shape in shapes {
            editor.add_shape(index, *shape).expect("add shape");
        }
    }
    editor
}

pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().expect("four bytes"))
}

/// Persisted fields of a project, for comparisons that ignore pixel data.
pub fn persisted(project: &Project) -> Vec<(std::path::PathBuf, Vec<Shape>)> {
    project
        .containers()
        .iter()
        .map(|c| (c.image_file.clone(), c.shapes.clone()))
        .collect()
}
