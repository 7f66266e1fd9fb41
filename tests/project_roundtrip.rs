use mpsh_shapes::io::media::{DecodeError, ImageCrateProcessor, ImageProcessor};
use mpsh_shapes::io::serialization::{load_project, read_documents};
use mpsh_shapes::ui::textures::Headless;
use mpsh_shapes::{BitDepth, ErrorKind, Shape, ShapeEditor, SimpleImage};
use std::path::{Path, PathBuf};

mod common;
use common::{editor_with, persisted, write_palette_png};

#[test]
fn save_then_load_keeps_files_and_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let editor = editor_with(
        dir.path(),
        &[
            ("art/hero.png", vec![Shape::new(0, 0, 16, 16), Shape::new(16, 0, 16, 24)]),
            ("art/tiles.png", Vec::new()),
            ("fx.png", vec![Shape::new(2, 3, 4, 5)]),
        ],
    );

    for name in ["project.json", "project.yaml"] {
        let path = dir.path().join(name);
        editor.save(&path).unwrap();

        let mut reloaded = ShapeEditor::new(dir.path(), Headless);
        reloaded.load(&path, &ImageCrateProcessor).unwrap();
        assert_eq!(persisted(reloaded.project()), persisted(editor.project()));
        assert!(reloaded.project().containers().iter().all(|c| c.image.is_some()));
        assert_eq!(reloaded.textures().len(), 3);
    }
}

#[test]
fn saved_document_is_portable() {
    let dir = tempfile::tempdir().unwrap();
    let editor = editor_with(dir.path(), &[("art/hero.png", vec![Shape::new(1, 2, 3, 4)])]);
    let path = dir.path().join("project.json");
    editor.save(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {
                "image_file": "art/hero.png",
                "shapes": [{ "x": 1, "y": 2, "width": 3, "height": 4 }]
            }
        ])
    );

    // Moving the whole directory keeps the project loadable
    let moved = tempfile::tempdir().unwrap();
    std::fs::create_dir(moved.path().join("art")).unwrap();
    std::fs::copy(dir.path().join("art/hero.png"), moved.path().join("art/hero.png")).unwrap();
    std::fs::copy(&path, moved.path().join("project.json")).unwrap();

    let project = load_project(
        &moved.path().join("project.json"),
        moved.path(),
        &ImageCrateProcessor,
    )
    .unwrap();
    assert_eq!(project.container(0).unwrap().shapes, vec![Shape::new(1, 2, 3, 4)]);
}

#[test]
fn load_failures_are_classified() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let err = load_project(&root.join("missing.json"), root, &ImageCrateProcessor).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let corrupt = root.join("corrupt.json");
    std::fs::write(&corrupt, "not json").unwrap();
    let err = load_project(&corrupt, root, &ImageCrateProcessor).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Corrupt);

    let dangling = root.join("dangling.json");
    std::fs::write(&dangling, r#"[{"image_file": "gone.png"}]"#).unwrap();
    let err = load_project(&dangling, root, &ImageCrateProcessor).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    std::fs::write(root.join("garbage.png"), b"definitely not a png").unwrap();
    let undecodable = root.join("undecodable.json");
    std::fs::write(&undecodable, r#"[{"image_file": "garbage.png"}]"#).unwrap();
    let err = load_project(&undecodable, root, &ImageCrateProcessor).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailure);
}

#[test]
fn one_bad_image_aborts_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    write_palette_png(&dir.path().join("good.png"), 8, 8);
    std::fs::write(dir.path().join("bad.png"), b"nope").unwrap();

    let document = dir.path().join("project.json");
    std::fs::write(
        &document,
        r#"[{"image_file": "good.png"}, {"image_file": "bad.png"}, {"image_file": "good.png"}]"#,
    )
    .unwrap();

    let mut editor = editor_with(dir.path(), &[("good.png", vec![Shape::new(0, 0, 2, 2)])]);
    let before = persisted(editor.project());
    assert!(editor.load(&document, &ImageCrateProcessor).is_err());
    assert_eq!(persisted(editor.project()), before);
}

#[test]
fn sparse_documents_load() {
    let dir = tempfile::tempdir().unwrap();
    write_palette_png(&dir.path().join("a.png"), 8, 8);
    let document = dir.path().join("sparse.json");
    std::fs::write(&document, r#"[{"image_file": "a.png", "shapes": [{}, {"width": 3}]}]"#).unwrap();

    let documents = read_documents(&document).unwrap();
    assert_eq!(documents[0].shapes, vec![Shape::default(), Shape::new(0, 0, 3, 0)]);
}

/// Collaborator that decodes every path to the same tiny image and counts calls.
struct CountingDecoder {
    decodes: std::cell::Cell<usize>,
}

impl ImageProcessor for CountingDecoder {
    fn decode(&self, _path: &Path) -> Result<SimpleImage, DecodeError> {
        self.decodes.set(self.decodes.get() + 1);
        Ok(SimpleImage::new(2, 2, vec![[0, 0, 0], [9, 9, 9]], vec![0, 1, 1, 0]))
    }

    fn crop(&self, image: &SimpleImage, _x: u16, _y: u16, _w: u16, _h: u16) -> SimpleImage {
        image.clone()
    }

    fn quantize(&self, image: &SimpleImage, depth: BitDepth, _background: u8) -> SimpleImage {
        SimpleImage {
            depth,
            ..image.clone()
        }
    }
}

#[test]
fn each_container_is_decoded_once() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    let document = dir.path().join("project.json");
    std::fs::write(
        &document,
        r#"[{"image_file": "a.png"}, {"image_file": "b.png"}, {"image_file": "c.png"}]"#,
    )
    .unwrap();

    let decoder = CountingDecoder {
        decodes: std::cell::Cell::new(0),
    };
    let project = load_project(&document, dir.path(), &decoder).unwrap();
    assert_eq!(decoder.decodes.get(), 3);
    assert_eq!(project.container(2).unwrap().image_file, PathBuf::from("c.png"));
}
