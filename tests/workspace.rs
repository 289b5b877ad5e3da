//! Integration tests for the transport-facing operations.

use std::fs;
use std::io::Read;
use std::path::Path;

use boxlabel::model::{Annotation, AnnotationSet, ImageIdentifier};
use boxlabel::store::LabelLayout;
use boxlabel::{BoxlabelError, Config, ErrorKind, Workspace};
use serde_json::json;

mod common;
use common::{touch, write_bmp};

fn workspace(root: &Path) -> Workspace {
    Workspace::new(Config::new(root.join("projects"))).expect("create workspace")
}

fn create_source(root: &Path) {
    write_bmp(&root.join("b.bmp"), 4, 4);
    write_bmp(&root.join("a.BMP"), 4, 4);
    write_bmp(&root.join("train/x.bmp"), 4, 4);
    write_bmp(&root.join("val/x.bmp"), 4, 4);
    touch(&root.join("notes.txt"));
}

fn boxes(class_id: u32) -> AnnotationSet {
    vec![
        Annotation::new(class_id, 0.5, 0.5, 0.2, 0.2),
        Annotation::new(class_id + 1, 0.1, 0.9, 0.05, 0.1),
    ]
    .into()
}

#[test]
fn set_dirs_counts_images_and_creates_dest() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("images");
    let dest = temp.path().join("out/labels");
    create_source(&source);

    let count = workspace(temp.path()).set_dirs(&source, &dest).expect("set dirs");
    assert_eq!(count, 4);
    assert!(dest.is_dir());
}

#[test]
fn set_dirs_rejects_missing_source() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let err = workspace(temp.path())
        .set_dirs(&temp.path().join("missing"), &temp.path().join("dest"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!temp.path().join("dest").exists());
}

#[test]
fn listing_then_annotating_each_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("images");
    let dest = temp.path().join("labels");
    create_source(&source);
    let ws = workspace(temp.path());

    let images = ws.list_images(&source).expect("list images");
    let names: Vec<&str> = images.iter().map(|id| id.as_str()).collect();
    assert_eq!(names, vec!["a.BMP", "b.bmp", "train/x.bmp", "val/x.bmp"]);

    ws.save_annotations(&source, &dest, &images[0], &boxes(0))
        .expect("save a");
    ws.save_annotations(&source, &dest, &images[1], &boxes(3))
        .expect("save b");

    assert_eq!(ws.load_annotations(&dest, &images[0]).expect("load a"), boxes(0));
    assert_eq!(ws.load_annotations(&dest, &images[1]).expect("load b"), boxes(3));
    assert!(ws
        .load_annotations(&dest, &images[2])
        .expect("load unsaved")
        .is_empty());

    assert_eq!(
        fs::read_to_string(dest.join("a.txt")).expect("read label"),
        "0 0.5 0.5 0.2 0.2\n1 0.1 0.9 0.05 0.1\n"
    );
}

#[test]
fn basename_layout_shares_label_file_between_directories() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("images");
    let dest = temp.path().join("labels");
    create_source(&source);
    let ws = workspace(temp.path());

    let train = ImageIdentifier::new("train/x.bmp");
    let val = ImageIdentifier::new("val/x.bmp");
    ws.save_annotations(&source, &dest, &train, &boxes(0))
        .expect("save train");
    ws.save_annotations(&source, &dest, &val, &boxes(5))
        .expect("save val");

    // Last writer wins on the shared x.txt.
    assert_eq!(ws.load_annotations(&dest, &train).expect("load"), boxes(5));
}

#[test]
fn mirrored_layout_keeps_directories_apart() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("images");
    let dest = temp.path().join("labels");
    create_source(&source);
    let ws = Workspace::new(
        Config::new(temp.path().join("projects")).with_label_layout(LabelLayout::Mirrored),
    )
    .expect("create workspace");

    let train = ImageIdentifier::new("train/x.bmp");
    let val = ImageIdentifier::new("val/x.bmp");
    ws.save_annotations(&source, &dest, &train, &boxes(0))
        .expect("save train");
    ws.save_annotations(&source, &dest, &val, &boxes(5))
        .expect("save val");

    assert_eq!(ws.load_annotations(&dest, &train).expect("load"), boxes(0));
    assert_eq!(ws.load_annotations(&dest, &val).expect("load"), boxes(5));
    assert!(dest.join("train/x.txt").is_file());
    assert!(dest.join("val/x.txt").is_file());
}

#[test]
fn save_annotations_requires_existing_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("images");
    let dest = temp.path().join("labels");
    create_source(&source);
    let ws = workspace(temp.path());

    let err = ws
        .save_annotations(&source, &dest, &ImageIdentifier::new("ghost.bmp"), &boxes(0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ws
        .save_annotations(
            &source,
            &dest,
            &ImageIdentifier::new("../../etc/passwd"),
            &boxes(0),
        )
        .unwrap_err();
    assert!(matches!(err, BoxlabelError::PathEscape { .. }));
    assert!(!dest.exists());
}

#[test]
fn load_annotations_reports_corrupt_labels() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let dest = temp.path().join("labels");
    fs::create_dir_all(&dest).expect("create dest");
    fs::write(dest.join("img.txt"), "0 0.1 0.1 0.1 0.1\nx 0.1 0.1 0.1 0.1\n").expect("write");

    let err = workspace(temp.path())
        .load_annotations(&dest, &ImageIdentifier::new("img.jpg"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptAnnotation);
}

#[test]
fn open_image_streams_original_bytes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("images");
    create_source(&source);

    let mut file = workspace(temp.path())
        .open_image(&source, &ImageIdentifier::new("train/x.bmp"))
        .expect("open image");
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).expect("read image");
    assert_eq!(bytes, common::bmp_bytes(4, 4));
}

#[test]
fn open_image_rejects_escape_and_missing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("images");
    create_source(&source);
    touch(&temp.path().join("secret.png"));
    let ws = workspace(temp.path());

    let err = ws
        .open_image(&source, &ImageIdentifier::new("../secret.png"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);

    let err = ws
        .open_image(&source, &ImageIdentifier::new("nope.png"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn sibling_directory_with_shared_prefix_is_rejected() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("img");
    create_source(&source);
    write_bmp(&temp.path().join("img2/leak.bmp"), 2, 2);

    let err = workspace(temp.path())
        .open_image(&source, &ImageIdentifier::new("../img2/leak.bmp"))
        .unwrap_err();
    assert!(matches!(err, BoxlabelError::PathEscape { .. }));
}

#[test]
fn projects_roundtrip_and_list() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let ws = workspace(temp.path());

    let payload = json!({
        "source_dir": "/data/images",
        "dest_dir": "/data/labels",
        "current": 3,
        "classes": ["cat", "dog"],
        "zoom": 1.25
    });
    let path = ws.save_project("demo", payload.clone()).expect("save");
    assert_eq!(path, temp.path().join("projects/demo.json"));
    ws.save_project("another", json!({"x": 1})).expect("save another");

    assert_eq!(ws.load_project("demo").expect("load"), payload);
    assert_eq!(ws.list_projects().expect("list"), vec!["another", "demo"]);

    ws.save_project("demo", json!([])).expect("overwrite");
    assert_eq!(ws.load_project("demo").expect("reload"), json!([]));
}

#[test]
fn project_errors_keep_their_kind() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let ws = workspace(temp.path());

    assert_eq!(
        ws.load_project("missing").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        ws.save_project("../escape", json!({})).unwrap_err().kind(),
        ErrorKind::InvalidPath
    );
    assert!(!temp.path().join("escape.json").exists());

    fs::create_dir_all(temp.path().join("projects")).expect("create projects dir");
    fs::write(temp.path().join("projects/bad.json"), "[1, 2").expect("write");
    assert_eq!(
        ws.load_project("bad").unwrap_err().kind(),
        ErrorKind::CorruptProject
    );
    // Unparsable content does not hide the name from the listing.
    assert_eq!(ws.list_projects().expect("list"), vec!["bad"]);
}
