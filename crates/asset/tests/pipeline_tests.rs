//! End-to-end tests: files on disk through parser, assembler and image cache.

use std::{cell::RefCell, fs, path::Path, rc::Rc};

use asset::{
    AssetError, ImageCache, TextureStore, list_image_paths, load_mesh,
};

const WALL_OBJ: &str = r#"# exported wall
mtllib wall.mtl
o Wall
v -1.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 2.0 0.0
v -1.0 2.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl wall
s off
f 1/1/1 2/2/1 3/3/1 4/4/1
"#;

fn write_png(path: &Path, size: u32) {
    image::RgbaImage::from_fn(size, size, |x, _| image::Rgba([(x * 16) as u8, 0, 0, 255]))
        .save(path)
        .unwrap();
}

#[test]
fn wall_mesh_from_file_with_corners() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wall.obj");
    fs::write(&path, WALL_OBJ).unwrap();

    let (mesh, report) = load_mesh(&path, true).unwrap();
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.as_floats().len(), 48);

    let report = report.expect("corner report requested");
    assert!(report.is_complete());
    assert_eq!(report.min_u_min_v.unwrap().position, [-1.0, 0.0, 0.0]);
    // (0,1) only ties (0,0) on U, so the first vertex stays.
    assert_eq!(report.min_u_max_v.unwrap().position, [-1.0, 0.0, 0.0]);
    assert_eq!(report.max_u_min_v.unwrap().position, [1.0, 0.0, 0.0]);
    assert_eq!(report.max_u_max_v.unwrap().position, [1.0, 2.0, 0.0]);
}

#[test]
fn missing_mesh_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_mesh(dir.path().join("absent.obj"), false).unwrap_err();
    assert!(matches!(err, AssetError::MissingResource { .. }));
}

#[test]
fn bad_index_rejects_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\nf 1 2 4\n").unwrap();
    assert!(matches!(
        load_mesh(&path, false),
        Err(AssetError::Index { face: 1, .. })
    ));
}

#[test]
fn image_directory_drives_shared_store() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["002.png", "000.png", "001.png"] {
        write_png(&dir.path().join(name), 8);
    }

    let store = Rc::new(RefCell::new(TextureStore::new()));
    let paths = list_image_paths(dir.path()).unwrap();
    let mut cache = ImageCache::new(paths, Rc::clone(&store));

    cache.set_current_image(0);
    assert!(cache.loaded_image().ends_with("000.png"));
    let first = cache.texture().unwrap();
    assert_eq!(store.borrow().get(first).unwrap().width, 8);

    for frame in 1..6 {
        cache.set_current_image(frame);
        assert_eq!(store.borrow().resident_count(), 1);
    }
    assert!(cache.loaded_image().ends_with("002.png"));
    assert!(store.borrow().get(first).is_none());

    drop(cache);
    assert_eq!(store.borrow().resident_count(), 0);
}

#[test]
fn undecodable_image_degrades_to_no_texture() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("a.png"), 8);
    fs::write(dir.path().join("b.txt"), b"readme").unwrap();

    let mut cache = ImageCache::new(list_image_paths(dir.path()).unwrap(), TextureStore::new());
    cache.set_current_image(0);
    assert!(cache.texture().is_some());

    cache.set_current_image(1);
    assert!(cache.texture().is_none());
    assert_eq!(cache.loader().resident_count(), 0);
    assert!(cache.loaded_image().ends_with("b.txt"));

    cache.set_current_image(0);
    assert!(cache.texture().is_some());
}
