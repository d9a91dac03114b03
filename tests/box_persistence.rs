use mockup::boxes::{default_box, get_box, nudge, AreaBox, BoxField, BoxOverrides, CANVAS_EXTENT};
use mockup::registry::PrintAreaKey;
use mockup::storage::{BoxOverrideStore, FileStore, KeyValueStore, BOX_OVERRIDES_STORAGE_KEY};

#[test]
fn test_width_nudges_never_leave_the_canvas() {
    let key = PrintAreaKey::FrontLeftChest;
    let mut overrides = BoxOverrides::new().with_defaults();
    let mut previous = get_box(key, &overrides);

    for _ in 0..200 {
        overrides = nudge(key, BoxField::Width, 0.5, &overrides);
        let current = get_box(key, &overrides);
        assert!(current.left + current.width <= CANVAS_EXTENT);
        if previous.right() == 0.0 {
            assert_eq!(current, previous);
        }
        previous = current;
    }
    assert_eq!(previous.left + previous.width, CANVAS_EXTENT);
}

#[test]
fn test_partial_blob_is_completed_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::new(dir.path());
    files
        .write(
            BOX_OVERRIDES_STORAGE_KEY,
            r#"{"front_left_chest": {"left": 50, "top": 25, "width": 20, "height": 18}}"#,
        )
        .unwrap();

    let loaded = BoxOverrideStore::new(files).load().unwrap();
    assert_eq!(loaded.len(), 8);
    assert_eq!(
        get_box(PrintAreaKey::FrontLeftChest, &loaded),
        AreaBox {
            left: 50.0,
            top: 25.0,
            width: 20.0,
            height: 18.0
        }
    );
    for key in PrintAreaKey::ALL {
        if key != PrintAreaKey::FrontLeftChest {
            assert_eq!(get_box(key, &loaded), default_box(key), "{}", key);
        }
    }
}

#[test]
fn test_nudges_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = BoxOverrideStore::new(FileStore::new(dir.path().join("boxes")));

    let overrides = nudge(
        PrintAreaKey::BackMid,
        BoxField::Top,
        -3.0,
        &store.load().unwrap(),
    );
    store.persist(&overrides).unwrap();
    assert!(dir
        .path()
        .join("boxes")
        .join(format!("{}.json", BOX_OVERRIDES_STORAGE_KEY))
        .exists());

    let reopened = BoxOverrideStore::new(FileStore::new(dir.path().join("boxes")));
    let reloaded = reopened.load().unwrap();
    assert_eq!(get_box(PrintAreaKey::BackMid, &reloaded).top, 35.0);
    assert_eq!(reloaded, overrides.with_defaults());

    reopened.reset().unwrap();
    assert_eq!(
        get_box(PrintAreaKey::BackMid, &reopened.load().unwrap()),
        default_box(PrintAreaKey::BackMid)
    );
}
