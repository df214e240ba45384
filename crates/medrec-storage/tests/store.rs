use medrec_core::PatientFields;
use medrec_storage::{FsObjectStore, ObjectStore, RecordStore, SqliteRecordStore};
use time::macros::date;

fn sample_fields() -> PatientFields {
    PatientFields::parse("Jane", "Doe", "1984-03-07", "Annual checkup", "Dr. Grey").unwrap()
}

#[tokio::test]
async fn test_record_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteRecordStore::open(&dir.path().join("test.db"))
        .await
        .unwrap();

    // Insert without an image
    let id = store.insert(&sample_fields(), None).await.unwrap();
    assert!(id > 0);

    let patient = store.get(id).await.unwrap().unwrap();
    assert_eq!(patient.first_name, "Jane");
    assert_eq!(patient.birthday, date!(1984 - 03 - 07));
    assert_eq!(patient.image_identifier, None);

    // List sees it
    let all = store.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);

    // Update scalars and attach an identifier
    let mut fields = sample_fields();
    fields.primary_doctor = "Dr. Shepherd".to_string();
    let updated = store.update(id, &fields, Some("a1B2c3D4e5F6g7H8")).await.unwrap();
    assert!(updated);

    let patient = store.get(id).await.unwrap().unwrap();
    assert_eq!(patient.primary_doctor, "Dr. Shepherd");
    assert_eq!(patient.image_identifier.as_deref(), Some("a1B2c3D4e5F6g7H8"));

    // Delete
    assert!(store.delete(id).await.unwrap());
    assert!(store.get(id).await.unwrap().is_none());
    assert!(store.list().await.unwrap().is_empty());

    store.close().await;
}

#[tokio::test]
async fn test_ids_are_not_reused() {
    let store = SqliteRecordStore::open_in_memory().await.unwrap();

    let first = store.insert(&sample_fields(), None).await.unwrap();
    assert!(store.delete(first).await.unwrap());

    let second = store.insert(&sample_fields(), None).await.unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_update_and_delete_report_missing_rows() {
    let store = SqliteRecordStore::open_in_memory().await.unwrap();

    assert!(!store.update(42, &sample_fields(), None).await.unwrap());
    assert!(!store.delete(42).await.unwrap());
}

#[tokio::test]
async fn test_fs_object_store_put_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsObjectStore::new(dir.path().join("blobs")).unwrap();

    store
        .put("a1B2c3D4e5F6g7H8", "image/png", b"fake png".to_vec())
        .await
        .unwrap();
    assert!(store.exists("a1B2c3D4e5F6g7H8"));

    store.delete("a1B2c3D4e5F6g7H8").await.unwrap();
    assert!(!store.exists("a1B2c3D4e5F6g7H8"));

    // Deleting an absent key is a no-op
    store.delete("missing").await.unwrap();
}
