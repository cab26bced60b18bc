#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use serial_test::serial;
use tempfile::TempDir;

fn temp_store() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::open(&dir.path().join("applytrack.db")).expect("open");
    (dir, store)
}

// --- db_path ---

/// Must run serially: mutates the global process environment.
#[test]
#[serial]
fn db_path_env_override() {
    let dir = TempDir::new().expect("tempdir");
    let custom = dir.path().join("custom.db");
    // SAFETY: test-only env mutation; #[serial] prevents races with other tests.
    unsafe {
        std::env::set_var("APPLYTRACK_DB_PATH", custom.to_str().expect("str"));
    }
    let result = db_path();
    unsafe {
        std::env::remove_var("APPLYTRACK_DB_PATH");
    }
    assert_eq!(result, Some(custom));
}

// --- SqliteStore ---

#[test]
fn open_creates_dir_and_schema() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("sub").join("applytrack.db");
    let store = SqliteStore::open(&path).expect("open");
    let count: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0))
        .expect("query");
    assert_eq!(count, 0);
    assert!(path.exists());
}

#[test]
fn open_idempotent() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("applytrack.db");
    SqliteStore::open(&path).expect("first open");
    SqliteStore::open(&path).expect("second open — must not error");
}

#[test]
fn sqlite_get_missing_key_is_none() {
    let (_dir, store) = temp_store();
    assert_eq!(store.get("nope").expect("get"), None);
}

#[test]
fn sqlite_set_then_get() {
    let (_dir, mut store) = temp_store();
    store.set(HISTORY_KEY, "[]").expect("set");
    assert_eq!(store.get(HISTORY_KEY).expect("get").as_deref(), Some("[]"));
}

#[test]
fn sqlite_set_overwrites() {
    let (_dir, mut store) = temp_store();
    store.set(RESUME_KEY, "{\"a\":1}").expect("set");
    store.set(RESUME_KEY, "{\"a\":2}").expect("set again");
    assert_eq!(
        store.get(RESUME_KEY).expect("get").as_deref(),
        Some("{\"a\":2}")
    );
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0))
        .expect("count");
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_remove_and_remove_missing() {
    let (_dir, mut store) = temp_store();
    store.set(JOB_RESULTS_KEY, "[]").expect("set");
    store.remove(JOB_RESULTS_KEY).expect("remove");
    store.remove(JOB_RESULTS_KEY).expect("remove missing — must not error");
    assert_eq!(store.get(JOB_RESULTS_KEY).expect("get"), None);
}

#[test]
fn sqlite_values_survive_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("applytrack.db");
    {
        let mut store = SqliteStore::open(&path).expect("open");
        store.set(HISTORY_KEY, "[{\"success\":true}]").expect("set");
    }
    let store = SqliteStore::open(&path).expect("reopen");
    assert_eq!(
        store.get(HISTORY_KEY).expect("get").as_deref(),
        Some("[{\"success\":true}]")
    );
}

// --- MemoryStore ---

#[test]
fn memory_store_roundtrip() {
    let mut store = MemoryStore::new();
    assert!(store.is_empty());
    store.set("k", "v").expect("set");
    assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
    assert_eq!(store.len(), 1);
    store.remove("k").expect("remove");
    assert!(store.is_empty());
}

#[test]
fn mut_ref_forwards_to_backend() {
    fn write_through<S: KeyValueStore>(mut backend: S) {
        backend.set("k", "v").expect("set through &mut");
    }

    let mut store = MemoryStore::new();
    write_through(&mut store);
    assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
}

// --- JSON documents ---

#[test]
fn json_document_round_trip() {
    let mut store = MemoryStore::new();
    let value: Option<Vec<u32>> = read_json(&store, "numbers").expect("read");
    assert_eq!(value, None);

    write_json(&mut store, "numbers", &[1u32, 2, 3][..]).expect("write");
    assert_eq!(store.get("numbers").expect("get").as_deref(), Some("[1,2,3]"));
    let value: Option<Vec<u32>> = read_json(&store, "numbers").expect("read");
    assert_eq!(value, Some(vec![1, 2, 3]));
}

#[test]
fn unparseable_document_names_the_key() {
    let mut store = MemoryStore::new();
    store.set("numbers", "[1,").expect("set");
    let err = read_json::<Vec<u32>>(&store, "numbers").expect_err("parse error");
    assert!(format!("{err:#}").contains("parse numbers"), "{err:#}");
}
