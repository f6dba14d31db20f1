//! 预设存储的集成测试，覆盖保存、列出、加载、导入与并发写入。

use std::sync::Arc;
use std::thread;

use tempfile::tempdir;

use ass_processor::{PresetError, PresetKind, PresetStore, SubtitleStyle};

fn store_in(dir: &tempfile::TempDir) -> PresetStore {
    PresetStore::new(dir.path())
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let mut style = SubtitleStyle::default();
    style.font_size_percent = 9.5;
    style.italic = true;

    let saved = store
        .save("alice", PresetKind::Podcast, "夜配信", &style)
        .unwrap();
    assert_eq!(saved.file_name, "夜配信.json");
    assert!(saved.path.is_file());

    let loaded = store
        .load("alice", &saved.file_name, PresetKind::Podcast)
        .unwrap();
    assert_eq!(loaded, style);
}

#[test]
fn test_save_rejects_invalid_settings_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let mut style = SubtitleStyle::default();
    style.speed = 9.0;

    let result = store.save("alice", PresetKind::Podcast, "bad", &style);
    match result {
        Err(PresetError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("speed"));
        }
        other => panic!("期待校验错误，实际为 {other:?}"),
    }
    assert!(store.list("alice", PresetKind::Podcast).unwrap().is_empty());
}

#[test]
fn test_duplicate_names_never_overwrite() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let style = SubtitleStyle::default();

    let first = store.save("alice", PresetKind::Podcast, "t", &style).unwrap();
    let second = store.save("alice", PresetKind::Podcast, "t", &style).unwrap();
    assert_eq!(first.file_name, "t.json");
    assert_eq!(second.file_name, "t(1).json");

    let names = store.list("alice", PresetKind::Podcast).unwrap();
    assert_eq!(names, vec!["t(1).json".to_string(), "t.json".to_string()]);
}

#[test]
fn test_list_empty_namespace_is_not_an_error() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.list("nobody", PresetKind::Subtitler).unwrap().is_empty());
}

#[test]
fn test_namespaces_are_isolated() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let style = SubtitleStyle::default();
    store.save("alice", PresetKind::Podcast, "a", &style).unwrap();
    store.save("alice", PresetKind::Subtitler, "b", &style).unwrap();
    store.save("bob", PresetKind::Podcast, "c", &style).unwrap();

    assert_eq!(store.list("alice", PresetKind::Podcast).unwrap(), ["a.json"]);
    assert_eq!(store.list("alice", PresetKind::Subtitler).unwrap(), ["b.json"]);
    assert_eq!(store.list("bob", PresetKind::Podcast).unwrap(), ["c.json"]);
}

#[test]
fn test_load_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let result = store.load("alice", "ghost.json", PresetKind::Podcast);
    assert!(matches!(result, Err(PresetError::NotFound(name)) if name == "ghost.json"));
}

#[test]
fn test_load_rejects_kind_mismatch() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let saved = store
        .save("alice", PresetKind::Podcast, "p", &SubtitleStyle::default())
        .unwrap();

    // 把 podcast 文档挪进 subtitler 目录，模拟手工搬动过的文件
    let subtitler_dir = saved
        .path
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("subtitler");
    std::fs::create_dir_all(&subtitler_dir).unwrap();
    std::fs::copy(&saved.path, subtitler_dir.join("p.json")).unwrap();

    let result = store.load("alice", "p.json", PresetKind::Subtitler);
    assert!(matches!(
        result,
        Err(PresetError::KindMismatch {
            expected: PresetKind::Subtitler,
            found: PresetKind::Podcast,
        })
    ));
}

#[test]
fn test_load_revalidates_tampered_file() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let saved = store
        .save("alice", PresetKind::Podcast, "p", &SubtitleStyle::default())
        .unwrap();

    let content = std::fs::read_to_string(&saved.path).unwrap();
    let mut document: serde_json::Value = serde_json::from_str(&content).unwrap();
    document["settings"]["font_size_percent"] = serde_json::json!(999);
    std::fs::write(&saved.path, serde_json::to_string(&document).unwrap()).unwrap();

    let result = store.load("alice", "p.json", PresetKind::Podcast);
    match result {
        Err(PresetError::Validation(errors)) => {
            assert!(errors[0].contains("font_size_percent"));
        }
        other => panic!("期待校验错误，实际为 {other:?}"),
    }
}

#[test]
fn test_import_valid_document() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let settings = serde_json::to_value(SubtitleStyle::default()).unwrap();
    let payload = serde_json::json!({
        "kind": "podcast",
        "name": "shared",
        "settings": settings,
    });

    let saved = store
        .import_from_str(&payload.to_string(), "alice", PresetKind::Podcast, "fallback")
        .unwrap();
    assert_eq!(saved.file_name, "shared.json");
    let loaded = store.load("alice", "shared.json", PresetKind::Podcast).unwrap();
    assert_eq!(loaded, SubtitleStyle::default());
}

#[test]
fn test_import_uses_fallback_name_when_name_missing_or_blank() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let settings = serde_json::to_value(SubtitleStyle::default()).unwrap();

    let without_name = serde_json::json!({ "kind": "podcast", "settings": settings });
    let blank_name = serde_json::json!({
        "kind": "podcast",
        "name": "   ",
        "settings": settings,
    });

    let first = store
        .import_from_str(&without_name.to_string(), "alice", PresetKind::Podcast, "imported")
        .unwrap();
    let second = store
        .import_from_str(&blank_name.to_string(), "alice", PresetKind::Podcast, "imported")
        .unwrap();
    assert_eq!(first.file_name, "imported.json");
    assert_eq!(second.file_name, "imported(1).json");
}

#[test]
fn test_import_reports_missing_keys() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    let result = store.import_from_str(r#"{"name": "x"}"#, "alice", PresetKind::Podcast, "f");
    assert!(matches!(result, Err(PresetError::MissingKeys(keys)) if keys == "kind, settings"));

    let result = store.import_from_str("[1, 2]", "alice", PresetKind::Podcast, "f");
    assert!(matches!(result, Err(PresetError::MissingKeys(_))));
}

#[test]
fn test_import_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let result = store.import_from_str("not json {", "alice", PresetKind::Podcast, "f");
    assert!(matches!(result, Err(PresetError::JsonParse { .. })));
}

#[test]
fn test_import_rejects_kind_mismatch() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let settings = serde_json::to_value(SubtitleStyle::default()).unwrap();
    let payload = serde_json::json!({ "kind": "podcast", "settings": settings });

    let result =
        store.import_from_str(&payload.to_string(), "alice", PresetKind::Subtitler, "f");
    assert!(matches!(result, Err(PresetError::KindMismatch { .. })));
    assert!(store.list("alice", PresetKind::Subtitler).unwrap().is_empty());
}

#[test]
fn test_import_invalid_settings_writes_nothing() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let mut settings = serde_json::to_value(SubtitleStyle::default()).unwrap();
    settings["alignment"] = serde_json::json!(42);
    let payload = serde_json::json!({ "kind": "podcast", "settings": settings });

    let result = store.import_from_str(&payload.to_string(), "alice", PresetKind::Podcast, "f");
    assert!(matches!(result, Err(PresetError::Validation(_))));
    assert!(store.list("alice", PresetKind::Podcast).unwrap().is_empty());
}

#[test]
fn test_concurrent_saves_with_same_name_all_survive() {
    let dir = tempdir().unwrap();
    let store = Arc::new(store_in(&dir));
    let style = SubtitleStyle::default();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let style = style.clone();
            thread::spawn(move || store.save("alice", PresetKind::Podcast, "racy", &style))
        })
        .collect();

    let mut file_names: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap().file_name)
        .collect();
    file_names.sort();
    file_names.dedup();
    assert_eq!(file_names.len(), 8, "并发保存必须各得其所，不得覆盖");
    assert_eq!(store.list("alice", PresetKind::Podcast).unwrap().len(), 8);
}
