use implreg_core::{
    decode_fragment, discover_fragments, implementors_root, render_fragment, replay_into,
    ImplementorsRegistry, LoaderError, MergedImplementors, PendingPolicy, SharedConsumer,
};
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(relative: &str) -> String {
    fs::read_to_string(fixtures_dir().join("implementors").join(relative)).unwrap()
}

#[test]
fn decodes_generated_error_fragment() {
    let contribution = decode_fragment(&read_fixture("core/error/trait.Error.js")).unwrap();

    let libraries: Vec<_> = contribution.libraries().map(|key| key.as_str()).collect();
    assert_eq!(libraries, vec!["radix_engine", "scrypto"]);
    assert_eq!(contribution.get("radix_engine").unwrap().len(), 2);
    assert_eq!(contribution.get("scrypto").unwrap().len(), 45);

    let first = contribution.get("radix_engine").unwrap()[0]
        .markup()
        .unwrap();
    assert!(first.starts_with("impl <a class=\"trait\""));
    assert!(first.contains("WasmError"));
}

#[test]
fn decodes_generated_display_fragment_with_empty_library() {
    let contribution = decode_fragment(&read_fixture("core/fmt/trait.Display.js")).unwrap();

    assert_eq!(contribution.len(), 3);
    assert_eq!(contribution.get("sbor"), Some(&[][..]));
    assert_eq!(contribution.get("radix_engine").unwrap().len(), 4);
    assert_eq!(contribution.get("scrypto").unwrap().len(), 82);
}

#[test]
fn rendering_decoded_fragment_reproduces_generator_output() {
    for relative in ["core/error/trait.Error.js", "core/fmt/trait.Display.js"] {
        let script = read_fixture(relative);
        let contribution = decode_fragment(&script).unwrap();
        assert_eq!(render_fragment(&contribution), script.trim_end(), "{relative}");
    }
}

#[test]
fn replays_docs_tree_into_late_consumer() {
    let root = implementors_root(&fixtures_dir());
    let files = discover_fragments(&root).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].trait_path, "core::error::Error");
    assert_eq!(files[1].trait_path, "core::fmt::Display");

    let merged = SharedConsumer::new(MergedImplementors::new());
    let mut registry = ImplementorsRegistry::with_policy(PendingPolicy::Buffered);
    let report = replay_into(&mut registry, &files);
    registry.install_consumer(merged.clone());

    assert!(report.is_clean());
    assert_eq!(report.registered, vec!["core::error::Error", "core::fmt::Display"]);
    merged.read(|view| {
        assert_eq!(view.contributions_seen(), 2);
        // Display was loaded last, so its lists win per library.
        assert_eq!(view.get("scrypto").unwrap().len(), 82);
        assert_eq!(view.get("sbor"), Some(&[][..]));
    });
}

#[test]
fn single_slot_replay_keeps_only_last_fragment_before_attach() {
    let files = discover_fragments(&implementors_root(&fixtures_dir())).unwrap();

    let merged = SharedConsumer::new(MergedImplementors::new());
    let mut registry = ImplementorsRegistry::new();
    replay_into(&mut registry, &files);
    registry.install_consumer(merged.clone());

    assert_eq!(merged.read(MergedImplementors::contributions_seen), 1);
    assert_eq!(merged.read(MergedImplementors::len), 3);
}

#[test]
fn malformed_fragment_is_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("core/fmt")).unwrap();
    fs::write(dir.path().join("core/fmt/trait.Debug.js"), "not a fragment").unwrap();
    fs::write(
        dir.path().join("core/fmt/trait.Display.js"),
        read_fixture("core/fmt/trait.Display.js"),
    )
    .unwrap();

    let files = discover_fragments(dir.path()).unwrap();
    let merged = SharedConsumer::new(MergedImplementors::new());
    let mut registry = ImplementorsRegistry::new();
    registry.install_consumer(merged.clone());
    let report = replay_into(&mut registry, &files);

    assert_eq!(report.registered, vec!["core::fmt::Display"]);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0], LoaderError::Fragment { .. }));
    assert_eq!(merged.read(MergedImplementors::len), 3);
}
