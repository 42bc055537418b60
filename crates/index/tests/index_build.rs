//! Index construction over fixture and on-disk trees.

use pretty_assertions::assert_eq;
use relmap_index::{ImportIndex, ImportIndexConfig};
use relmap_provider::{FsFileProvider, MemoryFileProvider};
use std::fs;

#[test]
fn duplicate_class_names_keep_both_paths() {
    let provider = MemoryFileProvider::new()
        .with_file("/src/models/User.ts", "export class User {}\n")
        .with_file("/src/admin/User.ts", "export class User {}\n");

    let index = ImportIndex::build(&provider, &ImportIndexConfig::default());
    let files = index.resolve("User");

    assert_eq!(files.len(), 2);
    assert!(files.contains(&"/src/models/User.ts".to_string()));
    assert!(files.contains(&"/src/admin/User.ts".to_string()));
}

#[test]
fn rebuild_preserves_membership_and_multiplicity() {
    let provider = MemoryFileProvider::new()
        .with_file("/src/a.ts", "export class Shared {}\n")
        .with_file("/src/b.ts", "export class Shared {}\nexport class Only {}\n");
    let config = ImportIndexConfig::default();

    let first = ImportIndex::build(&provider, &config);
    let second = ImportIndex::build(&provider, &config);

    assert_eq!(first.len(), second.len());
    assert_eq!(first.resolve("Shared"), second.resolve("Shared"));
    assert_eq!(first.resolve("Only"), second.resolve("Only"));
}

#[test]
fn builds_from_filesystem_provider() {
    let dir = tempfile::tempdir().unwrap();
    let models = dir.path().join("models");
    fs::create_dir_all(&models).unwrap();
    fs::write(models.join("user.ts"), "export class User {}\n").unwrap();
    fs::write(
        dir.path().join("report.py"),
        "class Report:\n    pass\n",
    )
    .unwrap();

    let provider = FsFileProvider::new(dir.path());
    let index = ImportIndex::build(&provider, &ImportIndexConfig::default());

    assert_eq!(index.resolve("User").len(), 1);
    assert_eq!(index.resolve("Report").len(), 1);
    assert_eq!(index.files_scanned(), 2);
}
