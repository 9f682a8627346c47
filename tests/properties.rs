//! Property-based tests for convergence and idempotence

use foldsync::orchestrate::run_once;
use foldsync::snapshot::TreeSnapshot;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A generated tree: relative `/`-joined paths mapped to file content
type GenTree = BTreeMap<String, Vec<u8>>;

/// Strategy producing small valid trees: no generated file path may sit on
/// the directory prefix of another (a path cannot be both file and dir
/// within one tree).
fn tree_strategy() -> impl Strategy<Value = GenTree> {
    let path = prop::collection::vec("[a-z]{1,5}", 1..=3).prop_map(|segments| segments.join("/"));
    prop::collection::btree_map(path, prop::collection::vec(any::<u8>(), 0..128), 0..8)
        .prop_filter("file paths must not nest under each other", |tree| {
            tree.keys().all(|k| {
                let prefix = format!("{}/", k);
                !tree.keys().any(|other| other.starts_with(&prefix))
            })
        })
}

fn materialize(root: &Path, tree: &GenTree) {
    for (rel, content) in tree {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// One pass converges any replica toward any source; a second pass is a no-op
#[test]
fn test_convergence_property() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 24,
        ..Default::default()
    });

    runner
        .run(
            &(tree_strategy(), tree_strategy()),
            |(source_tree, replica_tree)| {
                let source = TempDir::new().unwrap();
                let replica = TempDir::new().unwrap();
                materialize(source.path(), &source_tree);
                materialize(replica.path(), &replica_tree);

                let first = run_once(source.path(), replica.path()).unwrap();
                prop_assert_eq!(first.failed(), 0);

                let source_snap = TreeSnapshot::take(source.path()).unwrap();
                let replica_snap = TreeSnapshot::take(replica.path()).unwrap();
                prop_assert_eq!(&source_snap.files, &replica_snap.files);
                prop_assert_eq!(&source_snap.dirs, &replica_snap.dirs);

                let second = run_once(source.path(), replica.path()).unwrap();
                prop_assert!(second.is_noop());

                Ok(())
            },
        )
        .unwrap();
}

/// Snapshots of identical trees are equal, regardless of which root they
/// were taken under
#[test]
fn test_snapshot_identity_property() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 24,
        ..Default::default()
    });

    runner
        .run(&tree_strategy(), |tree| {
            let left = TempDir::new().unwrap();
            let right = TempDir::new().unwrap();
            materialize(left.path(), &tree);
            materialize(right.path(), &tree);

            let left_snap = TreeSnapshot::take(left.path()).unwrap();
            let right_snap = TreeSnapshot::take(right.path()).unwrap();
            prop_assert_eq!(left_snap.files, right_snap.files);
            prop_assert_eq!(left_snap.dirs, right_snap.dirs);

            Ok(())
        })
        .unwrap();
}
