//! Property-based tests for bundle byte accounting.
//!
//! Applies arbitrary add/remove sequences and checks after every step that the
//! running total matches the item sizes, names stay unique, and the cap holds.

use std::collections::HashSet;

use proptest::prelude::*;
use secret_core::{Appearance, Bundle, BundleError, ItemKind, RawFile};

const CAP: u64 = 4096;

#[derive(Debug, Clone)]
enum Op {
    AddFiles(Vec<(String, usize)>),
    AddText { title: String, content: String, link: bool },
    Remove(String),
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop::collection::vec((name_strategy(), 0usize..1500), 1..4).prop_map(Op::AddFiles),
        2 => (name_strategy(), "[ a-z]{0,64}", any::<bool>())
            .prop_map(|(title, content, link)| Op::AddText { title, content, link }),
        2 => name_strategy().prop_map(Op::Remove),
    ]
}

fn check_invariants(bundle: &Bundle) -> Result<(), TestCaseError> {
    let sum: u64 = bundle.items().iter().map(|i| i.size()).sum();
    prop_assert_eq!(bundle.total_bytes(), sum);
    prop_assert!(bundle.total_bytes() <= CAP);

    let names: HashSet<&str> = bundle.items().iter().map(|i| i.name()).collect();
    prop_assert_eq!(names.len(), bundle.len());
    Ok(())
}

proptest! {
    #[test]
    fn prop_total_bytes_tracks_items(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut bundle = Bundle::new(CAP, Appearance::Dark);

        for op in ops {
            let before_total = bundle.total_bytes();
            let before_len = bundle.len();

            match op {
                Op::AddFiles(files) => {
                    let files: Vec<RawFile> = files
                        .into_iter()
                        .map(|(name, size)| RawFile::new(name, vec![0xAB; size]))
                        .collect();
                    if let Err(BundleError::SizeLimitExceeded { attempted, limit }) =
                        bundle.add_files(files)
                    {
                        prop_assert!(attempted > limit);
                        prop_assert_eq!(bundle.total_bytes(), before_total);
                        prop_assert_eq!(bundle.len(), before_len);
                    }
                },
                Op::AddText { title, content, link } => {
                    let kind = if link { ItemKind::Link } else { ItemKind::Text };
                    if bundle.add_text_or_link(kind, &title, &content).is_err() {
                        prop_assert_eq!(bundle.total_bytes(), before_total);
                        prop_assert_eq!(bundle.len(), before_len);
                    }
                },
                Op::Remove(name) => {
                    let existed = bundle.contains(&name);
                    prop_assert_eq!(bundle.remove(&name).is_ok(), existed);
                },
            }

            check_invariants(&bundle)?;
        }
    }

    #[test]
    fn prop_duplicate_name_never_overwrites(
        name in name_strategy(),
        first in prop::collection::vec(any::<u8>(), 1..64),
        second in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut bundle = Bundle::new(CAP, Appearance::Dark);
        bundle.add_files(vec![RawFile::new(name.clone(), first.clone())]).unwrap();

        let report = bundle.add_files(vec![RawFile::new(name.clone(), second)]).unwrap();

        prop_assert_eq!(report.skipped, vec![name.clone()]);
        prop_assert_eq!(bundle.get(&name).unwrap().payload(), first.as_slice());
    }
}

#[test]
fn oversized_batch_is_atomic() {
    let mut bundle = Bundle::new(100, Appearance::Dark);
    bundle.add_files(vec![RawFile::new("a", vec![0; 50])]).unwrap();

    let result = bundle.add_files(vec![
        RawFile::new("b", vec![0; 30]),
        RawFile::new("c", vec![0; 30]),
    ]);

    assert!(matches!(result, Err(BundleError::SizeLimitExceeded { attempted: 110, limit: 100 })));
    assert!(!bundle.contains("b"));
    assert!(!bundle.contains("c"));
    assert_eq!(bundle.total_bytes(), 50);
}

/// A text item titled like an existing file is rejected and the file survives.
#[test]
fn duplicate_text_title_keeps_existing_item() {
    let mut bundle = Bundle::new(1024, Appearance::Dark);
    bundle.add_files(vec![RawFile::new("notes", b"original".to_vec())]).unwrap();

    let err = bundle.add_text_or_link(ItemKind::Text, "notes", "replacement").unwrap_err();

    assert_eq!(err, BundleError::DuplicateName { name: "notes".to_string() });
    assert_eq!(bundle.len(), 1);
    assert_eq!(bundle.get("notes").unwrap().payload(), b"original");
    assert_eq!(bundle.get("notes").unwrap().kind(), ItemKind::File);
}
