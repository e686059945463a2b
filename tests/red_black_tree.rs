use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use search_trees::RedBlackTree;

/// Nesting level of a rendered line, 1 for the root. A child line is indented
/// exactly four characters more than its parent.
fn depth(line: &str) -> usize {
    line.chars().take_while(|c| !c.is_ascii_digit()).count() / 4
}

#[test]
fn borrowed_lookups() {
    let mut tree: RedBlackTree<String, usize> = RedBlackTree::new();
    for word in ["splay", "treap", "scapegoat"] {
        tree.insert(word.to_string(), word.len());
    }

    assert_eq!(tree.get("treap"), Some(&5));
    assert!(tree.contains_key("splay"));
    assert!(!tree.contains_key("avl"));

    *tree.get_mut("scapegoat").unwrap() = 0;
    assert_eq!(tree.remove_entry("scapegoat"), Some(("scapegoat".to_string(), 0)));
    assert!(!tree.remove("scapegoat"));
    assert_eq!(tree.len(), 2);
}

#[test]
fn collects_and_debug_prints_in_order() {
    let tree: RedBlackTree<_, _> = [(3, 'c'), (1, 'a'), (2, 'b')].into();
    assert_eq!(format!("{tree:?}"), "{1: 'a', 2: 'b', 3: 'c'}");

    let collected: RedBlackTree<_, _> = (0..10).map(|key| (key, key * key)).collect();
    assert_eq!(collected.first_key_value(), Some((&0, &0)));
    assert_eq!(collected.last_key_value(), Some((&9, &81)));

    let empty: RedBlackTree<u8, u8> = RedBlackTree::default();
    assert_eq!(format!("{empty:?}"), "{}");
}

#[test]
fn zig_zag_insert_renders_balanced() {
    let mut tree = RedBlackTree::new();
    for key in [3, 1, 2] {
        tree.insert(key, ());
    }
    assert_eq!(tree.render().to_string(), "└── 2 B\n    ├── 1 B\n    └── 3 B");
    assert_eq!(tree.height(), 2);
}

#[test]
fn clear_resets_everything() {
    let mut tree: RedBlackTree<_, _> = (0..100).map(|key| (key, ())).collect();
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.minimum(), None);

    tree.insert(5, ());
    assert_eq!(tree.render().to_string(), "└── 5 B");
}

#[test]
fn descending_drain_keeps_remaining_keys() {
    let mut tree: RedBlackTree<_, _> = (0..500).map(|key| (key, key)).collect();
    for key in (0..500).rev() {
        assert_eq!(tree.remove_entry(&key), Some((key, key)));
        assert_eq!(tree.maximum().copied(), (key > 0).then(|| key - 1));
        assert_eq!(tree.minimum().copied(), (key > 0).then_some(0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The root is always rendered black and no red node has a red child.
    #[test]
    fn rendering_never_shows_red_red(keys in proptest::collection::vec(0u16..300, 0..300)) {
        let mut tree = RedBlackTree::new();
        for &key in &keys {
            if key % 3 == 0 {
                tree.remove(&(key / 3));
            } else {
                tree.insert(key, ());
            }
        }

        let lines: Vec<String> = tree.render().lines().collect();
        if let Some(root) = lines.first() {
            prop_assert!(root.ends_with(" B"));
        }
        let mut stack: Vec<bool> = Vec::new();
        for line in &lines {
            let level = depth(line);
            let red = line.ends_with(" R");
            stack.truncate(level - 1);
            if let Some(&parent_red) = stack.last() {
                prop_assert!(!(red && parent_red), "red-red at {}", line);
            }
            stack.push(red);
        }
    }

    #[test]
    fn debug_matches_btreemap(entries in proptest::collection::vec((any::<i8>(), any::<u8>()), 0..200)) {
        let tree: RedBlackTree<_, _> = entries.iter().copied().collect();
        let model: BTreeMap<_, _> = entries.iter().copied().collect();
        prop_assert_eq!(format!("{tree:?}"), format!("{model:?}"));
        prop_assert_eq!(tree.len(), model.len());
    }
}
