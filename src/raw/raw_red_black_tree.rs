use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use alloc::vec::Vec;
use smallvec::smallvec;

use super::arena::Arena;
use super::entry::Entry;
use super::handle::Handle;
use super::rb_node::{Color, RbNode, Side};
use crate::render::{Marker, Rendering, Shape};

/// The core red-black tree backing `RedBlackTree`.
///
/// Invariants, restored after every mutation:
/// 1. binary-search-tree order, no duplicate keys;
/// 2. the root is black;
/// 3. no red node has a red child;
/// 4. every path from the root to a missing child crosses the same number of
///    black nodes.
pub(crate) struct RawRedBlackTree<K, V> {
    /// One node per entry.
    nodes: Arena<RbNode<K, V>>,
    root: Option<Handle>,
}

impl<K, V> RawRedBlackTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    fn node(&self, handle: Handle) -> &RbNode<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut RbNode<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Missing children count as black.
    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|handle| self.node(handle).is_red())
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    /// Which side of `parent` the link to `child` is on. `child` may be a
    /// missing link, in which case the other side must be populated.
    fn side_of(&self, child: Option<Handle>, parent: Handle) -> Side {
        if self.node(parent).left == child { Side::Left } else { Side::Right }
    }

    /// Points whatever referenced `old` (its parent's link, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(Some(old), parent);
                self.node_mut(parent).set_child(side, new);
            }
        }
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
    }

    /// Rotates `pivot` down towards `side`; its child on the opposite side
    /// takes its place. In-order key sequence is unchanged.
    fn rotate(&mut self, pivot: Handle, side: Side) {
        let riser = self
            .node(pivot)
            .child(side.opposite())
            .expect("`RawRedBlackTree::rotate()` - no child on the rising side!");
        let inner = self.node(riser).child(side);

        self.node_mut(pivot).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(pivot);
        }

        let parent = self.node(pivot).parent;
        self.replace_child(parent, pivot, Some(riser));

        self.node_mut(riser).set_child(side, Some(pivot));
        self.node_mut(pivot).parent = Some(riser);
    }

    /// Follows `side` links from `handle` as far as they go.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.node(handle).child(side) {
            handle = child;
        }
        handle
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let first = self.extreme(self.root?, Side::Left);
        Some(self.node(first).entry.as_pair())
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let last = self.extreme(self.root?, Side::Right);
        Some(self.node(last).entry.as_pair())
    }

    /// Number of node levels on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut pending: Vec<(Handle, usize)> = self.root.into_iter().map(|root| (root, 1)).collect();
        while let Some((handle, depth)) = pending.pop() {
            height = height.max(depth);
            let node = self.node(handle);
            pending.extend(node.left.into_iter().chain(node.right).map(|child| (child, depth + 1)));
        }
        height
    }

    /// Entries in ascending key order.
    pub(crate) fn in_order(&self) -> Vec<(&K, &V)> {
        let mut entries = Vec::with_capacity(self.len());
        let mut spine = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(handle) = current {
                spine.push(handle);
                current = self.node(handle).left;
            }
            let Some(handle) = spine.pop() else {
                return entries;
            };
            let node = self.node(handle);
            entries.push(node.entry.as_pair());
            current = node.right;
        }
    }

    pub(crate) fn render(&self) -> Rendering<'_, K> {
        Rendering::new(self.root.map(|root| self.shape(root)))
    }

    fn shape(&self, handle: Handle) -> Shape<'_, K> {
        let node = self.node(handle);
        let marker = match node.color {
            Color::Red => Marker::Red,
            Color::Black => Marker::Black,
        };
        let children = node.left.into_iter().chain(node.right).map(|child| self.shape(child)).collect();
        Shape::new(smallvec![&node.entry.key], marker, children)
    }
}

impl<K: Ord, V> RawRedBlackTree<K, V> {
    /// Ordered descent from the root.
    fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(&self.node(handle).entry.value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(&mut self.node_mut(handle).entry.value)
    }

    /// Inserts a key-value pair, returning the previous value of an equal key.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut current) = self.root else {
            let root = self.nodes.alloc(RbNode::new(Entry::new(key, value), None));
            self.set_color(root, Color::Black);
            self.root = Some(root);
            return None;
        };

        let side = loop {
            let node = self.node(current);
            let side = match key.cmp(&node.entry.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    // Same key: overwrite in place, the shape does not change.
                    return Some(mem::replace(&mut self.node_mut(current).entry.value, value));
                }
            };
            match node.child(side) {
                Some(child) => current = child,
                None => break side,
            }
        };

        let leaf = self.nodes.alloc(RbNode::new(Entry::new(key, value), Some(current)));
        self.node_mut(current).set_child(side, Some(leaf));
        self.resolve_red_red(leaf);

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
        None
    }

    /// Removes red-red adjacencies from `node` upwards.
    ///
    /// Each step rotates the grandparent/parent/node triple so the middle key
    /// is on top (one rotation for a straight line, two for a zig-zag), makes
    /// the new top red with two black children, and re-checks one level up.
    /// A red root is left for the caller to blacken.
    fn resolve_red_red(&mut self, mut node: Handle) {
        loop {
            let Some(parent) = self.node(node).parent else {
                return;
            };
            if !(self.node(node).is_red() && self.node(parent).is_red()) {
                return;
            }
            let Some(grandparent) = self.node(parent).parent else {
                return;
            };

            let parent_side = self.side_of(Some(parent), grandparent);
            let top = if self.side_of(Some(node), parent) == parent_side {
                self.rotate(grandparent, parent_side.opposite());
                parent
            } else {
                self.rotate(parent, parent_side);
                self.rotate(grandparent, parent_side.opposite());
                node
            };
            trace_log!(zig_zag = (top == node), "resolved red-red violation");

            let (left, right) = {
                let top = self.node(top);
                (top.left, top.right)
            };
            for child in left.into_iter().chain(right) {
                self.set_color(child, Color::Black);
            }
            self.set_color(top, Color::Red);
            node = top;
        }
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let target = self.search(key)?;

        // A node with two children hands its removal down to its in-order
        // predecessor, which has no right child.
        let doomed = match (self.node(target).left, self.node(target).right) {
            (Some(left), Some(_)) => self.extreme(left, Side::Right),
            _ => target,
        };

        let (parent, child, color) = {
            let doomed = self.node(doomed);
            (doomed.parent, doomed.sole_child(), doomed.color)
        };
        self.replace_child(parent, doomed, child);
        let removed = self.nodes.free(doomed).entry;

        let entry = if doomed == target {
            removed
        } else {
            mem::replace(&mut self.node_mut(target).entry, removed)
        };

        if color == Color::Black {
            self.resolve_double_black(child, parent);
        }
        Some(entry.into_pair())
    }

    /// Repairs the black-height deficit left at `node` (possibly a missing
    /// link) under `parent` by a removed black node.
    fn resolve_double_black(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        loop {
            if self.is_red(node)
                && let Some(handle) = node
            {
                self.set_color(handle, Color::Black);
                return;
            }
            let Some(above) = parent else {
                // The deficit reached the root, where it is shared by every path.
                return;
            };

            let side = self.side_of(node, above);
            let sibling = self
                .node(above)
                .child(side.opposite())
                .expect("`RawRedBlackTree::resolve_double_black()` - deficient node has no sibling!");

            if self.node(sibling).is_red() {
                // Rotate the red sibling up; the deficient node gets a black
                // sibling and a red parent, and the same position is retried.
                trace_log!("double-black: red sibling rotated up");
                self.set_color(sibling, Color::Black);
                self.set_color(above, Color::Red);
                self.rotate(above, side);
                continue;
            }

            let far = self.node(sibling).child(side.opposite());
            let near = self.node(sibling).child(side);
            let above_color = self.node(above).color;

            if self.is_red(far)
                && let Some(far) = far
            {
                trace_log!("double-black: far red nephew");
                self.set_color(sibling, above_color);
                self.set_color(above, Color::Black);
                self.set_color(far, Color::Black);
                self.rotate(above, side);
                return;
            }

            if self.is_red(near)
                && let Some(near) = near
            {
                trace_log!("double-black: near red nephew");
                self.set_color(near, above_color);
                self.set_color(above, Color::Black);
                self.rotate(sibling, side.opposite());
                self.rotate(above, side);
                return;
            }

            trace_log!("double-black: sibling recolored, deficit moves up");
            self.set_color(sibling, Color::Red);
            node = Some(above);
            parent = self.node(above).parent;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use proptest::prelude::*;

    impl<K: Ord + core::fmt::Debug, V> RawRedBlackTree<K, V> {
        /// Panics with every violated invariant listed.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert!(self.nodes.is_empty(), "Empty tree still owns {} nodes", self.nodes.len());
                return;
            };

            let mut errors: Vec<String> = Vec::new();
            if self.node(root).parent.is_some() {
                errors.push(String::from("Root has a parent link"));
            }
            if self.node(root).is_red() {
                errors.push(String::from("Root is red"));
            }

            let mut reachable = 0;
            self.validate_node(root, None, None, &mut reachable, &mut errors);
            if reachable != self.nodes.len() {
                errors.push(alloc::format!("Arena holds {} nodes, {} reachable", self.nodes.len(), reachable));
            }

            assert!(errors.is_empty(), "Red-black invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the black height below `handle`, counting `handle`.
        fn validate_node(
            &self,
            handle: Handle,
            lower: Option<&K>,
            upper: Option<&K>,
            reachable: &mut usize,
            errors: &mut Vec<String>,
        ) -> usize {
            *reachable += 1;
            let node = self.node(handle);
            let key = &node.entry.key;

            if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
                errors.push(alloc::format!("Key {key:?} out of order (bounds {lower:?}..{upper:?})"));
            }

            let mut heights = [0; 2];
            for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
                let Some(child) = node.child(side) else {
                    continue;
                };
                if self.node(child).parent != Some(handle) {
                    errors.push(alloc::format!("Child of {key:?} has a stale parent link"));
                }
                if node.is_red() && self.node(child).is_red() {
                    errors.push(alloc::format!("Red node {key:?} has a red child"));
                }
                let (lower, upper) = match side {
                    Side::Left => (lower, Some(key)),
                    Side::Right => (Some(key), upper),
                };
                heights[slot] = self.validate_node(child, lower, upper, reachable, errors);
            }

            if heights[0] != heights[1] {
                errors.push(alloc::format!(
                    "Black height mismatch under {key:?}: left={}, right={}",
                    heights[0],
                    heights[1]
                ));
            }
            heights[0] + usize::from(!node.is_red())
        }

        fn keys(&self) -> Vec<&K> {
            self.in_order().into_iter().map(|(key, _)| key).collect()
        }
    }

    fn permutations(items: &[i32]) -> Vec<Vec<i32>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut result = Vec::new();
        for (index, &first) in items.iter().enumerate() {
            let mut rest = items.to_vec();
            rest.remove(index);
            for mut tail in permutations(&rest) {
                tail.insert(0, first);
                result.push(tail);
            }
        }
        result
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..500).prop_map(Op::Insert),
            2 => (0i32..500).prop_map(Op::Remove),
        ]
    }

    #[test]
    fn empty_tree() {
        let mut tree: RawRedBlackTree<i32, i32> = RawRedBlackTree::new();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.get(&1).is_none());
        assert!(tree.first_key_value().is_none());
        assert!(tree.last_key_value().is_none());
        assert!(tree.remove_entry(&1).is_none());
        assert!(tree.render().is_empty());
    }

    #[test]
    fn root_is_blackened_after_first_insert() {
        let mut tree = RawRedBlackTree::new();
        assert_eq!(tree.insert(7, "seven"), None);
        tree.validate_invariants();
        assert_eq!(tree.node(tree.root.unwrap()).color, Color::Black);
    }

    #[test]
    fn duplicate_insert_overwrites_in_place() {
        let mut tree = RawRedBlackTree::new();
        for key in 0..10 {
            tree.insert(key, key);
        }
        let shape_before = alloc::format!("{}", tree.render());

        assert_eq!(tree.insert(4, 40), Some(4));
        assert_eq!(tree.get(&4), Some(&40));
        assert_eq!(tree.len(), 10);
        assert_eq!(alloc::format!("{}", tree.render()), shape_before);
        tree.validate_invariants();
    }

    #[test]
    fn straight_line_insertions_rotate_once() {
        for keys in [[1, 2, 3], [3, 2, 1]] {
            let mut tree = RawRedBlackTree::new();
            for key in keys {
                tree.insert(key, ());
            }
            tree.validate_invariants();
            let root = tree.root.unwrap();
            assert_eq!(tree.node(root).entry.key, 2);
            assert_eq!(tree.height(), 2);
        }
    }

    #[test]
    fn zig_zag_insertions_rotate_twice() {
        for keys in [[1, 3, 2], [3, 1, 2]] {
            let mut tree = RawRedBlackTree::new();
            for key in keys {
                tree.insert(key, ());
            }
            tree.validate_invariants();
            let root = tree.root.unwrap();
            assert_eq!(tree.node(root).entry.key, 2);
            assert_eq!(alloc::format!("{}", tree.render()), "└── 2 B\n    ├── 1 B\n    └── 3 B");
        }
    }

    #[test]
    fn removing_two_child_node_uses_predecessor() {
        let mut tree = RawRedBlackTree::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key, key * 10);
        }
        let target = tree.root.unwrap();
        let key = tree.node(target).entry.key;
        let predecessor = tree.keys().into_iter().copied().filter(|&other| other < key).last().unwrap();

        assert_eq!(tree.remove_entry(&key), Some((key, key * 10)));
        tree.validate_invariants();
        // The target's slot survives and now carries the predecessor's entry.
        assert_eq!(tree.node(target).entry.key, predecessor);
        assert_eq!(tree.node(target).entry.value, predecessor * 10);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn removing_last_entry_empties_arena() {
        let mut tree = RawRedBlackTree::new();
        tree.insert("only", 1);
        assert_eq!(tree.remove_entry("only"), Some(("only", 1)));
        assert!(tree.is_empty());
        assert!(tree.root.is_none());
        tree.validate_invariants();
    }

    #[test]
    fn every_removal_order_of_small_trees() {
        // Covers every insertion shape of seven keys and, for each, removal of
        // every key, exercising all mirrored fixup cases.
        let keys: Vec<i32> = (1..=7).collect();
        for order in permutations(&keys) {
            let mut tree = RawRedBlackTree::new();
            for &key in &order {
                tree.insert(key, key);
                tree.validate_invariants();
            }

            for &victim in &keys {
                let mut copy = RawRedBlackTree::new();
                for &key in &order {
                    copy.insert(key, key);
                }
                assert_eq!(copy.remove_entry(&victim), Some((victim, victim)));
                copy.validate_invariants();
                assert!(copy.get(&victim).is_none());
                assert_eq!(copy.len(), keys.len() - 1);
            }
        }
    }

    #[test]
    fn drain_in_every_order_of_five() {
        let keys: Vec<i32> = (1..=5).collect();
        let mut tree = RawRedBlackTree::new();
        for order in permutations(&keys) {
            for key in 1..=5 {
                tree.insert(key, key);
            }
            for &key in &order {
                assert_eq!(tree.remove_entry(&key), Some((key, key)));
                tree.validate_invariants();
            }
            assert!(tree.is_empty());
        }
    }

    #[test]
    fn height_stays_logarithmic() {
        let mut tree = RawRedBlackTree::new();
        for key in 0..4096 {
            tree.insert(key, ());
        }
        tree.validate_invariants();
        // A red-black tree of n nodes is at most 2 * log2(n + 1) high.
        assert!(tree.height() <= 2 * 12 + 1, "height {}", tree.height());
    }

    #[test]
    fn extremes_follow_removals() {
        let mut tree = RawRedBlackTree::new();
        for key in 1..=64 {
            tree.insert(key, key * 2);
        }
        for key in 1..64 {
            tree.remove_entry(&key);
            assert_eq!(tree.first_key_value(), Some((&(key + 1), &((key + 1) * 2))));
            assert_eq!(tree.last_key_value(), Some((&64, &128)));
        }
        tree.remove_entry(&64);
        assert_eq!(tree.first_key_value(), None);
        assert_eq!(tree.last_key_value(), None);
        tree.validate_invariants();
    }

    #[test]
    fn missing_links_count_as_black() {
        let mut tree = RawRedBlackTree::new();
        assert!(!tree.is_red(None));
        assert!(!tree.is_red(tree.root));

        tree.insert(2, ());
        tree.insert(1, ());
        let root = tree.root.unwrap();
        let left = tree.node(root).left;
        assert!(!tree.is_red(Some(root)));
        assert!(tree.is_red(left));
        assert!(!tree.is_red(tree.node(root).right));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawRedBlackTree<i32, i32> = RawRedBlackTree::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        prop_assert_eq!(tree.insert(key, key * 3), model.insert(key, key * 3));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove_entry(&key), model.remove_entry(&key));
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let expected: Vec<(&i32, &i32)> = model.iter().collect();
            prop_assert_eq!(tree.in_order(), expected);
            prop_assert_eq!(tree.first_key_value(), model.first_key_value());
            prop_assert_eq!(tree.last_key_value(), model.last_key_value());
        }
    }
}
