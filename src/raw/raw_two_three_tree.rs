use core::borrow::Borrow;
use core::mem;

use alloc::vec::Vec;
use smallvec::{SmallVec, smallvec};

use super::arena::Arena;
use super::entry::Entry;
use super::handle::Handle;
use super::two_three_node::{SearchResult, TwoThreeNode};
use crate::render::{Marker, Rendering, Shape};

/// The core 2-3 tree backing `TwoThreeTree`.
///
/// Every leaf sits at the same depth. Insertion only ever grows the tree at
/// the root (by splitting it) and deletion only ever shrinks it at the root
/// (by collapsing an emptied root), so perfect balance holds by construction.
pub(crate) struct RawTwoThreeTree<K, V> {
    nodes: Arena<TwoThreeNode<K, V>>,
    root: Option<Handle>,
    /// Number of entries; nodes hold one or two each.
    len: usize,
}

impl<K, V> RawTwoThreeTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    #[inline]
    fn node(&self, handle: Handle) -> &TwoThreeNode<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut TwoThreeNode<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Position of `child` among `parent`'s children.
    fn child_index(&self, parent: Handle, child: Handle) -> usize {
        self.node(parent)
            .children
            .iter()
            .position(|&candidate| candidate == child)
            .expect("`RawTwoThreeTree::child_index()` - child is not linked under its parent!")
    }

    fn adopt(&mut self, parent: Handle, children: &[Handle]) {
        for &child in children {
            self.node_mut(child).parent = Some(parent);
        }
    }

    fn leftmost_leaf(&self, mut handle: Handle) -> Handle {
        while let Some(&child) = self.node(handle).children.first() {
            handle = child;
        }
        handle
    }

    fn rightmost_leaf(&self, mut handle: Handle) -> Handle {
        while let Some(&child) = self.node(handle).children.last() {
            handle = child;
        }
        handle
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let leaf = self.leftmost_leaf(self.root?);
        self.node(leaf).entries.first().map(Entry::as_pair)
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let leaf = self.rightmost_leaf(self.root?);
        self.node(leaf).entries.last().map(Entry::as_pair)
    }

    /// Number of node levels. All leaves share it, so the leftmost path suffices.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            height += 1;
            current = self.node(handle).children.first().copied();
        }
        height
    }

    /// Entries in ascending key order.
    pub(crate) fn in_order(&self) -> Vec<(&K, &V)> {
        let mut entries = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            self.collect_in_order(root, &mut entries);
        }
        entries
    }

    fn collect_in_order<'a>(&'a self, handle: Handle, entries: &mut Vec<(&'a K, &'a V)>) {
        let node = self.node(handle);
        for (index, entry) in node.entries.iter().enumerate() {
            if let Some(&child) = node.children.get(index) {
                self.collect_in_order(child, entries);
            }
            entries.push(entry.as_pair());
        }
        if let Some(&last) = node.children.get(node.entries.len()) {
            self.collect_in_order(last, entries);
        }
    }

    pub(crate) fn render(&self) -> Rendering<'_, K> {
        Rendering::new(self.root.map(|root| self.shape(root)))
    }

    fn shape(&self, handle: Handle) -> Shape<'_, K> {
        let node = self.node(handle);
        let keys: SmallVec<[&K; 2]> = node.entries.iter().map(|entry| &entry.key).collect();
        let children = node.children.iter().map(|&child| self.shape(child)).collect();
        Shape::new(keys, Marker::None, children)
    }
}

impl<K: Ord, V> RawTwoThreeTree<K, V> {
    /// Returns the node holding `key` and the entry's index within it.
    fn search<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        loop {
            let node = self.node(current);
            match node.search(key) {
                SearchResult::Found(index) => return Some((current, index)),
                SearchResult::NotFound(index) => current = *node.children.get(index)?,
            }
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;
        Some(&self.node(handle).entries[index].value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;
        Some(&mut self.node_mut(handle).entries[index].value)
    }

    /// Inserts a key-value pair, returning the previous value of an equal key.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut current) = self.root else {
            let root = self.nodes.alloc(TwoThreeNode::new_leaf(Entry::new(key, value), None));
            self.root = Some(root);
            self.len = 1;
            return None;
        };

        loop {
            let node = self.node(current);
            match node.search(&key) {
                SearchResult::Found(index) => {
                    return Some(mem::replace(&mut self.node_mut(current).entries[index].value, value));
                }
                SearchResult::NotFound(index) if node.is_leaf() => {
                    self.node_mut(current).entries.insert(index, Entry::new(key, value));
                    break;
                }
                SearchResult::NotFound(index) => current = node.children[index],
            }
        }

        self.len += 1;
        if self.node(current).is_overfull() {
            self.split_upwards(current);
        }
        None
    }

    /// Splits the overfull `node`, promoting its middle entry into the parent
    /// as if freshly inserted there, and repeats while the parent overflows.
    /// Splitting the root adds a level above every leaf at once.
    fn split_upwards(&mut self, mut node: Handle) {
        loop {
            let (middle, right) = self.node_mut(node).split();
            let parent = right.parent;
            let moved = right.children.clone();
            let right = self.nodes.alloc(right);
            self.adopt(right, &moved);

            let Some(parent) = parent else {
                let root = self.nodes.alloc(TwoThreeNode {
                    entries: smallvec![middle],
                    children: smallvec![node, right],
                    parent: None,
                });
                self.adopt(root, &[node, right]);
                self.root = Some(root);
                debug_log!(height = self.height(), "root split");
                return;
            };

            let index = self.child_index(parent, node);
            let above = self.node_mut(parent);
            above.entries.insert(index, middle);
            above.children.insert(index + 1, right);
            trace_log!("split promoted an entry");
            if !above.is_overfull() {
                return;
            }
            node = parent;
        }
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (node, index) = self.search(key)?;

        // Entries are only ever physically removed from leaves. An internal
        // entry is replaced by its in-order predecessor, the greatest entry of
        // the subtree to its left.
        let (leaf, removed) = if self.node(node).is_leaf() {
            (node, self.node_mut(node).entries.remove(index))
        } else {
            let leaf = self.rightmost_leaf(self.node(node).children[index]);
            let predecessor = self
                .node_mut(leaf)
                .entries
                .pop()
                .expect("`RawTwoThreeTree::remove_entry()` - empty leaf!");
            (leaf, mem::replace(&mut self.node_mut(node).entries[index], predecessor))
        };

        self.len -= 1;
        if self.node(leaf).is_hole() {
            self.fill_hole(leaf);
        }
        Some(removed.into_pair())
    }

    /// Resolves an empty node. A hole holds no entries and, unless it is a
    /// leaf, exactly one child.
    ///
    /// A sibling with two entries lends one through the parent and the hole is
    /// gone. Otherwise the hole, the separating parent entry and the sibling
    /// merge into one node; if that empties the parent, the parent becomes the
    /// next hole. A hole at the root is discarded and its child, if any,
    /// becomes the new root.
    fn fill_hole(&mut self, mut hole: Handle) {
        loop {
            let Some(parent) = self.node(hole).parent else {
                let emptied = self.nodes.free(hole);
                self.root = emptied.children.first().copied();
                if let Some(root) = self.root {
                    self.node_mut(root).parent = None;
                    debug_log!(height = self.height(), "root collapsed");
                }
                return;
            };

            let index = self.child_index(parent, hole);
            let siblings = &self.node(parent).children;
            let left = index.checked_sub(1).map(|left| siblings[left]);
            let right = siblings.get(index + 1).copied();

            if let Some(left) = left
                && self.node(left).is_three_node()
            {
                self.borrow_from_left(hole, left, parent, index);
                return;
            }
            if let Some(right) = right
                && self.node(right).is_three_node()
            {
                self.borrow_from_right(hole, right, parent, index);
                return;
            }

            match (left, right) {
                (Some(left), _) => self.merge_into_left(hole, left, parent, index),
                (None, Some(right)) => self.merge_into_right(hole, right, parent),
                (None, None) => unreachable!("`RawTwoThreeTree::fill_hole()` - hole has no sibling!"),
            }

            if !self.node(parent).is_hole() {
                return;
            }
            hole = parent;
        }
    }

    /// Rotates the left sibling's high entry up into the parent and the
    /// parent's separator down into the hole.
    fn borrow_from_left(&mut self, hole: Handle, lender: Handle, parent: Handle, index: usize) {
        trace_log!("hole borrowed from left sibling");
        let (entry, child) = {
            let lender = self.node_mut(lender);
            let entry = lender.entries.pop().expect("`RawTwoThreeTree::borrow_from_left()` - empty lender!");
            (entry, lender.children.pop())
        };
        let separator = mem::replace(&mut self.node_mut(parent).entries[index - 1], entry);

        let node = self.node_mut(hole);
        node.entries.insert(0, separator);
        if let Some(child) = child {
            node.children.insert(0, child);
            self.node_mut(child).parent = Some(hole);
        }
    }

    /// Rotates the right sibling's low entry up into the parent and the
    /// parent's separator down into the hole.
    fn borrow_from_right(&mut self, hole: Handle, lender: Handle, parent: Handle, index: usize) {
        trace_log!("hole borrowed from right sibling");
        let (entry, child) = {
            let lender = self.node_mut(lender);
            let entry = lender.entries.remove(0);
            let child = if lender.is_leaf() { None } else { Some(lender.children.remove(0)) };
            (entry, child)
        };
        let separator = mem::replace(&mut self.node_mut(parent).entries[index], entry);

        let node = self.node_mut(hole);
        node.entries.push(separator);
        if let Some(child) = child {
            node.children.push(child);
            self.node_mut(child).parent = Some(hole);
        }
    }

    /// Folds the separator and the hole's orphaned child (if any) into the
    /// left sibling, which becomes a 3-node. The hole is freed.
    fn merge_into_left(&mut self, hole: Handle, sibling: Handle, parent: Handle, index: usize) {
        trace_log!("hole merged into left sibling");
        let separator = {
            let above = self.node_mut(parent);
            above.children.remove(index);
            above.entries.remove(index - 1)
        };
        let orphans = self.nodes.free(hole).children;

        let node = self.node_mut(sibling);
        node.entries.push(separator);
        node.children.extend(orphans.iter().copied());
        self.adopt(sibling, &orphans);
    }

    /// Mirror of [`Self::merge_into_left`] for a hole in the leftmost position.
    fn merge_into_right(&mut self, hole: Handle, sibling: Handle, parent: Handle) {
        trace_log!("hole merged into right sibling");
        let separator = {
            let above = self.node_mut(parent);
            above.children.remove(0);
            above.entries.remove(0)
        };
        let orphans = self.nodes.free(hole).children;

        let node = self.node_mut(sibling);
        node.entries.insert(0, separator);
        node.children.insert_many(0, orphans.iter().copied());
        self.adopt(sibling, &orphans);
    }
}
