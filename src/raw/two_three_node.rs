use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::{SmallVec, smallvec};

use super::entry::Entry;
use super::handle::Handle;

pub(crate) const MAX_ENTRIES: usize = 2;

/// A 2-node (one entry, two children) or 3-node (two entries, three
/// children); leaves have no children. While a split or a deletion is in
/// progress a node may briefly hold three entries or none.
pub(crate) struct TwoThreeNode<K, V> {
    // +1 lets an overfull node exist until it is split.
    pub(crate) entries: SmallVec<[Entry<K, V>; MAX_ENTRIES + 1]>,
    pub(crate) children: SmallVec<[Handle; MAX_ENTRIES + 2]>,
    // Non-owning back-link, only followed during fixups.
    pub(crate) parent: Option<Handle>,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given entry index.
    Found(usize),
    /// Key was not found; the index is both the insertion point and the child
    /// to descend into.
    NotFound(usize),
}

impl<K, V> TwoThreeNode<K, V> {
    pub(crate) fn new_leaf(entry: Entry<K, V>, parent: Option<Handle>) -> Self {
        Self {
            entries: smallvec![entry],
            children: SmallVec::new(),
            parent,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A node that can lend an entry to a sibling.
    #[inline]
    pub(crate) fn is_three_node(&self) -> bool {
        self.entries.len() == MAX_ENTRIES
    }

    #[inline]
    pub(crate) fn is_overfull(&self) -> bool {
        self.entries.len() > MAX_ENTRIES
    }

    /// A node whose last entry was removed.
    #[inline]
    pub(crate) fn is_hole(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compares `key` against the node's one or two keys.
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        for (index, entry) in self.entries.iter().enumerate() {
            match key.cmp(entry.key.borrow()) {
                Ordering::Less => return SearchResult::NotFound(index),
                Ordering::Equal => return SearchResult::Found(index),
                Ordering::Greater => {}
            }
        }
        SearchResult::NotFound(self.entries.len())
    }

    /// Splits an overfull node in place. The node keeps its lowest entry and
    /// its two leftmost children; the highest entry and the remaining children
    /// are returned as a new right sibling, and the middle entry is returned
    /// for promotion into the parent.
    pub(crate) fn split(&mut self) -> (Entry<K, V>, TwoThreeNode<K, V>) {
        debug_assert!(self.is_overfull());
        let high = self.entries.pop().expect("`TwoThreeNode::split()` - node is not overfull!");
        let middle = self.entries.pop().expect("`TwoThreeNode::split()` - node is not overfull!");
        let children = if self.is_leaf() {
            SmallVec::new()
        } else {
            self.children.drain(MAX_ENTRIES..).collect()
        };

        let right = TwoThreeNode {
            entries: smallvec![high],
            children,
            parent: self.parent,
        };
        (middle, right)
    }
}
