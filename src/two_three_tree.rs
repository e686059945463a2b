use core::borrow::Borrow;
use core::fmt;

use crate::SearchTree;
use crate::raw::RawTwoThreeTree;
use crate::render::Rendering;

/// An ordered map based on a [2-3 tree].
///
/// Every node holds one entry and two children (a 2-node) or two entries and
/// three children (a 3-node); leaves hold entries only. All leaves are at the
/// same depth at all times, which bounds the height by log<sub>2</sub>(n + 1)
/// and makes lookups and updates O(log n).
///
/// Insertion always lands in a leaf. A leaf with room becomes a 3-node; a full
/// one splits in two and pushes its middle entry up into the parent, which may
/// split in turn. When the root splits, every leaf moves down one level at
/// once.
///
/// Removal always takes an entry out of a leaf, swapping an internal entry
/// with its in-order predecessor first. A leaf left empty borrows an entry
/// from a sibling 3-node through the parent or merges with a sibling 2-node
/// and the separating parent entry; merges may empty the parent and repeat up
/// to the root, which then disappears and takes one level with it.
///
/// # Examples
///
/// ```
/// use search_trees::TwoThreeTree;
///
/// let mut tree = TwoThreeTree::new();
/// for (position, letter) in "ALGORITHMS".chars().enumerate() {
///     tree.insert(letter, position);
/// }
///
/// assert_eq!(tree.len(), 10);
/// assert_eq!(tree.get(&'G'), Some(&2));
/// assert_eq!(tree.first_key_value(), Some((&'A', &0)));
/// assert_eq!(tree.last_key_value(), Some((&'T', &6)));
///
/// for letter in "ALGORITHMS".chars() {
///     assert!(tree.remove(&letter));
/// }
/// assert!(tree.is_empty());
/// ```
///
/// [2-3 tree]: https://en.wikipedia.org/wiki/2%E2%80%933_tree
pub struct TwoThreeTree<K, V> {
    raw: RawTwoThreeTree<K, V>,
}

impl<K, V> TwoThreeTree<K, V> {
    /// Makes a new, empty `TwoThreeTree`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        TwoThreeTree {
            raw: RawTwoThreeTree::new(),
        }
    }

    /// Returns the number of entries in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the tree, removing all entries.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of node levels, which is the depth of every leaf.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the entry with the least key, found in the leftmost leaf.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the entry with the greatest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Returns the value of the least key.
    #[must_use]
    pub fn minimum(&self) -> Option<&V> {
        self.first_key_value().map(|(_, value)| value)
    }

    /// Returns the value of the greatest key.
    #[must_use]
    pub fn maximum(&self) -> Option<&V> {
        self.last_key_value().map(|(_, value)| value)
    }

    /// Takes a snapshot of the tree's shape. A 2-node prints as its key, a
    /// 3-node as both keys separated by `|`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::TwoThreeTree;
    ///
    /// let mut tree = TwoThreeTree::new();
    /// for key in [1, 2, 3, 4] {
    ///     tree.insert(key, ());
    /// }
    /// assert_eq!(
    ///     tree.render().to_string(),
    ///     "└── 2\n    ├── 1\n    └── 3|4"
    /// );
    /// ```
    #[must_use]
    pub fn render(&self) -> Rendering<'_, K> {
        self.raw.render()
    }
}

impl<K: Ord, V> TwoThreeTree<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the tree contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).is_some()
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// If the tree did not have this key present, `None` is returned and the
    /// entry is added to a leaf, splitting full nodes on the way back up. If
    /// the key was present, its value
    /// is replaced in place and the old value returned; the key itself is not
    /// updated.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Removes a key from the tree, returning the stored key and value if the
    /// key was previously in the tree.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::TwoThreeTree;
    ///
    /// let mut tree = TwoThreeTree::new();
    /// tree.insert(1, "a");
    /// assert_eq!(tree.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(tree.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }

    /// Removes a key from the tree. Returns `true` if the key was present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key).is_some()
    }
}

impl<K: Ord, V> SearchTree<K, V> for TwoThreeTree<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    fn find(&self, key: &K) -> Option<&V> {
        self.raw.get(key)
    }

    fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        self.raw.remove_entry(key).is_some()
    }

    fn minimum(&self) -> Option<&V> {
        TwoThreeTree::minimum(self)
    }

    fn maximum(&self) -> Option<&V> {
        TwoThreeTree::maximum(self)
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    fn clear(&mut self) {
        self.raw.clear();
    }

    fn height(&self) -> usize {
        self.raw.height()
    }

    fn render(&self) -> Rendering<'_, K> {
        self.raw.render()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TwoThreeTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.raw.in_order()).finish()
    }
}

impl<K, V> Default for TwoThreeTree<K, V> {
    fn default() -> Self {
        TwoThreeTree::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for TwoThreeTree<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TwoThreeTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = TwoThreeTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for TwoThreeTree<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
