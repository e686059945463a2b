use core::borrow::Borrow;
use core::fmt;

use crate::SearchTree;
use crate::raw::RawRedBlackTree;
use crate::render::Rendering;

/// An ordered map based on a [red-black tree].
///
/// Each entry lives in its own binary node tagged red or black. After every
/// insertion and removal the tree restores four invariants: keys are in
/// binary-search-tree order, the root is black, no red node has a red child,
/// and every path from the root down to a missing child passes the same
/// number of black nodes. Together they keep the height within
/// 2 log<sub>2</sub>(n + 1), so lookups and updates take O(log n).
///
/// Insertion attaches a red leaf and removes any red-red adjacency by
/// rotating the offending grandparent, parent and child so the middle key is
/// on top, then re-checking one level up. Removal hands an entry with two
/// children over to its in-order predecessor, splices out a node with at most
/// one child, and repairs a missing black by recoloring and rotating around
/// the sibling.
///
/// Nodes are kept in an arena and link to each other by index, parent links
/// included, so no node is ever shared or aliased.
///
/// # Examples
///
/// ```
/// use search_trees::RedBlackTree;
///
/// let mut ratings = RedBlackTree::new();
/// ratings.insert("Vertigo", 9);
/// ratings.insert("Psycho", 8);
/// ratings.insert("Rope", 7);
///
/// assert_eq!(ratings.get("Psycho"), Some(&8));
/// assert_eq!(ratings.minimum(), Some(&8));
/// assert_eq!(ratings.maximum(), Some(&9));
///
/// // Inserting an existing key replaces its value.
/// assert_eq!(ratings.insert("Rope", 6), Some(7));
/// assert_eq!(ratings.len(), 3);
///
/// assert!(ratings.remove("Vertigo"));
/// assert!(!ratings.remove("Vertigo"));
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RedBlackTree<K, V> {
    raw: RawRedBlackTree<K, V>,
}

impl<K, V> RedBlackTree<K, V> {
    /// Makes a new, empty `RedBlackTree`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        RedBlackTree {
            raw: RawRedBlackTree::new(),
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

    /// Returns the number of node levels on the longest path from the root.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the entry with the least key.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.first_key_value(), None);
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// assert_eq!(tree.first_key_value(), Some((&1, &"a")));
    /// ```
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

    /// Takes a snapshot of the tree's shape. Each node prints as its key
    /// followed by `R` or `B` for its color.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// for key in [1, 2, 3, 4] {
    ///     tree.insert(key, ());
    /// }
    /// assert_eq!(
    ///     tree.render().to_string(),
    ///     "└── 2 B\n    ├── 1 B\n    └── 3 B\n        └── 4 R"
    /// );
    /// ```
    #[must_use]
    pub fn render(&self) -> Rendering<'_, K> {
        self.raw.render()
    }
}

impl<K: Ord, V> RedBlackTree<K, V> {
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
    /// If the tree did not have this key present, `None` is returned and a new
    /// red leaf is attached and rebalanced. If the key was present, its value
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
    /// use search_trees::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
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

impl<K: Ord, V> SearchTree<K, V> for RedBlackTree<K, V> {
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
        RedBlackTree::minimum(self)
    }

    fn maximum(&self) -> Option<&V> {
        RedBlackTree::maximum(self)
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

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.raw.in_order()).finish()
    }
}

impl<K, V> Default for RedBlackTree<K, V> {
    fn default() -> Self {
        RedBlackTree::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedBlackTree<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedBlackTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RedBlackTree<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
