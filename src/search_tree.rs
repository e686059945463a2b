//! The ordered-map contract shared by both tree variants.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::render::Rendering;
use crate::{RedBlackTree, TwoThreeTree};

/// Ordered key-value map operations, implemented by [`RedBlackTree`] and
/// [`TwoThreeTree`].
///
/// Callers that only need the map behaviour can hold a
/// `Box<dyn SearchTree<K, V>>` built by [`TreeKind::build`] and stay
/// independent of the balancing strategy.
///
/// Every operation except [`render`](SearchTree::render) and
/// [`clear`](SearchTree::clear) runs in O(log n).
///
/// # Examples
///
/// ```
/// use search_trees::{SearchTree, TreeKind};
///
/// for kind in [TreeKind::RedBlack, TreeKind::TwoThree] {
///     let mut tree = kind.build();
///     tree.insert(3, "three");
///     tree.insert(1, "one");
///     tree.insert(2, "two");
///
///     assert_eq!(tree.find(&2), Some(&"two"));
///     assert_eq!(tree.minimum(), Some(&"one"));
///     assert_eq!(tree.maximum(), Some(&"three"));
///     assert!(tree.remove(&2));
///     assert!(!tree.remove(&2));
///     assert_eq!(tree.len(), 2);
/// }
/// ```
pub trait SearchTree<K: Ord, V> {
    /// Inserts an entry. If the key is already present its value is replaced
    /// in place and the previous value returned; the shape does not change.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value stored under `key`.
    fn find(&self, key: &K) -> Option<&V>;

    /// Returns a mutable reference to the value stored under `key`.
    fn find_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Removes the entry stored under `key`. Returns `false`, leaving the tree
    /// untouched, if there is none.
    fn remove(&mut self, key: &K) -> bool;

    /// Returns the value of the least key.
    fn minimum(&self) -> Option<&V>;

    /// Returns the value of the greatest key.
    fn maximum(&self) -> Option<&V>;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the tree holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if an entry is stored under `key`.
    fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes every entry.
    fn clear(&mut self);

    /// Returns the number of node levels, 0 for an empty tree.
    fn height(&self) -> usize;

    /// Takes a snapshot of the current shape for diagnostics.
    fn render(&self) -> Rendering<'_, K>;
}

/// Selects a tree variant at construction time.
///
/// Parses from the names used on the command line: `rb` and `23`.
///
/// ```
/// use search_trees::TreeKind;
///
/// assert_eq!("rb".parse::<TreeKind>(), Ok(TreeKind::RedBlack));
/// assert_eq!("23".parse::<TreeKind>(), Ok(TreeKind::TwoThree));
/// assert!("avl".parse::<TreeKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TreeKind {
    /// [`RedBlackTree`]
    RedBlack,
    /// [`TwoThreeTree`]
    TwoThree,
}

impl TreeKind {
    /// Builds an empty tree of this kind behind the [`SearchTree`] contract.
    #[must_use]
    pub fn build<'a, K: Ord + 'a, V: 'a>(self) -> Box<dyn SearchTree<K, V> + 'a> {
        match self {
            TreeKind::RedBlack => Box::new(RedBlackTree::new()),
            TreeKind::TwoThree => Box::new(TwoThreeTree::new()),
        }
    }

    /// The command-line name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TreeKind::RedBlack => "rb",
            TreeKind::TwoThree => "23",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`TreeKind`] name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid tree type '{0}', available types: rb, 23")]
pub struct UnknownTreeKind(pub String);

impl FromStr for TreeKind {
    type Err = UnknownTreeKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "rb" => Ok(TreeKind::RedBlack),
            "23" => Ok(TreeKind::TwoThree),
            other => Err(UnknownTreeKind(String::from(other))),
        }
    }
}
