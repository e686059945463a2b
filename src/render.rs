//! Structural dumps of a tree's current shape.
//!
//! A [`Rendering`] is taken from a tree with `render()`. It borrows the tree's
//! keys, so the tree cannot change while the rendering is alive, and it turns
//! into text only when asked: either line by line through [`Rendering::lines`]
//! or all at once through its [`Display`](fmt::Display) implementation.
//!
//! ```
//! use search_trees::TwoThreeTree;
//!
//! let mut tree = TwoThreeTree::new();
//! for key in [2, 1, 3] {
//!     tree.insert(key, ());
//! }
//!
//! let lines: Vec<String> = tree.render().lines().collect();
//! assert_eq!(lines, ["└── 2", "    ├── 1", "    └── 3"]);
//! ```
//!
//! The format is meant for people debugging a tree and may change between
//! versions.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use smallvec::SmallVec;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// Per-node annotation printed after the keys.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Marker {
    None,
    Red,
    Black,
}

/// Snapshot of one node: its keys, its annotation and its children, left to right.
pub(crate) struct Shape<'a, K> {
    keys: SmallVec<[&'a K; 2]>,
    marker: Marker,
    children: Vec<Shape<'a, K>>,
}

impl<'a, K> Shape<'a, K> {
    pub(crate) fn new(keys: SmallVec<[&'a K; 2]>, marker: Marker, children: Vec<Shape<'a, K>>) -> Self {
        Self { keys, marker, children }
    }
}

impl<K: fmt::Display> fmt::Display for Shape<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                f.write_char('|')?;
            }
            write!(f, "{key}")?;
        }
        match self.marker {
            Marker::None => Ok(()),
            Marker::Red => f.write_str(" R"),
            Marker::Black => f.write_str(" B"),
        }
    }
}

/// An immutable snapshot of a tree's shape.
///
/// Red-black nodes print as `key R` or `key B`; 2-3 nodes print as `left` or
/// `left|right`. Children are listed left to right under their parent.
pub struct Rendering<'a, K> {
    root: Option<Shape<'a, K>>,
}

impl<'a, K> Rendering<'a, K> {
    pub(crate) fn new(root: Option<Shape<'a, K>>) -> Self {
        Self { root }
    }

    /// Returns `true` if the snapshot was taken from an empty tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the formatted lines of the dump, one node per line, produced on
    /// demand. An empty tree yields no lines.
    #[must_use]
    pub fn lines(&self) -> Lines<'_, 'a, K> {
        let mut pending = Vec::new();
        if let Some(root) = &self.root {
            pending.push((root, String::new(), true));
        }
        Lines { pending }
    }
}

impl<K: fmt::Display> fmt::Display for Rendering<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("empty tree");
        }

        for (index, line) in self.lines().enumerate() {
            if index > 0 {
                f.write_char('\n')?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}

/// Iterator over the lines of a [`Rendering`].
///
/// Walks the snapshot depth first with an explicit stack, carrying the
/// indentation prefix for each pending node.
pub struct Lines<'r, 'a, K> {
    pending: Vec<(&'r Shape<'a, K>, String, bool)>,
}

impl<K: fmt::Display> Iterator for Lines<'_, '_, K> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let (shape, prefix, last) = self.pending.pop()?;

        let mut line = prefix.clone();
        line.push_str(if last { LAST_BRANCH } else { BRANCH });
        // Writing into a `String` cannot fail.
        let _ = write!(line, "{shape}");

        let mut child_prefix = prefix;
        child_prefix.push_str(if last { BLANK } else { PIPE });
        let last_child = shape.children.len().saturating_sub(1);
        for (index, child) in shape.children.iter().enumerate().rev() {
            self.pending.push((child, child_prefix.clone(), index == last_child));
        }

        Some(line)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use smallvec::smallvec;

    fn leaf<K>(key: &K, marker: Marker) -> Shape<'_, K> {
        Shape::new(smallvec![key], marker, Vec::new())
    }

    #[test]
    fn empty_rendering() {
        let rendering: Rendering<'_, i32> = Rendering::new(None);
        assert!(rendering.is_empty());
        assert_eq!(rendering.lines().count(), 0);
        assert_eq!(rendering.to_string(), "empty tree");
    }

    #[test]
    fn colored_nodes_are_marked() {
        let keys = [1, 2, 3];
        let root = Shape::new(
            smallvec![&keys[1]],
            Marker::Black,
            vec![leaf(&keys[0], Marker::Red), leaf(&keys[2], Marker::Red)],
        );
        let rendering = Rendering::new(Some(root));

        assert_eq!(rendering.to_string(), "└── 2 B\n    ├── 1 R\n    └── 3 R");
    }

    #[test]
    fn nested_prefixes() {
        let keys = ['A', 'G', 'L', 'O', 'R'];
        let left = Shape::new(smallvec![&keys[0]], Marker::None, Vec::new());
        let middle = Shape::new(smallvec![&keys[2]], Marker::None, Vec::new());
        let right = Shape::new(smallvec![&keys[4]], Marker::None, Vec::new());
        let inner = Shape::new(smallvec![&keys[1], &keys[3]], Marker::None, vec![left, middle, right]);
        let root = Shape::new(smallvec![&keys[3]], Marker::None, vec![inner]);

        let lines: Vec<String> = Rendering::new(Some(root)).lines().collect();
        assert_eq!(lines, ["└── O", "    └── G|O", "        ├── A", "        ├── L", "        └── R"]);
    }

    #[test]
    fn pipes_continue_under_open_siblings() {
        let keys = [1, 2, 3, 4];
        let left = Shape::new(smallvec![&keys[1]], Marker::None, vec![leaf(&keys[0], Marker::None)]);
        let root = Shape::new(smallvec![&keys[2]], Marker::None, vec![left, leaf(&keys[3], Marker::None)]);

        let lines: Vec<String> = Rendering::new(Some(root)).lines().collect();
        assert_eq!(lines, ["└── 3", "    ├── 2", "    │   └── 1", "    └── 4"]);
    }
}
