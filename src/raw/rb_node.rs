use super::entry::Entry;
use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a node. Every fixup is written once in terms of a
/// `Side` and its mirror, rather than as two hand-copied branches.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub(crate) struct RbNode<K, V> {
    pub(crate) entry: Entry<K, V>,
    pub(crate) color: Color,
    // Non-owning back-link, only followed during fixups.
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K, V> RbNode<K, V> {
    /// Creates a detached red node; the caller links it under `parent`.
    pub(crate) const fn new(entry: Entry<K, V>, parent: Option<Handle>) -> Self {
        Self {
            entry,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// The only child of a node with at most one child.
    #[inline]
    pub(crate) fn sole_child(&self) -> Option<Handle> {
        debug_assert!(self.left.is_none() || self.right.is_none());
        self.left.or(self.right)
    }
}
