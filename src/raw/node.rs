use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a parent a node occupies.
///
/// Rebalancing code is written once against a `Side` and its `opposite()`,
/// instead of twice for the left and right mirror images.
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

/// A red-black tree node.
///
/// Children are owning links in the sense that every node is reachable from
/// the root along exactly one path. `parent` is a back-reference kept in sync
/// by the tree, as is `size`, the number of nodes in the subtree rooted here.
#[derive(Clone, Debug)]
pub(crate) struct RBNode {
    key: i64,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    size: usize,
}

impl RBNode {
    /// Creates a detached red leaf.
    pub(crate) const fn new(key: i64) -> Self {
        Self {
            key,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            size: 1,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> i64 {
        self.key
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
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

    /// Returns the side `child` hangs from, or `None` if it is not a child.
    ///
    /// An absent `child` matches an absent slot, left first. The delete fixup
    /// relies on this to locate a deficit carried by a missing leaf.
    pub(crate) fn side_of(&self, child: Option<Handle>) -> Option<Side> {
        if self.left == child {
            Some(Side::Left)
        } else if self.right == child {
            Some(Side::Right)
        } else {
            None
        }
    }
}
