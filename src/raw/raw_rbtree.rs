use core::cmp::Ordering;

use log::{trace, warn};
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, RBNode, Side};

/// Stack of pending ancestors for an in-order walk.
///
/// A red-black tree is at most `2 * log2(n + 1)` levels deep, so this never
/// spills for any tree an `Arena` can address.
pub(crate) type WalkStack = SmallVec<[Handle; 64]>;

/// The core red-black tree backing `RBTree`.
#[derive(Clone)]
pub(crate) struct RawRBTree {
    /// Arena storing all tree nodes.
    nodes: Arena<RBNode>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of keys in the tree.
    len: usize,
}

/// The position that is one black node short after a black node was excised.
///
/// `node` may be an absent leaf, which has no parent link of its own, so its
/// parent is carried alongside.
#[derive(Clone, Copy, Debug)]
struct Deficit {
    node: Option<Handle>,
    parent: Option<Handle>,
}

/// Outcome of one step of the removal repair loop.
enum Fixup {
    /// The deficit moved up to a new position.
    Continue(Deficit),
    /// The deficit is resolved (up to a final recolor of the current node).
    Done,
}

impl RawRBTree {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no keys.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Removes every key, releasing all node slots.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &RBNode {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut RBNode {
        self.nodes.get_mut(handle)
    }

    /// Returns the color of a possibly absent node. Absent leaves are black.
    #[inline]
    pub(crate) fn color(&self, handle: Option<Handle>) -> Color {
        handle.map_or(Color::Black, |h| self.node(h).color())
    }

    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        self.color(handle) == Color::Red
    }

    #[inline]
    fn is_black(&self, handle: Option<Handle>) -> bool {
        self.color(handle) == Color::Black
    }

    /// Recolors a node. Absent leaves stay black, so they are skipped.
    #[inline]
    fn set_color(&mut self, handle: Option<Handle>, color: Color) {
        if let Some(handle) = handle {
            self.node_mut(handle).set_color(color);
        }
    }

    fn key_of(&self, handle: Option<Handle>) -> Option<i64> {
        handle.map(|h| self.node(h).key())
    }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

impl RawRBTree {
    /// Walks down from the root and returns the first node holding `key`.
    ///
    /// With duplicates present, which occurrence is found depends on the
    /// current shape of the tree.
    pub(crate) fn search(&self, key: i64) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(&node.key()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Returns the leftmost node of the subtree rooted at `handle`.
    pub(crate) fn minimum(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left() {
            handle = left;
        }
        handle
    }

    /// Returns the rightmost node of the subtree rooted at `handle`.
    pub(crate) fn maximum(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right() {
            handle = right;
        }
        handle
    }

    /// Number of nodes in the subtree rooted at `handle`, read from the node.
    #[inline]
    pub(crate) fn subtree_size(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.node(h).size())
    }

    /// Recomputes the stored size of `handle` from its children.
    fn update_size(&mut self, handle: Handle) {
        let node = self.node(handle);
        let size = 1 + self.subtree_size(node.left()) + self.subtree_size(node.right());
        self.node_mut(handle).set_size(size);
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| {
            let node = self.node(h);
            1 + self.subtree_height(node.left()).max(self.subtree_height(node.right()))
        })
    }

    /// Counts keys strictly greater than `key` (or `>=` when `inclusive`).
    ///
    /// Whenever a node qualifies, so does its whole right subtree, whose size
    /// is stored on its root. Only one root-to-leaf path is walked.
    pub(crate) fn count_above(&self, key: i64, inclusive: bool) -> usize {
        let mut count = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            let qualifies = if inclusive { node.key() >= key } else { node.key() > key };
            if qualifies {
                count += 1 + self.subtree_size(node.right());
                current = node.left();
            } else {
                current = node.right();
            }
        }
        count
    }
}

// ─── Rotations ───────────────────────────────────────────────────────────────

impl RawRBTree {
    /// Rotates `handle` down toward `direction`, promoting its child on the
    /// opposite side into its place. `rotate(n, Side::Left)` is the classic
    /// left rotation and `rotate(n, Side::Right)` its mirror.
    ///
    /// Only links and the two affected sizes are rewritten; keys and colors
    /// stay with their nodes. A rotation without a child to promote leaves the
    /// tree untouched.
    pub(crate) fn rotate(&mut self, handle: Handle, direction: Side) {
        let Some(pivot) = self.node(handle).child(direction.opposite()) else {
            warn!("rotation at key {} has no child to promote", self.node(handle).key());
            return;
        };
        let inner = self.node(pivot).child(direction);
        let parent = self.node(handle).parent();

        // The pivot's inner subtree changes sides.
        self.node_mut(handle).set_child(direction.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(handle));
        }

        self.node_mut(pivot).set_parent(parent);
        self.replace_child(parent, handle, Some(pivot));

        self.node_mut(pivot).set_child(direction, Some(handle));
        self.node_mut(handle).set_parent(Some(pivot));

        // The pivot now spans exactly what `handle` used to.
        let size = self.node(handle).size();
        self.node_mut(pivot).set_size(size);
        self.update_size(handle);
    }

    /// Redirects the link that pointed at `old` (a child slot of `parent`, or
    /// the root) to `new`. Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.left() == Some(old) {
                    node.set_child(Side::Left, new);
                } else {
                    node.set_child(Side::Right, new);
                }
            }
        }
    }

    /// Puts the subtree rooted at `new` where the one rooted at `old` hangs.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.node(old).parent();
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.node_mut(new).set_parent(parent);
        }
    }
}

// ─── Insertion ───────────────────────────────────────────────────────────────

impl RawRBTree {
    /// Inserts one occurrence of `key`. Equal keys descend to the right.
    pub(crate) fn insert(&mut self, key: i64) -> Handle {
        let z = self.nodes.alloc(RBNode::new(key));
        self.len += 1;

        let Some(mut current) = self.root else {
            self.node_mut(z).set_color(Color::Black);
            self.root = Some(z);
            return z;
        };

        let side = loop {
            let node = self.node_mut(current);
            node.set_size(node.size() + 1);
            let side = if key < node.key() { Side::Left } else { Side::Right };
            match node.child(side) {
                Some(child) => current = child,
                None => break side,
            }
        };
        self.node_mut(z).set_parent(Some(current));
        self.node_mut(current).set_child(side, Some(z));

        self.insert_fixup(z);
        z
    }

    /// Restores the red-black rules after `z` was attached as a red leaf.
    fn insert_fixup(&mut self, mut z: Handle) {
        while let Some(mut parent) = self.node(z).parent()
            && self.is_red(Some(parent))
        {
            // A red parent is never the root, so it always has a parent.
            let Some(grand) = self.node(parent).parent() else {
                break;
            };
            let Some(side) = self.node(grand).side_of(Some(parent)) else {
                break;
            };
            let uncle = self.node(grand).child(side.opposite());

            if self.is_red(uncle) {
                trace!("insert fixup: red uncle, pushing red up to {}", self.node(grand).key());
                self.set_color(Some(parent), Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(Some(grand), Color::Red);
                z = grand;
                continue;
            }

            if self.node(parent).child(side.opposite()) == Some(z) {
                trace!("insert fixup: inner grandchild {}, rotating parent", self.node(z).key());
                self.rotate(parent, side);
                core::mem::swap(&mut z, &mut parent);
            }

            trace!("insert fixup: outer grandchild {}, rotating grandparent", self.node(z).key());
            self.set_color(Some(parent), Color::Black);
            self.set_color(Some(grand), Color::Red);
            self.rotate(grand, side.opposite());
            break;
        }

        self.set_color(self.root, Color::Black);
    }
}

// ─── Removal ─────────────────────────────────────────────────────────────────

impl RawRBTree {
    /// Removes one node holding `key` and returns its key, or `None` if no
    /// node holds it.
    pub(crate) fn remove(&mut self, key: i64) -> Option<i64> {
        let z = self.search(key)?;
        Some(self.remove_node(z))
    }

    /// Unlinks `z`, frees its slot and repairs the coloring.
    fn remove_node(&mut self, z: Handle) -> i64 {
        let node = self.node(z);
        let (left, right, parent, color) = (node.left(), node.right(), node.parent(), node.color());

        let (removed_color, deficit, shrunk) = match (left, right) {
            (None, child) | (child, None) => {
                self.transplant(z, child);
                (color, Deficit { node: child, parent }, parent)
            }
            (Some(left), Some(right)) => {
                // The successor has no left child, so it can be lifted out of
                // its own slot by promoting its right child.
                let y = self.minimum(right);
                let y_color = self.node(y).color();
                let x = self.node(y).right();

                let x_parent = if y == right {
                    Some(y)
                } else {
                    let y_parent = self.node(y).parent();
                    self.transplant(y, x);
                    self.node_mut(y).set_child(Side::Right, Some(right));
                    self.node_mut(right).set_parent(Some(y));
                    y_parent
                };

                self.transplant(z, Some(y));
                self.node_mut(y).set_child(Side::Left, Some(left));
                self.node_mut(left).set_parent(Some(y));
                self.node_mut(y).set_color(color);

                (y_color, Deficit { node: x, parent: x_parent }, x_parent)
            }
        };

        // Every subtree that lost a node lies on the path from the lowest
        // relinked position up to the root.
        let mut current = shrunk;
        while let Some(handle) = current {
            self.update_size(handle);
            current = self.node(handle).parent();
        }

        self.len -= 1;
        let removed = self.nodes.take(z);
        debug_assert_eq!(self.nodes.len(), self.len);

        if removed_color == Color::Black {
            self.remove_fixup(deficit);
        }

        removed.key()
    }

    /// Runs the double-black repair until a step reports it resolved.
    fn remove_fixup(&mut self, mut deficit: Deficit) {
        while let Fixup::Continue(next) = self.remove_fixup_step(deficit) {
            deficit = next;
        }
        self.set_color(deficit.node, Color::Black);
        self.set_color(self.root, Color::Black);
    }

    /// One pass over the six removal cases, in order.
    ///
    /// Cases 2 and 5 only reshape the neighbourhood and fall through to the
    /// later cases; 3 moves the deficit up; 1, 4 and 6 resolve it.
    fn remove_fixup_step(&mut self, deficit: Deficit) -> Fixup {
        // Case 1: the root absorbs the deficit, as does a red node once it is
        // painted black after the loop.
        if deficit.node == self.root || self.is_red(deficit.node) {
            return Fixup::Done;
        }
        let Some(parent) = deficit.parent else {
            return Fixup::Done;
        };
        let Some(side) = self.node(parent).side_of(deficit.node) else {
            warn!("removal deficit at {:?} is not a child of its parent", self.key_of(deficit.node));
            return Fixup::Done;
        };

        // Case 2: red sibling. Rotating it above the parent leaves a black
        // sibling and a red parent.
        let mut sibling = self.node(parent).child(side.opposite());
        if self.is_red(sibling) {
            trace!("remove fixup: red sibling {:?}", self.key_of(sibling));
            self.set_color(sibling, Color::Black);
            self.set_color(Some(parent), Color::Red);
            self.rotate(parent, side);
            sibling = self.node(parent).child(side.opposite());
        }

        // A short side always has a sibling with at least one black node.
        let Some(mut sibling) = sibling else {
            warn!("removal deficit under {} has no sibling", self.node(parent).key());
            return Fixup::Done;
        };
        let near = self.node(sibling).child(side);
        let mut far = self.node(sibling).child(side.opposite());

        if self.is_black(near) && self.is_black(far) {
            self.set_color(Some(sibling), Color::Red);

            // Case 3: everything black. The parent's whole subtree is now short.
            if self.is_black(Some(parent)) {
                trace!("remove fixup: black family under {}, moving up", self.node(parent).key());
                return Fixup::Continue(Deficit {
                    node: Some(parent),
                    parent: self.node(parent).parent(),
                });
            }

            // Case 4: a red parent trades colors with the sibling.
            trace!("remove fixup: red parent {}", self.node(parent).key());
            self.set_color(Some(parent), Color::Black);
            return Fixup::Done;
        }

        // Case 5: only the near nephew is red. Rotate it above the sibling so
        // the red ends up on the far side.
        if let Some(red_near) = near
            && self.is_black(far)
        {
            trace!("remove fixup: red near nephew {}", self.node(red_near).key());
            self.set_color(Some(red_near), Color::Black);
            self.set_color(Some(sibling), Color::Red);
            self.rotate(sibling, side.opposite());
            sibling = red_near;
            far = self.node(sibling).child(side.opposite());
        }

        // Case 6: red far nephew. Rotating the parent toward the short side
        // hands it an extra black.
        trace!("remove fixup: red far nephew {:?}", self.key_of(far));
        let parent_color = self.node(parent).color();
        self.set_color(Some(sibling), parent_color);
        self.set_color(Some(parent), Color::Black);
        self.set_color(far, Color::Black);
        self.rotate(parent, side);
        Fixup::Done
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

impl RawRBTree {
    /// Checks the coloring rules without touching the tree.
    ///
    /// An empty tree is valid. Otherwise the root must be black and every
    /// subtree must report a consistent black height.
    pub(crate) fn validate(&self) -> bool {
        match self.root {
            None => true,
            Some(root) => {
                self.node(root).color() == Color::Black && self.subtree_black_height(Some(root)).is_some_and(|h| h > 0)
            }
        }
    }

    /// The validator's black height of the whole tree, counting the absent
    /// leaves as one. `None` if some subtree breaks the coloring rules.
    pub(crate) fn black_height(&self) -> Option<usize> {
        self.subtree_black_height(self.root)
    }

    fn subtree_black_height(&self, handle: Option<Handle>) -> Option<usize> {
        let Some(handle) = handle else {
            return Some(1);
        };
        let node = self.node(handle);
        if node.color() == Color::Red && (self.is_red(node.left()) || self.is_red(node.right())) {
            return None;
        }

        let left = self.subtree_black_height(node.left())?;
        let right = self.subtree_black_height(node.right())?;
        if left != right {
            return None;
        }

        Some(left + usize::from(node.color() == Color::Black))
    }
}
