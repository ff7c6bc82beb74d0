use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::raw::{Handle, RawRBTree, WalkStack};

/// An ordered multiset of `i64` keys backed by a red-black tree.
///
/// Every key inserted is kept as its own member, so the same score may be
/// present several times and each occurrence is removed independently. All
/// mutations rebalance the tree, keeping its height within `2 * log2(n + 1)`.
///
/// # Examples
///
/// ```
/// use rbt_leaderboard::RBTree;
///
/// let mut scores = RBTree::new();
/// scores.insert(120);
/// scores.insert(80);
/// scores.insert(150);
/// scores.insert(80);
///
/// assert_eq!(scores.len(), 4);
/// assert!(scores.contains(&150));
///
/// // Removing a duplicated key removes a single occurrence.
/// scores.remove(&80);
/// assert_eq!(scores.to_vec(), [80, 120, 150]);
///
/// // The coloring rules hold after every operation.
/// assert!(scores.validate());
/// ```
#[derive(Clone)]
pub struct RBTree {
    raw: RawRBTree,
}

/// An iterator over the keys of an `RBTree` in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`RBTree`].
///
/// # Examples
///
/// ```
/// use rbt_leaderboard::RBTree;
///
/// let tree = RBTree::from([3, 1, 2, 1]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.len(), 2);
/// ```
///
/// [`iter`]: RBTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a> {
    tree: &'a RawRBTree,
    // Ancestors whose key and right subtree are still to be yielded, one
    // stack per end.
    front: WalkStack,
    back: WalkStack,
    remaining: usize,
}

/// An owning iterator over the keys of an `RBTree` in ascending order.
///
/// This `struct` is created by the `into_iter` method on [`RBTree`]
/// (provided by the [`IntoIterator`] trait).
pub struct IntoIter {
    inner: alloc::vec::IntoIter<i64>,
}

impl RBTree {
    /// Makes a new, empty `RBTree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::new();
    /// assert!(tree.is_empty());
    /// assert!(tree.validate());
    /// ```
    #[must_use]
    pub const fn new() -> RBTree {
        RBTree { raw: RawRBTree::new() }
    }

    /// Makes a new, empty `RBTree` with room for at least `capacity` keys
    /// before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> RBTree {
        RBTree {
            raw: RawRBTree::with_capacity(capacity),
        }
    }

    /// Returns the number of keys the tree can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Inserts one occurrence of `key`.
    ///
    /// Insertion always succeeds; an equal key already in the tree is kept
    /// and the new one is stored alongside it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let mut tree = RBTree::new();
    /// tree.insert(80);
    /// tree.insert(80);
    /// assert_eq!(tree.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: i64) {
        self.raw.insert(key);
    }

    /// Removes one occurrence of `key`. Returns whether an occurrence was
    /// present.
    ///
    /// Removing a key that is not in the tree does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let mut tree = RBTree::from([80, 80, 120]);
    /// assert!(tree.remove(&80));
    /// assert_eq!(tree.to_vec(), [80, 120]);
    /// assert!(!tree.remove(&42));
    /// assert_eq!(tree.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &i64) -> bool {
        self.raw.remove(*key).is_some()
    }

    /// Returns `true` if at least one occurrence of `key` is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([1, 2, 3]);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains(&self, key: &i64) -> bool {
        self.raw.search(*key).is_some()
    }

    /// Returns the stored key equal to `key`, taking the first match found on
    /// the way down from the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([1, 2, 3]);
    /// assert_eq!(tree.get(&2), Some(2));
    /// assert_eq!(tree.get(&4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get(&self, key: &i64) -> Option<i64> {
        self.raw.search(*key).map(|h| self.raw.node(h).key())
    }

    /// Returns the smallest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([5, -3, 9]);
    /// assert_eq!(tree.first(), Some(-3));
    /// assert_eq!(RBTree::new().first(), None);
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<i64> {
        self.raw.root().map(|root| self.raw.node(self.raw.minimum(root)).key())
    }

    /// Returns the largest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([5, -3, 9]);
    /// assert_eq!(tree.last(), Some(9));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<i64> {
        self.raw.root().map(|root| self.raw.node(self.raw.maximum(root)).key())
    }

    /// Returns the number of keys strictly greater than `key`.
    ///
    /// For a leaderboard of scores, this plus one is the rank of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([80, 80, 120, 140, 150]);
    /// assert_eq!(tree.count_greater(&120), 2);
    /// assert_eq!(tree.count_greater(&80), 3);
    /// ```
    #[must_use]
    pub fn count_greater(&self, key: &i64) -> usize {
        self.raw.count_above(*key, false)
    }

    /// Returns the number of occurrences of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([80, 80, 120]);
    /// assert_eq!(tree.count_equal(&80), 2);
    /// assert_eq!(tree.count_equal(&100), 0);
    /// ```
    #[must_use]
    pub fn count_equal(&self, key: &i64) -> usize {
        self.raw.count_above(*key, true) - self.raw.count_above(*key, false)
    }

    /// Gets an iterator that visits every key in ascending order.
    ///
    /// The iterator borrows the tree, so it can be created again at any time
    /// to restart the walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([3, 1, 2]);
    /// let keys: Vec<i64> = tree.iter().collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: &self.raw,
            front: WalkStack::new(),
            back: WalkStack::new(),
            remaining: self.raw.len(),
        };
        iter.descend_front(self.raw.root());
        iter.descend_back(self.raw.root());
        iter
    }

    /// Collects every key in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([120, 80, 150, 80, 140]);
    /// assert_eq!(tree.to_vec(), [80, 80, 120, 140, 150]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }

    /// Checks the red-black coloring rules.
    ///
    /// Returns `true` for an empty tree, or when the root is black, no red
    /// node has a red child, and every path to an absent leaf crosses the same
    /// number of black nodes. The tree is only read.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let mut tree = RBTree::new();
    /// for key in 0..100 {
    ///     tree.insert(key);
    ///     assert!(tree.validate());
    /// }
    /// ```
    #[must_use]
    pub fn validate(&self) -> bool {
        self.raw.validate()
    }

    /// Returns the black height the validator computes for the root, counting
    /// absent leaves as one black node, or `None` if the coloring is broken.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// assert_eq!(RBTree::new().black_height(), Some(1));
    /// assert_eq!(RBTree::from([1]).black_height(), Some(2));
    /// ```
    #[must_use]
    pub fn black_height(&self) -> Option<usize> {
        self.raw.black_height()
    }

    /// Returns the number of nodes on the longest path from the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree: RBTree = (1..=30).collect();
    /// assert!(tree.height() <= 9);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Clears the tree, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let mut tree = RBTree::from([1, 2]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of keys in the tree, duplicates included.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl PartialEq for RBTree {
    fn eq(&self, other: &RBTree) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for RBTree {}

impl Hash for RBTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for key in self {
            key.hash(state);
        }
    }
}

impl fmt::Debug for RBTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Default for RBTree {
    fn default() -> Self {
        RBTree::new()
    }
}

impl FromIterator<i64> for RBTree {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut tree = RBTree::new();
        tree.extend(iter);
        tree
    }
}

impl Extend<i64> for RBTree {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a> Extend<&'a i64> for RBTree {
    fn extend<I: IntoIterator<Item = &'a i64>>(&mut self, iter: I) {
        for &key in iter {
            self.insert(key);
        }
    }
}

impl<const N: usize> From<[i64; N]> for RBTree {
    fn from(arr: [i64; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl IntoIterator for RBTree {
    type Item = i64;
    type IntoIter = IntoIter;

    /// Gets an iterator for moving out the tree's keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::RBTree;
    ///
    /// let tree = RBTree::from([4, 2, 2]);
    /// let v: Vec<_> = tree.into_iter().collect();
    /// assert_eq!(v, [2, 2, 4]);
    /// ```
    fn into_iter(self) -> IntoIter {
        IntoIter {
            inner: self.to_vec().into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a RBTree {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Iter<'_> {
    fn descend_front(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.front.push(handle);
            current = self.tree.node(handle).left();
        }
    }

    fn descend_back(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.back.push(handle);
            current = self.tree.node(handle).right();
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.pop()?;
        self.remaining -= 1;
        let node = self.tree.node(handle);
        self.descend_front(node.right());
        Some(node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<i64> {
        self.next_back()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.pop()?;
        self.remaining -= 1;
        let node = self.tree.node(handle);
        self.descend_back(node.left());
        Some(node.key())
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl FusedIterator for Iter<'_> {}

impl Iterator for IntoIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<i64> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FusedIterator for IntoIter {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn iter_meets_in_the_middle() {
        let tree = RBTree::from([5, 1, 4, 2, 3, 3]);
        let mut iter = tree.iter();
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(5));
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(3));
        assert_eq!(iter.next_back(), Some(3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_is_restartable() {
        let tree: RBTree = (0..50).rev().collect();
        let first: Vec<i64> = tree.iter().collect();
        let second: Vec<i64> = tree.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first, (0..50).collect::<Vec<_>>());
        assert_eq!(tree.iter().rev().collect::<Vec<_>>(), (0..50).rev().collect::<Vec<_>>());
        tree.raw.validate_invariants();
    }

    #[test]
    fn equality_ignores_shape() {
        let ascending: RBTree = (0..20).collect();
        let descending: RBTree = (0..20).rev().collect();
        assert_eq!(ascending, descending);
        assert_ne!(ascending, RBTree::from([1, 2]));
    }

    #[test]
    fn debug_lists_keys() {
        let tree = RBTree::from([2, 1, 2]);
        assert_eq!(alloc::format!("{tree:?}"), "{1, 2, 2}");
    }

    #[test]
    fn extend_by_reference() {
        let mut tree = RBTree::new();
        tree.extend(&[3, 1, 3]);
        assert_eq!(tree.to_vec(), [1, 3, 3]);
        tree.raw.validate_invariants();
    }
}
