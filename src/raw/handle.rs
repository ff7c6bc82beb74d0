use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type Slot = u16;
#[cfg(not(test))]
type Slot = u32;

/// Index of a node slot in the tree's arena, stored off by one.
///
/// Parent, child and root links are all `Option<Handle>`. The zero niche keeps
/// an absent link the same size as a present one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Slot>);

impl Handle {
    /// Highest slot index a handle can address.
    pub(crate) const MAX: usize = Slot::MAX as usize - 1;

    /// Returns the handle for slot `index`, or `None` past [`Handle::MAX`].
    pub(crate) fn new(index: usize) -> Option<Self> {
        let stored = Slot::try_from(index.checked_add(1)?).ok()?;
        NonZero::new(stored).map(Handle)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}
