use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes.
///
/// Excised nodes leave a hole that is pushed onto `free` and handed out again
/// by the next `alloc`, so handles of live nodes never move.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.index()] = Some(element);
            return handle;
        }

        let Some(handle) = Handle::new(self.slots.len()) else {
            panic!("node arena is full ({} slots)", Handle::MAX + 1);
        };
        self.slots.push(Some(element));
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.index()] {
            Some(element) => element,
            None => panic!("node slot {handle} is empty"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.index()] {
            Some(element) => element,
            None => panic!("node slot {handle} is empty"),
        }
    }

    /// Removes the element, returning it and recycling its slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let Some(element) = self.slots[handle.index()].take() else {
            panic!("node slot {handle} was already freed");
        };
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<i64> = Arena::with_capacity(10);
        assert_eq!(arena.capacity(), 10);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn freed_slot_is_reused() {
        let mut arena: Arena<i64> = Arena::new();
        let a = arena.alloc(120);
        let b = arena.alloc(80);
        assert_eq!(arena.take(a), 120);
        assert_eq!(arena.len(), 1);

        let c = arena.alloc(150);
        assert_eq!(c, a);
        assert_eq!(*arena.get(b), 80);
        assert_eq!(*arena.get(c), 150);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "node slot #0 is empty")]
    fn stale_handle_panics() {
        let mut arena: Arena<i64> = Arena::new();
        let handle = arena.alloc(1);
        arena.take(handle);
        let _ = arena.get(handle);
    }

    proptest! {
        #[test]
        fn live_handles_survive_churn(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut live: Vec<(Handle, i64)> = Vec::new();
            let mut arena: Arena<i64> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(key) => {
                        live.push((arena.alloc(key), key));
                    }
                    Operation::Overwrite(which, key) => {
                        if live.is_empty() {
                            continue;
                        }
                        let index = which % live.len();
                        *arena.get_mut(live[index].0) = key;
                        live[index].1 = key;
                    }
                    Operation::Take(which) => {
                        if live.is_empty() {
                            continue;
                        }
                        let index = which % live.len();
                        let (handle, key) = live.swap_remove(index);
                        prop_assert_eq!(arena.take(handle), key);
                    }
                    Operation::Clear => {
                        arena.clear();
                        live.clear();
                    }
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, key) in &live {
                    prop_assert_eq!(*arena.get(handle), key);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(i64),
        Overwrite(usize, i64),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<i64>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<i64>()).prop_map(|(which, key)| Operation::Overwrite(which, key)),
            8 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
