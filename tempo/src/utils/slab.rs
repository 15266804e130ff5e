use std::mem::MaybeUninit;

/// Index-addressed storage with slot reuse.
///
/// Values live in a contiguous array of [`MaybeUninit`] slots; a free list
/// hands vacated indices back out, so indices stay small. The reactor uses
/// these indices as poller tokens.
pub(crate) struct Slab<T> {
    items: Vec<MaybeUninit<T>>,
    /// Stack of free indices.
    free: Vec<usize>,
    /// Marks whether a slot is currently initialized.
    used: Vec<bool>,
}

impl<T> Slab<T> {
    /// Creates a slab with `size` free slots.
    pub(crate) fn new(size: usize) -> Self {
        let items = (0..size).map(|_| MaybeUninit::<T>::uninit()).collect();
        let free = (0..size).rev().collect();
        let used = vec![false; size];

        Self { items, free, used }
    }

    /// Stores `item` and returns its index, growing the slab when full.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        let index = if let Some(i) = self.free.pop() {
            i
        } else {
            let len = self.items.len();
            let new_len = if len == 0 { 1 } else { 2 * len };

            self.items
                .extend((len..new_len).map(|_| MaybeUninit::<T>::uninit()));
            self.free.extend(((len + 1)..new_len).rev());
            self.used.resize(new_len, false);

            len
        };

        self.items[index] = MaybeUninit::new(item);
        self.used[index] = true;

        index
    }

    /// Removes and returns the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the slot is vacant.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        assert!(index < self.items.len(), "index out of range");
        assert!(self.used[index], "slot is vacant");

        self.free.push(index);
        self.used[index] = false;

        unsafe { self.items[index].assume_init_read() }
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(false)
    }

    /// Returns the value at `index`, or `None` if the slot is vacant.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.contains(index) {
            return None;
        }

        Some(unsafe { self.items[index].assume_init_mut() })
    }

    pub(crate) fn len(&self) -> usize {
        self.used.iter().filter(|&&used| used).count()
    }
}

impl<T> Drop for Slab<T> {
    fn drop(&mut self) {
        for (slot, &used) in self.items.iter_mut().zip(self.used.iter()) {
            if used {
                unsafe { slot.assume_init_drop() };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn reuses_vacated_slots() {
        let mut slab = Slab::new(2);

        let a = slab.insert("a");
        let b = slab.insert("b");
        assert_eq!((a, b), (0, 1));

        assert_eq!(slab.remove(a), "a");
        assert!(slab.get_mut(a).is_none());

        let c = slab.insert("c");
        assert_eq!(c, a);
        assert_eq!(slab.get_mut(c).copied(), Some("c"));
        assert_eq!(slab.len(), 2);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut slab = Slab::new(1);

        let indices: Vec<usize> = (0..5).map(|i| slab.insert(i)).collect();

        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(slab.len(), 5);
        assert!(!slab.contains(7));
    }

    #[test]
    fn drop_releases_live_values() {
        let value = Rc::new(());
        {
            let mut slab = Slab::new(4);
            slab.insert(value.clone());
            let gone = slab.insert(value.clone());
            drop(slab.remove(gone));
            assert_eq!(Rc::strong_count(&value), 2);
        }
        assert_eq!(Rc::strong_count(&value), 1);
    }
}
