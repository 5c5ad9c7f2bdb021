use std::{mem, ptr};

use super::{engine, set::Set, set_traits::SetParams};

/// Copy construction and assignment
impl<T: SetParams> Clone for Set<T>
where
    T::KeyType: Clone,
{
    /// Builds an independent copy with the same shape.
    ///
    /// If cloning a key panics, the half-built copy is dropped on the way out
    /// and frees every node it already got; `self` is only read.
    fn clone(&self) -> Self {
        let mut copy = Set::new();
        copy.key_less = self.key_less.clone();

        let dst = unsafe { &mut *copy.sentinel_ };
        engine::clone_tree::<T>(self.sentinel(), dst, &mut copy.size_);
        debug_assert!(copy.size_ == self.size_);

        log::debug!("Set::clone copied {} nodes", copy.size());
        copy.self_verify("clone");
        copy
    }

    /// Assigns a copy of `source`. The copy is built on the side and swapped
    /// in, so a panic while cloning leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        if ptr::eq(self, source) {
            return;
        }
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

/// Swap
impl<T: SetParams> Set<T> {
    /// Exchanges the contents of two sets in O(1).
    ///
    /// Each set keeps its own sentinel, so `end()` positions stay with their
    /// set while positions of keys follow the keys to the other set.
    pub fn swap(&mut self, other: &mut Self) {
        if ptr::eq(self, other) {
            return;
        }

        {
            let a = unsafe { &mut *self.sentinel_ };
            let b = unsafe { &mut *other.sentinel_ };
            mem::swap(&mut a.base.left, &mut b.base.left);
            mem::swap(&mut a.leftmost, &mut b.leftmost);
            mem::swap(&mut a.rightmost, &mut b.rightmost);
        }
        mem::swap(&mut self.size_, &mut other.size_);
        mem::swap(&mut self.key_less, &mut other.key_less);

        self.reanchor();
        other.reanchor();
        log::debug!(
            "Set::swap: sizes now {} and {}",
            self.size(),
            other.size()
        );
    }

    /// Hooks the root onto this set's sentinel after a swap, or self-links
    /// the sentinel if the tree it received is empty.
    fn reanchor(&mut self) {
        let sentinel = self.sentinel_mut();
        let end = sentinel.as_base_ptr();
        if sentinel.is_empty() {
            sentinel.reset();
        } else {
            unsafe { &mut *sentinel.root() }.parent = end;
        }
    }
}
