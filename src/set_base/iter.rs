use std::{fmt::Debug, iter::FusedIterator, marker::PhantomData, ptr::null_mut};

use super::{
    engine::{predecessor, successor},
    node::{Node, NodeBase},
    set_traits::SetParams,
};

pub trait TreeIterator<T: SetParams>: Clone + Debug {
    fn key(&self) -> &T::KeyType;
    fn forward(&mut self) -> &mut Self;
    fn backward(&mut self) -> &mut Self;
    fn equals(&self, other: &Self) -> bool;
    fn is_end(&self) -> bool;

    /// The position one step forward, leaving `self` in place.
    fn next_pos(&self) -> Self {
        let mut it = self.clone();
        it.forward();
        it
    }

    /// The position one step backward, leaving `self` in place.
    fn prev_pos(&self) -> Self {
        let mut it = self.clone();
        it.backward();
        it
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Marker for what a cursor may hand out.
pub trait Constness: sealed::Sealed + 'static {}

#[derive(Clone, Copy, Debug)]
pub enum Const {}

#[derive(Clone, Copy, Debug)]
pub enum Mut {}

impl sealed::Sealed for Const {}
impl sealed::Sealed for Mut {}
impl Constness for Const {}
impl Constness for Mut {}

/// A position in a set: one key node or the end sentinel.
///
/// The cursor holds a raw node pointer and does not borrow the set, so it
/// stays usable while other keys are inserted or erased. It dangles once its
/// own node is erased or the set is dropped, and must not be used after
/// that.
pub struct SetIterator<T: SetParams, M: Constness> {
    pub(crate) curr: *mut NodeBase,
    _marker: PhantomData<(*const T, M)>,
}

pub type ConstIterator<T> = SetIterator<T, Const>;
pub type MutIterator<T> = SetIterator<T, Mut>;

impl<T: SetParams, M: Constness> SetIterator<T, M> {
    pub(crate) fn new(curr: *mut NodeBase) -> Self {
        Self {
            curr,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_singular(&self) -> bool {
        self.curr.is_null()
    }

    pub fn as_const(&self) -> ConstIterator<T> {
        SetIterator::new(self.curr)
    }

    #[inline]
    fn curr(&self) -> &NodeBase {
        debug_assert!(!self.is_singular(), "use of a singular iterator");
        unsafe { &*self.curr }
    }
}

impl<T: SetParams> SetIterator<T, Mut> {
    /// # Safety
    ///
    /// The iterator must point at a live key, and the key must keep its
    /// position relative to every other key in the set.
    pub unsafe fn key_mut(&mut self) -> &mut T::KeyType {
        debug_assert!(!self.curr().is_sentinel(), "dereferenced end()");
        &mut (*self.curr.cast::<Node<T>>()).key
    }
}

impl<T: SetParams, M: Constness> TreeIterator<T> for SetIterator<T, M> {
    #[inline]
    fn key(&self) -> &T::KeyType {
        debug_assert!(!self.curr().is_sentinel(), "dereferenced end()");
        &self.curr().as_node::<T>().key
    }

    fn forward(&mut self) -> &mut Self {
        debug_assert!(!self.is_singular(), "use of a singular iterator");
        self.curr = successor(self.curr);
        self
    }

    fn backward(&mut self) -> &mut Self {
        debug_assert!(!self.is_singular(), "use of a singular iterator");
        self.curr = predecessor(self.curr);
        self
    }

    fn equals(&self, other: &Self) -> bool {
        self.curr == other.curr
    }

    fn is_end(&self) -> bool {
        self.curr().is_sentinel()
    }
}

impl<T: SetParams, M: Constness> Default for SetIterator<T, M> {
    fn default() -> Self {
        Self::new(null_mut())
    }
}

impl<T: SetParams, M: Constness> Clone for SetIterator<T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SetParams, M: Constness> Copy for SetIterator<T, M> {}

impl<T: SetParams, M: Constness> Debug for SetIterator<T, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetIterator").field("curr", &self.curr).finish()
    }
}

impl<T: SetParams, A: Constness, B: Constness> PartialEq<SetIterator<T, B>> for SetIterator<T, A> {
    fn eq(&self, other: &SetIterator<T, B>) -> bool {
        self.curr == other.curr
    }
}

impl<T: SetParams, M: Constness> Eq for SetIterator<T, M> {}

impl<T: SetParams> From<MutIterator<T>> for ConstIterator<T> {
    fn from(it: MutIterator<T>) -> Self {
        it.as_const()
    }
}

/// Walks a set backwards. It refers to the key just before its base
/// position, so `rbegin()` wraps `end()` and `rend()` wraps `begin()`.
pub struct SetReverseIterator<T: SetParams, M: Constness> {
    base: SetIterator<T, M>,
}

pub type ConstReverseIterator<T> = SetReverseIterator<T, Const>;
pub type MutReverseIterator<T> = SetReverseIterator<T, Mut>;

impl<T: SetParams, M: Constness> SetReverseIterator<T, M> {
    pub fn new(base: SetIterator<T, M>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> SetIterator<T, M> {
        self.base
    }
}

impl<T: SetParams, M: Constness> TreeIterator<T> for SetReverseIterator<T, M> {
    fn key(&self) -> &T::KeyType {
        let mut prev = self.base;
        prev.backward();
        Node::<T>::key_of(prev.curr)
    }

    fn forward(&mut self) -> &mut Self {
        self.base.backward();
        self
    }

    fn backward(&mut self) -> &mut Self {
        self.base.forward();
        self
    }

    fn equals(&self, other: &Self) -> bool {
        self.base.equals(&other.base)
    }

    /// True at `rend()`, i.e. when the base sits on the smallest key. Without
    /// the owning set at hand this climbs the left spine, so it costs O(h).
    fn is_end(&self) -> bool {
        let mut x = self.base.curr;
        let n = self.base.curr();
        if n.is_sentinel() {
            return n.as_sentinel().leftmost == x;
        }
        if !n.left.is_null() {
            return false;
        }
        loop {
            let p = unsafe { &*(*x).parent };
            if p.is_sentinel() {
                return true;
            }
            if p.left != x {
                return false;
            }
            x = unsafe { &*x }.parent;
        }
    }
}

impl<T: SetParams, M: Constness> Clone for SetReverseIterator<T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SetParams, M: Constness> Copy for SetReverseIterator<T, M> {}

impl<T: SetParams, M: Constness> Default for SetReverseIterator<T, M> {
    fn default() -> Self {
        Self::new(SetIterator::default())
    }
}

impl<T: SetParams, M: Constness> Debug for SetReverseIterator<T, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetReverseIterator")
            .field("base", &self.base)
            .finish()
    }
}

impl<T: SetParams, A: Constness, B: Constness> PartialEq<SetReverseIterator<T, B>>
    for SetReverseIterator<T, A>
{
    fn eq(&self, other: &SetReverseIterator<T, B>) -> bool {
        self.base == other.base
    }
}

impl<T: SetParams, M: Constness> Eq for SetReverseIterator<T, M> {}

impl<T: SetParams> From<MutReverseIterator<T>> for ConstReverseIterator<T> {
    fn from(it: MutReverseIterator<T>) -> Self {
        Self::new(it.base.as_const())
    }
}

/// Borrowing iterator over the keys of a set, in ascending order.
pub struct Iter<'a, T: SetParams> {
    front: *mut NodeBase,
    back: *mut NodeBase,
    remaining: usize,
    _marker: PhantomData<&'a T::KeyType>,
}

impl<'a, T: SetParams> Iter<'a, T> {
    pub(crate) fn new(front: *mut NodeBase, back: *mut NodeBase, remaining: usize) -> Self {
        Self {
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: SetParams + 'a> Iterator for Iter<'a, T> {
    type Item = &'a T::KeyType;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = Node::<T>::key_of(self.front);
        self.front = successor(self.front);
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: SetParams + 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back = predecessor(self.back);
        self.remaining -= 1;
        Some(Node::<T>::key_of(self.back))
    }
}

impl<'a, T: SetParams + 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: SetParams + 'a> FusedIterator for Iter<'a, T> {}

impl<'a, T: SetParams> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self::new(self.front, self.back, self.remaining)
    }
}
