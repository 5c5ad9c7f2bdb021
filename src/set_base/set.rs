use std::{fmt::Write, marker::PhantomData};

use super::{
    engine::{self, InsertPosition},
    iter::{
        Constness, ConstIterator, ConstReverseIterator, Iter, MutIterator, SetIterator, TreeIterator,
    },
    node::{Node, NodeBase, Sentinel},
    set_traits::{KeyComparator, SetParams},
    tree_stats::TreeStats,
};

/// An ordered set of unique keys on an unbalanced binary search tree.
///
/// The set owns a heap-allocated sentinel for its whole life. The sentinel is
/// the `end()` position, the parent of the root, and the holder of the links
/// to the smallest and largest keys. Positions are raw cursors
/// ([`SetIterator`]) that survive insertion and removal of other keys.
pub struct Set<T: SetParams> {
    pub(crate) sentinel_: *mut Sentinel,
    pub(crate) size_: usize,
    pub(crate) key_less: T::KeyCompareType,
    _marker: PhantomData<Box<Node<T>>>,
}

impl<T: SetParams> Set<T> {
    pub fn key_comp(&self) -> &T::KeyCompareType {
        &self.key_less
    }
}

impl<T: SetParams> Drop for Set<T> {
    fn drop(&mut self) {
        self.clear();
        Sentinel::free_sentinel(self.sentinel_);
    }
}

/// Sentinel access
impl<T: SetParams> Set<T> {
    #[inline]
    pub(crate) fn sentinel(&self) -> &Sentinel {
        unsafe { &*self.sentinel_ }
    }

    #[inline]
    pub(crate) fn sentinel_mut(&mut self) -> &mut Sentinel {
        unsafe { &mut *self.sentinel_ }
    }

    #[inline]
    fn end_ptr(&self) -> *mut NodeBase {
        self.sentinel_ as *mut NodeBase
    }
}

/// Access Functions to the item count
impl<T: SetParams> Set<T> {
    pub fn size(&self) -> usize {
        self.size_
    }

    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    pub fn max_size(&self) -> usize {
        usize::MAX
    }

    /// Measures the current shape; O(n).
    pub fn get_stats(&self) -> TreeStats<T> {
        TreeStats::measure(self.sentinel().root())
    }
}

/// Positions
impl<T: SetParams> Set<T> {
    pub fn begin(&self) -> ConstIterator<T> {
        SetIterator::new(self.sentinel().leftmost)
    }

    pub fn end(&self) -> ConstIterator<T> {
        SetIterator::new(self.end_ptr())
    }

    pub fn rbegin(&self) -> ConstReverseIterator<T> {
        ConstReverseIterator::new(self.end())
    }

    pub fn rend(&self) -> ConstReverseIterator<T> {
        ConstReverseIterator::new(self.begin())
    }

    pub fn begin_mut(&mut self) -> MutIterator<T> {
        SetIterator::new(self.sentinel().leftmost)
    }

    pub fn end_mut(&mut self) -> MutIterator<T> {
        SetIterator::new(self.end_ptr())
    }

    /// The key at `pos`, borrowed from the set, or `None` at `end()`.
    pub fn get<M: Constness>(&self, pos: SetIterator<T, M>) -> Option<&T::KeyType> {
        if pos.is_end() {
            None
        } else {
            Some(Node::<T>::key_of(pos.curr))
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.sentinel().leftmost, self.end_ptr(), self.size())
    }
}

/// Access functions querying the tree by descending from the root
impl<T: SetParams> Set<T> {
    /// Checks whether a key is in the set; same as `find(k) != end()`.
    pub fn exists(&self, key: &T::KeyType) -> bool {
        !self.find(key).is_end()
    }

    /// Tries to locate a key and returns its position, or end() if the key
    /// is absent.
    pub fn find(&self, key: &T::KeyType) -> ConstIterator<T> {
        SetIterator::new(engine::find::<T>(self.sentinel(), &self.key_less, key))
    }

    pub fn find_mut(&mut self, key: &T::KeyType) -> MutIterator<T> {
        SetIterator::new(engine::find::<T>(self.sentinel(), &self.key_less, key))
    }

    /// Keys are unique, so this is 0 or 1.
    pub fn count(&self, key: &T::KeyType) -> usize {
        self.exists(key) as usize
    }

    /// Returns the position of the first key equal to or greater than key,
    /// or end() if all keys are smaller.
    pub fn lower_bound(&self, key: &T::KeyType) -> ConstIterator<T> {
        SetIterator::new(engine::lower_bound::<T>(self.sentinel(), &self.key_less, key))
    }

    /// Returns the position of the first key greater than key, or end() if
    /// all keys are smaller or equal.
    pub fn upper_bound(&self, key: &T::KeyType) -> ConstIterator<T> {
        SetIterator::new(engine::upper_bound::<T>(self.sentinel(), &self.key_less, key))
    }

    /// Returns both lower_bound() and upper_bound().
    pub fn equal_range(&self, key: &T::KeyType) -> (ConstIterator<T>, ConstIterator<T>) {
        (self.lower_bound(key), self.upper_bound(key))
    }
}

/// Insertion
impl<T: SetParams> Set<T> {
    /// Inserts `key` unless an equal key is present. Returns the position of
    /// the key in the set and whether it was inserted.
    ///
    /// All comparisons happen before the tree is touched: if the comparator
    /// panics, the set is unchanged and `key` is dropped.
    pub fn insert(&mut self, key: T::KeyType) -> (MutIterator<T>, bool) {
        log::debug!("Set::insert({:?}) on set size {}", key, self.size());

        let (parent, left) =
            match engine::insert_position::<T>(self.sentinel(), &self.key_less, &key) {
                InsertPosition::Occupied(x) => {
                    log::debug!("Set::insert found {:?} at {:p}", key, x);
                    return (SetIterator::new(x), false);
                }
                InsertPosition::Vacant { parent, left } => (parent, left),
            };

        let node = Node::<T>::new_node(key, parent);
        engine::link_new(self.sentinel_mut(), node, parent, left);
        self.size_ += 1;

        self.self_verify("insert");
        (SetIterator::new(node), true)
    }
}

/// Erase
impl<T: SetParams> Set<T> {
    /// Removes the key at `pos` and returns the position after it. Never
    /// calls the comparator. Positions of all other keys stay valid.
    ///
    /// # Panics
    ///
    /// If `pos` is singular, is `end()`, or belongs to another set.
    pub fn erase_at<M: Constness>(&mut self, pos: SetIterator<T, M>) -> MutIterator<T> {
        let z = pos.curr;
        assert!(!pos.is_singular(), "erase of a singular iterator");
        assert!(
            engine::owner(z) == self.end_ptr(),
            "erase_at: position belongs to another set"
        );
        assert!(!pos.is_end(), "erase of end()");

        let next = engine::successor(z);
        let case = engine::unlink(self.sentinel_mut(), z);
        log::debug!("Set::erase_at {:p} ({:?}) on set size {}", z, case, self.size());

        Node::<T>::free_node(z);
        self.size_ -= 1;

        self.self_verify("erase_at");
        SetIterator::new(next)
    }

    /// Removes `key` if present and returns how many keys were removed.
    pub fn erase(&mut self, key: &T::KeyType) -> usize {
        log::debug!("Set::erase({:?}) on set size {}", key, self.size());
        let it = self.find(key);
        if it.is_end() {
            log::debug!("Could not find key {:?} to erase.", key);
            return 0;
        }
        self.erase_at(it);
        1
    }

    /// Frees every node; the sentinel goes back to pointing at itself.
    pub fn clear(&mut self) {
        let root = self.sentinel().root();
        let freed = engine::teardown::<T>(root);
        // a second panic while unwinding would abort
        if !std::thread::panicking() {
            debug_assert!(freed == self.size_);
        }
        log::debug!("Set::clear freed {} nodes", freed);

        self.sentinel_mut().reset();
        self.size_ = 0;
    }
}

/// Debug
impl<T: SetParams> Set<T> {
    /// Renders the tree shape, one node per line, children indented under
    /// their parent.
    pub fn dump(&self) -> String {
        let sentinel = self.sentinel();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "sentinel {:p} leftmost {:p} rightmost {:p} size {}",
            sentinel, sentinel.leftmost, sentinel.rightmost, self.size()
        );

        let mut stack = vec![(sentinel.root(), 1usize, ' ')];
        while let Some((x, depth, side)) = stack.pop() {
            for _ in 0..depth {
                out.push_str("  ");
            }
            if x.is_null() {
                let _ = writeln!(out, "{} -", side);
                continue;
            }
            let n = unsafe { &*x };
            let _ = writeln!(
                out,
                "{} {:?} ({:p} parent {:p})",
                side,
                Node::<T>::key_of(x),
                x,
                n.parent
            );
            if !n.left.is_null() || !n.right.is_null() {
                stack.push((n.right, depth + 1, 'R'));
                stack.push((n.left, depth + 1, 'L'));
            }
        }

        out
    }
}

impl<T: SetParams> std::fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: SetParams> Set<T> {
    pub fn new() -> Self {
        Self {
            sentinel_: Sentinel::new_sentinel(),
            size_: 0,
            key_less: T::KeyCompareType::new(),
            _marker: PhantomData,
        }
    }
}

impl<T: SetParams> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: SetParams> IntoIterator for &'a Set<T> {
    type Item = &'a T::KeyType;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
