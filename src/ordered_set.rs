use std::fmt::Debug;

use crate::set_base::{
    iter::Iter,
    set::Set,
    set_traits::SetParams,
    DefaultSetConfig,
};

/// Set with the usual Rust collection surface over [`Set`].
pub struct OrderedSet<T: SetParams> {
    _tree: Set<T>,
}

impl<T: SetParams> OrderedSet<T> {
    pub fn new() -> Self {
        Self { _tree: Set::new() }
    }

    pub fn is_empty(&self) -> bool {
        self._tree.empty()
    }

    pub fn len(&self) -> usize {
        self._tree.size()
    }

    pub fn contains(&self, key: &T::KeyType) -> bool {
        self._tree.exists(key)
    }

    /// Returns `false` and drops `key` if an equal key is already present.
    pub fn insert(&mut self, key: T::KeyType) -> bool {
        self._tree.insert(key).1
    }

    pub fn remove(&mut self, key: &T::KeyType) -> bool {
        self._tree.erase(key) == 1
    }

    pub fn get(&self, key: &T::KeyType) -> Option<&T::KeyType> {
        self._tree.get(self._tree.find(key))
    }

    pub fn first(&self) -> Option<&T::KeyType> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<&T::KeyType> {
        self.iter().next_back()
    }

    /// Smallest key not less than `key`.
    pub fn ceiling(&self, key: &T::KeyType) -> Option<&T::KeyType> {
        self._tree.get(self._tree.lower_bound(key))
    }

    /// Smallest key greater than `key`.
    pub fn successor(&self, key: &T::KeyType) -> Option<&T::KeyType> {
        self._tree.get(self._tree.upper_bound(key))
    }

    pub fn clear(&mut self) {
        self._tree.clear();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self._tree.iter()
    }

    /// The underlying set, with its position-based interface.
    pub fn as_set(&self) -> &Set<T> {
        &self._tree
    }

    pub fn as_set_mut(&mut self) -> &mut Set<T> {
        &mut self._tree
    }
}

impl<T: SetParams> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SetParams> Clone for OrderedSet<T>
where
    T::KeyType: Clone,
{
    fn clone(&self) -> Self {
        Self {
            _tree: self._tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self._tree.clone_from(&source._tree);
    }
}

impl<T: SetParams> Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self._tree.fmt(f)
    }
}

impl<T: SetParams> PartialEq for OrderedSet<T>
where
    T::KeyType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: SetParams> Eq for OrderedSet<T> where T::KeyType: Eq {}

impl<T: SetParams> Extend<T::KeyType> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T::KeyType>>(&mut self, iter: I) {
        for key in iter {
            self._tree.insert(key);
        }
    }
}

impl<T: SetParams> FromIterator<T::KeyType> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T::KeyType>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a, T: SetParams> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T::KeyType;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub type DefaultOrderedSet<K> = OrderedSet<DefaultSetConfig<K>>;
