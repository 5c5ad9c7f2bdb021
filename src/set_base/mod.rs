mod copy;
mod engine;
pub mod iter;
mod macros;
mod node;
pub mod set;
pub mod set_traits;
pub mod tree_stats;
pub mod verify;

use self::{
    set::Set,
    set_traits::{KeyComparator, _Set},
};
use std::{fmt::Debug, marker::PhantomData};

#[derive(Debug)]
pub struct DefaultKeyComparator<T> {
    _t: PhantomData<T>,
}

// not derived: the key itself need not be `Clone`
impl<T> Clone for DefaultKeyComparator<T> {
    fn clone(&self) -> Self {
        Self { _t: PhantomData }
    }
}

impl<T> KeyComparator<T> for DefaultKeyComparator<T>
where
    T: Ord + Debug,
{
    fn new() -> Self {
        Self { _t: PhantomData }
    }
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }
}

pub type DefaultSetConfig<K> = _Set<K, DefaultKeyComparator<K>>;
pub type VerifiedSetConfig<K> = _Set<K, DefaultKeyComparator<K>, true>;
pub type DefaultSet<K> = Set<DefaultSetConfig<K>>;
pub type VerifiedSet<K> = Set<VerifiedSetConfig<K>>;
