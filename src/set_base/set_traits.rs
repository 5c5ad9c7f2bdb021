use std::fmt::Debug;
use std::marker::PhantomData;

// Traits bound
pub trait KeyComparator<T>: Clone + Debug {
    fn new() -> Self;
    fn less(&self, lhs: &T, rhs: &T) -> bool;
}

pub trait SetParams {
    type KeyType: Debug;
    type KeyCompareType: KeyComparator<Self::KeyType>;
    /// Run `Set::verify` after every mutation and panic on the first violation.
    const SELF_VERIFY: bool;
}

#[derive(Clone, Debug)]
pub struct _Set<TKey: Debug, TCompare, const SELF_VERIFY: bool = false> {
    _phantom_key: PhantomData<TKey>,
    _phantom_compare: PhantomData<TCompare>,
}

impl<TKey: Debug, TCompare: KeyComparator<TKey>, const VERIFY: bool> SetParams
    for _Set<TKey, TCompare, VERIFY>
{
    type KeyType = TKey;
    type KeyCompareType = TCompare;
    const SELF_VERIFY: bool = VERIFY;
}
