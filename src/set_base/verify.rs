use bitmask_enum::bitmask;

use super::{
    engine::{leftmost, rightmost, successor},
    node::Node,
    set::Set,
    set_traits::{KeyComparator, SetParams},
};

#[bitmask(u8)]
pub enum VerifyFlags {
    Ok = 0,
    Unordered = 1,
    BrokenParentLink = 2,
    SizeMismatch = 4,
    BadLeftmost = 8,
    BadRightmost = 16,
    BadRoot = 32,
}

pub struct VerifyReport {
    pub flags: VerifyFlags,
    /// Key nodes reachable from the root.
    pub nodes: usize,
}

impl VerifyReport {
    pub fn has(&self, flag: VerifyFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_ok(&self) -> bool {
        self.flags.is_none()
    }
}

/// Self Verification
impl<T: SetParams> Set<T> {
    /// Walks the whole tree and checks every structural invariant. Calls the
    /// comparator once per adjacent pair of keys.
    pub fn verify(&self) -> VerifyReport {
        let sentinel = self.sentinel();
        let end = sentinel.as_base_ptr();
        let root = sentinel.root();
        let mut flags = VerifyFlags::Ok;

        if !sentinel.base.right.is_null() || !sentinel.base.is_sentinel() {
            flags = flags | VerifyFlags::BadRoot;
        }

        if root.is_null() {
            if sentinel.leftmost != end {
                flags = flags | VerifyFlags::BadLeftmost;
            }
            if sentinel.rightmost != end {
                flags = flags | VerifyFlags::BadRightmost;
            }
            if self.size() != 0 {
                flags = flags | VerifyFlags::SizeMismatch;
            }
            return VerifyReport { flags, nodes: 0 };
        }

        if unsafe { &*root }.parent != end {
            flags = flags | VerifyFlags::BadRoot;
        }
        if sentinel.leftmost != leftmost(root) {
            flags = flags | VerifyFlags::BadLeftmost;
        }
        if sentinel.rightmost != rightmost(root) {
            flags = flags | VerifyFlags::BadRightmost;
        }

        let mut nodes = 0;
        let mut prev = None;
        let mut x = leftmost(root);
        while x != end && nodes <= self.size() {
            let n = unsafe { &*x };
            for child in [n.left, n.right] {
                if !child.is_null() && unsafe { &*child }.parent != x {
                    flags = flags | VerifyFlags::BrokenParentLink;
                }
            }

            let key = Node::<T>::key_of(x);
            if let Some(prev) = prev {
                if !self.key_comp().less(prev, key) {
                    log::trace!("Set::verify: {:?} is not below {:?}", prev, key);
                    flags = flags | VerifyFlags::Unordered;
                }
            }
            prev = Some(key);
            nodes += 1;
            x = successor(x);
        }

        if nodes != self.size() {
            flags = flags | VerifyFlags::SizeMismatch;
        }

        VerifyReport { flags, nodes }
    }

    /// Runs `verify` when the params ask for it.
    pub(crate) fn self_verify(&self, after: &str) {
        if !T::SELF_VERIFY {
            return;
        }
        let report = self.verify();
        if !report.is_ok() {
            log::error!(
                "Set::{} broke the tree (flags {:#08b}, {} nodes, size {})\n{}",
                after,
                report.flags.bits(),
                report.nodes,
                self.size(),
                self.dump()
            );
            panic!("Set::{} broke the tree (flags {:#08b})", after, report.flags.bits());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set_base::DefaultSet;

    #[test]
    fn healthy_trees_verify() {
        let mut set = DefaultSet::<i32>::new();
        assert!(set.verify().is_ok());
        for k in [8, 4, 12, 2, 6, 10, 14, 1] {
            set.insert(k);
        }
        let report = set.verify();
        assert!(report.is_ok());
        assert_eq!(report.nodes, 8);
        set.erase(&8);
        assert!(set.verify().is_ok());
    }

    #[test]
    fn detects_a_swapped_key() {
        let mut set = DefaultSet::<i32>::new();
        for k in [2, 1, 3] {
            set.insert(k);
        }
        unsafe { *set.find_mut(&1).key_mut() = 5 };
        let report = set.verify();
        assert!(report.has(VerifyFlags::Unordered));
        assert!(!report.has(VerifyFlags::SizeMismatch));
        assert!(!report.has(VerifyFlags::BrokenParentLink));
    }
}
