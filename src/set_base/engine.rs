//! Structural algorithms over raw node links.
//!
//! Nothing here touches the element count; the container owns that. Search
//! functions only read links and call the comparator, so a panicking
//! comparator leaves the tree exactly as it was. Link surgery (`link_new`,
//! `unlink`, `teardown`) never calls the comparator.

use std::ptr::null_mut;

use super::{
    macros::{extreme, step},
    node::{Node, NodeBase, Sentinel},
    set_traits::{KeyComparator, SetParams},
};

/// Where a key would go.
pub enum InsertPosition {
    /// An equal key already lives in this node.
    Occupied(*mut NodeBase),
    /// Attach under `parent`, on its left when `left` is set. For an empty
    /// tree `parent` is the sentinel and the node becomes the root.
    Vacant { parent: *mut NodeBase, left: bool },
}

/// Structural cases of `unlink`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlinkCase {
    Leaf,
    OneChild,
    TwoChildren,
}

#[inline]
pub fn leftmost(x: *mut NodeBase) -> *mut NodeBase {
    unsafe { extreme!(x, left) }
}

#[inline]
pub fn rightmost(x: *mut NodeBase) -> *mut NodeBase {
    unsafe { extreme!(x, right) }
}

/// In-order successor. The successor of the maximum is the sentinel.
#[inline]
pub fn successor(x: *mut NodeBase) -> *mut NodeBase {
    debug_assert!(!unsafe { &*x }.is_sentinel(), "stepped past the end");
    step!(x, right, left)
}

/// In-order predecessor. The predecessor of the sentinel is the maximum.
#[inline]
pub fn predecessor(x: *mut NodeBase) -> *mut NodeBase {
    let n = unsafe { &*x };
    if n.is_sentinel() {
        return n.as_sentinel().rightmost;
    }
    step!(x, left, right)
}

/// The sentinel of the tree that `x` is linked into. O(h).
pub fn owner(x: *mut NodeBase) -> *mut NodeBase {
    let mut x = x;
    unsafe {
        while !(*x).parent.is_null() {
            x = (*x).parent;
        }
    }
    x
}

/// Three-way descent. Returns the sentinel if the key is absent.
pub fn find<T: SetParams>(
    sentinel: &Sentinel,
    key_less: &T::KeyCompareType,
    key: &T::KeyType,
) -> *mut NodeBase {
    let mut x = sentinel.root();
    while !x.is_null() {
        let node_key = Node::<T>::key_of(x);
        if key_less.less(key, node_key) {
            x = unsafe { &*x }.left;
        } else if key_less.less(node_key, key) {
            x = unsafe { &*x }.right;
        } else {
            return x;
        }
    }
    sentinel.as_base_ptr()
}

/// First node whose key is not less than `key`, or the sentinel.
pub fn lower_bound<T: SetParams>(
    sentinel: &Sentinel,
    key_less: &T::KeyCompareType,
    key: &T::KeyType,
) -> *mut NodeBase {
    let mut result = sentinel.as_base_ptr();
    let mut x = sentinel.root();
    while !x.is_null() {
        if !key_less.less(Node::<T>::key_of(x), key) {
            result = x;
            x = unsafe { &*x }.left;
        } else {
            x = unsafe { &*x }.right;
        }
    }
    result
}

/// First node whose key is greater than `key`, or the sentinel.
pub fn upper_bound<T: SetParams>(
    sentinel: &Sentinel,
    key_less: &T::KeyCompareType,
    key: &T::KeyType,
) -> *mut NodeBase {
    let mut result = sentinel.as_base_ptr();
    let mut x = sentinel.root();
    while !x.is_null() {
        if key_less.less(key, Node::<T>::key_of(x)) {
            result = x;
            x = unsafe { &*x }.left;
        } else {
            x = unsafe { &*x }.right;
        }
    }
    result
}

pub fn insert_position<T: SetParams>(
    sentinel: &Sentinel,
    key_less: &T::KeyCompareType,
    key: &T::KeyType,
) -> InsertPosition {
    let mut parent = sentinel.as_base_ptr();
    let mut left = true;
    let mut x = sentinel.root();
    while !x.is_null() {
        parent = x;
        let node_key = Node::<T>::key_of(x);
        if key_less.less(key, node_key) {
            left = true;
            x = unsafe { &*x }.left;
        } else if key_less.less(node_key, key) {
            left = false;
            x = unsafe { &*x }.right;
        } else {
            return InsertPosition::Occupied(x);
        }
    }
    log::trace!("insert_position: vacant under {:p} (left: {})", parent, left);
    InsertPosition::Vacant { parent, left }
}

/// Hangs a freshly allocated node under `parent` and keeps the sentinel's
/// extremes current. A new minimum can only appear as the left child of the
/// old one, a new maximum only as the right child of the old one.
pub fn link_new(sentinel: &mut Sentinel, node: *mut NodeBase, parent: *mut NodeBase, left: bool) {
    debug_assert!(unsafe { &*node }.parent == parent);
    if parent == sentinel.as_base_ptr() {
        debug_assert!(sentinel.is_empty());
        sentinel.base.left = node;
        sentinel.leftmost = node;
        sentinel.rightmost = node;
    } else if left {
        unsafe { &mut *parent }.left = node;
        if parent == sentinel.leftmost {
            sentinel.leftmost = node;
        }
    } else {
        unsafe { &mut *parent }.right = node;
        if parent == sentinel.rightmost {
            sentinel.rightmost = node;
        }
    }
}

/// Points the parent's link that referenced `old` at `new`.
fn replace_child(old: *mut NodeBase, new: *mut NodeBase) {
    let p = unsafe { &*old }.parent;
    let parent = unsafe { &mut *p };
    // the sentinel only links the root through `left`
    if parent.left == old {
        parent.left = new;
    } else {
        debug_assert!(parent.right == old);
        parent.right = new;
    }
    if !new.is_null() {
        unsafe { &mut *new }.parent = p;
    }
}

/// Detaches `z` from the tree without freeing it. A node with two children
/// is replaced by its successor node, which is moved into `z`'s position;
/// no other node changes identity. Only `z`'s child links are cleared.
pub fn unlink(sentinel: &mut Sentinel, z: *mut NodeBase) -> UnlinkCase {
    debug_assert!(!unsafe { &*z }.is_sentinel(), "cannot unlink the sentinel");

    // advance the extremes while z is still linked
    if z == sentinel.leftmost {
        sentinel.leftmost = successor(z);
    }
    if z == sentinel.rightmost {
        let zn = unsafe { &*z };
        sentinel.rightmost = if !zn.left.is_null() {
            rightmost(zn.left)
        } else {
            zn.parent
        };
    }

    let (zl, zr) = {
        let zn = unsafe { &*z };
        (zn.left, zn.right)
    };

    let case = if zl.is_null() || zr.is_null() {
        let child = if zl.is_null() { zr } else { zl };
        replace_child(z, child);
        if child.is_null() {
            UnlinkCase::Leaf
        } else {
            UnlinkCase::OneChild
        }
    } else {
        let y = leftmost(zr);
        if y != zr {
            replace_child(y, unsafe { &*y }.right);
            unsafe { &mut *y }.right = zr;
            unsafe { &mut *zr }.parent = y;
        }
        replace_child(z, y);
        unsafe { &mut *y }.left = zl;
        unsafe { &mut *zl }.parent = y;
        UnlinkCase::TwoChildren
    };

    if sentinel.is_empty() {
        sentinel.reset();
    }

    // parent stays set: a null parent marks the sentinel
    let zn = unsafe { &mut *z };
    zn.left = null_mut();
    zn.right = null_mut();

    case
}

/// Frees every node below `root`, `root` included, and clears the parent's
/// link to it. Walks parent links instead of recursing.
pub fn teardown<T: SetParams>(root: *mut NodeBase) -> usize {
    if root.is_null() {
        return 0;
    }
    let stop = unsafe { &*root }.parent;
    let mut freed = 0;
    let mut x = root;
    while x != stop {
        let n = unsafe { &mut *x };
        if !n.left.is_null() {
            x = n.left;
        } else if !n.right.is_null() {
            x = n.right;
        } else {
            let p = unsafe { &mut *n.parent };
            if p.left == x {
                p.left = null_mut();
            } else {
                p.right = null_mut();
            }
            Node::<T>::free_node(x);
            freed += 1;
            x = p as *mut NodeBase;
        }
    }
    freed
}

/// Copies the tree under `src` into the empty `dst`, keeping its shape.
///
/// Each copy is linked into `dst` and counted in `copied` right after
/// allocation, so when `Clone` panics halfway the partial tree is still owned
/// by `dst` and goes away with it. `dst`'s extremes are only set once the
/// copy is complete.
pub fn clone_tree<T: SetParams>(src: &Sentinel, dst: &mut Sentinel, copied: &mut usize)
where
    T::KeyType: Clone,
{
    debug_assert!(dst.is_empty());
    let src_root = src.root();
    if src_root.is_null() {
        return;
    }

    let dst_base = dst.as_base_ptr();
    let mut s = src_root;
    let mut d = Node::<T>::new_node(Node::<T>::key_of(s).clone(), dst_base);
    dst.base.left = d;
    *copied += 1;

    loop {
        let (sn, dn) = unsafe { (&*s, &mut *d) };
        if !sn.left.is_null() && dn.left.is_null() {
            s = sn.left;
            let key = Node::<T>::key_of(s).clone();
            dn.left = Node::<T>::new_node(key, d);
            d = dn.left;
            *copied += 1;
        } else if !sn.right.is_null() && dn.right.is_null() {
            s = sn.right;
            let key = Node::<T>::key_of(s).clone();
            dn.right = Node::<T>::new_node(key, d);
            d = dn.right;
            *copied += 1;
        } else if s == src_root {
            break;
        } else {
            s = sn.parent;
            d = dn.parent;
        }
    }

    let root = dst.root();
    dst.leftmost = leftmost(root);
    dst.rightmost = rightmost(root);
}
