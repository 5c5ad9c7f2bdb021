use std::ptr::null_mut;

use super::set_traits::SetParams;

/// Link header shared by key nodes and the sentinel. `left` and `right` own
/// their subtrees, `parent` is a plain back-reference.
#[derive(Debug)]
#[repr(C)]
pub struct NodeBase {
    pub left: *mut NodeBase,
    pub right: *mut NodeBase,
    pub parent: *mut NodeBase,
}

#[repr(C)]
pub struct Node<Tree: SetParams> {
    pub base: NodeBase,
    pub key: Tree::KeyType,
}

/// The end node. Its header `left` is the root and its header `right` stays
/// null; the extremes are tracked in separate fields so that stepping up
/// from the maximum stops here.
#[derive(Debug)]
#[repr(C)]
pub struct Sentinel {
    pub base: NodeBase,
    pub leftmost: *mut NodeBase,
    pub rightmost: *mut NodeBase,
}

impl NodeBase {
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.parent.is_null()
    }

    #[inline]
    pub fn as_node_ptr<Tree: SetParams>(&self) -> *mut Node<Tree> {
        self as *const NodeBase as *mut Node<Tree>
    }

    #[inline]
    pub fn as_node<Tree: SetParams>(&self) -> &Node<Tree> {
        debug_assert!(!self.is_sentinel());
        unsafe { &*self.as_node_ptr() }
    }

    #[inline]
    pub fn as_sentinel_ptr(&self) -> *mut Sentinel {
        self as *const NodeBase as *mut Sentinel
    }

    #[inline]
    pub fn as_sentinel(&self) -> &Sentinel {
        debug_assert!(self.is_sentinel());
        unsafe { &*self.as_sentinel_ptr() }
    }
}

impl<Tree: SetParams> Node<Tree> {
    pub fn new_node(key: Tree::KeyType, parent: *mut NodeBase) -> *mut NodeBase {
        debug_assert!(!parent.is_null());
        Box::into_raw(Box::new(Node::<Tree> {
            base: NodeBase {
                left: null_mut(),
                right: null_mut(),
                parent,
            },
            key,
        })) as *mut NodeBase
    }

    /// Releases a node that is no longer linked anywhere.
    pub fn free_node(node: *mut NodeBase) {
        debug_assert!(!unsafe { &*node }.is_sentinel());
        drop(unsafe { Box::from_raw(node as *mut Node<Tree>) });
    }

    #[inline]
    pub fn key_of<'a>(node: *mut NodeBase) -> &'a Tree::KeyType
    where
        Tree: 'a,
    {
        &unsafe { &*node }.as_node::<Tree>().key
    }
}

impl Sentinel {
    /// Allocates an empty sentinel linked to itself at both extremes.
    pub fn new_sentinel() -> *mut Sentinel {
        let sentinel = Box::into_raw(Box::new(Sentinel {
            base: NodeBase {
                left: null_mut(),
                right: null_mut(),
                parent: null_mut(),
            },
            leftmost: null_mut(),
            rightmost: null_mut(),
        }));
        unsafe { &mut *sentinel }.reset();
        sentinel
    }

    pub fn free_sentinel(sentinel: *mut Sentinel) {
        drop(unsafe { Box::from_raw(sentinel) });
    }

    #[inline]
    pub fn as_base_ptr(&self) -> *mut NodeBase {
        self as *const Sentinel as *mut NodeBase
    }

    #[inline]
    pub fn root(&self) -> *mut NodeBase {
        self.base.left
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.left.is_null()
    }

    /// Forgets the tree and self-links both extremes.
    pub fn reset(&mut self) {
        let this = self.as_base_ptr();
        self.base.left = null_mut();
        self.leftmost = this;
        self.rightmost = this;
    }
}
