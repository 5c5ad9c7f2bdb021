use std::marker::PhantomData;

use super::{node::NodeBase, set_traits::SetParams};

/// Shape of a tree at the moment it was measured.
pub struct TreeStats<T: SetParams> {
    _phantom: PhantomData<T>,
    pub size: usize,
    pub leaves: usize,
    /// Nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub height: usize,
    pub total_depth: usize,
}

impl<T: SetParams> TreeStats<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
            size: 0,
            leaves: 0,
            height: 0,
            total_depth: 0,
        }
    }

    /// Measures the tree under `root` with an explicit stack, so degenerate
    /// trees are fine.
    pub(crate) fn measure(root: *mut NodeBase) -> Self {
        let mut stats = Self::new();
        if root.is_null() {
            return stats;
        }

        let mut stack = vec![(root, 1usize)];
        while let Some((x, depth)) = stack.pop() {
            let n = unsafe { &*x };
            stats.size += 1;
            stats.total_depth += depth;
            stats.height = stats.height.max(depth);
            if n.left.is_null() && n.right.is_null() {
                stats.leaves += 1;
            }
            for child in [n.left, n.right] {
                if !child.is_null() {
                    stack.push((child, depth + 1));
                }
            }
        }

        stats
    }

    pub fn avg_depth(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        self.total_depth as f64 / self.size as f64
    }
}

impl<T: SetParams> Default for TreeStats<T> {
    fn default() -> Self {
        Self::new()
    }
}
