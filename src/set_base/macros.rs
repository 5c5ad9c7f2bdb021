/// Follows `$link` from `$from` as far as it goes. Expands to raw pointer
/// reads, so it must sit inside an `unsafe` block.
macro_rules! extreme {
    ($from:expr, $link:ident) => {{
        let mut x: *mut NodeBase = $from;
        while !(*x).$link.is_null() {
            x = (*x).$link;
        }
        x
    }};
}

/// In-order neighbour of `$from` on the `$near` side; `$far` is the opposite
/// link. Stepping right is `step!(x, right, left)`.
macro_rules! step {
    ($from:expr, $near:ident, $far:ident) => {{
        let mut x: *mut NodeBase = $from;
        unsafe {
            if !(*x).$near.is_null() {
                x = extreme!((*x).$near, $far);
            } else {
                let mut p = (*x).parent;
                while x == (*p).$near {
                    x = p;
                    p = (*p).parent;
                    debug_assert!(!p.is_null(), "stepped past the first element");
                }
                x = p;
            }
        }
        x
    }};
}

pub(crate) use extreme;
pub(crate) use step;
