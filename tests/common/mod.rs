#![allow(dead_code)]

use std::{
    cell::Cell,
    cmp::Ordering,
    fmt,
    panic::{self, AssertUnwindSafe},
};

use bst_set::set_base::{set::Set, set_traits::_Set, DefaultKeyComparator, DefaultSet};

thread_local! {
    static LIVE: Cell<isize> = Cell::new(0);
    static FAULT_AFTER: Cell<Option<usize>> = Cell::new(None);
}

/// Payload of an injected panic.
#[derive(Debug)]
pub struct InjectedFault;

/// Counts down to an injected panic. Every comparison and every clone of an
/// [`Element`] is one step.
pub fn fault_point() {
    FAULT_AFTER.with(|f| match f.get() {
        Some(0) => {
            f.set(None);
            panic::panic_any(InjectedFault);
        }
        Some(n) => f.set(Some(n - 1)),
        None => {}
    });
}

/// Switches fault injection off until dropped.
pub struct FaultInjectionDisable {
    saved: Option<usize>,
}

impl FaultInjectionDisable {
    pub fn new() -> Self {
        Self {
            saved: FAULT_AFTER.with(|f| f.replace(None)),
        }
    }
}

impl Drop for FaultInjectionDisable {
    fn drop(&mut self) {
        FAULT_AFTER.with(|f| f.set(self.saved));
    }
}

/// An `i32` key whose comparison and clone may panic, and which counts its
/// live instances.
pub struct Element(i32);

impl Element {
    pub fn new(value: i32) -> Self {
        LIVE.with(|c| c.set(c.get() + 1));
        Element(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn live() -> isize {
        LIVE.with(|c| c.get())
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::new(value)
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        fault_point();
        Element::new(self.0)
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        LIVE.with(|c| c.set(c.get() - 1));
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Element {}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        fault_point();
        self.0.cmp(&other.0)
    }
}

pub type ElementSet = Set<_Set<Element, DefaultKeyComparator<Element>>>;

/// Fails the test if the scope leaks or double-frees elements.
pub struct NoNewInstancesGuard {
    start: isize,
}

impl NoNewInstancesGuard {
    pub fn new() -> Self {
        Self {
            start: Element::live(),
        }
    }
}

impl Drop for NoNewInstancesGuard {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert_eq!(self.start, Element::live(), "elements leaked or freed twice");
        }
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs `f` with a panic injected at step 0, then step 1, and so on, until
/// a run completes without reaching the fault. Any panic other than the
/// injected one fails the test.
pub fn faulty_run(f: impl Fn()) {
    let start = Element::live();
    let mut skip = 0;
    loop {
        FAULT_AFTER.with(|c| c.set(Some(skip)));
        let result = panic::catch_unwind(AssertUnwindSafe(&f));
        FAULT_AFTER.with(|c| c.set(None));
        match result {
            Ok(()) => break,
            Err(payload) if payload.is::<InjectedFault>() => skip += 1,
            Err(payload) => panic::resume_unwind(payload),
        }
        assert_eq!(start, Element::live(), "faulted run leaked elements");
    }
    assert_eq!(start, Element::live(), "run leaked elements");
}

/// Runs `f` with a fault armed at the very first comparison or clone, so
/// `f` fails if it performs either.
pub fn assert_no_fault_points<R>(f: impl FnOnce() -> R) -> R {
    FAULT_AFTER.with(|c| c.set(Some(0)));
    let r = f();
    let untouched = FAULT_AFTER.with(|c| c.replace(None)) == Some(0);
    assert!(untouched);
    r
}

pub fn values(c: &ElementSet) -> Vec<i32> {
    let _dg = FaultInjectionDisable::new();
    c.iter().map(Element::value).collect()
}

/// Runs `op` on `c`; if it panics, checks that `c` still holds exactly what
/// it held before and re-raises the panic.
pub fn strong_exception_safety<R>(c: &mut ElementSet, op: impl FnOnce(&mut ElementSet) -> R) -> R {
    let expected = values(c);
    let expected_size = c.size();
    match panic::catch_unwind(AssertUnwindSafe(|| op(&mut *c))) {
        Ok(r) => r,
        Err(payload) => {
            let _dg = FaultInjectionDisable::new();
            assert_eq!(expected, values(c));
            assert_eq!(expected_size, c.size());
            assert!(c.verify().is_ok());
            panic::resume_unwind(payload)
        }
    }
}

pub fn mass_insert(c: &mut ElementSet, values: &[i32]) {
    for &v in values {
        c.insert(Element::new(v));
    }
}

/// Inserts 1..=count (times `factor`) in an order that keeps the tree
/// balanced.
pub fn mass_insert_balanced(c: &mut DefaultSet<i64>, count: i64, factor: i64) {
    let mut i = 1i64 << (63 - count.leading_zeros());
    while i > 0 {
        let mut j = i;
        while j <= count {
            c.insert(j * factor);
            j += i * 2;
        }
        i /= 2;
    }
}
