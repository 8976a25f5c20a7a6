//! Per-subject store of named timing accumulators.
//!
//! A [`Registry`] is a cheap-clone handle: the subject owns one and every
//! instrumentation point or [`TimerGroup`](crate::TimerGroup) that needs the
//! same store clones the handle. The inner state is `Rc<RefCell<_>>` on
//! purpose: the timing model is single-threaded, and a `!Send` handle turns
//! that contract into a compile-time fact rather than a data race.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::stat::BlockStat;

/// A type whose methods and blocks can be timed.
///
/// Implementors hold an `Option<Registry>` field and expose it here; a
/// subject without a registry is simply uninstrumented, and every timing
/// point degrades to a no-op for it.
pub trait Instrumented {
    /// Handle to this subject's registry, if one has been installed.
    fn registry(&self) -> Option<&Registry>;

    /// Install or remove the registry. Called by
    /// [`TimerGroup::attach`](crate::TimerGroup::attach).
    fn set_registry(&mut self, registry: Option<Registry>);
}

struct RegistryInner {
    enabled: bool,
    /// Stats in creation order; rendering depends on this order.
    order: Vec<BlockStat>,
    /// Name → index into `order`, so per-call lookup is O(1) instead of a
    /// linear scan over every distinct block name.
    index: HashMap<String, usize>,
}

/// Shared handle to one subject's timing store: an enabled flag plus an
/// insertion-ordered, name-unique collection of [`BlockStat`].
#[derive(Clone)]
pub struct Registry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl Registry {
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                enabled,
                order: Vec::new(),
                index: HashMap::new(),
            })),
        }
    }

    pub fn enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    /// Gate whether new samples are recorded. Never touches existing stats.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.borrow_mut().enabled = enabled;
    }

    /// Drop every accumulator. The enabled flag is untouched.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.order.clear();
        inner.index.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().order.len()
    }

    /// Fold one sample into the accumulator named `name`, creating it at
    /// `(level, parent)` on first use. A later call with a different level
    /// or parent reuses the existing entry unchanged: names are unique and
    /// the first creation wins.
    ///
    /// No-op while disabled, so a guard armed before `disable()` does not
    /// record after it.
    pub fn record(&self, name: &str, level: u32, parent: Option<&str>, elapsed_ms: f64) {
        let mut inner = self.inner.borrow_mut();
        if !inner.enabled {
            return;
        }
        match inner.index.get(name).copied() {
            Some(i) => inner.order[i].update(elapsed_ms),
            None => {
                let mut stat = BlockStat::new(name, level, parent);
                stat.update(elapsed_ms);
                let i = inner.order.len();
                inner.index.insert(name.to_string(), i);
                inner.order.push(stat);
            }
        }
    }

    /// Point-in-time copy of every accumulator in creation order. The
    /// renderer works off this snapshot so it is safe to call mid-flight.
    pub fn snapshot(&self) -> Vec<BlockStat> {
        self.inner.borrow().order.clone()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Registry")
            .field("enabled", &inner.enabled)
            .field("blocks", &inner.order.len())
            .finish()
    }
}
