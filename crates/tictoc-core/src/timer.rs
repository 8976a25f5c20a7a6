//! Instrumentation points: RAII guards that record into a subject's
//! [`Registry`] when they drop.
//!
//! Both guards are inert when the subject has no registry or the registry is
//! disabled: construction then does nothing beyond the option check, so
//! instrumentation can stay in place on objects that are sometimes used
//! unmeasured. Recording happens in `Drop`, which runs on every exit path
//! out of the governed scope, early returns and panic unwinds included; the
//! guards never catch, alter, or suppress a panic from the timed code.

use crate::clock::{Clock, HostClock};
use crate::registry::{Instrumented, Registry};

/// Default nesting level for a block opened directly inside a level-0 method.
pub const DEFAULT_BLOCK_LEVEL: u32 = 1;

struct Armed {
    registry: Registry,
    name: String,
    level: u32,
    parent: Option<String>,
    clock: Box<dyn Clock>,
}

impl Armed {
    fn arm<S: Instrumented + ?Sized>(
        subject: &S,
        name: &str,
        level: u32,
        parent: Option<&str>,
        clock: impl Clock + 'static,
    ) -> Option<Self> {
        let registry = subject.registry()?;
        if !registry.enabled() {
            return None;
        }
        let mut clock: Box<dyn Clock> = Box::new(clock);
        clock.mark_start();
        Some(Self {
            registry: registry.clone(),
            name: name.to_string(),
            level,
            parent: parent.map(str::to_string),
            clock,
        })
    }

    fn finish(mut self) {
        let elapsed_ms = self.clock.mark_stop();
        self.registry
            .record(&self.name, self.level, self.parent.as_deref(), elapsed_ms);
    }
}

/// Times one execution of a method body, recording under the method's name
/// at level 0 with no parent.
///
/// Start it on the first line of the method; the sample is recorded when the
/// guard drops at scope exit:
///
/// ```ignore
/// fn transform(&mut self) {
///     let _t = MethodTimer::start(self, "transform");
///     // ... body ...
/// }
/// ```
pub struct MethodTimer {
    armed: Option<Armed>,
}

impl MethodTimer {
    /// Host-clock timer. Inert if `subject` has no registry or it is
    /// disabled.
    pub fn start<S: Instrumented + ?Sized>(subject: &S, name: &str) -> Self {
        Self::start_with_clock(subject, name, HostClock::new())
    }

    /// Same, with a caller-supplied clock (e.g. a device stream clock).
    pub fn start_with_clock<S: Instrumented + ?Sized>(
        subject: &S,
        name: &str,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            armed: Armed::arm(subject, name, 0, None, clock),
        }
    }
}

impl Drop for MethodTimer {
    fn drop(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.finish();
        }
    }
}

/// Times a named sub-region inside an already-instrumented method at a
/// caller-specified nesting level and parent name.
///
/// ```ignore
/// let _b = ScopedBlockTimer::child_of(self, "transform.window", "transform");
/// ```
pub struct ScopedBlockTimer {
    armed: Option<Armed>,
}

impl ScopedBlockTimer {
    /// Host-clock block timer. Inert if `subject` has no registry or it is
    /// disabled; entry and exit never fail.
    pub fn new<S: Instrumented + ?Sized>(
        subject: &S,
        name: &str,
        parent: Option<&str>,
        level: u32,
    ) -> Self {
        Self::new_with_clock(subject, name, parent, level, HostClock::new())
    }

    /// Direct child of a level-0 method: level [`DEFAULT_BLOCK_LEVEL`],
    /// parent = the enclosing method's name.
    pub fn child_of<S: Instrumented + ?Sized>(subject: &S, name: &str, parent: &str) -> Self {
        Self::new(subject, name, Some(parent), DEFAULT_BLOCK_LEVEL)
    }

    /// Same as [`new`](Self::new), with a caller-supplied clock.
    pub fn new_with_clock<S: Instrumented + ?Sized>(
        subject: &S,
        name: &str,
        parent: Option<&str>,
        level: u32,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            armed: Armed::arm(subject, name, level, parent, clock),
        }
    }
}

impl Drop for ScopedBlockTimer {
    fn drop(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.finish();
        }
    }
}

/// Higher-order rendition of [`MethodTimer`]: run `body` under a level-0
/// timer named `name` and return its value unchanged.
///
/// The guard holds only a registry handle, so the subject is passed back
/// into the closure mutably:
///
/// ```ignore
/// time_method(&mut pipeline, "ingest", |p| p.ingest_inner())
/// ```
pub fn time_method<S: Instrumented, R>(
    subject: &mut S,
    name: &str,
    body: impl FnOnce(&mut S) -> R,
) -> R {
    let guard = MethodTimer::start(subject, name);
    let out = body(subject);
    drop(guard);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct Probe {
        registry: Option<Registry>,
    }

    impl Probe {
        fn bare() -> Self {
            Self { registry: None }
        }

        fn instrumented(enabled: bool) -> Self {
            Self {
                registry: Some(Registry::new(enabled)),
            }
        }
    }

    impl Instrumented for Probe {
        fn registry(&self) -> Option<&Registry> {
            self.registry.as_ref()
        }

        fn set_registry(&mut self, registry: Option<Registry>) {
            self.registry = registry;
        }
    }

    /// Deterministic clock: every interval is exactly `0` ms wall time but
    /// reports the configured constant.
    struct FixedClock(f64);

    impl Clock for FixedClock {
        fn mark_start(&mut self) {}

        fn mark_stop(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_uninstrumented_subject_is_untouched() {
        let probe = Probe::bare();
        {
            let _m = MethodTimer::start(&probe, "step");
            let _b = ScopedBlockTimer::new(&probe, "step.inner", Some("step"), 1);
        }
        // No registry created as a side effect.
        assert!(probe.registry.is_none());
    }

    #[test]
    fn test_disabled_registry_unchanged() {
        let probe = Probe::instrumented(false);
        {
            let _m = MethodTimer::start_with_clock(&probe, "step", FixedClock(2.0));
        }
        assert!(probe.registry.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_method_timer_accumulates() {
        let probe = Probe::instrumented(true);
        for _ in 0..3 {
            let _m = MethodTimer::start_with_clock(&probe, "step", FixedClock(2.0));
        }
        let snap = probe.registry.as_ref().unwrap().snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].name, "step");
        assert_eq!(snap[0].level, 0);
        assert!(snap[0].parent.is_none());
        assert_eq!(snap[0].count, 3);
        assert!((snap[0].total_ms - 6.0).abs() < 1e-12);
        assert_eq!(snap[0].mean_ms(), Some(2.0));
        assert_eq!(snap[0].std_ms(), Some(0.0));
    }

    #[test]
    fn test_block_timer_records_level_and_parent() {
        let probe = Probe::instrumented(true);
        {
            let _m = MethodTimer::start_with_clock(&probe, "run", FixedClock(5.0));
            let _b = ScopedBlockTimer::new_with_clock(
                &probe,
                "run.load",
                Some("run"),
                1,
                FixedClock(2.0),
            );
        }
        let snap = probe.registry.as_ref().unwrap().snapshot();
        // Inner guard drops first, so the block precedes the method in
        // creation order.
        assert_eq!(snap[0].name, "run.load");
        assert_eq!(snap[0].level, 1);
        assert_eq!(snap[0].parent.as_deref(), Some("run"));
        assert_eq!(snap[1].name, "run");
    }

    #[test]
    fn test_panic_still_records_and_propagates() {
        let probe = Probe::instrumented(true);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _m = MethodTimer::start_with_clock(&probe, "boom", FixedClock(1.0));
            panic!("kaput");
        }));
        let err = result.unwrap_err();
        assert_eq!(err.downcast_ref::<&str>(), Some(&"kaput"));

        let snap = probe.registry.as_ref().unwrap().snapshot();
        assert_eq!(snap[0].name, "boom");
        assert_eq!(snap[0].count, 1);
    }

    #[test]
    fn test_disable_between_start_and_drop_skips_sample() {
        let probe = Probe::instrumented(true);
        {
            let _m = MethodTimer::start_with_clock(&probe, "step", FixedClock(1.0));
            probe.registry.as_ref().unwrap().set_enabled(false);
        }
        assert!(probe.registry.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_time_method_returns_value() {
        let mut probe = Probe::instrumented(true);
        let out = time_method(&mut probe, "answer", |p| {
            let _b = ScopedBlockTimer::child_of(p, "answer.inner", "answer");
            42
        });
        assert_eq!(out, 42);
        let snap = probe.registry.as_ref().unwrap().snapshot();
        let names: Vec<_> = snap.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"answer"));
        assert!(names.contains(&"answer.inner"));
    }
}
