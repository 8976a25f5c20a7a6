//! Labeled collection of subjects whose registries are driven together.

use std::fmt;

use tracing::debug;

use crate::registry::{Instrumented, Registry};
use crate::report::{self, ReportError};

/// Binds an ordered list of (label, subject) members, broadcasts
/// enable/disable/reset to their registries, and renders the group report.
///
/// ```ignore
/// let mut group = TimerGroup::new(true);
/// group.attach("Pipeline", &mut pipeline);
/// group.attach("Resampler", &mut pipeline.resampler);
/// pipeline.run();
/// println!("{}", group.render()?);
/// ```
pub struct TimerGroup {
    /// Flag installed into newly attached members; tracks the last
    /// enable()/disable() broadcast.
    enabled: bool,
    members: Vec<(String, Registry)>,
}

impl TimerGroup {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            members: Vec::new(),
        }
    }

    /// Install a fresh, empty registry into `subject` (replacing any
    /// previous one) and add it to the group. Returns a handle to the new
    /// registry.
    pub fn attach<S: Instrumented + ?Sized>(
        &mut self,
        label: impl Into<String>,
        subject: &mut S,
    ) -> Registry {
        let label = label.into();
        let registry = Registry::new(self.enabled);
        subject.set_registry(Some(registry.clone()));
        debug!(target: "tictoc", label = %label, enabled = self.enabled, "attached subject");
        self.members.push((label, registry.clone()));
        registry
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Resume recording on every member. Prior statistics are kept;
    /// accumulation continues on top of them.
    pub fn enable(&mut self) {
        self.enabled = true;
        for (_, registry) in &self.members {
            registry.set_enabled(true);
        }
        debug!(target: "tictoc", members = self.members.len(), "timers enabled");
    }

    /// Stop recording on every member without touching existing statistics.
    pub fn disable(&mut self) {
        self.enabled = false;
        for (_, registry) in &self.members {
            registry.set_enabled(false);
        }
        debug!(target: "tictoc", members = self.members.len(), "timers disabled");
    }

    /// Clear every member's statistics. Labels, subjects, and enabled flags
    /// are untouched.
    pub fn reset(&mut self) {
        for (_, registry) in &self.members {
            registry.reset();
        }
        debug!(target: "tictoc", members = self.members.len(), "timers reset");
    }

    /// Render the hierarchical report over all members, in attach order.
    pub fn render(&self) -> Result<String, ReportError> {
        report::render_group(&self.members)
    }
}

impl fmt::Display for TimerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A malformed parent reference must stay visible, not vanish into
        // fmt::Error.
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "report error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NO_TIMINGS_MESSAGE;
    use crate::timer::{MethodTimer, ScopedBlockTimer};

    struct Probe {
        registry: Option<Registry>,
    }

    impl Probe {
        fn new() -> Self {
            Self { registry: None }
        }

        /// Round-trip body: a method with a nested block that itself nests
        /// one deeper.
        fn method_b(&mut self) {
            let _t = MethodTimer::start(self, "method_b");
            {
                let _b1 = ScopedBlockTimer::child_of(self, "method_b.1", "method_b");
                {
                    let _b2 =
                        ScopedBlockTimer::new(self, "method_b.1.a", Some("method_b.1"), 2);
                }
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

    #[test]
    fn test_attach_installs_registry_with_group_flag() {
        let mut off = TimerGroup::new(false);
        let mut probe = Probe::new();
        off.attach("p", &mut probe);
        assert!(!probe.registry().unwrap().enabled());

        let mut on = TimerGroup::new(true);
        on.attach("p", &mut probe);
        assert!(probe.registry().unwrap().enabled());
    }

    #[test]
    fn test_broadcast_enable_disable() {
        let mut group = TimerGroup::new(true);
        let mut a = Probe::new();
        let mut b = Probe::new();
        group.attach("a", &mut a);
        group.attach("b", &mut b);

        group.disable();
        assert!(!a.registry().unwrap().enabled());
        assert!(!b.registry().unwrap().enabled());

        group.enable();
        assert!(a.registry().unwrap().enabled());
        assert!(b.registry().unwrap().enabled());
    }

    #[test]
    fn test_reset_empties_all_members() {
        let mut group = TimerGroup::new(true);
        let mut probe = Probe::new();
        group.attach("p", &mut probe);
        probe.method_b();
        assert!(!probe.registry().unwrap().is_empty());

        group.reset();
        assert!(probe.registry().unwrap().is_empty());
        assert_eq!(group.render().unwrap(), NO_TIMINGS_MESSAGE);
    }

    #[test]
    fn test_round_trip_render_order() {
        let mut group = TimerGroup::new(true);
        let mut probe = Probe::new();
        group.attach("Test Object", &mut probe);
        probe.method_b();

        let snap = probe.registry().unwrap().snapshot();
        assert_eq!(snap.len(), 3);
        // Guards drop innermost-first, so creation order is deepest-first
        // here; the splice rule still places children before parents.
        let text = group.render().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("method_b.1.a:"));
        assert!(lines[2].contains("method_b.1:"));
        assert!(lines[3].contains("method_b:"));
    }

    #[test]
    fn test_disabled_calls_leave_stats_unchanged() {
        let mut group = TimerGroup::new(true);
        let mut probe = Probe::new();
        group.attach("p", &mut probe);

        probe.method_b();
        let before = probe.registry().unwrap().snapshot();

        group.disable();
        probe.method_b();
        probe.method_b();
        let after = probe.registry().unwrap().snapshot();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.count, a.count);
            assert_eq!(b.total_ms, a.total_ms);
        }

        // Re-enabling resumes accumulation on top of the old values.
        group.enable();
        probe.method_b();
        let resumed = probe.registry().unwrap().snapshot();
        let b = resumed.iter().find(|s| s.name == "method_b").unwrap();
        assert_eq!(b.count, 2);
    }

    #[test]
    fn test_display_surfaces_render_error() {
        let mut group = TimerGroup::new(true);
        let mut probe = Probe::new();
        let registry = group.attach("p", &mut probe);
        registry.record("orphan", 1, Some("ghost"), 1.0);
        let shown = group.to_string();
        assert!(shown.starts_with("report error:"));
        assert!(shown.contains("ghost"));
    }
}
