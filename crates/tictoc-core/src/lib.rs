//! tictoc-core — hierarchical, opt-in timing registries for object methods
//! and blocks.
//!
//! A subject type exposes an optional [`Registry`] through [`Instrumented`];
//! [`MethodTimer`] and [`ScopedBlockTimer`] guards record named samples into
//! it, a [`TimerGroup`] drives enable/disable/reset over several subjects at
//! once, and [`TimerGroup::render`] produces a fixed-width report with the
//! blocks regrouped under their parents. Subjects without a registry cost
//! nothing: every instrumentation point degrades to a no-op.

pub mod clock;
pub mod group;
pub mod registry;
pub mod report;
pub mod stat;
pub mod timer;

pub use clock::{Clock, HostClock, ScopedPrintTimer, StreamClock, TimerStream};
pub use group::TimerGroup;
pub use registry::{Instrumented, Registry};
pub use report::{ReportError, NO_TIMINGS_MESSAGE};
pub use stat::BlockStat;
pub use timer::{time_method, MethodTimer, ScopedBlockTimer, DEFAULT_BLOCK_LEVEL};
