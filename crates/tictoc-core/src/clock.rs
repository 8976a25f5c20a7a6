//! Elapsed-time measurement between a start and a stop marker.
//!
//! Two interchangeable families sit behind the [`Clock`] trait: [`HostClock`]
//! reads the monotonic wall clock, and [`StreamClock`] drives an asynchronous
//! compute-stream timestamp source (CUDA events, Metal command-buffer
//! timestamps, ...) supplied through the [`TimerStream`] trait. The one hard
//! invariant lives in `StreamClock::mark_stop`: the stream is synchronized
//! after the stop marker is issued and *before* the interval is read.
//! Reading an unsynchronized interval is a correctness bug.

use std::time::Instant;

use tracing::info;

/// Measures elapsed milliseconds between [`mark_start`](Clock::mark_start)
/// and [`mark_stop`](Clock::mark_stop).
pub trait Clock {
    fn mark_start(&mut self);

    /// Elapsed milliseconds since the matching `mark_start`, or 0.0 if no
    /// start marker was issued.
    fn mark_stop(&mut self) -> f64;
}

/// Monotonic wall-clock implementation backed by [`Instant`].
#[derive(Debug, Default)]
pub struct HostClock {
    start: Option<Instant>,
}

impl HostClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for HostClock {
    fn mark_start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn mark_stop(&mut self) -> f64 {
        match self.start.take() {
            Some(start) => start.elapsed().as_secs_f64() * 1_000.0,
            None => 0.0,
        }
    }
}

/// Asynchronous timestamp source on a compute stream.
///
/// `record` enqueues a timestamp marker and returns immediately; the marker's
/// value is only defined once [`synchronize`](TimerStream::synchronize) has
/// returned. Device backends (CUDA, Metal, ...) implement this in downstream
/// crates; the test suite ships a host-side fake.
pub trait TimerStream {
    type Marker;

    /// Enqueue a timestamp marker on the stream.
    fn record(&mut self) -> Self::Marker;

    /// Block until every marker enqueued so far has a defined value.
    fn synchronize(&mut self);

    /// Interval between two synchronized markers, in milliseconds.
    fn elapsed_ms(&self, start: &Self::Marker, stop: &Self::Marker) -> f64;
}

/// [`Clock`] over a [`TimerStream`].
///
/// `mark_stop` records the stop marker, synchronizes the stream, and only
/// then reads the interval.
pub struct StreamClock<S: TimerStream> {
    stream: S,
    start: Option<S::Marker>,
}

impl<S: TimerStream> StreamClock<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            start: None,
        }
    }

    /// Consume the clock and hand the stream back to the caller.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: TimerStream> Clock for StreamClock<S> {
    fn mark_start(&mut self) {
        self.start = Some(self.stream.record());
    }

    fn mark_stop(&mut self) -> f64 {
        let stop = self.stream.record();
        // Must happen before elapsed_ms: the markers have no defined value
        // until the stream has reached them.
        self.stream.synchronize();
        match self.start.take() {
            Some(start) => self.stream.elapsed_ms(&start, &stop),
            None => 0.0,
        }
    }
}

/// One-shot scoped timer that logs its elapsed time on drop.
///
/// Unrelated to any [`Registry`](crate::Registry); this is the quick
/// "how long was that?" tool:
///
/// ```ignore
/// {
///     let _t = ScopedPrintTimer::new("load index");
///     load_index()?;
/// } // logs: load index: 12.41 ms
/// ```
pub struct ScopedPrintTimer {
    name: String,
    clock: HostClock,
}

impl ScopedPrintTimer {
    pub fn new(name: impl Into<String>) -> Self {
        let mut clock = HostClock::new();
        clock.mark_start();
        Self {
            name: name.into(),
            clock,
        }
    }
}

impl Drop for ScopedPrintTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.clock.mark_stop();
        info!(target: "tictoc", "{}: {:.2} ms", self.name, elapsed_ms);
    }
}
