//! Instrumented demo workload: a two-subject processing pipeline.
//!
//! `Pipeline` owns a `Resampler` sub-subject; both carry their own registry
//! so the group report shows one section per object. The method bodies do
//! real (if synthetic) floating-point work so the demo prints non-trivial
//! timings.

use tictoc_core::{Instrumented, MethodTimer, Registry, ScopedBlockTimer};

/// Leaf subject invoked from inside the pipeline's own timed methods.
pub struct Resampler {
    registry: Option<Registry>,
    acc: f64,
}

impl Resampler {
    pub fn new() -> Self {
        Self {
            registry: None,
            acc: 0.0,
        }
    }

    /// Level-0 method on its own registry, even though it is called from an
    /// instrumented method of the parent pipeline.
    pub fn resample(&mut self, points: usize) {
        let _t = MethodTimer::start(self, "resample");
        for i in 0..points {
            self.acc += (i as f64).sqrt();
        }
    }

    pub fn acc(&self) -> f64 {
        self.acc
    }
}

impl Instrumented for Resampler {
    fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    fn set_registry(&mut self, registry: Option<Registry>) {
        self.registry = registry;
    }
}

pub struct Pipeline {
    registry: Option<Registry>,
    pub resampler: Resampler,
    samples: Vec<f64>,
    checksum: f64,
}

impl Pipeline {
    pub fn new(sample_points: usize) -> Self {
        Self {
            registry: None,
            resampler: Resampler::new(),
            samples: vec![0.0; sample_points],
            checksum: 0.0,
        }
    }

    /// Fill the sample buffer, then hand off to the resampler sub-subject.
    pub fn ingest(&mut self) {
        let _t = MethodTimer::start(self, "ingest");
        for (i, s) in self.samples.iter_mut().enumerate() {
            *s = (i as f64 * 0.001).sin();
        }
        self.resampler.resample(self.samples.len() / 4);
    }

    /// Windowed smoothing with two nested timed blocks, one per nesting
    /// level.
    pub fn transform(&mut self) {
        let _t = MethodTimer::start(self, "transform");
        {
            let _w = ScopedBlockTimer::child_of(self, "transform.window", "transform");
            let n = self.samples.len();
            for i in 1..n.saturating_sub(1) {
                self.samples[i] =
                    (self.samples[i - 1] + self.samples[i] + self.samples[i + 1]) / 3.0;
            }
            {
                let _f = ScopedBlockTimer::new(
                    self,
                    "transform.window.fold",
                    Some("transform.window"),
                    2,
                );
                self.checksum = self.samples.iter().sum();
            }
        }
    }

    /// Final reduction over the smoothed samples.
    pub fn finalize(&mut self) {
        let _t = MethodTimer::start(self, "finalize");
        self.checksum += self
            .samples
            .iter()
            .map(|s| s.abs())
            .fold(0.0_f64, |a, b| a.max(b));
    }

    /// One full run: ingest, transform, finalize.
    pub fn run_once(&mut self) {
        self.ingest();
        self.transform();
        self.finalize();
    }

    pub fn checksum(&self) -> f64 {
        self.checksum
    }
}

impl Instrumented for Pipeline {
    fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    fn set_registry(&mut self, registry: Option<Registry>) {
        self.registry = registry;
    }
}
