use serde::Serialize;

/// One named timing accumulator.
///
/// Holds a running sum and sum-of-squares in milliseconds so mean and
/// population standard deviation can be derived at render time without
/// storing individual samples. `level` is the nesting depth (0 = top-level
/// instrumented method) and `parent` names the enclosing block for
/// `level > 0` entries.
#[derive(Debug, Clone, Serialize)]
pub struct BlockStat {
    pub name: String,
    pub level: u32,
    pub parent: Option<String>,
    pub total_ms: f64,
    pub total_sq_ms: f64,
    pub count: u64,
}

impl BlockStat {
    pub fn new(name: impl Into<String>, level: u32, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            level,
            parent: parent.map(str::to_string),
            total_ms: 0.0,
            total_sq_ms: 0.0,
            count: 0,
        }
    }

    /// Fold one sample (milliseconds) into the running sums.
    pub fn update(&mut self, elapsed_ms: f64) {
        self.total_ms += elapsed_ms;
        self.total_sq_ms += elapsed_ms * elapsed_ms;
        self.count += 1;
    }

    /// Mean sample duration in ms, or None if nothing has been recorded.
    pub fn mean_ms(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.total_ms / self.count as f64)
    }

    /// Population standard deviation in ms, or None if nothing has been
    /// recorded. The radicand is clamped at zero; floating-point rounding
    /// can push `E[t²] - mean²` slightly negative for constant samples.
    pub fn std_ms(&self) -> Option<f64> {
        let mean = self.mean_ms()?;
        let var = self.total_sq_ms / self.count as f64 - mean * mean;
        Some(var.max(0.0).sqrt())
    }
}
