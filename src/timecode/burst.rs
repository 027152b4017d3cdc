//! Frame-sequence generation: expanding one burst request into the ordered
//! capture instants handed to the frame extractor.

/// One planned burst: where it starts, how many frames, how far apart.
/// Built once per invocation from the resolved inputs and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstSpec {
    pub base: f64,
    pub count: u32,
    pub step: f64,
}

impl BurstSpec {
    pub fn new(base: f64, count: u32, step: f64) -> Self {
        Self { base, count, step }
    }

    /// Absolute capture instants, in extraction order.
    pub fn timestamps(&self) -> Vec<f64> {
        generate_sequence(self.base, self.count, self.step)
    }

    /// The last instant of the burst, or the base for an empty one.
    pub fn end(&self) -> f64 {
        self.base + f64::from(self.count.saturating_sub(1)) * self.step
    }
}

/// `base, base+step, …, base+(count-1)*step`. A zero count yields an empty
/// sequence; a zero step repeats the base `count` times.
pub fn generate_sequence(base: f64, count: u32, step: f64) -> Vec<f64> {
    (0..count).map(|i| base + f64::from(i) * step).collect()
}
