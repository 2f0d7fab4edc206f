/// Deterministic value generator used for all procedural placement and jitter.
///
/// Each draw maps the current seed state through `fract(sin(state * 9999) * 10000)`
/// and advances the state by exactly one. Generated entities must consume a
/// fixed number of draws so that independent sequences started from the same
/// seed stay in lockstep (the lake reflections rebuild the forest from the
/// same seed and rely on this).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn state(self) -> u64 {
        self.state
    }

    /// Next value in [0, 1), advancing the state by one.
    pub fn next(&mut self) -> f64 {
        let x = ((self.state as f64) * 9999.0).sin() * 10000.0;
        self.state += 1;
        x - x.floor()
    }

    /// Next value scaled into [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next() * (hi - lo)
    }

    /// Child generator starting at the current state; the parent advances by
    /// one. Mirrors the original "hand the seed to the sub-shape, then bump it"
    /// convention so forest and reflection builders derive identical per-tree
    /// jitter sequences.
    pub fn fork(&mut self) -> SeededRng {
        let child = SeededRng::new(self.state);
        self.state += 1;
        child
    }
}
