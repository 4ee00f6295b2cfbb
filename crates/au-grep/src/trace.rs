//! Instrumentation hooks for the matcher.
//!
//! `NoopTracer` methods are `#[inline(always)]` and empty, so the plain
//! `matches` path compiles to the uninstrumented walk.

use au_core::Value;

pub trait Tracer {
    /// Called for every authorized scalar the matcher tests.
    fn trace_leaf(&mut self, value: &Value);

    /// Called once, on the leaf that decided the match.
    fn trace_hit(&mut self, value: &Value);
}

pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_leaf(&mut self, _value: &Value) {}

    #[inline(always)]
    fn trace_hit(&mut self, _value: &Value) {}
}

/// Counts tested leaves and hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingTracer {
    pub leaves: usize,
    pub hits: usize,
}

impl Tracer for CountingTracer {
    fn trace_leaf(&mut self, _value: &Value) {
        self.leaves += 1;
    }

    fn trace_hit(&mut self, _value: &Value) {
        self.hits += 1;
    }
}
