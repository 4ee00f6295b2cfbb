//! Record matching.
//!
//! Pre-order walk over an explicit stack of `(value, authorized)` pairs.
//! `authorized` starts true only without a key filter; an object entry whose
//! key equals the filter authorizes its whole subtree, and array elements
//! inherit their array's state. Only authorized scalars are tested, and the
//! walk stops at the first hit.

use au_core::Value;

use crate::pattern::Pattern;
use crate::trace::{NoopTracer, Tracer};

/// Whether `record` matches `pattern`.
pub fn matches(record: &Value, pattern: &Pattern) -> bool {
    Matcher::new(pattern).matches(record)
}

#[derive(Clone, Copy, Debug)]
pub struct Matcher<'p> {
    pattern: &'p Pattern,
}

impl<'p> Matcher<'p> {
    pub fn new(pattern: &'p Pattern) -> Self {
        Self { pattern }
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.matches_with(record, &mut NoopTracer)
    }

    pub fn matches_with<T: Tracer>(&self, record: &Value, tracer: &mut T) -> bool {
        if self.pattern.is_empty() {
            return false;
        }

        let key = self.pattern.key();
        let mut stack: Vec<(&Value, bool)> = vec![(record, key.is_none())];

        while let Some((value, authorized)) = stack.pop() {
            match value {
                Value::Array(items) => {
                    stack.extend(items.iter().rev().map(|item| (item, authorized)));
                }
                Value::Object(fields) => {
                    stack.extend(
                        fields
                            .iter()
                            .rev()
                            .map(|(k, v)| (v, authorized || key == Some(k.as_str()))),
                    );
                }
                leaf if authorized => {
                    tracer.trace_leaf(leaf);
                    if self.leaf_matches(leaf) {
                        tracer.trace_hit(leaf);
                        return true;
                    }
                }
                _ => {}
            }
        }

        false
    }

    fn leaf_matches(&self, leaf: &Value) -> bool {
        let p = self.pattern;
        match leaf {
            Value::String(s) => p.string().is_some_and(|sp| sp.matches(s)),
            Value::Int64(i) => {
                p.signed() == Some(*i)
                    || p.unsigned()
                        .is_some_and(|u| u64::try_from(*i).is_ok_and(|i| i == u))
            }
            Value::Uint64(u) => {
                p.unsigned() == Some(*u)
                    || p.signed()
                        .is_some_and(|s| u64::try_from(s).is_ok_and(|s| s == *u))
            }
            // IEEE equality: NaN never matches.
            Value::Double(d) => p.double().is_some_and(|pd| pd == *d),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => false,
        }
    }
}
