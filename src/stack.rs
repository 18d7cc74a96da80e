//! Stack growth for the recursive parser and evaluator.
//!
//! Nesting depth in source text is unbounded, so every recursive step that
//! can nest goes through [`ensure_sufficient_stack`]. When less than the red
//! zone remains, a new segment is allocated before `f` runs.

const RED_ZONE: usize = 100 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
