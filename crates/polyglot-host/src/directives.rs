//! Compiler directive hooks
//!
//! Host access code runs under an embedding compiler that specializes on
//! state it observes. When such state changes (a handle cell going from
//! unlinked to linked), the compiled code that assumed the old state must be
//! discarded. These hooks mark those points and count them so the embedder
//! (and tests) can observe them.

use std::sync::atomic::{AtomicU64, Ordering};

static DEOPTS: AtomicU64 = AtomicU64::new(0);
static INVALIDATIONS: AtomicU64 = AtomicU64::new(0);

/// Leave compiled code and continue in the interpreter.
#[inline]
pub fn transfer_to_interpreter() {
    DEOPTS.fetch_add(1, Ordering::Relaxed);
    tracing::trace!("transfer to interpreter");
}

/// Leave compiled code and invalidate it so it is recompiled later.
///
/// Must precede any write to state that compiled code treats as constant.
#[inline]
pub fn transfer_to_interpreter_and_invalidate() {
    DEOPTS.fetch_add(1, Ordering::Relaxed);
    INVALIDATIONS.fetch_add(1, Ordering::AcqRel);
    tracing::trace!("transfer to interpreter and invalidate");
}

/// Number of transfers to the interpreter so far (including invalidating ones)
pub fn deopt_count() -> u64 {
    DEOPTS.load(Ordering::Relaxed)
}

/// Number of invalidating transfers so far
pub fn invalidation_count() -> u64 {
    INVALIDATIONS.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidation_counts_as_deopt() {
        // Counters are process-wide; other tests may bump them concurrently.
        let before_deopt = deopt_count();
        let before_inval = invalidation_count();

        transfer_to_interpreter_and_invalidate();

        assert!(deopt_count() > before_deopt);
        assert!(invalidation_count() > before_inval);
    }

    #[test]
    fn test_plain_transfer() {
        let before = deopt_count();
        transfer_to_interpreter();
        assert!(deopt_count() > before);
    }
}
