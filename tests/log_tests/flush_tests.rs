//! Tests for FlushPlan
//!
//! These tests verify:
//! - Skip when nothing is pending
//! - Append whenever existing + pending fits the capacity
//! - Rewrite offsets over capacity
//! - The rewritten length matches the eviction formula for all small sizes

use histlog::log::FlushPlan;

// =============================================================================
// Helper Functions
// =============================================================================

/// Entries a flush leaves in the file
fn resulting_len(existing: usize, pending: usize, capacity: usize) -> usize {
    match FlushPlan::compute(existing, pending, capacity) {
        FlushPlan::Skip => existing,
        FlushPlan::Append => existing + pending,
        FlushPlan::Rewrite {
            skip_existing,
            skip_pending,
        } => (existing - skip_existing) + (pending - skip_pending),
    }
}

// =============================================================================
// Plan Tests
// =============================================================================

#[test]
fn test_nothing_pending_skips() {
    assert_eq!(FlushPlan::compute(0, 0, 5), FlushPlan::Skip);
    assert_eq!(FlushPlan::compute(10, 0, 5), FlushPlan::Skip);
}

#[test]
fn test_fits_appends() {
    assert_eq!(FlushPlan::compute(0, 3, 1000), FlushPlan::Append);
    assert_eq!(FlushPlan::compute(3, 2, 5), FlushPlan::Append);
}

#[test]
fn test_fresh_file_over_capacity() {
    assert_eq!(
        FlushPlan::compute(0, 6, 5),
        FlushPlan::Rewrite { skip_existing: 0, skip_pending: 1 }
    );
}

#[test]
fn test_long_history_short_batch() {
    // Only a batch-sized tail of history survives
    assert_eq!(
        FlushPlan::compute(100, 3, 50),
        FlushPlan::Rewrite { skip_existing: 97, skip_pending: 0 }
    );
    assert_eq!(resulting_len(100, 3, 50), 6);
}

#[test]
fn test_batch_larger_than_history() {
    assert_eq!(
        FlushPlan::compute(2, 4, 3),
        FlushPlan::Rewrite { skip_existing: 0, skip_pending: 1 }
    );
}

#[test]
fn test_capacity_one() {
    assert_eq!(
        FlushPlan::compute(1, 1, 1),
        FlushPlan::Rewrite { skip_existing: 0, skip_pending: 0 }
    );
    assert_eq!(
        FlushPlan::compute(0, 4, 1),
        FlushPlan::Rewrite { skip_existing: 0, skip_pending: 3 }
    );
}

#[test]
fn test_eviction_formula_small_sizes() {
    for capacity in 1..8 {
        for existing in 0..12 {
            for pending in 1..12 {
                let expected = if existing + pending <= capacity {
                    existing + pending
                } else {
                    existing.min(pending) + pending.min(capacity)
                };
                assert_eq!(
                    resulting_len(existing, pending, capacity),
                    expected,
                    "e={} p={} C={}",
                    existing,
                    pending,
                    capacity
                );
            }
        }
    }
}
