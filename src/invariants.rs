//! Debug assertion macros for the ring buffer and refcount invariants.
//!
//! These macros provide runtime checks for the ring's structural
//! invariants. They are only active in debug builds
//! (`#[cfg(debug_assertions)]`), so there is zero overhead in release builds.
//!
//! Used by [`crate::ring::RingBuffer`] and [`crate::pipe::PipeInner`].

// =============================================================================
// INV-01: Non-zero element size
// =============================================================================

/// Assert that `elem_size` is non-zero.
///
/// **Invariant**: `elem_size > 0`
macro_rules! debug_assert_elem_size_nonzero {
    ($elem_size:expr) => {
        debug_assert!(
            $elem_size > 0,
            "INV-01 violated: elem_size is zero"
        )
    };
}

// =============================================================================
// INV-02/03: Capacity bounds
// =============================================================================

/// Assert `min_cap <= capacity` and `elem_count <= capacity`.
macro_rules! debug_assert_capacity_bounds {
    ($min_cap:expr, $capacity:expr, $elem_count:expr) => {
        debug_assert!(
            $min_cap <= $capacity,
            "INV-02 violated: min_cap {} exceeds capacity {}",
            $min_cap,
            $capacity
        );
        debug_assert!(
            $elem_count <= $capacity,
            "INV-03 violated: elem_count {} exceeds capacity {}",
            $elem_count,
            $capacity
        );
    };
}

// =============================================================================
// INV-04: Pointer range
// =============================================================================

/// Assert `begin` and `end` lie within `[0, bufend]`.
macro_rules! debug_assert_pointers_in_range {
    ($begin:expr, $end:expr, $bufend:expr) => {
        debug_assert!(
            $begin <= $bufend && $end <= $bufend,
            "INV-04 violated: begin {} / end {} outside [0, {}]",
            $begin,
            $end,
            $bufend
        )
    };
}

// =============================================================================
// INV-05: begin never parked exactly at bufend
// =============================================================================

/// Assert that `begin != bufend` (a pipe with nonzero capacity always wraps
/// `begin` back to 0 before it would reach the physical end).
macro_rules! debug_assert_begin_not_at_bufend {
    ($begin:expr, $bufend:expr) => {
        debug_assert!(
            $bufend == 0 || $begin != $bufend,
            "INV-05 violated: begin parked at bufend {}",
            $bufend
        )
    };
}

// =============================================================================
// INV-06: Byte accounting
// =============================================================================

/// Assert that the linearised live-byte length equals `elem_count * elem_size`,
/// accounting for the wrap/nowrap layout.
macro_rules! debug_assert_byte_accounting {
    ($begin:expr, $end:expr, $bufend:expr, $elem_count:expr, $elem_size:expr) => {
        let expected = $elem_count * $elem_size;
        let actual = if $begin <= $end {
            $end - $begin
        } else {
            ($bufend - $begin) + $end
        };
        debug_assert_eq!(
            actual, expected,
            "INV-06 violated: live bytes {} != elem_count*elem_size {}",
            actual, expected
        );
    };
}

// =============================================================================
// INV-07: Refcount non-negativity (caught by usize underflow, but documented)
// =============================================================================

/// Assert that a refcount is about to be decremented from a positive value.
macro_rules! debug_assert_refcount_positive {
    ($name:literal, $count:expr) => {
        debug_assert!(
            $count > 0,
            "INV-07 violated: {} refcount released while already zero",
            $name
        )
    };
}

pub(crate) use debug_assert_begin_not_at_bufend;
pub(crate) use debug_assert_byte_accounting;
pub(crate) use debug_assert_capacity_bounds;
pub(crate) use debug_assert_elem_size_nonzero;
pub(crate) use debug_assert_pointers_in_range;
pub(crate) use debug_assert_refcount_positive;
