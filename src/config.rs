//! Tunables for the ring buffer core.
//!
//! Unlike the lock-free sibling channels in this codebase, which expose a
//! builder-style `Config` (ring bits, max producers, metrics toggle) fixed at
//! construction time, this pipe has exactly one construction-time knob
//! (`elem_size`) and one runtime knob (`reserve`, see [`crate::Handle::reserve`]).
//! A full `Config` struct would document settings that don't exist.

/// The capacity (in records) a freshly created pipe starts with, and the
/// floor that [`crate::ring::RingBuffer`] will never shrink below unless
/// raised by [`crate::Handle::reserve`].
pub const DEFAULT_MIN_CAPACITY: usize = 32;
