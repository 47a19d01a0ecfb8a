//! The mutex/condvar-guarded shared state behind every handle.
//!
//! `PipeInner` is never exposed directly; [`crate::Handle`],
//! [`crate::ProducerHandle`], and [`crate::ConsumerHandle`] each hold an
//! `Arc<PipeInner>` and forward to the methods here, applying only the role
//! restrictions appropriate to their kind (producers can't pop, consumers
//! can't push).

use std::sync::{Condvar, Mutex, PoisonError};

#[cfg(debug_assertions)]
use crate::invariants::debug_assert_refcount_positive;

use crate::error::PipeError;
use crate::metrics::MetricsSnapshot;
use crate::ring::RingBuffer;

struct PipeState {
    ring: RingBuffer,
    producer_refcount: usize,
    consumer_refcount: usize,
}

pub(crate) struct PipeInner {
    state: Mutex<PipeState>,
    /// Signalled whenever new records become available, or whenever the
    /// last producer departs (so blocked consumers can observe end-of-stream).
    has_new_elems: Condvar,
}

impl PipeInner {
    pub(crate) fn new(elem_size: usize) -> Result<Self, PipeError> {
        let ring = RingBuffer::new(elem_size)?;
        Ok(Self {
            state: Mutex::new(PipeState {
                ring,
                producer_refcount: 1,
                consumer_refcount: 1,
            }),
            has_new_elems: Condvar::new(),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PipeState> {
        // A prior panic while holding the lock would have happened mid-mutation
        // of a single critical section; recovering the guard here assumes
        // mutex operations always succeed. None of the critical sections
        // below can panic under correct (length-checked) usage.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn elem_size(&self) -> usize {
        self.lock().ring.elem_size()
    }

    fn check_len(&self, buf_len: usize, count: usize, elem_size: usize) -> Result<(), PipeError> {
        if buf_len != count * elem_size {
            return Err(PipeError::MisalignedBuffer {
                len: buf_len,
                count,
                elem_size,
            });
        }
        Ok(())
    }

    /// Atomically appends `count` records read from `src`. May grow the
    /// buffer. Broadcasts after releasing the lock.
    pub(crate) fn push(&self, src: &[u8], count: usize) -> Result<(), PipeError> {
        self.check_len(src.len(), count, self.elem_size())?;
        {
            let mut state = self.lock();
            state.ring.push(src, count)?;
        }
        self.has_new_elems.notify_all();
        Ok(())
    }

    /// Blocks until at least `count` records are available or all producers
    /// have departed, then pops whatever is available (possibly fewer than
    /// `count`, possibly zero).
    pub(crate) fn pop_blocking(&self, dst: &mut [u8], count: usize) -> Result<usize, PipeError> {
        self.check_len(dst.len(), count, self.elem_size())?;
        let mut state = self.lock();
        while state.ring.elem_count() < count && state.producer_refcount > 0 {
            state = self
                .has_new_elems
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Ok(state.ring.pop(dst, count))
    }

    /// Returns immediately with up to `count` records, never waiting.
    pub(crate) fn pop_eager(&self, dst: &mut [u8], count: usize) -> Result<usize, PipeError> {
        self.check_len(dst.len(), count, self.elem_size())?;
        let mut state = self.lock();
        Ok(state.ring.pop(dst, count))
    }

    pub(crate) fn reserve(&self, n: usize) -> Result<(), PipeError> {
        let mut state = self.lock();
        state.ring.reserve(n)
    }

    pub(crate) fn metrics(&self) -> MetricsSnapshot {
        self.lock().ring.metrics.snapshot()
    }

    pub(crate) fn acquire_producer(&self) {
        let mut state = self.lock();
        state.producer_refcount += 1;
    }

    pub(crate) fn acquire_consumer(&self) {
        let mut state = self.lock();
        state.consumer_refcount += 1;
    }

    pub(crate) fn release_producer(&self) {
        let became_zero = {
            let mut state = self.lock();
            #[cfg(debug_assertions)]
            debug_assert_refcount_positive!("producer", state.producer_refcount);
            state.producer_refcount -= 1;
            state.producer_refcount == 0
        };
        if became_zero {
            self.has_new_elems.notify_all();
        }
    }

    pub(crate) fn release_consumer(&self) {
        let mut state = self.lock();
        #[cfg(debug_assertions)]
        debug_assert_refcount_positive!("consumer", state.consumer_refcount);
        state.consumer_refcount -= 1;
    }

    /// Decrements both refcounts as one atomic operation (the bidirectional
    /// handle counts as both a producer and a consumer).
    pub(crate) fn release_bidirectional(&self) {
        let became_zero = {
            let mut state = self.lock();
            #[cfg(debug_assertions)]
            {
                debug_assert_refcount_positive!("producer", state.producer_refcount);
                debug_assert_refcount_positive!("consumer", state.consumer_refcount);
            }
            state.producer_refcount -= 1;
            state.consumer_refcount -= 1;
            state.producer_refcount == 0
        };
        if became_zero {
            self.has_new_elems.notify_all();
        }
    }

    #[cfg(test)]
    pub(crate) fn producer_refcount(&self) -> usize {
        self.lock().producer_refcount
    }

    #[cfg(test)]
    pub(crate) fn consumer_refcount(&self) -> usize {
        self.lock().consumer_refcount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pipe_starts_with_refcount_one_each() {
        let inner = PipeInner::new(4).unwrap();
        assert_eq!(inner.producer_refcount(), 1);
        assert_eq!(inner.consumer_refcount(), 1);
    }

    #[test]
    fn zero_elem_size_rejected() {
        assert!(matches!(PipeInner::new(0), Err(PipeError::ZeroElemSize)));
    }

    #[test]
    fn eager_pop_on_empty_pipe_returns_zero() {
        let inner = PipeInner::new(4).unwrap();
        let mut out = [0u8; 4];
        assert_eq!(inner.pop_eager(&mut out, 1).unwrap(), 0);
    }

    #[test]
    fn release_last_producer_wakes_blocked_consumer() {
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        let inner = Arc::new(PipeInner::new(1).unwrap());
        inner.acquire_consumer(); // keep a second consumer handle alive for the test

        let reader = Arc::clone(&inner);
        let handle = thread::spawn(move || {
            let mut out = [0u8; 10];
            reader.pop_blocking(&mut out, 10).unwrap()
        });

        thread::sleep(Duration::from_millis(50));
        inner.release_producer(); // the only producer departs

        let n = handle.join().unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn misaligned_buffer_is_rejected() {
        let inner = PipeInner::new(4).unwrap();
        let src = [0u8; 5]; // count=1, elem_size=4, but len=5 != 1*4
        assert!(matches!(
            inner.push(&src, 1),
            Err(PipeError::MisalignedBuffer { .. })
        ));
    }
}
