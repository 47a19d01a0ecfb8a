//! The three handle kinds through which a pipe is reached.
//!
//! Each handle wraps an `Arc<PipeInner>`. The `Arc`'s own strong count
//! governs when the backing buffer is actually freed (Rust's ownership
//! model already does this correctly); the pipe's separate
//! `producer_refcount`/`consumer_refcount` fields (decremented from each
//! handle kind's `Drop` impl) are a protocol-level count used only to
//! detect producer exhaustion for the blocking-pop wake-up rule.

use std::sync::Arc;

use crate::error::PipeError;
use crate::metrics::MetricsSnapshot;
use crate::pipe::PipeInner;

/// Creates a new pipe and returns its bidirectional handle.
///
/// Fails if `elem_size` is zero. Both the producer and consumer refcount
/// start at 1, matching the single returned handle.
pub fn new_pipe(elem_size: usize) -> Result<Handle, PipeError> {
    let inner = PipeInner::new(elem_size)?;
    Ok(Handle(Arc::new(inner)))
}

/// A handle that counts as both a producer and a consumer.
///
/// Dropping it decrements both refcounts in a single locked step.
pub struct Handle(Arc<PipeInner>);

/// A handle that may only push records; counts as one producer.
pub struct ProducerHandle(Arc<PipeInner>);

/// A handle that may only pop records; counts as one consumer.
pub struct ConsumerHandle(Arc<PipeInner>);

/// Shared by all three handle kinds: any live handle may mint a new
/// producer or consumer handle sharing the same pipe.
fn mint_producer(inner: &Arc<PipeInner>) -> ProducerHandle {
    inner.acquire_producer();
    ProducerHandle(Arc::clone(inner))
}

fn mint_consumer(inner: &Arc<PipeInner>) -> ConsumerHandle {
    inner.acquire_consumer();
    ConsumerHandle(Arc::clone(inner))
}

impl Handle {
    /// Mints a new producer-only handle sharing this pipe.
    pub fn new_producer(&self) -> ProducerHandle {
        mint_producer(&self.0)
    }

    /// Mints a new consumer-only handle sharing this pipe.
    pub fn new_consumer(&self) -> ConsumerHandle {
        mint_consumer(&self.0)
    }

    /// Appends `count` records read from `src` (`count * elem_size` bytes)
    /// to the tail. May grow the buffer.
    pub fn push(&self, src: &[u8], count: usize) -> Result<(), PipeError> {
        self.0.push(src, count)
    }

    /// Blocks until at least `count` records are available or every
    /// producer has departed, then returns the number actually popped into
    /// `dst` (`count * elem_size` bytes). Zero iff the pipe is empty and
    /// producers are exhausted (the normal end-of-stream signal).
    pub fn pop(&self, dst: &mut [u8], count: usize) -> Result<usize, PipeError> {
        self.0.pop_blocking(dst, count)
    }

    /// Returns immediately with up to `count` records, never waiting.
    pub fn try_pop(&self, dst: &mut [u8], count: usize) -> Result<usize, PipeError> {
        self.0.pop_eager(dst, count)
    }

    /// Raises the pipe's minimum capacity to `n`, growing the buffer now if
    /// needed. `n == 0` resets the minimum capacity to the default.
    pub fn reserve(&self, n: usize) -> Result<(), PipeError> {
        self.0.reserve(n)
    }

    /// A snapshot of push/pop/resize counters at this instant.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.0.metrics()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.0.release_bidirectional();
    }
}

impl ProducerHandle {
    /// Mints a new producer-only handle sharing this pipe.
    pub fn new_producer(&self) -> ProducerHandle {
        mint_producer(&self.0)
    }

    /// Mints a new consumer-only handle sharing this pipe.
    pub fn new_consumer(&self) -> ConsumerHandle {
        mint_consumer(&self.0)
    }

    /// Appends `count` records read from `src` to the tail. May grow the buffer.
    pub fn push(&self, src: &[u8], count: usize) -> Result<(), PipeError> {
        self.0.push(src, count)
    }

    /// Raises the pipe's minimum capacity to `n`.
    pub fn reserve(&self, n: usize) -> Result<(), PipeError> {
        self.0.reserve(n)
    }

    /// A snapshot of push/pop/resize counters at this instant.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.0.metrics()
    }
}

impl Drop for ProducerHandle {
    fn drop(&mut self) {
        self.0.release_producer();
    }
}

impl ConsumerHandle {
    /// Mints a new producer-only handle sharing this pipe.
    pub fn new_producer(&self) -> ProducerHandle {
        mint_producer(&self.0)
    }

    /// Mints a new consumer-only handle sharing this pipe.
    pub fn new_consumer(&self) -> ConsumerHandle {
        mint_consumer(&self.0)
    }

    /// Blocks until at least `count` records are available or every
    /// producer has departed. See [`Handle::pop`].
    pub fn pop(&self, dst: &mut [u8], count: usize) -> Result<usize, PipeError> {
        self.0.pop_blocking(dst, count)
    }

    /// Returns immediately with up to `count` records, never waiting.
    pub fn try_pop(&self, dst: &mut [u8], count: usize) -> Result<usize, PipeError> {
        self.0.pop_eager(dst, count)
    }

    /// Raises the pipe's minimum capacity to `n`.
    pub fn reserve(&self, n: usize) -> Result<(), PipeError> {
        self.0.reserve(n)
    }

    /// A snapshot of push/pop/resize counters at this instant.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.0.metrics()
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        self.0.release_consumer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_bidirectional_handle_zeroes_both_counts() {
        let handle = new_pipe(4).unwrap();
        let inner = Arc::clone(&handle.0);
        drop(handle);
        assert_eq!(inner.producer_refcount(), 0);
        assert_eq!(inner.consumer_refcount(), 0);
    }

    #[test]
    fn minted_handles_increment_their_role_count() {
        let handle = new_pipe(4).unwrap();
        let producer = handle.new_producer();
        let _consumer = handle.new_consumer();
        assert_eq!(handle.0.producer_refcount(), 2);
        assert_eq!(handle.0.consumer_refcount(), 2);
        drop(producer);
        assert_eq!(handle.0.producer_refcount(), 1);
    }

    #[test]
    fn pipe_survives_bidirectional_drop_while_consumer_remains() {
        let handle = new_pipe(4).unwrap();
        let consumer = handle.new_consumer();
        drop(handle);
        // Producer count hit zero; consumer should still be able to pop
        // (possibly zero records) without panicking.
        let mut out = [0u8; 4];
        assert_eq!(consumer.try_pop(&mut out, 1).unwrap(), 0);
    }
}
