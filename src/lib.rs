//! `ringpipe`: a bounded, thread-safe, multi-producer/multi-consumer
//! byte-granular FIFO ring buffer.
//!
//! A pipe transports fixed-size records (`elem_size` bytes each) between
//! threads. It is reached through three handle kinds that share one
//! underlying buffer:
//!
//! - [`Handle`]: bidirectional, counts as one producer and one consumer.
//! - [`ProducerHandle`]: push-only.
//! - [`ConsumerHandle`]: pop-only.
//!
//! The buffer grows to the next power of two on demand and shrinks back
//! (never below a minimum capacity) as it drains, so callers don't need to
//! size it up front. Blocking pops wait on a condition variable until
//! either enough records are available or every producer handle has been
//! dropped (the latter is the pipe's end-of-stream signal, observed as a
//! pop returning fewer records than requested, down to zero).
//!
//! # Example
//!
//! ```
//! use ringpipe::new_pipe;
//! use std::thread;
//!
//! let handle = new_pipe(1).unwrap();
//! let producer = handle.new_producer();
//! let consumer = handle.new_consumer();
//! drop(handle);
//!
//! let writer = thread::spawn(move || {
//!     producer.push(b"HELLO", 5).unwrap();
//!     // producer dropped here, signalling end-of-stream
//! });
//!
//! let mut out = [0u8; 5];
//! let n = consumer.pop(&mut out, 5).unwrap();
//! assert_eq!(n, 5);
//! assert_eq!(&out, b"HELLO");
//!
//! writer.join().unwrap();
//! ```

mod config;
mod error;
mod handle;
mod invariants;
mod metrics;
mod pipe;
mod ring;

pub use error::PipeError;
pub use handle::{new_pipe, ConsumerHandle, Handle, ProducerHandle};
pub use metrics::MetricsSnapshot;
