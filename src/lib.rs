//! Mergeable min-priority queue implemented as a Fibonacci heap
//!
//! This crate provides a [`FibonacciHeap`], the classical backbone of
//! shortest-path and minimum-spanning-tree algorithms:
//!
//! - **O(1)** amortized `insert`, `decrease_key`, and `find_min`
//! - **O(log n)** amortized `extract_min` and `delete`
//!
//! Elements are `(key, value)` pairs: keys are any totally ordered type
//! (duplicates allowed), values are opaque payloads that are carried but
//! never compared. `insert` returns a [`NodeHandle`] that later feeds
//! `decrease_key` and `delete`.
//!
//! Nodes live in a generational-key arena rather than behind raw pointers,
//! so a handle to an already-removed node is a recoverable
//! [`HeapError::InvalidNodeReference`], never undefined behavior.
//!
//! The heap has no internal synchronization; callers that share one across
//! threads must serialize access externally.
//!
//! # Example
//!
//! ```rust
//! use fibheap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1");
//! let _handle2 = heap.insert(3, "item2");
//! heap.decrease_key(handle1, 1).unwrap();
//! assert_eq!(heap.find_min(), Ok((&1, &"item1")));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod fibonacci;
mod node;
mod ring;

// Re-export the main types for convenience
pub use error::HeapError;
pub use fibonacci::{FibonacciHeap, NodeHandle};
