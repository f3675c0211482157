//! Error type for heap operations
//!
//! All failures are detected before any mutation takes place, so an operation
//! that returns an error leaves the heap exactly as it found it.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `find_min` or `extract_min` was called on an empty heap
    EmptyHeap,
    /// `decrease_key` was called with a new key greater than the current key
    InvalidKeyOrder,
    /// The handle refers to a node that is no longer present in the heap
    InvalidNodeReference,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::InvalidKeyOrder => {
                write!(f, "new key is greater than the current key")
            }
            HeapError::InvalidNodeReference => {
                write!(f, "handle refers to a node no longer in the heap")
            }
        }
    }
}

impl std::error::Error for HeapError {}
