//! Bucket - the free list for one size class.
//!
//! A [`Bucket`] holds previously returned buffers of a single capacity and
//! hands the most recently returned one out first.

use parking_lot::Mutex;

use crate::common::SizeClass;

/// A LIFO free list of buffers for one size class.
///
/// # Thread Safety
/// The list sits behind its own `Mutex`. Each operation holds the lock for a
/// single push or pop, so buckets never contend with each other and a bucket
/// never holds its lock across calls.
pub struct Bucket {
    /// Size class served by this bucket.
    class: SizeClass,

    /// Available buffers; the top of the stack is the last one returned.
    free: Mutex<Vec<Box<[u8]>>>,
}

impl Bucket {
    /// Create an empty bucket. Nothing is preallocated.
    pub fn new(class: SizeClass) -> Self {
        Self {
            class,
            free: Mutex::new(Vec::new()),
        }
    }

    /// The size class this bucket serves.
    #[inline]
    pub fn class(&self) -> SizeClass {
        self.class
    }

    /// Take the most recently pushed buffer, if any.
    #[inline]
    pub fn pop(&self) -> Option<Box<[u8]>> {
        self.free.lock().pop()
    }

    /// Push a buffer on top of the stack.
    ///
    /// # Panics
    /// Debug builds panic if the buffer is not exactly the class capacity.
    #[inline]
    pub fn push(&self, buf: Box<[u8]>) {
        debug_assert_eq!(buf.len(), self.class.capacity(), "buffer/class mismatch");
        self.free.lock().push(buf);
    }

    /// Number of buffers currently available.
    #[inline]
    pub fn len(&self) -> usize {
        self.free.lock().len()
    }

    /// Check if no buffers are available.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes held by this bucket.
    #[inline]
    pub fn retained_bytes(&self) -> usize {
        self.len() * self.class.capacity()
    }

    /// Hold the bucket lock until the returned guard drops.
    #[cfg(test)]
    pub(crate) fn lock_for_test(&self) -> parking_lot::MutexGuard<'_, Vec<Box<[u8]>>> {
        self.free.lock()
    }
}
