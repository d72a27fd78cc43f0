//! RAII guard for rented buffers.
//!
//! [`RentedBuffer`] derefs to the byte slice and gives the buffer back to its
//! pool when dropped, so a scope can never forget (or repeat) the return.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use super::size_class_pool::SizeClassPool;

/// A buffer rented from a [`SizeClassPool`], returned automatically on drop.
///
/// # Example
/// ```
/// use poolbench::SizeClassPool;
///
/// let pool = SizeClassPool::new();
/// {
///     let mut buf = pool.rent_guarded(100)?;
///     buf[0] = 1;
///     assert_eq!(buf.len(), 128);
/// } // returned here
/// assert_eq!(pool.available_total(), 1);
/// # Ok::<(), poolbench::Error>(())
/// ```
pub struct RentedBuffer<'a> {
    /// Pool to return to on drop.
    pool: &'a SizeClassPool,
    /// `None` only after `detach` or during drop.
    buf: Option<Box<[u8]>>,
}

impl<'a> RentedBuffer<'a> {
    /// Wrap a buffer obtained from `pool`.
    pub(crate) fn new(pool: &'a SizeClassPool, buf: Box<[u8]>) -> Self {
        Self {
            pool,
            buf: Some(buf),
        }
    }

    /// Take the buffer out of the guard without returning it.
    ///
    /// The caller becomes the sole owner and may drop it or hand it to
    /// [`SizeClassPool::give_back`] later.
    pub fn detach(mut self) -> Box<[u8]> {
        self.buf.take().unwrap_or_default()
    }
}

impl Deref for RentedBuffer<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.buf.as_deref().unwrap_or_default()
    }
}

impl DerefMut for RentedBuffer<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buf.as_deref_mut().unwrap_or_default()
    }
}

impl Drop for RentedBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            if let Err(err) = self.pool.give_back(buf) {
                warn!(%err, "rented buffer could not be returned");
            }
        }
    }
}
