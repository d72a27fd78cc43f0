//! Size class identifier type.

use std::fmt;

use super::config::{CLASS_CAPACITIES, MAX_CLASS_SIZE, MIN_CLASS_SIZE, NUM_CLASSES};

/// One of the fixed power-of-two buffer capacities, 16 through 8192 bytes.
///
/// Wraps the bucket index so it can be used directly as an index:
/// `buckets[class.index()]`.
///
/// # Example
/// ```
/// use poolbench::SizeClass;
///
/// let class = SizeClass::for_len(17).unwrap();
/// assert_eq!(class.capacity(), 32);
/// assert_eq!(class.index(), 1);
/// assert!(SizeClass::for_len(8193).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SizeClass(u8);

impl SizeClass {
    /// Every size class, smallest first.
    pub const ALL: [SizeClass; NUM_CLASSES] = [
        SizeClass(0),
        SizeClass(1),
        SizeClass(2),
        SizeClass(3),
        SizeClass(4),
        SizeClass(5),
        SizeClass(6),
        SizeClass(7),
        SizeClass(8),
        SizeClass(9),
    ];

    /// The smallest class whose capacity is at least `len`.
    ///
    /// Returns `None` when `len` exceeds [`MAX_CLASS_SIZE`].
    ///
    /// Same mapping as walking the capacity table in ascending order, done
    /// with a leading-zero count: the class is `ceil(log2(len)) - 4`, clamped
    /// so that everything up to 16 lands in class 0.
    #[inline]
    pub fn for_len(len: usize) -> Option<SizeClass> {
        if len <= MIN_CLASS_SIZE {
            return Some(SizeClass(0));
        }
        if len > MAX_CLASS_SIZE {
            return None;
        }
        let bits = usize::BITS - (len - 1).leading_zeros();
        Some(SizeClass((bits - MIN_CLASS_SIZE.trailing_zeros()) as u8))
    }

    /// The class whose capacity is exactly `len`, if any.
    #[inline]
    pub fn exact(len: usize) -> Option<SizeClass> {
        SizeClass::for_len(len).filter(|class| class.capacity() == len)
    }

    /// Build a class from a bucket index.
    ///
    /// # Panics
    /// Panics if `index >= NUM_CLASSES`.
    #[inline]
    pub fn from_index(index: usize) -> SizeClass {
        assert!(index < NUM_CLASSES, "size class index out of range");
        SizeClass(index as u8)
    }

    /// Bucket index of this class.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Capacity in bytes of every buffer in this class.
    #[inline]
    pub fn capacity(self) -> usize {
        CLASS_CAPACITIES[self.index()]
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({}B)", self.capacity())
    }
}
