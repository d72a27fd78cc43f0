//! Benchmark workload: fill a buffer with random bytes and reduce it to a scalar.

/// Seed substituted for zero, which would lock xorshift at zero forever.
const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Small, fast xorshift64 generator. One per worker thread.
///
/// Statistical quality is irrelevant here; the bytes only need to defeat
/// trivial optimization of the averaging loop.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a generator. A zero seed is replaced with a fixed constant.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed };
        Self { state }
    }

    /// Next 64 random bits.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Overwrite every byte of `dest`.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut chunks = dest.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_u64().to_le_bytes());
        }
        let rest = chunks.into_remainder();
        if !rest.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            rest.copy_from_slice(&bytes[..rest.len()]);
        }
    }
}

/// Mean value of the bytes in `bytes`; 0.0 for an empty slice.
#[inline]
pub fn average_byte(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let sum: u64 = bytes.iter().map(|&b| u64::from(b)).sum();
    sum as f64 / bytes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_byte() {
        assert_eq!(average_byte(&[]), 0.0);
        assert_eq!(average_byte(&[0, 255]), 127.5);
        assert_eq!(average_byte(&[7; 64]), 7.0);
    }

    #[test]
    fn test_zero_seed_still_random() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = XorShift64::new(42);
        let mut b = XorShift64::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_fill_bytes_covers_remainder() {
        let mut rng = XorShift64::new(7);
        // 8 full words plus 5 trailing bytes; all-zero output is astronomically unlikely.
        let mut buf = [0u8; 69];
        rng.fill_bytes(&mut buf);
        assert!(buf[64..].iter().any(|&b| b != 0));
        assert!(buf[..64].iter().any(|&b| b != 0));
    }

    #[test]
    fn test_random_average_is_in_range() {
        let mut rng = XorShift64::new(1234);
        let mut buf = vec![0u8; 2048];
        rng.fill_bytes(&mut buf);

        let avg = average_byte(&buf);
        assert!((0.0..=255.0).contains(&avg));
        // Uniform bytes average near 127.5.
        assert!((100.0..155.0).contains(&avg));
    }
}
