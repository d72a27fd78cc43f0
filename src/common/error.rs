//! Error types for poolbench.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in poolbench.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested or returned size is larger than the largest size class.
    #[error("Unsupported size: {0} bytes exceeds the largest size class")]
    UnsupportedSize(usize),

    /// A returned buffer's length is not one of the class capacities.
    ///
    /// The buffer did not come from a pool; the buckets are left untouched.
    #[error("Invalid buffer: length {0} does not match any size class")]
    InvalidBuffer(usize),

    /// Benchmark trial parameters are unusable (e.g., zero workers).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error, e.g. when writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedSize(8193);
        assert_eq!(
            format!("{}", err),
            "Unsupported size: 8193 bytes exceeds the largest size class"
        );

        let err = Error::InvalidBuffer(100);
        assert_eq!(
            format!("{}", err),
            "Invalid buffer: length 100 does not match any size class"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<usize> {
            Err(Error::InvalidConfig("concurrency must be > 0".into()))
        }

        assert!(matches!(might_fail(), Err(Error::InvalidConfig(_))));
    }
}
