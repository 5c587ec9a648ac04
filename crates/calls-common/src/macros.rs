//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `CallsError`
///
/// # Examples
///
/// ```rust
/// use calls_common::bail;
/// use calls_common::Result;
///
/// fn check_top_n(n: usize) -> Result<()> {
///     if n == 0 {
///         bail!("top_n must be at least 1, got {}", n);
///     }
///     Ok(())
/// }
///
/// assert!(check_top_n(0).is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::CallsError::new(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::CallsError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::CallsError::new(format!($fmt, $($arg)*)))
    };
}

/// Add context to an error while preserving the error chain
///
/// # Examples
///
/// ```rust
/// use calls_common::{with_context, Result};
///
/// fn read_input(path: &str) -> Result<String> {
///     std::fs::read_to_string(path)
///         .map_err(|e| with_context!(e, "Failed to read {}", path))
/// }
///
/// assert!(read_input("/definitely/not/here.csv").is_err());
/// ```
#[macro_export]
macro_rules! with_context {
    ($err:expr, $msg:literal $(,)?) => {
        $crate::CallsError::with_source(format!($msg), $err)
    };
    ($err:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::CallsError::with_source(format!($fmt, $($arg)*), $err)
    };
}

#[cfg(test)]
mod tests {
    use crate::{CallsError, Result};

    fn bails(flag: bool) -> Result<u8> {
        if flag {
            bail!("flag was set");
        }
        Ok(1)
    }

    #[test]
    fn test_bail() {
        assert_eq!(bails(false).unwrap(), 1);
        let err = bails(true).unwrap_err();
        assert_eq!(err.to_string(), "flag was set");
    }

    #[test]
    fn test_with_context() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: CallsError = with_context!(io, "while reading {}", "calls.csv");
        assert_eq!(err.to_string(), "while reading calls.csv");
    }
}
