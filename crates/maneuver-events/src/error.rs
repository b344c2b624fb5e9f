/// Error raised by a pipeline stage.
///
/// Every stage reports failures synchronously to its caller and never
/// retries. Empty input is not an error anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum Error {
    /// The signal is too short for the requested operation.
    #[display("{operation} needs at least {required} samples, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },
    /// Malformed or out-of-domain intervals, or a non-increasing index column.
    #[display("invalid range: {reason}")]
    InvalidRange { reason: String },
    /// A configuration value outside its accepted domain.
    #[display("invalid configuration: {reason}")]
    Configuration { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn ensure_len(
        operation: &'static str,
        required: usize,
        actual: usize,
    ) -> Result<()> {
        if actual < required {
            return Err(Self::InsufficientData {
                operation,
                required,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::InsufficientData {
            operation: "rate of change",
            required: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "rate of change needs at least 2 samples, got 1");
        assert_eq!(
            Error::configuration("cluster count must be at least 1").to_string(),
            "invalid configuration: cluster count must be at least 1"
        );
    }

    #[test]
    fn test_ensure_len() {
        assert!(Error::ensure_len("detector", 2, 2).is_ok());
        assert!(matches!(
            Error::ensure_len("detector", 3, 2),
            Err(Error::InsufficientData {
                required: 3,
                actual: 2,
                ..
            })
        ));
    }
}
