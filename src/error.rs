use thiserror::Error;

/// Errors produced while validating or running a combination request.
///
/// Both variants are caller errors. The computation itself cannot fail once
/// a request has passed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// A numeric field is out of range. `field` is the wire name (`"samples"`, `"a1"`, ...).
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// The operation tag is not one of `add`, `subtract`, `multiply`.
    #[error("invalid operation '{0}', expected one of: add, subtract, multiply")]
    InvalidOperation(String),
}

impl ProcessError {
    pub fn invalid_parameter(field: &'static str, reason: impl Into<String>) -> Self {
        ProcessError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Stable snake_case tag used in error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::InvalidParameter { .. } => "invalid_parameter",
            ProcessError::InvalidOperation(_) => "invalid_operation",
        }
    }

    /// The offending field, if the error names one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ProcessError::InvalidParameter { field, .. } => Some(*field),
            ProcessError::InvalidOperation(_) => Some("operation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_field() {
        let err = ProcessError::invalid_parameter("samples", "must be greater than 0, got 0");
        assert_eq!(
            err.to_string(),
            "invalid parameter `samples`: must be greater than 0, got 0"
        );
        assert_eq!(err.kind(), "invalid_parameter");
        assert_eq!(err.field(), Some("samples"));
    }

    #[test]
    fn invalid_operation_kind() {
        let err = ProcessError::InvalidOperation("divide".into());
        assert_eq!(err.kind(), "invalid_operation");
        assert!(err.to_string().contains("'divide'"));
    }
}
