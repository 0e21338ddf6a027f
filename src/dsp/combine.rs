//! Element-wise combination of two signals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

/// How the two input signals are combined into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `y = x1 + x2`
    Add,
    /// `y = x1 - x2`
    Subtract,
    /// `y = x1 * x2`
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    /// Wire tag for this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
        }
    }

    /// Combine a single pair of samples.
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
        }
    }

    /// Combine two signals sample by sample. The output has the length of the
    /// shorter input.
    pub fn combine(self, x1: &[f64], x2: &[f64]) -> Vec<f64> {
        x1.iter().zip(x2).map(|(&a, &b)| self.apply(a, b)).collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            other => Err(ProcessError::InvalidOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_signals() {
        let y = Operation::Add.combine(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        assert_eq!(y, vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn subtract_signals() {
        let y = Operation::Subtract.combine(&[5.0, 7.0, 9.0], &[1.0, 2.0, 3.0]);
        assert_eq!(y, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn multiply_signals() {
        let y = Operation::Multiply.combine(&[2.0, 3.0, 4.0], &[5.0, 6.0, 7.0]);
        assert_eq!(y, vec![10.0, 18.0, 28.0]);
    }

    #[test]
    fn parse_known_tags() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>(), Ok(op));
            assert_eq!(op.to_string(), op.as_str());
        }
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        assert_eq!(
            "divide".parse::<Operation>(),
            Err(ProcessError::InvalidOperation("divide".into()))
        );
        // Tags are matched exactly.
        assert!("Add".parse::<Operation>().is_err());
        assert!("".parse::<Operation>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Operation::Multiply).unwrap();
        assert_eq!(json, "\"multiply\"");
        let op: Operation = serde_json::from_str("\"subtract\"").unwrap();
        assert_eq!(op, Operation::Subtract);
    }
}
