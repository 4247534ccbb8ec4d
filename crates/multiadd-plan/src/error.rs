//! Error types for planning and plan evaluation

use thiserror::Error;

/// Rejected tree configuration
///
/// Raised before any planning begins; no partial plan is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("operand count too small: {count} (at least 2 operands are required)")]
    OperandCountTooSmall { count: usize },

    #[error("operand width non-positive: {width}")]
    OperandWidthNonPositive { width: usize },

    #[error("configuration too large: {count} operands of {width} bits")]
    ConfigurationTooLarge { width: usize, count: usize },
}

/// Operands handed to a plan evaluation do not match the planned shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("expected {expected} operands, got {actual}")]
    OperandCount { expected: usize, actual: usize },

    #[error("operand {index} is {actual} bits wide, expected {expected}")]
    OperandWidth {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("node {node} has no children")]
    MalformedTree { node: usize },

    #[error("no adder planned for node {node}")]
    MissingAdder { node: usize },
}
