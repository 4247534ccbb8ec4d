//! Configuration validation

use crate::error::ConfigurationError;
use multiadd_lir::CARRY4_LANES;

/// Reject configurations the tree planner cannot handle
///
/// The operand count is checked first, so `(0, 1)` reports the count.
/// Configurations whose node count, destination width or carry chain would
/// not fit in a `usize` are rejected as too large.
pub fn validate(operand_width: usize, operand_count: usize) -> Result<(), ConfigurationError> {
    if operand_count < 2 {
        return Err(ConfigurationError::OperandCountTooSmall {
            count: operand_count,
        });
    }
    if operand_width < 1 {
        return Err(ConfigurationError::OperandWidthNonPositive {
            width: operand_width,
        });
    }

    let fits = operand_count.checked_mul(2).is_some()
        && operand_width
            .checked_add(bit_length(operand_count - 1))
            .and_then(|width| width.checked_next_multiple_of(CARRY4_LANES))
            .is_some();
    if !fits {
        return Err(ConfigurationError::ConfigurationTooLarge {
            width: operand_width,
            count: operand_count,
        });
    }
    Ok(())
}

/// Number of bits needed to represent `value`
pub(crate) fn bit_length(value: usize) -> usize {
    (usize::BITS - value.leading_zeros()) as usize
}
