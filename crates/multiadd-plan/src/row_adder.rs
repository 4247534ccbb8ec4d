//! Carry-lookahead row adder planning
//!
//! A `W`-bit adder is built from one generate LUT (`a & b`) and one propagate
//! LUT (`a ^ b`) per bit, feeding a chain of `CARRY4` blocks that covers
//! `ceil4(W)` bit positions. Block `k` takes its carry-in from the top
//! carry-out of block `k - 1`; only block 0 starts from a constant zero.
//! Lanes above bit `W - 1` in the last block see zero generate and propagate.
//!
//! The `W + 1` bit result is `{co[W-1], o[W-1:0]}`.

use crate::error::{ConfigurationError, EvaluationError};
use bitvec::prelude::*;
use multiadd_lir::{Carry4, CarryOutputs, Lut2, CARRY4_LANES};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a carry block's carry-in comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarryIn {
    /// Tied to constant 0 (first block only)
    Zero,
    /// Top carry-out of the given block
    Chained { block: usize },
}

/// One `CARRY4` in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarryBlock {
    /// Position in the chain
    pub index: usize,
    /// First bit position covered by this block
    pub base: usize,
    /// Number of lanes that carry real operand bits (1..=4)
    pub lanes: usize,
    pub carry_in: CarryIn,
}

impl CarryBlock {
    /// Bit positions `[base, base + 4)` covered by this block
    pub fn bits(&self) -> std::ops::Range<usize> {
        self.base..self.base + CARRY4_LANES
    }

    /// Lanes above the operand width, fed with zeros
    pub fn padding(&self) -> usize {
        CARRY4_LANES - self.lanes
    }
}

/// Planned two-operand adder of a fixed width
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowAdderPlan {
    width: usize,
    generate: Lut2,
    propagate: Lut2,
    blocks: Vec<CarryBlock>,
}

impl RowAdderPlan {
    /// Plan a `width`-bit adder
    pub fn plan(width: usize) -> Result<Self, ConfigurationError> {
        if width == 0 {
            return Err(ConfigurationError::OperandWidthNonPositive { width });
        }

        let blocks = (0..width.div_ceil(CARRY4_LANES))
            .map(|index| {
                let base = index * CARRY4_LANES;
                CarryBlock {
                    index,
                    base,
                    lanes: (width - base).min(CARRY4_LANES),
                    carry_in: match index {
                        0 => CarryIn::Zero,
                        _ => CarryIn::Chained { block: index - 1 },
                    },
                }
            })
            .collect::<Vec<_>>();

        debug!(width, blocks = blocks.len(), "planned row adder");

        Ok(Self {
            width,
            generate: Lut2::and(),
            propagate: Lut2::xor(),
            blocks,
        })
    }

    /// Operand width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Result width, one carry bit over the operands
    pub fn result_width(&self) -> usize {
        self.width + 1
    }

    /// Bit positions covered by the carry chain, `ceil4(width)`
    pub fn carry_width(&self) -> usize {
        self.blocks.len() * CARRY4_LANES
    }

    /// LUT driving `generate[i]`
    pub fn generate_lut(&self) -> Lut2 {
        self.generate
    }

    /// LUT driving `propagate[i]`
    pub fn propagate_lut(&self) -> Lut2 {
        self.propagate
    }

    pub fn blocks(&self) -> &[CarryBlock] {
        &self.blocks
    }

    /// Run two operands through the planned LUTs and carry chain
    pub fn evaluate(&self, a: &BitSlice, b: &BitSlice) -> Result<BitVec, EvaluationError> {
        for (index, operand) in [a, b].into_iter().enumerate() {
            if operand.len() != self.width {
                return Err(EvaluationError::OperandWidth {
                    index,
                    expected: self.width,
                    actual: operand.len(),
                });
            }
        }

        let lane = |bits: &BitSlice, i: usize| bits.get(i).map(|b| *b).unwrap_or(false);
        let generate: Vec<bool> = (0..self.carry_width())
            .map(|i| i < self.width && self.generate.eval(lane(a, i), lane(b, i)))
            .collect();
        let propagate: Vec<bool> = (0..self.carry_width())
            .map(|i| i < self.width && self.propagate.eval(lane(a, i), lane(b, i)))
            .collect();

        let mut outputs: Vec<CarryOutputs> = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let ci = match block.carry_in {
                CarryIn::Zero => false,
                CarryIn::Chained { block: prev } => outputs[prev].carry_out(),
            };
            let di = std::array::from_fn(|l| generate[block.base + l]);
            let s = std::array::from_fn(|l| propagate[block.base + l]);
            outputs.push(Carry4::eval(ci, di, s));
        }

        let mut result = BitVec::with_capacity(self.result_width());
        for i in 0..self.width {
            result.push(outputs[i / CARRY4_LANES].o[i % CARRY4_LANES]);
        }
        let top = self.width - 1;
        result.push(outputs[top / CARRY4_LANES].co[top % CARRY4_LANES]);
        Ok(result)
    }
}
