//! Complete plan: the reduction tree plus one row adder per distinct width

use crate::error::{ConfigurationError, EvaluationError};
use crate::row_adder::RowAdderPlan;
use crate::tree::{TreeNode, TreePlan};
use bitvec::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Everything needed to emit a self-contained adder tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    pub tree: TreePlan,
    /// One plan per catalogue width, keyed by adder width
    pub adders: BTreeMap<usize, RowAdderPlan>,
}

impl Design {
    /// Validate a configuration and plan the tree and all of its adders
    pub fn plan(operand_width: usize, operand_count: usize) -> Result<Self, ConfigurationError> {
        Self::from_tree(TreePlan::plan(operand_width, operand_count)?)
    }

    /// Plan every adder the tree references
    ///
    /// Adder widths are independent of each other and are planned in parallel.
    pub fn from_tree(tree: TreePlan) -> Result<Self, ConfigurationError> {
        let widths: Vec<usize> = tree.catalogue().iter().collect();
        let adders = widths
            .into_par_iter()
            .map(|width| RowAdderPlan::plan(width).map(|plan| (width, plan)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        info!(
            operand_width = tree.operand_width(),
            operand_count = tree.operand_count(),
            final_width = tree.final_width(),
            adders = adders.len(),
            "planned design"
        );

        Ok(Self { tree, adders })
    }

    /// Adder plan used by an internal node
    pub fn adder_for(&self, index: usize) -> Option<&RowAdderPlan> {
        let width = self.tree.node(index)?.adder_width()?;
        self.adders.get(&width)
    }

    /// Sum `operands` through the planned tree, bit for bit
    ///
    /// Every operand must be exactly `operand_width` bits. The result is
    /// `final_width` bits.
    pub fn evaluate(&self, operands: &[BitVec]) -> Result<BitVec, EvaluationError> {
        let spec = self.tree.spec();
        if operands.len() != spec.operand_count {
            return Err(EvaluationError::OperandCount {
                expected: spec.operand_count,
                actual: operands.len(),
            });
        }
        if let Some((index, operand)) = operands
            .iter()
            .enumerate()
            .find(|(_, op)| op.len() != spec.operand_width)
        {
            return Err(EvaluationError::OperandWidth {
                index,
                expected: spec.operand_width,
                actual: operand.len(),
            });
        }

        let nodes = self.tree.nodes();
        let mut values: Vec<BitVec> = vec![BitVec::new(); nodes.len()];

        // children always sit at higher indices than their parent
        for index in (0..nodes.len()).rev() {
            values[index] = match nodes[index] {
                TreeNode::Source { source_index, .. } => operands
                    .get(source_index)
                    .cloned()
                    .ok_or(EvaluationError::MalformedTree { node: index })?,
                TreeNode::Sum { .. } | TreeNode::Destination { .. } => {
                    let inputs = self
                        .tree
                        .child_inputs(index)
                        .ok_or(EvaluationError::MalformedTree { node: index })?;
                    let adder = self
                        .adder_for(index)
                        .ok_or(EvaluationError::MissingAdder { node: index })?;
                    let [a, b] = inputs.map(|input| {
                        let mut value = values[input.node].clone();
                        value.resize(value.len() + input.padding, false);
                        value
                    });
                    adder.evaluate(&a, &b)?
                }
            };
        }

        Ok(std::mem::take(&mut values[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiadd_lir::{bits_from_u128, bits_to_u128};

    #[test]
    fn test_adders_match_catalogue() {
        let design = Design::plan(8, 5).unwrap();
        let widths: Vec<usize> = design.adders.keys().copied().collect();
        assert_eq!(widths, design.tree.catalogue().iter().collect::<Vec<_>>());
        assert_eq!(widths, vec![8, 9, 10]);
        for (width, plan) in &design.adders {
            assert_eq!(plan.width(), *width);
        }
    }

    #[test]
    fn test_every_internal_node_has_an_adder() {
        let design = Design::plan(3, 11).unwrap();
        for index in design.tree.internal_nodes() {
            let adder = design.adder_for(index).unwrap();
            assert_eq!(adder.result_width(), design.tree.nodes()[index].width());
        }
    }

    #[test]
    fn test_evaluate_all_ones() {
        let design = Design::plan(4, 3).unwrap();
        let ones: Vec<BitVec> = (0..3).map(|_| bits_from_u128(0xF, 4)).collect();
        let sum = design.evaluate(&ones).unwrap();
        assert_eq!(sum.len(), 6);
        assert_eq!(bits_to_u128(&sum), Some(45));
    }

    #[test]
    fn test_evaluate_rejects_bad_operands() {
        let design = Design::plan(4, 3).unwrap();
        let two = vec![bits_from_u128(1, 4), bits_from_u128(1, 4)];
        assert_eq!(
            design.evaluate(&two),
            Err(EvaluationError::OperandCount {
                expected: 3,
                actual: 2
            })
        );

        let narrow = vec![
            bits_from_u128(1, 4),
            bits_from_u128(1, 3),
            bits_from_u128(1, 4),
        ];
        assert_eq!(
            design.evaluate(&narrow),
            Err(EvaluationError::OperandWidth {
                index: 1,
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_evaluate_reports_missing_adder() {
        let mut design = Design::plan(4, 3).unwrap();
        // node 1 sums two 4-bit sources
        assert!(design.adders.remove(&4).is_some());
        let operands = vec![bits_from_u128(1, 4); 3];
        assert_eq!(
            design.evaluate(&operands),
            Err(EvaluationError::MissingAdder { node: 1 })
        );
    }

    #[test]
    fn test_design_rejects_invalid_configuration() {
        assert_eq!(
            Design::plan(4, 1),
            Err(ConfigurationError::OperandCountTooSmall { count: 1 })
        );
    }
}
