//! Adder tree planning
//!
//! The tree is a complete binary tree in implicit heap layout: node 0 is the
//! destination, node `i` has children `2i + 1` and `2i + 2`, and the last
//! `operand_count` slots are the source leaves. With `2n - 1` nodes for `n`
//! operands every internal node has exactly two children.
//!
//! Widths grow by one bit per level towards the root. The destination is
//! `operand_width + ceil(log2(operand_count))` bits: one carry bit per adder
//! level, enough that no level overflows with every operand at its maximum.
//! Leaves that sit one level above the bottom row are narrower than their
//! parent's adder expects and get zero-padded on the most significant side.

use crate::error::ConfigurationError;
use crate::validate::{bit_length, validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Validated tree configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeSpec {
    /// Width of every input operand
    pub operand_width: usize,
    /// Number of input operands (at least 2)
    pub operand_count: usize,
}

impl TreeSpec {
    /// Validate and build a configuration
    pub fn new(operand_width: usize, operand_count: usize) -> Result<Self, ConfigurationError> {
        validate(operand_width, operand_count)?;
        Ok(Self {
            operand_width,
            operand_count,
        })
    }

    /// Extra bits the sum needs over a single operand, `ceil(log2(count))`
    pub fn bit_growth(&self) -> usize {
        bit_length(self.operand_count.saturating_sub(1))
    }

    /// Width of the destination
    pub fn final_width(&self) -> usize {
        self.operand_width + self.bit_growth()
    }

    /// Total number of heap slots, `2 * count - 1`
    pub fn node_count(&self) -> usize {
        2 * self.operand_count - 1
    }
}

/// One slot of the heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Input operand
    Source { source_index: usize, width: usize },
    /// Intermediate sum of two children
    Sum { width: usize },
    /// Root; also an internal node
    Destination { width: usize },
}

impl TreeNode {
    pub fn width(&self) -> usize {
        match *self {
            TreeNode::Source { width, .. }
            | TreeNode::Sum { width }
            | TreeNode::Destination { width } => width,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, TreeNode::Source { .. })
    }

    /// Operand width of the two-input adder producing this node, if any
    pub fn adder_width(&self) -> Option<usize> {
        match *self {
            TreeNode::Source { .. } => None,
            TreeNode::Sum { width } | TreeNode::Destination { width } => width.checked_sub(1),
        }
    }
}

/// Distinct adder widths a tree needs, in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdderWidthCatalogue(BTreeSet<usize>);

impl AdderWidthCatalogue {
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, width: usize) -> bool {
        self.0.contains(&width)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, width: usize) {
        self.0.insert(width);
    }
}

/// One operand of an internal node's adder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildInput {
    /// Heap index of the child
    pub node: usize,
    /// Zero bits prepended to the child to reach the adder's operand width
    pub padding: usize,
}

/// Planned reduction tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePlan {
    spec: TreeSpec,
    final_width: usize,
    nodes: Vec<TreeNode>,
    catalogue: AdderWidthCatalogue,
}

impl TreePlan {
    /// Validate a configuration and plan its tree
    pub fn plan(operand_width: usize, operand_count: usize) -> Result<Self, ConfigurationError> {
        Ok(Self::from_spec(TreeSpec::new(operand_width, operand_count)?))
    }

    /// Plan the tree for an already validated configuration
    pub fn from_spec(spec: TreeSpec) -> Self {
        let final_width = spec.final_width();
        let node_count = spec.node_count();
        let first_leaf = node_count - spec.operand_count;

        let mut nodes = Vec::with_capacity(node_count);
        nodes.push(TreeNode::Destination { width: final_width });
        for index in 1..node_count {
            if is_leaf(index, node_count) {
                nodes.push(TreeNode::Source {
                    source_index: index - first_leaf,
                    width: spec.operand_width,
                });
            } else {
                nodes.push(TreeNode::Sum {
                    width: final_width - depth(index),
                });
            }
        }

        let mut catalogue = AdderWidthCatalogue::default();
        for width in nodes.iter().filter_map(TreeNode::adder_width) {
            catalogue.insert(width);
        }

        debug!(
            operand_width = spec.operand_width,
            operand_count = spec.operand_count,
            final_width,
            node_count,
            adder_widths = ?catalogue,
            "planned adder tree"
        );

        Self {
            spec,
            final_width,
            nodes,
            catalogue,
        }
    }

    pub fn spec(&self) -> &TreeSpec {
        &self.spec
    }

    pub fn operand_width(&self) -> usize {
        self.spec.operand_width
    }

    pub fn operand_count(&self) -> usize {
        self.spec.operand_count
    }

    pub fn final_width(&self) -> usize {
        self.final_width
    }

    /// All nodes in heap order
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn catalogue(&self) -> &AdderWidthCatalogue {
        &self.catalogue
    }

    /// Heap indices of the Sum and Destination nodes
    pub fn internal_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_source())
            .map(|(index, _)| index)
    }

    /// Heap indices of the two children of an internal node
    pub fn children(&self, index: usize) -> Option<[usize; 2]> {
        if 2 * index + 2 >= self.nodes.len() {
            return None;
        }
        Some([2 * index + 1, 2 * index + 2])
    }

    /// Children of an internal node with the padding each needs to reach
    /// the node's adder width
    pub fn child_inputs(&self, index: usize) -> Option<[ChildInput; 2]> {
        let adder_width = self.nodes.get(index)?.adder_width()?;
        let children = self.children(index)?;
        Some(children.map(|child| ChildInput {
            node: child,
            padding: adder_width.saturating_sub(self.nodes[child].width()),
        }))
    }
}

/// Heap level of a node, `floor(log2(index + 1))`
pub fn depth(index: usize) -> usize {
    (index + 1).ilog2() as usize
}

fn is_leaf(index: usize, node_count: usize) -> bool {
    2 * index + 1 >= node_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(width: usize, count: usize) -> TreePlan {
        TreePlan::plan(width, count).unwrap()
    }

    #[test]
    fn test_final_width() {
        assert_eq!(plan(4, 3).final_width(), 6);
        assert_eq!(plan(8, 5).final_width(), 11);
        assert_eq!(plan(1, 2).final_width(), 2);
        assert_eq!(plan(8, 4).final_width(), 10);
        assert_eq!(plan(16, 17).final_width(), 21);
    }

    #[test]
    fn test_final_width_never_overflows() {
        for width in 1..=10usize {
            for count in 2..=40usize {
                let fw = plan(width, count).final_width();
                let growth = (0..).find(|g| 1usize << g >= count).unwrap();
                assert_eq!(fw, width + growth);
                let max_sum = count as u128 * ((1u128 << width) - 1);
                assert!(max_sum < 1u128 << fw, "overflow at {width}x{count}");
            }
        }
    }

    #[test]
    fn test_node_kinds() {
        for count in 2..=33 {
            let tree = plan(5, count);
            assert_eq!(tree.nodes().len(), 2 * count - 1);
            let sources = tree.nodes().iter().filter(|n| n.is_source()).count();
            let sums = tree
                .nodes()
                .iter()
                .filter(|n| matches!(n, TreeNode::Sum { .. }))
                .count();
            assert_eq!(sources, count);
            assert_eq!(sums, count - 2);
            assert!(matches!(tree.nodes()[0], TreeNode::Destination { .. }));
            assert_eq!(tree.internal_nodes().count(), count - 1);
        }
    }

    #[test]
    fn test_source_indices_left_to_right() {
        let tree = plan(4, 5);
        let indices: Vec<_> = tree
            .nodes()
            .iter()
            .filter_map(|n| match n {
                TreeNode::Source { source_index, .. } => Some(*source_index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(tree.nodes()[4], TreeNode::Source { source_index: 0, width: 4 });
    }

    #[test]
    fn test_two_operands() {
        let tree = plan(3, 2);
        assert_eq!(tree.internal_nodes().collect::<Vec<_>>(), vec![0]);
        assert_eq!(tree.children(0), Some([1, 2]));
        let inputs = tree.child_inputs(0).unwrap();
        assert!(inputs.iter().all(|c| c.padding == 0));
        assert_eq!(tree.catalogue().iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_unbalanced_leaf_padding() {
        // 3 operands: node 1 sums src1/src2 at 5 bits, node 2 is src0 at 4
        let tree = plan(4, 3);
        assert_eq!(tree.node(1), Some(&TreeNode::Sum { width: 5 }));
        assert_eq!(
            tree.node(2),
            Some(&TreeNode::Source {
                source_index: 0,
                width: 4
            })
        );
        let root = tree.child_inputs(0).unwrap();
        assert_eq!(root[0], ChildInput { node: 1, padding: 0 });
        assert_eq!(root[1], ChildInput { node: 2, padding: 1 });
        assert_eq!(tree.catalogue().iter().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_widths_non_increasing_towards_leaves() {
        for count in 2..=64 {
            let tree = plan(7, count);
            for index in tree.internal_nodes() {
                let width = tree.nodes()[index].width();
                for input in tree.child_inputs(index).unwrap() {
                    let child = tree.nodes()[input.node].width();
                    assert!(child < width, "{count}: node {index} -> {}", input.node);
                    assert_eq!(child + input.padding, width - 1);
                }
            }
            for node in tree.nodes().iter().filter(|n| n.is_source()) {
                assert_eq!(node.width(), 7);
            }
        }
    }

    #[test]
    fn test_catalogue_minimal_and_complete() {
        for count in 2..=20 {
            let tree = plan(6, count);
            // internal nodes fill heap levels 0..=floor(log2(count - 1)), one
            // adder width per level
            let final_width = 6 + count.next_power_of_two().trailing_zeros() as usize;
            let deepest = (count - 1).ilog2() as usize;
            let expected: BTreeSet<usize> =
                (0..=deepest).map(|level| final_width - 1 - level).collect();
            assert_eq!(
                tree.catalogue().iter().collect::<BTreeSet<_>>(),
                expected,
                "{count} operands"
            );
        }
        assert_eq!(plan(6, 5).catalogue().iter().collect::<Vec<_>>(), vec![6, 7, 8]);
    }

    #[test]
    fn test_leaves_have_no_children() {
        let tree = plan(4, 4);
        for index in 3..7 {
            assert_eq!(tree.children(index), None);
            assert_eq!(tree.child_inputs(index), None);
        }
        assert_eq!(tree.children(99), None);
    }

    #[test]
    fn test_depth() {
        assert_eq!(depth(0), 0);
        assert_eq!(depth(1), 1);
        assert_eq!(depth(2), 1);
        assert_eq!(depth(3), 2);
        assert_eq!(depth(6), 2);
        assert_eq!(depth(7), 3);
    }

    #[test]
    fn test_planning_is_deterministic() {
        assert_eq!(plan(9, 13), plan(9, 13));
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(TreePlan::plan(8, 1).is_err());
        assert!(TreePlan::plan(0, 8).is_err());
    }

    #[test]
    fn test_oversized_configuration_rejected_before_planning() {
        assert_eq!(
            TreePlan::plan(usize::MAX, 2),
            Err(ConfigurationError::ConfigurationTooLarge {
                width: usize::MAX,
                count: 2
            })
        );
        assert!(TreePlan::plan(3, usize::MAX).is_err());
    }

    #[test]
    fn test_zero_width_node_has_no_adder() {
        assert_eq!(TreeNode::Sum { width: 0 }.adder_width(), None);
        assert_eq!(TreeNode::Destination { width: 1 }.adder_width(), Some(0));
    }
}
