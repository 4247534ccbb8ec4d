//! Module, port and net names shared by all generators

use multiadd_plan::{TreeNode, TreePlan, TreeSpec};

/// Tree module, e.g. `adder_tree_5x8` for five 8-bit operands
pub fn tree_module(spec: &TreeSpec) -> String {
    format!("adder_tree_{}x{}", spec.operand_count, spec.operand_width)
}

/// Adder module for `width`-bit operands
pub fn adder_module(width: usize) -> String {
    format!("cla_adder_{width}")
}

/// Tree input port for operand `index`
pub fn source_port(index: usize) -> String {
    format!("src{index}")
}

/// Tree output port
pub const DESTINATION_PORT: &str = "dst";

/// Internal wire of the Sum node at heap index `index`
pub fn sum_net(index: usize) -> String {
    format!("sum{index}")
}

/// Signal carrying the value of a tree node
pub fn node_signal(tree: &TreePlan, index: usize) -> Option<String> {
    Some(match tree.node(index)? {
        TreeNode::Source { source_index, .. } => source_port(*source_index),
        TreeNode::Sum { .. } => sum_net(index),
        TreeNode::Destination { .. } => DESTINATION_PORT.to_string(),
    })
}

/// Zero-extend `signal` by `padding` bits on the most significant side
pub fn zero_extend(signal: &str, padding: usize) -> String {
    if padding == 0 {
        signal.to_string()
    } else {
        format!("{{{padding}'h0, {signal}}}")
    }
}

/// Bit range `[hi:lo]` of `signal`, declared `width` bits wide
///
/// Single-bit signals are declared without a range, so selecting their only
/// bit yields the bare name.
pub fn select(signal: &str, width: usize, hi: usize, lo: usize) -> String {
    if width == 1 && hi == 0 && lo == 0 {
        signal.to_string()
    } else if hi == lo {
        format!("{signal}[{hi}]")
    } else {
        format!("{signal}[{hi}:{lo}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_extend() {
        assert_eq!(zero_extend("src2", 0), "src2");
        assert_eq!(zero_extend("src2", 1), "{1'h0, src2}");
        assert_eq!(zero_extend("g[9:8]", 2), "{2'h0, g[9:8]}");
    }

    #[test]
    fn test_select() {
        assert_eq!(select("a", 1, 0, 0), "a");
        assert_eq!(select("a", 8, 3, 3), "a[3]");
        assert_eq!(select("a", 8, 7, 4), "a[7:4]");
    }

    #[test]
    fn test_node_signals() {
        let tree = TreePlan::plan(4, 3).unwrap();
        assert_eq!(node_signal(&tree, 0).as_deref(), Some("dst"));
        assert_eq!(node_signal(&tree, 1).as_deref(), Some("sum1"));
        assert_eq!(node_signal(&tree, 2).as_deref(), Some("src0"));
        assert_eq!(node_signal(&tree, 4).as_deref(), Some("src2"));
        assert_eq!(node_signal(&tree, 5), None);
        assert_eq!(tree_module(tree.spec()), "adder_tree_3x4");
    }
}
