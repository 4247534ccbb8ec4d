//! End-to-end checks of planned adder trees

use multiadd_lir::{bits_from_u128, bits_to_u128};
use multiadd_plan::{ConfigurationError, Design, TreeNode, TreePlan};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_operands(rng: &mut StdRng, width: usize, count: usize) -> Vec<u128> {
    let mask = if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    };
    (0..count).map(|_| rng.gen::<u128>() & mask).collect()
}

fn tree_sum(design: &Design, operands: &[u128]) -> u128 {
    let width = design.tree.operand_width();
    let bits: Vec<_> = operands
        .iter()
        .map(|&v| bits_from_u128(v, width))
        .collect();
    let sum = design.evaluate(&bits).unwrap();
    assert_eq!(sum.len(), design.tree.final_width());
    bits_to_u128(&sum).unwrap()
}

#[test]
fn test_tree_sums_random_operands() {
    let mut rng = StdRng::seed_from_u64(42);
    let configs = [
        (1, 2),
        (1, 3),
        (1, 7),
        (4, 3),
        (4, 4),
        (5, 6),
        (8, 5),
        (8, 16),
        (12, 9),
        (16, 17),
        (32, 3),
        (63, 2),
        (64, 5),
    ];
    for (width, count) in configs {
        let design = Design::plan(width, count).unwrap();
        for _ in 0..200 {
            let operands = random_operands(&mut rng, width, count);
            let expected: u128 = operands.iter().sum();
            assert_eq!(tree_sum(&design, &operands), expected, "{width}x{count}");
        }
    }
}

#[test]
fn test_tree_never_wraps_at_maximum() {
    for width in 1..=9 {
        for count in 2..=33 {
            let design = Design::plan(width, count).unwrap();
            let max = (1u128 << width) - 1;
            let operands = vec![max; count];
            assert_eq!(
                tree_sum(&design, &operands),
                max * count as u128,
                "{width}x{count}"
            );
        }
    }
}

#[test]
fn test_small_tree_exhaustive() {
    let design = Design::plan(3, 3).unwrap();
    for a in 0..8u128 {
        for b in 0..8u128 {
            for c in 0..8u128 {
                assert_eq!(tree_sum(&design, &[a, b, c]), a + b + c);
            }
        }
    }
}

#[test]
fn test_planning_is_deterministic() {
    for (width, count) in [(4, 3), (8, 5), (7, 31)] {
        assert_eq!(
            Design::plan(width, count).unwrap(),
            Design::plan(width, count).unwrap()
        );
    }
}

#[test]
fn test_two_operand_boundary() {
    let tree = TreePlan::plan(6, 2).unwrap();
    assert_eq!(tree.nodes().len(), 3);
    assert_eq!(tree.internal_nodes().count(), 1);
    assert_eq!(tree.nodes()[0], TreeNode::Destination { width: 7 });
    assert!(tree.nodes()[1..].iter().all(TreeNode::is_source));
}

#[test]
fn test_configuration_errors_fail_fast() {
    assert_eq!(
        Design::plan(8, 0).unwrap_err(),
        ConfigurationError::OperandCountTooSmall { count: 0 }
    );
    assert_eq!(
        Design::plan(0, 2).unwrap_err(),
        ConfigurationError::OperandWidthNonPositive { width: 0 }
    );
    assert_eq!(
        Design::plan(usize::MAX, 2).unwrap_err(),
        ConfigurationError::ConfigurationTooLarge {
            width: usize::MAX,
            count: 2
        }
    );
}
