//! Lowering of plans into structural netlists

use crate::naming::{
    adder_module, node_signal, select, source_port, sum_net, tree_module, zero_extend,
    DESTINATION_PORT,
};
use crate::{CodegenError, Result};
use multiadd_lir::{Carry4, Instance, Lut2, Module, Netlist, PortDirection, CARRY4_LANES};
use multiadd_plan::{CarryIn, Design, RowAdderPlan, TreeNode, TreePlan};
use tracing::debug;

/// Adder operand ports
const ADDER_A: &str = "a";
const ADDER_B: &str = "b";
/// Adder result port
const ADDER_Y: &str = "y";

/// Per-bit generate/propagate nets and carry chain outputs
const GENERATE: &str = "g";
const PROPAGATE: &str = "p";
const CARRY_SUM: &str = "o";
const CARRY_OUT: &str = "co";

const ZERO: &str = "1'b0";

/// Netlist with the tree module on top followed by one module per
/// catalogue width
pub fn lower_design(design: &Design) -> Result<Netlist> {
    let tree = lower_tree(&design.tree)?;
    let mut netlist = Netlist::new(tree.name.clone());
    netlist.modules.push(tree);
    netlist
        .modules
        .extend(design.adders.values().map(lower_adder));
    Ok(netlist)
}

/// Tree module: one port per operand, one wire per Sum node and one adder
/// instance per internal node
///
/// Fails if an internal node has no children or no adder width, which only
/// happens for plans that were not built by the tree planner.
pub fn lower_tree(tree: &TreePlan) -> Result<Module> {
    let spec = tree.spec();
    let mut module = Module::new(tree_module(spec));

    for index in 0..spec.operand_count {
        module.add_port(source_port(index), PortDirection::Input, spec.operand_width);
    }
    module.add_port(DESTINATION_PORT, PortDirection::Output, tree.final_width());

    for (index, node) in tree.nodes().iter().enumerate() {
        if let TreeNode::Sum { width } = node {
            module.add_net(sum_net(index), *width);
        }
    }

    for index in tree.internal_nodes() {
        let malformed = || CodegenError::MalformedTree { node: index };
        let adder_width = tree.nodes()[index].adder_width().ok_or_else(malformed)?;
        let inputs = tree.child_inputs(index).ok_or_else(malformed)?;
        let output = node_signal(tree, index).ok_or_else(malformed)?;
        let [a, b] = inputs.map(|input| {
            node_signal(tree, input.node).map(|signal| zero_extend(&signal, input.padding))
        });
        let (Some(a), Some(b)) = (a, b) else {
            return Err(malformed());
        };
        module.instances.push(
            Instance::new(adder_module(adder_width), format!("add{index}"))
                .connect(ADDER_A, a)
                .connect(ADDER_B, b)
                .connect(ADDER_Y, output),
        );
    }

    debug!(
        module = %module.name,
        adders = module.instances.len(),
        "lowered tree"
    );
    Ok(module)
}

/// Adder module: generate/propagate LUTs per bit feeding a chained run of
/// `CARRY4` blocks
pub fn lower_adder(plan: &RowAdderPlan) -> Module {
    let width = plan.width();
    let carry_width = plan.carry_width();
    let mut module = Module::new(adder_module(width));

    module.add_port(ADDER_A, PortDirection::Input, width);
    module.add_port(ADDER_B, PortDirection::Input, width);
    module.add_port(ADDER_Y, PortDirection::Output, plan.result_width());

    module.add_net(GENERATE, width);
    module.add_net(PROPAGATE, width);
    module.add_net(CARRY_SUM, carry_width);
    module.add_net(CARRY_OUT, carry_width);

    for (prefix, net, lut) in [
        ("gen", GENERATE, plan.generate_lut()),
        ("prop", PROPAGATE, plan.propagate_lut()),
    ] {
        for bit in 0..width {
            module.instances.push(lut_instance(
                format!("{prefix}{bit}"),
                lut,
                select(ADDER_A, width, bit, bit),
                select(ADDER_B, width, bit, bit),
                select(net, width, bit, bit),
            ));
        }
    }

    for block in plan.blocks() {
        let top = block.base + block.lanes - 1;
        let carry_in = match block.carry_in {
            CarryIn::Zero => ZERO.to_string(),
            CarryIn::Chained { block: prev } => {
                let bit = prev * CARRY4_LANES + CARRY4_LANES - 1;
                select(CARRY_OUT, carry_width, bit, bit)
            }
        };
        let lanes_hi = block.bits().end - 1;
        module.instances.push(
            Instance::new(Carry4::CELL, format!("carry{}", block.index))
                .connect(Carry4::CI, carry_in)
                .connect(Carry4::CYINIT, ZERO)
                .connect(
                    Carry4::DI,
                    zero_extend(&select(GENERATE, width, top, block.base), block.padding()),
                )
                .connect(
                    Carry4::S,
                    zero_extend(&select(PROPAGATE, width, top, block.base), block.padding()),
                )
                .connect(
                    Carry4::O,
                    select(CARRY_SUM, carry_width, lanes_hi, block.base),
                )
                .connect(
                    Carry4::CO,
                    select(CARRY_OUT, carry_width, lanes_hi, block.base),
                ),
        );
    }

    let msb = width - 1;
    module.add_assign(
        ADDER_Y,
        format!(
            "{{{}, {}}}",
            select(CARRY_OUT, carry_width, msb, msb),
            select(CARRY_SUM, carry_width, msb, 0)
        ),
    );

    debug!(module = %module.name, blocks = plan.blocks().len(), "lowered adder");
    module
}

fn lut_instance(name: String, lut: Lut2, i0: String, i1: String, o: String) -> Instance {
    Instance::new(Lut2::CELL, name)
        .with_parameter(Lut2::INIT_PARAM, lut.init_literal())
        .connect(Lut2::INPUTS[0], i0)
        .connect(Lut2::INPUTS[1], i1)
        .connect(Lut2::OUTPUT, o)
}
