//! multiadd Code Generation
//!
//! This crate handles:
//! - Lowering tree and adder plans to a structural netlist
//! - Structural Verilog emission
//! - Self-checking testbench generation
//! - Shift-register input wrappers

pub mod lower;
pub mod naming;
pub mod shift_register;
pub mod testbench;
pub mod verilog;

pub use lower::{lower_adder, lower_design, lower_tree};
pub use shift_register::ShiftRegisterGenerator;
pub use testbench::TestbenchGenerator;
pub use verilog::{write_module, write_netlist, VerilogWriter};

use multiadd_plan::{ConfigurationError, Design, RowAdderPlan};
use thiserror::Error;

/// Code generation errors
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("unsupported module interface for {module}: {reason}")]
    UnsupportedInterface { module: String, reason: String },

    #[error("malformed tree plan at node {node}")]
    MalformedTree { node: usize },
}

/// Result type for code generation
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Verilog for a complete design: the tree module followed by every adder
/// module it instantiates
pub fn generate_design(design: &Design) -> Result<String> {
    let spec = design.tree.spec();
    let mut out = format!(
        "// Generated by multiadd - {} x {}-bit adder tree\n\n",
        spec.operand_count, spec.operand_width
    );
    out.push_str(&write_netlist(&lower_design(design)?));
    Ok(out)
}

/// Verilog for a single `width`-bit carry-lookahead adder module
pub fn generate_adder(width: usize) -> Result<String> {
    let plan = RowAdderPlan::plan(width)?;
    let mut out = format!("// Generated by multiadd - {width}-bit carry-lookahead adder\n\n");
    out.push_str(&write_module(&lower_adder(&plan)));
    Ok(out)
}
