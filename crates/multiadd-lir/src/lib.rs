//! multiadd LIR - structural representation
//!
//! This crate handles:
//! - The two hardware primitives an adder is built from (`LUT2`, `CARRY4`)
//! - Bit-level evaluation of those primitives
//! - A generic structural netlist (modules, nets, instances)
//! - Bit-vector helpers shared by planners and generators

pub mod bits;
pub mod netlist;
pub mod primitives;

pub use bits::{bits_from_u128, bits_to_u128, format_hex};
pub use netlist::{
    Assign, Connection, Instance, InternalNet, Module, ModuleInterface, Netlist, Port,
    PortDirection,
};
pub use primitives::{Carry4, CarryOutputs, Lut2, CARRY4_LANES};
