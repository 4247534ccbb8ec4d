//! Hardware primitives for multiadd LIR
//!
//! Only two primitives are used to build adders:
//! - `LUT2`, a 2-input boolean lookup element configured by a 4-bit INIT
//! - `CARRY4`, a 4-lane fast-carry block
//!
//! Port and parameter names follow the Xilinx 7-series library cells so the
//! emitted netlists can be fed to vendor tools unchanged.

use serde::{Deserialize, Serialize};

/// Number of lanes in one fast-carry block
pub const CARRY4_LANES: usize = 4;

/// 2-input lookup table primitive
///
/// Truth table entry `k` holds the output for `I1 = k >> 1`, `I0 = k & 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lut2 {
    /// 4-entry truth table, bit `k` is the output for input index `k`
    pub init: u8,
}

impl Lut2 {
    /// Library cell name
    pub const CELL: &'static str = "LUT2";
    /// Name of the truth table parameter
    pub const INIT_PARAM: &'static str = "INIT";
    /// Input pin names, least significant first
    pub const INPUTS: [&'static str; 2] = ["I0", "I1"];
    /// Output pin name
    pub const OUTPUT: &'static str = "O";

    /// Derive the truth table of an arbitrary 2-input function
    pub fn from_fn(f: impl Fn(bool, bool) -> bool) -> Self {
        let init = (0..4u8).fold(0u8, |acc, index| {
            let i0 = index & 1 == 1;
            let i1 = index & 2 == 2;
            acc | (u8::from(f(i0, i1)) << index)
        });
        Self { init }
    }

    /// Carry generate: `I0 AND I1`
    pub fn and() -> Self {
        Self::from_fn(|a, b| a && b)
    }

    /// Carry propagate: `I0 XOR I1`
    pub fn xor() -> Self {
        Self::from_fn(|a, b| a ^ b)
    }

    /// Evaluate the LUT for one input combination
    pub fn eval(&self, i0: bool, i1: bool) -> bool {
        let index = (usize::from(i1) << 1) | usize::from(i0);
        (self.init >> index) & 1 == 1
    }

    /// INIT value as a sized Verilog literal, e.g. `4'h8`
    pub fn init_literal(&self) -> String {
        format!("4'h{:X}", self.init)
    }
}

/// Outputs of one `CARRY4` evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarryOutputs {
    /// Sum outputs `O[3:0]`
    pub o: [bool; CARRY4_LANES],
    /// Per-lane carry outputs `CO[3:0]`
    pub co: [bool; CARRY4_LANES],
}

impl CarryOutputs {
    /// Carry leaving the top lane of the block
    pub fn carry_out(&self) -> bool {
        self.co[CARRY4_LANES - 1]
    }
}

/// 4-lane fast-carry block
///
/// Each lane muxes between the incoming carry and its `DI` input using the
/// select `S`, and XORs `S` with the incoming carry for the sum output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Carry4;

impl Carry4 {
    /// Library cell name
    pub const CELL: &'static str = "CARRY4";
    /// Carry input pin
    pub const CI: &'static str = "CI";
    /// Carry initialization pin (unused, tied low)
    pub const CYINIT: &'static str = "CYINIT";
    /// Data input bus (generate)
    pub const DI: &'static str = "DI";
    /// Select bus (propagate)
    pub const S: &'static str = "S";
    /// Sum output bus
    pub const O: &'static str = "O";
    /// Carry output bus
    pub const CO: &'static str = "CO";

    /// Evaluate one block
    ///
    /// `co[i] = s[i] ? c[i] : di[i]` and `o[i] = s[i] ^ c[i]`, where `c[0]` is
    /// the carry-in and `c[i + 1] = co[i]`.
    pub fn eval(ci: bool, di: [bool; CARRY4_LANES], s: [bool; CARRY4_LANES]) -> CarryOutputs {
        let mut out = CarryOutputs::default();
        let mut carry = ci;
        for lane in 0..CARRY4_LANES {
            out.o[lane] = s[lane] ^ carry;
            carry = if s[lane] { carry } else { di[lane] };
            out.co[lane] = carry;
        }
        out
    }
}
