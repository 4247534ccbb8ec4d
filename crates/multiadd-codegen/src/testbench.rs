//! Self-checking randomized testbench generation
//!
//! The testbench drives every input of a module with an all-zeros vector, an
//! all-ones vector and a run of random vectors, and compares the module's
//! single output against the behavioral sum of its inputs.

use crate::verilog::VerilogWriter;
use crate::{CodegenError, Result};
use bitvec::prelude::*;
use multiadd_lir::{format_hex, ModuleInterface, Port};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default number of random vectors
pub const DEFAULT_VECTORS: usize = 1000;
/// Default stimulus seed
pub const DEFAULT_SEED: u64 = 1;

/// Testbench generator for a summing module
#[derive(Debug, Clone)]
pub struct TestbenchGenerator {
    dut: ModuleInterface,
    output: Port,
    vectors: usize,
    seed: u64,
}

impl TestbenchGenerator {
    /// Create a generator for `dut`
    ///
    /// The module must have at least one input and exactly one output.
    pub fn new(dut: ModuleInterface) -> Result<Self> {
        let unsupported = |reason: &str| CodegenError::UnsupportedInterface {
            module: dut.name.clone(),
            reason: reason.to_string(),
        };
        if dut.inputs().next().is_none() {
            return Err(unsupported("no input ports"));
        }
        let output = {
            let mut outputs = dut.outputs();
            match (outputs.next(), outputs.next()) {
                (Some(output), None) => output.clone(),
                _ => return Err(unsupported("expected exactly one output port")),
            }
        };

        Ok(Self {
            dut,
            output,
            vectors: DEFAULT_VECTORS,
            seed: DEFAULT_SEED,
        })
    }

    /// Number of random vectors after the corner cases
    pub fn vectors(mut self, vectors: usize) -> Self {
        self.vectors = vectors;
        self
    }

    /// Seed for the random vectors
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Name of the generated testbench module
    pub fn module_name(&self) -> String {
        format!("{}_tb", self.dut.name)
    }

    pub fn generate(&self) -> String {
        let inputs: Vec<&Port> = self.dut.inputs().collect();
        let output = &self.output;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut w = VerilogWriter::new();

        w.emit_module_header(&self.module_name(), &[]);
        w.indent();
        for port in &inputs {
            w.emit_line(&declare("reg", port.width, &port.name));
        }
        w.emit_line(&declare("wire", output.width, &output.name));
        w.emit_line(&declare("wire", output.width, "expected"));
        w.emit_line("wire ok;");
        w.blank_line();

        let connections: Vec<String> = self
            .dut
            .ports
            .iter()
            .map(|p| format!(".{0}({0})", p.name))
            .collect();
        w.emit_line(&format!(
            "{} dut ({});",
            self.dut.name,
            connections.join(", ")
        ));
        w.blank_line();

        let terms: Vec<&str> = inputs.iter().map(|p| p.name.as_str()).collect();
        w.emit_line(&format!("assign expected = {};", terms.join(" + ")));
        w.emit_line(&format!("assign ok = expected == {};", output.name));
        w.blank_line();

        w.emit_line("initial begin");
        w.indent();
        w.emit_line(&format!(
            "$monitor(\"expected: 0x%x, {0}: 0x%x, ok: %d\", expected, {0}, ok);",
            output.name
        ));
        for port in &inputs {
            w.emit_line(&drive(port, &bitvec![0; port.width]));
        }
        w.emit_line("#1;");
        for port in &inputs {
            w.emit_line(&drive(port, &bitvec![1; port.width]));
        }
        for _ in 0..self.vectors {
            w.emit_line("#1;");
            for port in &inputs {
                let value: BitVec = (0..port.width).map(|_| rng.gen::<bool>()).collect();
                w.emit_line(&drive(port, &value));
            }
        }
        w.emit_line("#1;");
        w.emit_line("$finish;");
        w.dedent();
        w.emit_line("end");
        w.dedent();
        w.emit_line("endmodule");

        w.finish()
    }
}

fn declare(kind: &str, width: usize, name: &str) -> String {
    if width <= 1 {
        format!("{kind} {name};")
    } else {
        format!("{kind} [{}:0] {name};", width - 1)
    }
}

fn drive(port: &Port, value: &BitSlice) -> String {
    format!("{} = {}'h{};", port.name, port.width, format_hex(value))
}
