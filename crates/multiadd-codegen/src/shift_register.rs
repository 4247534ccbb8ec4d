//! Clocked shift-register input wrapper
//!
//! Each operand of the wrapped module is loaded serially: on every rising
//! clock edge the matching `stream` bit is shifted into the operand's least
//! significant position. Outputs of the wrapped module are passed through.

use crate::verilog::VerilogWriter;
use crate::{CodegenError, Result};
use multiadd_lir::{Module, ModuleInterface, Port, PortDirection};

const CLOCK: &str = "clk";

/// Serial-input wrapper generator
#[derive(Debug, Clone)]
pub struct ShiftRegisterGenerator {
    inner: ModuleInterface,
}

impl ShiftRegisterGenerator {
    /// Create a wrapper generator for `inner`
    ///
    /// The module must have at least one input and one output.
    pub fn new(inner: ModuleInterface) -> Result<Self> {
        let reason = if inner.inputs().next().is_none() {
            Some("no input ports")
        } else if inner.outputs().next().is_none() {
            Some("no output ports")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CodegenError::UnsupportedInterface {
                module: inner.name,
                reason: reason.to_string(),
            });
        }
        Ok(Self { inner })
    }

    /// Name of the generated wrapper module
    pub fn module_name(&self) -> String {
        format!("{}_shift", self.inner.name)
    }

    /// Ports of the wrapper: clock, one serial input per operand, then the
    /// wrapped module's outputs
    pub fn interface(&self) -> ModuleInterface {
        let mut module = Module::new(self.module_name());
        module.add_port(CLOCK, PortDirection::Input, 1);
        for index in 0..self.inner.inputs().count() {
            module.add_port(stream_port(index), PortDirection::Input, 1);
        }
        for port in self.inner.outputs() {
            module.ports.push(port.clone());
        }
        module.interface()
    }

    pub fn generate(&self) -> String {
        let inputs: Vec<&Port> = self.inner.inputs().collect();
        let mut w = VerilogWriter::new();

        let wrapper = self.interface();
        w.emit_module_header(&wrapper.name, &wrapper.ports);
        w.indent();
        for port in &inputs {
            w.emit_line(&register(port));
        }
        w.blank_line();

        let connections: Vec<String> = self
            .inner
            .ports
            .iter()
            .map(|p| format!(".{0}({0})", p.name))
            .collect();
        w.emit_line(&format!(
            "{} inner ({});",
            self.inner.name,
            connections.join(", ")
        ));
        w.blank_line();

        w.emit_line("initial begin");
        w.indent();
        for port in &inputs {
            w.emit_line(&format!("{} = 0;", port.name));
        }
        w.dedent();
        w.emit_line("end");
        w.blank_line();

        w.emit_line(&format!("always @(posedge {CLOCK}) begin"));
        w.indent();
        for (index, port) in inputs.iter().enumerate() {
            let stream = stream_port(index);
            let next = if port.width <= 1 {
                stream
            } else {
                format!("{{{}[{}:0], {stream}}}", port.name, port.width - 2)
            };
            w.emit_line(&format!("{} <= {next};", port.name));
        }
        w.dedent();
        w.emit_line("end");

        w.dedent();
        w.emit_line("endmodule");
        w.finish()
    }
}

fn stream_port(index: usize) -> String {
    format!("stream{index}")
}

fn register(port: &Port) -> String {
    let range = port.range();
    if range.is_empty() {
        format!("reg {};", port.name)
    } else {
        format!("reg {range} {};", port.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface(width: usize) -> ModuleInterface {
        let mut module = Module::new(format!("adder_tree_2x{width}"));
        module.add_port("src0", PortDirection::Input, width);
        module.add_port("src1", PortDirection::Input, width);
        module.add_port("dst", PortDirection::Output, width + 1);
        module.interface()
    }

    #[test]
    fn test_wrapper_ports() {
        let gen = ShiftRegisterGenerator::new(interface(8)).unwrap();
        let iface = gen.interface();
        assert_eq!(iface.name, "adder_tree_2x8_shift");
        let names: Vec<_> = iface.ports.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["clk", "stream0", "stream1", "dst"]);
        assert_eq!(iface.ports[3].width, 9);
    }

    #[test]
    fn test_shift_statements() {
        let text = ShiftRegisterGenerator::new(interface(8)).unwrap().generate();
        assert!(text.starts_with("module adder_tree_2x8_shift (\n    input clk,\n"));
        assert!(text.contains("    output [8:0] dst\n);"));
        assert!(text.contains("    reg [7:0] src1;\n"));
        assert!(text.contains("adder_tree_2x8 inner (.src0(src0), .src1(src1), .dst(dst));"));
        assert!(text.contains("always @(posedge clk) begin"));
        assert!(text.contains("src0 <= {src0[6:0], stream0};"));
        assert!(text.contains("src1 <= {src1[6:0], stream1};"));
        assert!(text.contains("        src1 = 0;\n"));
    }

    #[test]
    fn test_single_bit_operands() {
        let text = ShiftRegisterGenerator::new(interface(1)).unwrap().generate();
        assert!(text.contains("    reg src0;\n"));
        assert!(text.contains("src0 <= stream0;"));
    }

    #[test]
    fn test_requires_inputs_and_outputs() {
        let mut module = Module::new("empty");
        module.add_port("dst", PortDirection::Output, 4);
        assert!(ShiftRegisterGenerator::new(module.interface()).is_err());

        let mut module = Module::new("sink");
        module.add_port("src0", PortDirection::Input, 4);
        assert!(ShiftRegisterGenerator::new(module.interface()).is_err());
    }
}
