//! Structural Verilog writer
//!
//! Renders `multiadd_lir` modules. Declaration order inside a module does
//! not matter to Verilog tools, so nets, instances and assignments are
//! emitted in the order they were added.

use multiadd_lir::{Instance, Module, Netlist, Port, PortDirection};

/// Indented line writer shared by all generators
#[derive(Debug, Default)]
pub struct VerilogWriter {
    output: String,
    indent: usize,
}

impl VerilogWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_line(&mut self, s: &str) {
        if !s.is_empty() {
            self.output.push_str(&"    ".repeat(self.indent));
            self.output.push_str(s);
        }
        self.output.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.output.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// `module name (ports);` header, or `module name;` without ports
    pub fn emit_module_header(&mut self, name: &str, ports: &[Port]) {
        if ports.is_empty() {
            self.emit_line(&format!("module {name};"));
            return;
        }

        self.emit_line(&format!("module {name} ("));
        self.indent();
        for (i, port) in ports.iter().enumerate() {
            let comma = if i + 1 < ports.len() { "," } else { "" };
            self.emit_line(&format!("{}{}", declaration(port), comma));
        }
        self.dedent();
        self.emit_line(");");
    }

    pub fn emit_instance(&mut self, instance: &Instance) {
        let mut line = instance.module_type.clone();
        if !instance.parameters.is_empty() {
            let params: Vec<String> = instance
                .parameters
                .iter()
                .map(|(name, value)| format!(".{name}({value})"))
                .collect();
            line.push_str(&format!(" #({})", params.join(", ")));
        }
        let connections: Vec<String> = instance
            .connections
            .iter()
            .map(|c| format!(".{}({})", c.port, c.net))
            .collect();
        line.push_str(&format!(" {} ({});", instance.name, connections.join(", ")));
        self.emit_line(&line);
    }

    pub fn emit_module(&mut self, module: &Module) {
        self.emit_module_header(&module.name, &module.ports);
        self.indent();

        for net in &module.nets {
            self.emit_line(&wire(&net.range(), &net.name));
        }
        if !module.nets.is_empty() {
            self.blank_line();
        }

        for instance in &module.instances {
            self.emit_instance(instance);
        }
        if !module.instances.is_empty() && !module.assigns.is_empty() {
            self.blank_line();
        }

        for assign in &module.assigns {
            self.emit_line(&format!("assign {} = {};", assign.lhs, assign.rhs));
        }

        self.dedent();
        self.emit_line("endmodule");
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// `input [7:0] a` style port declaration
pub fn declaration(port: &Port) -> String {
    let direction = match port.direction {
        PortDirection::Input => "input",
        PortDirection::Output => "output",
    };
    let range = port.range();
    if range.is_empty() {
        format!("{direction} {}", port.name)
    } else {
        format!("{direction} {range} {}", port.name)
    }
}

fn wire(range: &str, name: &str) -> String {
    if range.is_empty() {
        format!("wire {name};")
    } else {
        format!("wire {range} {name};")
    }
}

/// Render one module
pub fn write_module(module: &Module) -> String {
    let mut writer = VerilogWriter::new();
    writer.emit_module(module);
    writer.finish()
}

/// Render every module of a netlist, separated by blank lines
pub fn write_netlist(netlist: &Netlist) -> String {
    let mut writer = VerilogWriter::new();
    for (i, module) in netlist.modules.iter().enumerate() {
        if i > 0 {
            writer.blank_line();
        }
        writer.emit_module(module);
    }
    writer.finish()
}
