//! Netlist representation for multiadd LIR

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Netlist representation of a hardware design
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Netlist {
    /// Top-level module name
    pub top_module: String,
    /// All modules in the design, top module first
    pub modules: Vec<Module>,
}

/// Hardware module in the netlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    /// Module name
    pub name: String,
    /// Module ports, in declaration order
    pub ports: Vec<Port>,
    /// Internal nets
    pub nets: Vec<InternalNet>,
    /// Module instances
    pub instances: Vec<Instance>,
    /// Continuous assignments
    pub assigns: Vec<Assign>,
}

/// Module port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Port width
    pub width: usize,
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

/// Module instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name
    pub name: String,
    /// Module type being instantiated
    pub module_type: String,
    /// Parameter overrides, in emission order
    pub parameters: IndexMap<String, String>,
    /// Port connections
    pub connections: Vec<Connection>,
}

/// Port connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Port name on the instance
    pub port: String,
    /// Net expression connected to this port
    pub net: String,
}

/// Internal net within a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalNet {
    /// Net name
    pub name: String,
    /// Net width
    pub width: usize,
}

/// Continuous assignment `assign lhs = rhs;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assign {
    pub lhs: String,
    pub rhs: String,
}

/// Externally visible shape of a module: its name and ordered ports
///
/// This is all a wrapper or testbench needs to know about a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInterface {
    pub name: String,
    pub ports: Vec<Port>,
}

impl Netlist {
    /// Create a new empty netlist
    pub fn new(top_module: String) -> Self {
        Self {
            top_module,
            modules: Vec::new(),
        }
    }
}

impl Module {
    /// Create an empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_port(&mut self, name: impl Into<String>, direction: PortDirection, width: usize) {
        self.ports.push(Port {
            name: name.into(),
            direction,
            width,
        });
    }

    pub fn add_net(&mut self, name: impl Into<String>, width: usize) {
        self.nets.push(InternalNet {
            name: name.into(),
            width,
        });
    }

    pub fn add_assign(&mut self, lhs: impl Into<String>, rhs: impl Into<String>) {
        self.assigns.push(Assign {
            lhs: lhs.into(),
            rhs: rhs.into(),
        });
    }

    /// Name and ports of this module
    pub fn interface(&self) -> ModuleInterface {
        ModuleInterface {
            name: self.name.clone(),
            ports: self.ports.clone(),
        }
    }
}

impl Instance {
    /// Create an instance with no parameters or connections
    pub fn new(module_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_type: module_type.into(),
            parameters: IndexMap::new(),
            connections: Vec::new(),
        }
    }

    /// Builder-style parameter override
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Builder-style named port connection
    pub fn connect(mut self, port: impl Into<String>, net: impl Into<String>) -> Self {
        self.connections.push(Connection {
            port: port.into(),
            net: net.into(),
        });
        self
    }

    /// Net connected to `port`, if any
    pub fn connection(&self, port: &str) -> Option<&str> {
        self.connections
            .iter()
            .find(|c| c.port == port)
            .map(|c| c.net.as_str())
    }
}

impl Port {
    /// Verilog range for this port, `[w-1:0]`, or empty for single-bit ports
    pub fn range(&self) -> String {
        range(self.width)
    }
}

impl InternalNet {
    pub fn range(&self) -> String {
        range(self.width)
    }
}

impl ModuleInterface {
    /// Input ports in declaration order
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|p| p.direction == PortDirection::Input)
    }

    /// Output ports in declaration order
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|p| p.direction == PortDirection::Output)
    }
}

fn range(width: usize) -> String {
    if width <= 1 {
        String::new()
    } else {
        format!("[{}:0]", width - 1)
    }
}
