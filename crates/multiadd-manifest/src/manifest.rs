//! Manifest structure definitions

use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};

/// Complete `multiadd.toml` manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Tree to generate
    pub tree: TreeConfig,

    /// Output selection
    #[serde(default)]
    pub output: OutputConfig,

    /// Testbench stimulus settings
    #[serde(default)]
    pub testbench: TestbenchConfig,
}

/// Tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Width of every operand
    pub operand_width: usize,

    /// Number of operands
    pub operand_count: usize,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "build")
    #[serde(default = "default_out_dir")]
    pub dir: String,

    /// Also write a self-checking testbench
    #[serde(default)]
    pub testbench: bool,

    /// Also write a shift-register input wrapper
    #[serde(default)]
    pub shift_register: bool,
}

/// Testbench stimulus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestbenchConfig {
    /// Number of random vectors
    #[serde(default = "default_vectors")]
    pub vectors: usize,

    /// Seed for the random vectors
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_out_dir() -> String {
    "build".to_string()
}

fn default_vectors() -> usize {
    1000
}

fn default_seed() -> u64 {
    1
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            testbench: false,
            shift_register: false,
        }
    }
}

impl Default for TestbenchConfig {
    fn default() -> Self {
        Self {
            vectors: default_vectors(),
            seed: default_seed(),
        }
    }
}

impl Manifest {
    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        multiadd_plan::validate(self.tree.operand_width, self.tree.operand_count)?;

        if self.output.dir.trim().is_empty() {
            return Err(ManifestError::Validation(
                "Output directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
