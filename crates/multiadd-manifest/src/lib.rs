//! multiadd manifest parsing
//!
//! This crate handles parsing and validation of `multiadd.toml` files, which
//! describe the tree to generate and which outputs to write.

pub mod error;
pub mod manifest;

pub use error::{ManifestError, Result};
pub use manifest::{Manifest, OutputConfig, TestbenchConfig, TreeConfig};

use std::path::Path;

/// Default manifest file name
pub const MANIFEST_FILE: &str = "multiadd.toml";

/// Parse and validate a manifest from a file path
pub fn from_path(path: impl AsRef<Path>) -> Result<Manifest> {
    let contents =
        std::fs::read_to_string(path.as_ref()).map_err(|e| ManifestError::Io(e.to_string()))?;
    from_str(&contents)
}

/// Parse and validate a manifest from a string
pub fn from_str(s: &str) -> Result<Manifest> {
    let manifest: Manifest = toml::from_str(s).map_err(|e| ManifestError::Parse(e.to_string()))?;
    manifest.validate()?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest() {
        let toml = r#"
            [tree]
            operand_width = 8
            operand_count = 5
        "#;

        let manifest = from_str(toml).unwrap();
        assert_eq!(manifest.tree.operand_width, 8);
        assert_eq!(manifest.tree.operand_count, 5);
        assert_eq!(manifest.output.dir, "build");
        assert!(!manifest.output.testbench);
        assert!(!manifest.output.shift_register);
        assert_eq!(manifest.testbench.vectors, 1000);
        assert_eq!(manifest.testbench.seed, 1);
    }

    #[test]
    fn test_missing_tree_section() {
        let err = from_str("[output]\ndir = \"out\"\n").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }
}
