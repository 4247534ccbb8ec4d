//! multiadd planning
//!
//! This crate handles:
//! - Validation of tree configurations
//! - Planning the binary reduction tree and its per-node bit growth
//! - Planning each two-operand adder as a LUT2/CARRY4 carry-lookahead chain
//! - Bit-level evaluation of the resulting plans
//!
//! ```
//! use multiadd_plan::Design;
//!
//! let design = Design::plan(8, 5).unwrap();
//! assert_eq!(design.tree.final_width(), 11);
//! assert_eq!(design.adders.len(), design.tree.catalogue().len());
//! ```

pub mod design;
pub mod error;
pub mod row_adder;
pub mod tree;
pub mod validate;

pub use design::Design;
pub use error::{ConfigurationError, EvaluationError};
pub use row_adder::{CarryBlock, CarryIn, RowAdderPlan};
pub use tree::{AdderWidthCatalogue, ChildInput, TreeNode, TreePlan, TreeSpec};
pub use validate::validate;
