//! Portable descriptions of data tasks
//!
//! A data task consumes named tabular resources and produces new ones. This
//! crate never touches the data itself: it validates a JSON description of the
//! resources, their columns and how each output column is derived, and turns it
//! into a canonical, fully resolved [`Task`].
//!
//! ```
//! use datatask::{Expr, Task};
//!
//! let task = Task::from_json(
//!     r#"{
//!         "resources": {"inv": "https://example.org/inventory.csv"},
//!         "inputs": {"inv": ["item", "quantity", "price"]},
//!         "outputs": {"report.csv": [
//!             {"inv": "item"},
//!             {"cost": {"$mul": [{"inv": "quantity"}, {"inv": "price"}]}}
//!         ]}
//!     }"#,
//! )?;
//!
//! let cost = &task.outputs()["report.csv"].schema()[1];
//! assert_eq!(cost.name(), Some("cost"));
//! assert!(matches!(cost, Expr::Alias { .. }));
//! assert_eq!(
//!     cost.to_string(),
//!     "cost = $mul(https://example.org/inventory.csv[1], https://example.org/inventory.csv[2])"
//! );
//! # Ok::<(), datatask::Error>(())
//! ```

pub mod builder;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod expr;
pub mod limits;
pub mod path;
pub mod reference;
mod resolver;
pub mod schema;
mod spec;
pub mod task;
pub mod value;

// Re-export main types
pub use builder::{Normalizer, NormalizerBuilder};
pub use codec::{decode, encode, encode_pretty};
pub use descriptor::{ColumnDescriptor, OPERATOR_SIGIL, ResourceScope};
pub use error::{Error, Result};
pub use expr::{ColumnRef, Expr};
pub use limits::{DEFAULT_MAX_DEPTH, Limits};
pub use path::DescriptorPath;
pub use reference::ReferenceTable;
pub use schema::{ColumnSelector, InputColumn, InputResource};
pub use task::{ColumnLineage, OutputResource, Task};
pub use value::RawValue;
