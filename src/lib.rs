//! Rule Filter
//!
//! Prunes JSON Schema rule documents down to a set of retained property names.
//!
//! Given a rules document and the names to keep, the filter drops every
//! property definition, `required` entry and conditional branch that no longer
//! mentions a retained name. The input is left untouched; a new document is
//! returned.
//!
//! # Example
//!
//! ```
//! use rule_filter::{filter_rules, RetainSet};
//! use serde_json::json;
//!
//! let rules = json!({
//!     "type": "object",
//!     "properties": {
//!         "brand": { "type": "string" },
//!         "color": { "type": "string" }
//!     },
//!     "allOf": [{ "required": ["brand", "color"] }]
//! });
//!
//! let filtered = filter_rules(&rules, &RetainSet::new(["brand"])).unwrap();
//!
//! assert!(filtered["properties"].get("color").is_none());
//! assert_eq!(filtered["allOf"][0]["required"], json!(["brand"]));
//! ```
//!
//! # Pruning Rules
//!
//! | Key | Root level | Inside a condition |
//! |-----|------------|--------------------|
//! | `properties` | Keep retained entries | Keep retained entries |
//! | `allOf` | Prune each branch | Prune each branch |
//! | `required` | Copied | Keep retained entries |
//! | `anyOf` | Copied | Prune each branch |
//! | `if` / `then` / `else` / `not` | Copied | Prune, drop if irrelevant |
//! | anything else | Copied | Copied |
//!
//! Structural keys left empty by pruning are removed rather than kept empty.

mod error;
mod filter;
mod items;
mod loader;
mod types;
mod validator;

pub use error::{FilterError, LoadError, SchemaError, ValidateError};
pub use filter::{filter, filter_condition, filter_rules, filter_rules_with, is_relevant};
pub use items::parse_items;
pub use loader::{is_url, load_rules, load_rules_auto, load_rules_str};
pub use types::{json_type_name, FilterOptions, FilterResponse, RetainSet, DEFAULT_MAX_DEPTH};
pub use validator::{check_schema, validate_against_schema, validate_payload};

#[cfg(feature = "remote")]
pub use loader::load_rules_url;
