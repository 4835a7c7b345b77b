//! Schema registry: the ordered fields, their kinds, option sets and ranges.

pub mod domain;
pub mod registry;

pub use domain::{FieldKind, FieldSpec, NumericRange, RangeTable, Schema, UNKNOWN};
pub use registry::hcc;
