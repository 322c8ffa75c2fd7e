//! Report Builder - Entity records to report documents
//!
//! Translates a selection of site or supplier records into a `Document`.
//! Which rows appear and in which order comes from the declared field tables
//! in [`fields`]; report options only decide whether a field shows its value
//! or the `Excluded` marker.

mod builder;
mod error;
pub mod fields;
mod options;
mod records;
mod request;

pub use builder::*;
pub use error::*;
pub use fields::{FieldGroup, FieldSpec, EXCLUDED};
pub use options::*;
pub use records::*;
pub use request::*;
