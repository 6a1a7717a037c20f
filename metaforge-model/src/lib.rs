//! Platform-independent meta-model for Metaforge.
//!
//! This crate owns the in-memory representation of the system being
//! generated (classes, attributes, stereotypes), the JSON reader that
//! produces it, and the semantic validator. The generation pipeline in
//! `metaforge-codegen` consumes the model read-only.

mod error;
mod model;
mod reader;
mod validate;

pub use error::{Error, Result};
pub use model::{Attribute, Datatype, MetaClass, MetaModel, ObjectDatatype, Stereotype};
pub use reader::{parse_file, parse_str, parse_str_with_filename};
pub use validate::{Issue, IssueSeverity, validate};
