//! # ecsgen_schema
//!
//! The schema model every artifact is derived from.
//!
//! - [`decl`]: raw declarations as handed in by the extractor (or loaded
//!   from JSON).
//! - [`schema`]: the validated, immutable [`Schema`] and [`SchemaError`].

pub mod decl;
pub mod schema;

pub use decl::*;
pub use schema::{
    CommandSchema, ComponentSchema, ElementKind, FieldSchema, Schema, SchemaBuild, SchemaError,
    SystemSchema,
};
