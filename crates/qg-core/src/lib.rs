//! qg-core - Core library for Querygate
//!
//! This crate provides the schema metadata model shared by the DDL extractor
//! and the query validator, identifier normalization helpers, and the
//! `querygate.yml` configuration.

pub mod config;
pub mod error;
pub mod ident;
pub mod schema;

pub use config::{Config, Dialect, OutputFormat};
pub use error::{CoreError, CoreResult};
pub use schema::{Relation, SchemaMetadata, Table};
