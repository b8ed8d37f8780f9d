//! GraphQL surface over the lead pipeline.

pub mod auth;
pub mod error;
pub mod schema;
pub mod seed;
pub mod types;

pub use schema::{build_schema, AppSchema};
