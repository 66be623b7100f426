//! Tool domain module
//!
//! Definitions, calls, results, and the catalog rendered into the system
//! prompt so the model knows what it can invoke.

pub mod catalog;
pub mod entities;
pub mod value_objects;
