//! Core domain concepts shared across all subdomains.

pub mod value;
