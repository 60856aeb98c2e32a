//! Command-line front end for class reference queries.
//!
//! - `unit`: the JSON compilation unit document and module construction
//! - `cli`: command implementations and the CLI error type
//! - `output`: JSON response types and the single output path

pub mod cli;
pub mod output;
pub mod unit;
