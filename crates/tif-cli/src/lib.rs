//! tif CLI library
//!
//! Argument parsing, layered configuration and the conversion command behind
//! the `tif` binary.

pub mod cli;
pub mod config;
pub mod run;
