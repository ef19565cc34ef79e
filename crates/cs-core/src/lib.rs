//! Cascade Statistics Core Library
//!
//! This library provides the analysis behind the `cs-core` binary:
//! - Time-bucketed smoothed entropy of reaction cascades
//! - The PHEME dataset walk that scores every cascade
//! - Node and edge counts of the heterogeneous graph
//! - Text embedding and token-length statistics
//! - Configuration loading, logging, exit codes and output rendering
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod dataset;
pub mod embed;
pub mod exit_codes;
pub mod graph;
pub mod logging;
pub mod output;
pub mod temporal;
