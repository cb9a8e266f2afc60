//! Experiment harness: loads the Cranfield collection, sweeps analyzer × scoring model
//! combinations, and reports retrieval metrics for each.

pub mod cranfield;
pub mod grid;
pub mod report;
