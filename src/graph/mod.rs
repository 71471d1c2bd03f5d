//! Obligation graph construction and reduction.

pub mod cycle_detection;
pub mod extractor;
pub mod obligation_graph;
pub mod reducer;
