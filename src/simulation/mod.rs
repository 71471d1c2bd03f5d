//! Synthetic workloads for tests, benchmarks and the `generate` command.

pub mod stress_test;
