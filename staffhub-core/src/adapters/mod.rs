//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB file for the KeyValueStore port
//! - In-process map for the KeyValueStore port (tests, throwaway runs)
//! - Recording queue for the ViewHooks port
//! - Seed data for empty or corrupt stores

pub mod duckdb;
pub mod memory;
pub mod seed;
pub mod views;
