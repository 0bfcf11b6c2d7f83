//! Builders to construct car park components from configuration.

pub mod pool_builder;

pub use pool_builder::PoolBuilder;
