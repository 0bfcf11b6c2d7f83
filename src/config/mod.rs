//! Configuration models for the car park simulation.

pub mod simulation;

pub use simulation::SimulationConfig;
