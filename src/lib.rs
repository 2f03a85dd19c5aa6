//! Traffic Light Simulation Library
//!
//! Simulates car arrivals at a single intersection with a fixed-cycle light
//! and summarizes how arrivals fall across the red and green phases.

pub mod simulation;
