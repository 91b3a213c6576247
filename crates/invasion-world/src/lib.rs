//! World simulation engine.
//!
//! This crate holds the city graph aliens roam, the map file format that
//! describes it, and the epoch engine that runs the invasion.

pub mod graph;
pub mod map;
pub mod simulation;

pub use graph::WorldGraph;
pub use map::WorldMap;
pub use simulation::{
    DestructionEvent, Placement, RunOutcome, RunSummary, Simulation, SurvivorData, Termination,
};
