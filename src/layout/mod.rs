//! Per-tick layout forces.
//!
//! Pure functions over entity bodies. The tick driver in `graph` gathers
//! neighbor bodies from the arena and applies the results.

pub mod kinematics;

pub use kinematics::{attraction, integrate, pull_toward};
