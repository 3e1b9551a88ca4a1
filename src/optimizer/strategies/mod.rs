//! Dispatch model formulations
//!
//! - MILP: exact cost-minimising plan with binary on/off per period

pub mod milp;

pub use milp::*;
