//! # Dispatch Simulation Module
//!
//! Turns per-period dispatch decisions into economic and storage time series.
//!
//! ## Components
//!
//! - **Assembler**: sequential fold over periods tracking storage level and
//!   cumulative cost per electricity source
//!
//! The same fold serves both the optimal plan and the renewable-only
//! baseline; each call starts from a fresh [`StorageLedger`].

pub mod assembler;

pub use assembler::{assemble_outcomes, StorageLedger};
