//! Castellan engine library.
//!
//! Exposes the board representation, graph analysis, decision engine, and
//! protocol modules for use by integration tests and the binary entry
//! points.

pub mod analysis;
pub mod board;
pub mod commander;
pub mod protocol;
pub mod sim;
