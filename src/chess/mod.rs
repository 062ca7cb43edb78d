//! Implementation of the chess position, its text format and state
//! transitions.

pub mod bitboard;
pub mod core;
pub mod error;
pub mod notation;
pub mod position;
