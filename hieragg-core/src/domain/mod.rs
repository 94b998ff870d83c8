//! Core domain types
//!
//! The structures exchanged between the miner (which builds them) and the
//! server and CLI (which serialize and display them).

pub mod event_log;
pub mod petri;
pub mod tree;
