//! Data Transfer Objects for the HTTP API
//!
//! Request and response shapes shared by the server, the client and the CLI.

pub mod aggregate;
pub mod discovery;
